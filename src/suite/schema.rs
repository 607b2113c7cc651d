use jsonschema::Validator;
use once_cell::sync::Lazy;
use serde_json::Value;

use crate::error::SuiteError;

/// JSON Schema every suite document must satisfy.
pub const SUITE_SCHEMA: &str = include_str!("schema.json");

static SUITE_VALIDATOR: Lazy<Result<Validator, String>> = Lazy::new(|| {
    let schema: Value = serde_json::from_str(SUITE_SCHEMA).map_err(|err| err.to_string())?;
    jsonschema::validator_for(&schema).map_err(|err| err.to_string())
});

/// Validates a suite document (already converted to JSON) against [`SUITE_SCHEMA`].
///
/// # Errors
///
/// Returns an error listing every violation, or if the embedded schema
/// itself fails to compile.
pub fn validate_suite_document(document: &Value) -> Result<(), SuiteError> {
    let validator = SUITE_VALIDATOR
        .as_ref()
        .map_err(|message| SuiteError::InvalidSchemaDocument {
            message: message.clone(),
        })?;
    let errors = schema_errors(validator, document);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(SuiteError::SchemaViolation {
            errors: errors.join("; "),
        })
    }
}

/// Collects every violation of `instance` as `<path>: <message>`.
pub(crate) fn schema_errors(validator: &Validator, instance: &Value) -> Vec<String> {
    validator
        .iter_errors(instance)
        .map(|err| {
            let path = err.instance_path.to_string();
            let path = if path.is_empty() { "/".to_owned() } else { path };
            format!("{}: {}", path, err)
        })
        .collect()
}
