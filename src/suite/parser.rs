use std::collections::BTreeSet;
use std::path::Path;

use serde_json::Value;

use crate::error::SuiteError;

use super::schema::validate_suite_document;
use super::types::{TestCase, TestSuite};

/// Reads, parses and schema-validates a suite file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not valid YAML, repeats a
/// case name, or violates the suite schema.
pub fn parse(path: &Path) -> Result<TestSuite, SuiteError> {
    let data = std::fs::read(path).map_err(|err| SuiteError::ReadSuite {
        path: path.to_path_buf(),
        source: err,
    })?;
    parse_and_validate(&data).map_err(|err| SuiteError::ParseSuite {
        path: path.to_path_buf(),
        source: Box::new(err),
    })
}

/// Loads a suite for execution: [`parse`] plus resolution of `prepare`
/// paths against the suite file's directory.
///
/// # Errors
///
/// Returns an error under the same conditions as [`parse`].
pub fn load_suite(path: &Path) -> Result<TestSuite, SuiteError> {
    let mut suite = parse(path)?;
    let dir = path.parent().unwrap_or_else(|| Path::new(""));
    for case in &mut suite.items {
        for entry in &mut case.prepare.kubernetes {
            *entry = dir.join(&*entry).to_string_lossy().into_owned();
        }
    }
    Ok(suite)
}

fn parse_and_validate(data: &[u8]) -> Result<TestSuite, SuiteError> {
    let suite = parse_from_data(data)?;
    let document: Value =
        serde_yaml::from_slice(data).map_err(|err| SuiteError::ParseYaml { source: err })?;
    validate_suite_document(&document)?;
    Ok(suite)
}

/// Parses suite YAML without schema validation.
///
/// # Errors
///
/// Returns an error if the data is not a suite document or two cases share a
/// name.
pub fn parse_from_data(data: &[u8]) -> Result<TestSuite, SuiteError> {
    let suite: TestSuite =
        serde_yaml::from_slice(data).map_err(|err| SuiteError::ParseYaml { source: err })?;

    let mut names = BTreeSet::new();
    for item in &suite.items {
        if !names.insert(item.name.as_str()) {
            return Err(SuiteError::DuplicatedName {
                name: item.name.clone(),
            });
        }
    }
    Ok(suite)
}

/// Parses a single test case document.
///
/// # Errors
///
/// Returns an error if the data is not a test case document.
pub fn parse_test_case_from_data(data: &[u8]) -> Result<TestCase, SuiteError> {
    serde_yaml::from_slice(data).map_err(|err| SuiteError::ParseYaml { source: err })
}
