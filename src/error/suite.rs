use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SuiteError {
    #[error("Failed to read suite '{path}': {source}")]
    ReadSuite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse suite YAML: {source}")]
    ParseYaml {
        #[source]
        source: serde_yaml::Error,
    },
    #[error("Failed to parse suite '{path}': {source}")]
    ParseSuite {
        path: PathBuf,
        #[source]
        source: Box<SuiteError>,
    },
    #[error("Having duplicated name '{name}'.")]
    DuplicatedName { name: String },
    #[error("Suite schema document is invalid: {message}")]
    InvalidSchemaDocument { message: String },
    #[error("Suite does not match the schema: {errors}")]
    SchemaViolation { errors: String },
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[cfg(test)]
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to render {field} '{template}': {message}")]
    Template {
        field: String,
        template: String,
        message: String,
    },
    #[error("Failed to build template context: {message}")]
    Context { message: String },
    #[error("Failed to read body file '{path}': {source}")]
    ReadBodyFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
