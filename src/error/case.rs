use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use super::RenderError;

#[derive(Debug, Error)]
pub enum CaseError {
    #[error("{0}")]
    Render(#[from] RenderError),
    #[error("Invalid HTTP method '{method}'.")]
    InvalidMethod { method: String },
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Failed to read body file '{path}': {source}")]
    ReadBodyFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to build request: {source}")]
    BuildRequest {
        #[source]
        source: reqwest::Error,
    },
    #[error("Request to '{url}' timed out after {timeout:?}.")]
    Timeout { url: String, timeout: Duration },
    #[error("Request to '{url}' failed: {message}")]
    Transport { url: String, message: String },
    #[error("Failed to read response body from '{url}': {source}")]
    ReadResponse {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Status code {actual} does not match the expected {expected}.")]
    StatusMismatch { expected: u16, actual: u16 },
    #[error("Header '{name}' is '{actual}', expected '{expected}'.")]
    HeaderMismatch {
        name: String,
        expected: String,
        actual: String,
    },
    #[error("Expected header '{name}' is missing.")]
    HeaderMissing { name: String },
    #[error("Expected schema is not valid JSON: {source}")]
    SchemaParse {
        #[source]
        source: serde_json::Error,
    },
    #[error("Expected schema cannot be compiled: {message}")]
    SchemaCompile { message: String },
    #[error("Response body is not valid JSON: {source}")]
    ResponseNotJson {
        #[source]
        source: serde_json::Error,
    },
    #[error("Response body does not match the schema: {errors}")]
    SchemaMismatch { errors: String },
    #[error("Cancelled before the case finished.")]
    Cancelled,
}

impl CaseError {
    /// Whether ignore-error mode is allowed to skip past this failure.
    ///
    /// Every case failure is, except cancellation, which ends the run.
    #[must_use]
    pub const fn is_ignorable(&self) -> bool {
        match self {
            Self::Cancelled => false,
            Self::Render(_)
            | Self::InvalidMethod { .. }
            | Self::InvalidUrl { .. }
            | Self::ReadBodyFile { .. }
            | Self::BuildRequest { .. }
            | Self::Timeout { .. }
            | Self::Transport { .. }
            | Self::ReadResponse { .. }
            | Self::StatusMismatch { .. }
            | Self::HeaderMismatch { .. }
            | Self::HeaderMissing { .. }
            | Self::SchemaParse { .. }
            | Self::SchemaCompile { .. }
            | Self::ResponseNotJson { .. }
            | Self::SchemaMismatch { .. } => true,
        }
    }
}
