use thiserror::Error;

use super::{
    CaseError, ConfigError, EngineError, RenderError, ReportError, SuiteError, ValidationError,
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("CLI error: {source}")]
    Clap {
        #[from]
        source: clap::Error,
    },
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
    #[error("HTTP client error: {source}")]
    Reqwest {
        #[from]
        source: reqwest::Error,
    },
    #[error("Join error: {source}")]
    Join {
        #[from]
        source: tokio::task::JoinError,
    },
    #[error("Invalid pattern: {source}")]
    Pattern {
        #[from]
        source: glob::PatternError,
    },
    #[error("Failed to resolve pattern entry: {source}")]
    Glob {
        #[from]
        source: glob::GlobError,
    },
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Suite error: {0}")]
    Suite(#[from] SuiteError),
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
    #[error("Case error: {0}")]
    Case(#[from] CaseError),
    #[error("Run error: {0}")]
    Engine(#[from] EngineError),
    #[error("Report error: {0}")]
    Report(#[from] ReportError),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn validation<E>(error: E) -> Self
    where
        E: Into<ValidationError>,
    {
        error.into().into()
    }

    pub fn config<E>(error: E) -> Self
    where
        E: Into<ConfigError>,
    {
        error.into().into()
    }

    pub fn suite<E>(error: E) -> Self
    where
        E: Into<SuiteError>,
    {
        error.into().into()
    }

    pub fn engine<E>(error: E) -> Self
    where
        E: Into<EngineError>,
    {
        error.into().into()
    }

    pub fn report<E>(error: E) -> Self
    where
        E: Into<ReportError>,
    {
        error.into().into()
    }
}
