mod app;
mod case;
mod config;
mod engine;
mod report;
mod suite;
mod validation;

#[cfg(test)]
mod test_support;

pub use app::{AppError, AppResult};
pub use case::CaseError;
pub use config::ConfigError;
pub use engine::EngineError;
pub use report::ReportError;
pub use suite::{RenderError, SuiteError};
pub use validation::ValidationError;

/// Joins an error and its `source()` chain into one line.
///
/// Template and schema libraries keep the useful detail in nested sources, so
/// the top-level `Display` alone is rarely enough to diagnose a failure.
#[must_use]
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.contains(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }
    message
}
