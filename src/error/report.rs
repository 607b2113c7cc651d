use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to format report: {source}")]
    Format {
        #[source]
        source: std::fmt::Error,
    },
    #[error("Failed to write report: {source}")]
    Write {
        #[source]
        source: std::io::Error,
    },
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
