use std::time::Duration;

use serde::Deserialize;

use crate::args::parse_duration_value;
use crate::error::ValidationError;

/// Defaults for `atest run`, keyed like the long flags with `_` for `-`.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    pub pattern: Option<String>,
    pub duration: Option<DurationValue>,
    #[serde(alias = "timeout")]
    pub request_timeout: Option<DurationValue>,
    pub request_ignore_error: Option<bool>,
    pub thread: Option<usize>,
    pub qps: Option<u32>,
    pub burst: Option<u32>,
    pub report: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self) -> Result<Duration, ValidationError> {
        match self {
            DurationValue::Seconds(secs) => Ok(Duration::from_secs(*secs)),
            DurationValue::Text(text) => parse_duration_value(text),
        }
    }
}
