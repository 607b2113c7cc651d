//! CLI argument types and parsing helpers.
mod cli;
mod defaults;
pub(crate) mod parsers;
mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use cli::{Cli, Command, RunArgs};
pub use types::{PositiveUsize, ReportKind};

pub(crate) use defaults::{CONFIG_FILE_STEM, DEFAULT_USER_AGENT};
pub(crate) use parsers::parse_duration_value;
