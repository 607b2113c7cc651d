use clap::{Args, Parser, Subcommand};
use std::time::Duration;

use super::defaults::{
    DEFAULT_BURST, DEFAULT_DURATION, DEFAULT_PATTERN, DEFAULT_QPS, DEFAULT_REQUEST_TIMEOUT,
    DEFAULT_THREAD,
};
use super::parsers::{parse_bool_env, parse_duration_arg, parse_positive_usize};
use super::types::{PositiveUsize, ReportKind};

#[derive(Debug, Parser, Clone)]
#[clap(
    name = "atest",
    version,
    about = "Run declarative API test suites described in YAML."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging (sets log level to debug unless overridden by ATEST_LOG/RUST_LOG)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Disable color output
    #[arg(long = "no-color", env = "NO_COLOR", value_parser = parse_bool_env, global = true)]
    pub no_color: bool,

    /// Path to config file (TOML/JSON). Defaults to ./atest.toml or ./atest.json if present.
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the test suites matching a file pattern
    #[command(visible_alias = "r")]
    Run(RunArgs),
    /// Print the JSON schema of the test suite file
    JsonSchema,
    /// Print a sample test suite
    Sample,
}

#[derive(Debug, Args, Clone)]
pub struct RunArgs {
    /// File pattern of the test suites to execute
    #[arg(long, short = 'p', default_value = DEFAULT_PATTERN)]
    pub pattern: String,

    /// Running duration; 0 runs each suite once (supports ms/s/m/h, e.g. 1m30s)
    #[arg(long, default_value = DEFAULT_DURATION, value_parser = parse_duration_arg)]
    pub duration: Duration,

    /// Timeout for each request; 0 disables it (supports ms/s/m/h)
    #[arg(long = "request-timeout", default_value = DEFAULT_REQUEST_TIMEOUT, value_parser = parse_duration_arg)]
    pub request_timeout: Duration,

    /// Keep going when a request or its expectations fail
    #[arg(long = "request-ignore-error")]
    pub request_ignore_error: bool,

    /// Maximum number of concurrent passes over a suite
    #[arg(long, default_value = DEFAULT_THREAD, value_parser = parse_positive_usize)]
    pub thread: PositiveUsize,

    /// Requests per second across all passes; 0 disables rate limiting
    #[arg(long, default_value_t = DEFAULT_QPS)]
    pub qps: u32,

    /// Requests allowed in a burst above the rate
    #[arg(long, default_value_t = DEFAULT_BURST)]
    pub burst: u32,

    /// Report format (markdown/md, otherwise plain text)
    #[arg(long, default_value = "")]
    pub report: String,
}

impl RunArgs {
    #[must_use]
    pub fn report_kind(&self) -> ReportKind {
        ReportKind::from_name(&self.report)
    }
}
