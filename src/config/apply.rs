use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::{PositiveUsize, RunArgs};
use crate::error::{AppError, AppResult, ConfigError};

use super::types::{ConfigFile, DurationValue};

fn is_cli(matches: &ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(ValueSource::CommandLine)
}

fn ensure_positive_usize(value: usize, field: &str) -> AppResult<PositiveUsize> {
    PositiveUsize::try_from(value).map_err(|err| {
        AppError::config(ConfigError::FieldMustBePositive {
            field: field.to_owned(),
            source: err,
        })
    })
}

fn config_duration(value: &DurationValue, field: &str) -> AppResult<std::time::Duration> {
    value.to_duration().map_err(|err| {
        AppError::config(ConfigError::InvalidDuration {
            field: field.to_owned(),
            source: err,
        })
    })
}

/// Applies config file values to `run` arguments that were not given on the
/// command line.
///
/// `matches` are the matches of the `run` subcommand.
///
/// # Errors
///
/// Returns an error when a config value is invalid.
pub fn apply_config(args: &mut RunArgs, matches: &ArgMatches, config: &ConfigFile) -> AppResult<()> {
    if !is_cli(matches, "pattern")
        && let Some(pattern) = config.pattern.clone()
    {
        args.pattern = pattern;
    }

    if !is_cli(matches, "duration")
        && let Some(duration) = config.duration.as_ref()
    {
        args.duration = config_duration(duration, "duration")?;
    }

    if !is_cli(matches, "request_timeout")
        && let Some(timeout) = config.request_timeout.as_ref()
    {
        args.request_timeout = config_duration(timeout, "request_timeout")?;
    }

    if !is_cli(matches, "request_ignore_error")
        && let Some(ignore) = config.request_ignore_error
    {
        args.request_ignore_error = ignore;
    }

    if !is_cli(matches, "thread")
        && let Some(thread) = config.thread
    {
        args.thread = ensure_positive_usize(thread, "thread")?;
    }

    if !is_cli(matches, "qps")
        && let Some(qps) = config.qps
    {
        args.qps = qps;
    }

    if !is_cli(matches, "burst")
        && let Some(burst) = config.burst
    {
        args.burst = burst;
    }

    if !is_cli(matches, "report")
        && let Some(report) = config.report.clone()
    {
        args.report = report;
    }

    Ok(())
}
