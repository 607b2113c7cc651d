mod run;


use std::io::Write;

use clap::{ArgMatches, CommandFactory, FromArgMatches};

use crate::args::{Cli, Command};
use crate::config::{apply_config, load_config};
use crate::error::{AppError, AppResult, ValidationError};
use crate::suite::{SAMPLE_SUITE, SUITE_SCHEMA};

pub use run::{execute_run, result_writer, run_suites};

/// Parses the process arguments and runs the selected command.
///
/// # Errors
///
/// Returns the first error that aborts the command.
pub fn run() -> AppResult<()> {
    let (cli, matches) = parse_args()?;

    crate::logger::init_logging(cli.verbose, cli.no_color);

    match cli.command {
        Command::Sample => print_document(SAMPLE_SUITE),
        Command::JsonSchema => print_document(SUITE_SCHEMA),
        Command::Run(mut args) => {
            if let Some(config) = load_config(cli.config.as_deref())?
                && let Some((_, run_matches)) = matches.subcommand()
            {
                apply_config(&mut args, run_matches, &config)?;
            }

            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .map_err(|err| {
                    AppError::validation(ValidationError::RuntimeBuildFailed { source: err })
                })?;
            runtime.block_on(execute_run(&args))
        }
    }
}

fn parse_args() -> AppResult<(Cli, ArgMatches)> {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches)?;
    Ok((cli, matches))
}

fn print_document(document: &str) -> AppResult<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(document.as_bytes())?;
    if !document.ends_with('\n') {
        stdout.write_all(b"\n")?;
    }
    stdout.flush()?;
    Ok(())
}
