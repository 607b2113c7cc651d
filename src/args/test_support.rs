use clap::Parser;

use crate::error::{AppError, AppResult};

use super::Cli;

pub(crate) fn parse_test_args<I, T>(args: I) -> AppResult<Cli>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args).map_err(AppError::from)
}
