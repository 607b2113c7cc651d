use tracing_subscriber::{EnvFilter, FmtSubscriber};

const LOG_ENV: &str = "ATEST_LOG";

fn default_filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    }
}

/// Installs the global subscriber, logging to stderr so stdout carries only
/// command output.
///
/// The filter comes from `ATEST_LOG`, then `RUST_LOG`; `verbose` only picks
/// the fallback level. Later calls keep the first subscriber.
pub fn init_logging(verbose: bool, no_color: bool) {
    if tracing::dispatcher::has_been_set() {
        return;
    }
    let filter = std::env::var(LOG_ENV)
        .or_else(|_missing| std::env::var("RUST_LOG"))
        .map_or_else(
            |_missing| default_filter(verbose),
            |value| EnvFilter::try_new(value).unwrap_or_else(|_invalid| default_filter(verbose)),
        );

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_ansi(!no_color)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set global default subscriber: {}", err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_logging_is_idempotent() {
        init_logging(false, true);
        init_logging(true, false);
    }
}
