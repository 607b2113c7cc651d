use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use chrono::Local;
use tracing::{info, warn};

use crate::args::{ReportKind, RunArgs};
use crate::engine::{Engine, RunPolicy, RunState};
use crate::error::AppResult;
use crate::http::{RateLimiter, build_client};
use crate::report::{
    MarkdownResultWriter, MemoryReporter, PlainResultWriter, ReportResultWriter, TestReporter,
};
use crate::runner::HttpCaseRunner;
use crate::shutdown::StopSignal;
use crate::shutdown_handlers::setup_signal_shutdown_handler;
use crate::suite::load_suite;

/// Picks the writer for the requested report layout.
#[must_use]
pub fn result_writer<W>(kind: ReportKind, sink: W) -> Box<dyn ReportResultWriter>
where
    W: Write + 'static,
{
    match kind {
        ReportKind::Plain => Box::new(PlainResultWriter::new(sink)),
        ReportKind::Markdown => Box::new(MarkdownResultWriter::new(sink)),
    }
}

fn run_policy(args: &RunArgs) -> RunPolicy {
    RunPolicy {
        thread: args.thread,
        qps: args.qps,
        burst: args.burst,
        duration: args.duration,
        request_timeout: args.request_timeout,
        ignore_error: args.request_ignore_error,
        start_time: Local::now(),
    }
}

/// Runs `atest run` against stdout, cancelling on Ctrl-C or SIGTERM.
///
/// The elapsed time is printed whether or not the run succeeds.
///
/// # Errors
///
/// Returns the first error that aborts the run.
pub async fn execute_run(args: &RunArgs) -> AppResult<()> {
    let policy = run_policy(args);
    let start_time = policy.start_time;
    let cancel = StopSignal::new();
    let signal_task = setup_signal_shutdown_handler(&cancel);
    let reporter: Arc<dyn TestReporter> = Arc::new(MemoryReporter::new());
    let mut writer = result_writer(args.report_kind(), std::io::stdout());

    let result = run_suites(&args.pattern, policy, &cancel, reporter, writer.as_mut()).await;

    let consumed = Local::now()
        .signed_duration_since(start_time)
        .to_std()
        .unwrap_or_default();
    println!("consume: {:?}", consumed);
    signal_task.abort();
    result
}

/// Runs every suite matching `pattern`, then writes the collected report.
///
/// Suites run one after another, in path order. A cancelled run skips the
/// remaining suites but still writes what was collected.
///
/// # Errors
///
/// Returns an error when the pattern is invalid, a suite fails to load, a
/// suite run aborts, or the report cannot be written. No report is written
/// in that case.
pub async fn run_suites(
    pattern: &str,
    policy: RunPolicy,
    cancel: &StopSignal,
    reporter: Arc<dyn TestReporter>,
    writer: &mut dyn ReportResultWriter,
) -> AppResult<()> {
    let limiter = Arc::new(RateLimiter::new(policy.qps, policy.burst));
    let client = build_client(policy.request_timeout)?;
    let runner = Arc::new(HttpCaseRunner::new(client, reporter.clone()));
    let engine = Engine::new(policy, runner, limiter.clone(), cancel.clone());

    let result = run_matching(&engine, pattern).await;
    limiter.stop();
    result?;

    let results = reporter.export_all_report_results()?;
    writer.output(&results)?;
    Ok(())
}

async fn run_matching(engine: &Engine, pattern: &str) -> AppResult<()> {
    let mut matched: usize = 0;
    for entry in glob::glob(pattern)? {
        let path = entry?;
        matched = matched.saturating_add(1);
        if !run_file(engine, &path).await? {
            warn!("Run cancelled, skipping the remaining suites.");
            break;
        }
    }
    if matched == 0 {
        warn!("No test suite matches the pattern '{}'.", pattern);
    }
    Ok(())
}

/// Returns `false` once the run has been cancelled.
async fn run_file(engine: &Engine, path: &Path) -> AppResult<bool> {
    let suite = load_suite(path)?;
    info!("Loaded suite '{}' from {}", suite.name, path.display());
    let outcome = engine.run_suite(Arc::new(suite)).await?;
    Ok(outcome.state != RunState::Aborted)
}
