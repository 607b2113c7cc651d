use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{CaseError, EngineError};
use crate::http::RateLimiter;
use crate::runner::{CaseContext, CaseRunner};
use crate::shutdown::StopSignal;
use crate::suite::{TestSuite, render};

use super::context::DataContext;

#[derive(Clone)]
pub(super) struct PassShared {
    pub(super) runner: Arc<dyn CaseRunner>,
    pub(super) limiter: Arc<RateLimiter>,
    pub(super) data: Arc<DataContext>,
    pub(super) stop: StopSignal,
    pub(super) cancel: StopSignal,
    pub(super) timeout: Duration,
    pub(super) ignore_error: bool,
}

impl PassShared {
    fn halted(&self) -> bool {
        self.stop.is_triggered() || self.cancel.is_triggered()
    }

    async fn admit(&self) -> bool {
        tokio::select! {
            biased;
            () = self.cancel.triggered() => false,
            () = self.stop.triggered() => false,
            accepted = self.limiter.accept() => accepted,
        }
    }
}

/// Runs every case of `suite` once, in declared order.
pub(super) async fn run_pass(shared: &PassShared, suite: &TestSuite) -> Result<(), EngineError> {
    let started = Instant::now();
    let base_api = render("base api", &suite.api, &shared.data.snapshot()).map_err(|err| {
        EngineError::BaseApi {
            suite: suite.name.clone(),
            source: err,
        }
    })?;
    let base_api = base_api.trim_end_matches('/');
    let mut executed: usize = 0;

    for template in &suite.items {
        if shared.halted() || !shared.admit().await {
            break;
        }

        let mut case = template.clone();
        let snapshot = shared.data.snapshot();
        let context = CaseContext {
            suite: &suite.name,
            base_api,
            data: &snapshot,
            timeout: shared.timeout,
            cancel: &shared.cancel,
        };
        let result = shared.runner.run_case(&mut case, context).await;
        executed = executed.saturating_add(1);

        let output = match result {
            Ok(output) => output,
            Err(CaseError::Cancelled) => break,
            Err(err) if shared.ignore_error && err.is_ignorable() => {
                warn!(
                    "Ignoring failure of case '{}' in suite '{}': {}",
                    case.name, suite.name, err
                );
                Value::Null
            }
            Err(err) => {
                return Err(EngineError::CaseFailed {
                    suite: suite.name.clone(),
                    case: case.name,
                    source: err,
                });
            }
        };
        shared.data.insert(case.name, output);
    }

    debug!(
        "Pass over suite '{}' finished: {} case(s) in {:?}",
        suite.name,
        executed,
        started.elapsed()
    );
    Ok(())
}
