//! Bounded, cancellable execution of one suite under a run policy.
mod context;
mod pass;
mod policy;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

use crate::error::EngineError;
use crate::http::RateLimiter;
use crate::runner::CaseRunner;
use crate::shutdown::StopSignal;
use crate::suite::TestSuite;

pub use context::DataContext;
pub use policy::{RunOutcome, RunPolicy, RunState};

use pass::{PassShared, run_pass};

/// Drives passes over a suite until it is exhausted, times out, fails or is
/// cancelled.
pub struct Engine {
    policy: RunPolicy,
    runner: Arc<dyn CaseRunner>,
    limiter: Arc<RateLimiter>,
    cancel: StopSignal,
}

impl Engine {
    #[must_use]
    pub const fn new(
        policy: RunPolicy,
        runner: Arc<dyn CaseRunner>,
        limiter: Arc<RateLimiter>,
        cancel: StopSignal,
    ) -> Self {
        Self {
            policy,
            runner,
            limiter,
            cancel,
        }
    }

    /// Runs `suite` under the engine policy.
    ///
    /// With a zero duration exactly one pass runs. Otherwise passes are
    /// dispatched until the duration elapses, bounded by the thread count.
    /// Every dispatched pass is drained before this returns, so nothing
    /// touches the run's data context afterwards.
    ///
    /// # Errors
    ///
    /// Returns the first fatal case failure of any pass, or a worker failure.
    pub async fn run_suite(&self, suite: Arc<TestSuite>) -> Result<RunOutcome, EngineError> {
        let data = Arc::new(DataContext::new());
        let stop = StopSignal::new();
        let shared = PassShared {
            runner: self.runner.clone(),
            limiter: self.limiter.clone(),
            data: data.clone(),
            stop: stop.clone(),
            cancel: self.cancel.clone(),
            timeout: self.policy.request_timeout,
            ignore_error: self.policy.ignore_error,
        };
        let permits = Arc::new(Semaphore::new(self.policy.thread.get()));
        let mut workers: JoinSet<Result<(), EngineError>> = JoinSet::new();
        let once = self.policy.duration.is_zero() || suite.items.is_empty();
        let mut state = RunState::Running;
        let mut passes: usize = 0;
        let mut first_error: Option<EngineError> = None;

        info!(
            "Running suite '{}' with {} case(s), {} thread(s)",
            suite.name,
            suite.items.len(),
            self.policy.thread.get()
        );

        let duration = self.policy.duration;
        let deadline = async {
            if duration.is_zero() {
                std::future::pending::<()>().await;
            } else {
                tokio::time::sleep(duration).await;
            }
        };
        tokio::pin!(deadline);

        loop {
            if once && passes > 0 {
                break;
            }
            tokio::select! {
                biased;
                () = self.cancel.triggered() => {
                    state = RunState::Aborted;
                    break;
                }
                () = &mut deadline => {
                    debug!("Suite '{}' reached its duration of {:?}", suite.name, duration);
                    state = RunState::TimedOut;
                    break;
                }
                Some(joined) = workers.join_next() => {
                    if let Err(err) = flatten_join(joined) {
                        first_error = Some(err);
                        break;
                    }
                }
                permit = permits.clone().acquire_owned() => {
                    let Ok(permit) = permit else {
                        first_error = Some(EngineError::PoolClosed);
                        break;
                    };
                    passes = passes.saturating_add(1);
                    let shared = shared.clone();
                    let suite = suite.clone();
                    workers.spawn(async move {
                        let _permit = permit;
                        run_pass(&shared, &suite).await
                    });
                }
            }
        }

        if state != RunState::Running || first_error.is_some() {
            stop.trigger();
        }
        while let Some(joined) = workers.join_next().await {
            if let Err(err) = flatten_join(joined)
                && first_error.is_none()
            {
                stop.trigger();
                first_error = Some(err);
            }
        }

        if let Some(err) = first_error {
            error!("Suite '{}' aborted: {}", suite.name, err);
            return Err(err);
        }
        if self.cancel.is_triggered() {
            state = RunState::Aborted;
        } else if state == RunState::Running {
            state = RunState::Completed;
        }
        info!(
            "Suite '{}' finished as {:?} after {} pass(es), {} output(s) captured",
            suite.name,
            state,
            passes,
            data.len()
        );
        Ok(RunOutcome { state, passes })
    }
}

fn flatten_join(
    joined: Result<Result<(), EngineError>, tokio::task::JoinError>,
) -> Result<(), EngineError> {
    joined.map_err(|err| EngineError::WorkerFailed { source: err })?
}
