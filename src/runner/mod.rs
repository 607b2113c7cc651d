//! Single test case execution.
mod http;


use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::CaseError;
use crate::shutdown::StopSignal;
use crate::suite::TestCase;

pub use http::HttpCaseRunner;

/// Per-call inputs a runner needs besides the case itself.
#[derive(Debug, Clone, Copy)]
pub struct CaseContext<'run> {
    pub suite: &'run str,
    /// Rendered suite base API, without a trailing `/`.
    pub base_api: &'run str,
    /// Snapshot of the outputs captured so far in this run.
    pub data: &'run Value,
    /// Zero disables the per-request timeout.
    pub timeout: Duration,
    /// Run-wide cancellation; an in-flight case ends with [`CaseError::Cancelled`].
    pub cancel: &'run StopSignal,
}

#[async_trait]
pub trait CaseRunner: Send + Sync {
    /// Executes one case and returns its captured output.
    ///
    /// The case is mutated in place: its API is prefixed and every templated
    /// field is rendered.
    ///
    /// # Errors
    ///
    /// Returns an error when rendering, the HTTP exchange, or a response
    /// expectation fails, and [`CaseError::Cancelled`] once the run is
    /// cancelled while the case is in flight.
    async fn run_case(
        &self,
        case: &mut TestCase,
        context: CaseContext<'_>,
    ) -> Result<Value, CaseError>;
}
