use std::time::Duration;

use chrono::{DateTime, Local};

use crate::args::PositiveUsize;

/// Limits and error handling applied to every suite of an invocation.
#[derive(Debug, Clone)]
pub struct RunPolicy {
    /// Maximum number of passes in flight.
    pub thread: PositiveUsize,
    pub qps: u32,
    pub burst: u32,
    /// Zero runs a single pass.
    pub duration: Duration,
    pub request_timeout: Duration,
    pub ignore_error: bool,
    pub start_time: DateTime<Local>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RunState {
    #[default]
    Idle,
    Running,
    Completed,
    TimedOut,
    Aborted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    pub state: RunState,
    /// Passes dispatched, including any cut short.
    pub passes: usize,
}
