use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::AbortHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};

const MIN_REFILL_PERIOD: Duration = Duration::from_millis(1);

/// Token-bucket admission gate shared by every worker of a run.
///
/// Tokens are permits of a semaphore topped up by a background task at `qps`
/// tokens per second, never beyond `burst` banked tokens. A limiter built
/// with `qps == 0` is pass-through.
#[derive(Debug)]
pub struct RateLimiter {
    permits: Option<Arc<Semaphore>>,
    refill: Option<AbortHandle>,
}

impl RateLimiter {
    /// Builds a limiter and starts its refill task.
    ///
    /// A burst of 0 is treated as 1. The bucket starts full so the first
    /// `burst` callers are admitted immediately. Must be called from within
    /// a Tokio runtime unless `qps` is 0.
    #[must_use]
    pub fn new(qps: u32, burst: u32) -> Self {
        if qps == 0 {
            return Self::pass_through();
        }
        let capacity = usize::try_from(burst.max(1)).unwrap_or(usize::MAX);
        let permits = Arc::new(Semaphore::new(capacity));
        let refill = spawn_refill(permits.clone(), capacity, RefillSchedule::new(qps));
        Self {
            permits: Some(permits),
            refill: Some(refill),
        }
    }

    /// A limiter that admits every caller without waiting.
    #[must_use]
    pub const fn pass_through() -> Self {
        Self {
            permits: None,
            refill: None,
        }
    }

    #[must_use]
    pub const fn is_pass_through(&self) -> bool {
        self.permits.is_none()
    }

    /// Waits for a token.
    ///
    /// Returns `false` once the limiter has been stopped, including for
    /// callers that were already waiting.
    pub async fn accept(&self) -> bool {
        let Some(permits) = self.permits.as_ref() else {
            return true;
        };
        match permits.acquire().await {
            Ok(permit) => {
                permit.forget();
                true
            }
            Err(_) => false,
        }
    }

    /// Stops the refill task and releases every waiting caller.
    ///
    /// Safe to call repeatedly.
    pub fn stop(&self) {
        if let Some(refill) = self.refill.as_ref() {
            refill.abort();
        }
        if let Some(permits) = self.permits.as_ref() {
            permits.close();
        }
    }
}

impl Drop for RateLimiter {
    fn drop(&mut self) {
        if let Some(refill) = self.refill.as_ref() {
            refill.abort();
        }
    }
}

/// When and how much the refill task tops up.
///
/// Each tick grants the tokens owed since the start, so rates above one
/// token per millisecond keep their fractional remainder instead of
/// truncating it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct RefillSchedule {
    pub(super) period: Duration,
    qps: u64,
    ticks_per_sec: u64,
}

impl RefillSchedule {
    pub(super) fn new(qps: u32) -> Self {
        let qps = qps.max(1);
        let period = Duration::from_secs(1)
            .checked_div(qps)
            .unwrap_or(MIN_REFILL_PERIOD);
        if period >= MIN_REFILL_PERIOD {
            return Self {
                period,
                qps: u64::from(qps),
                ticks_per_sec: u64::from(qps),
            };
        }
        let ticks_per_sec = u64::try_from(
            Duration::from_secs(1)
                .as_nanos()
                .checked_div(MIN_REFILL_PERIOD.as_nanos())
                .unwrap_or(1),
        )
        .unwrap_or(1);
        Self {
            period: MIN_REFILL_PERIOD,
            qps: u64::from(qps),
            ticks_per_sec,
        }
    }

    /// Tokens granted in total after `ticks` ticks.
    pub(super) fn owed(&self, ticks: u64) -> u64 {
        ticks
            .saturating_mul(self.qps)
            .checked_div(self.ticks_per_sec)
            .unwrap_or(ticks)
    }
}

fn spawn_refill(
    permits: Arc<Semaphore>,
    capacity: usize,
    schedule: RefillSchedule,
) -> AbortHandle {
    let handle = tokio::spawn(async move {
        let start = Instant::now();
        let first = start.checked_add(schedule.period).unwrap_or(start);
        let mut refill_tick = interval_at(first, schedule.period);
        refill_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut ticks: u64 = 0;
        let mut granted: u64 = 0;
        loop {
            refill_tick.tick().await;
            if permits.is_closed() {
                break;
            }
            ticks = ticks.saturating_add(1);
            let owed = schedule.owed(ticks);
            let due = usize::try_from(owed.saturating_sub(granted)).unwrap_or(usize::MAX);
            granted = owed;
            let available = permits.available_permits();
            if available < capacity && due > 0 {
                permits.add_permits(due.min(capacity.saturating_sub(available)));
            }
        }
    });
    handle.abort_handle()
}
