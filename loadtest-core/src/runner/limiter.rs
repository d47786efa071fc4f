use std::sync::Mutex;
use std::time::Duration;

use tokio::time::{Instant, sleep_until};

use super::cancel::PhaseContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("rate limiter wait cancelled")]
pub struct Cancelled;

/// Token bucket with a capacity of one token, refilled at `rate` tokens per second.
///
/// The bucket is shared by every worker of a run, so `rate` bounds the aggregate request rate
/// no matter how many workers are waiting on it.
///
/// Internally the bucket is a reservation clock: `next_free` is the earliest instant at which
/// the next token exists. A caller reserves the slot `max(next_free, now)` and pushes
/// `next_free` one interval further, then sleeps until its slot. With a capacity of one, an idle
/// limiter never accumulates more than the single token available at `now`.
#[derive(Debug)]
pub struct RateLimiter {
    interval: Duration,
    next_free: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(rate: u32) -> Self {
        Self {
            interval: refill_interval(rate),
            next_free: Mutex::new(None),
        }
    }

    /// Waits for a token.
    ///
    /// Returns [`Cancelled`] when the phase ends first, including the case where the token would
    /// only become available at or after the phase deadline.
    pub async fn acquire(&self, ctx: &PhaseContext) -> Result<(), Cancelled> {
        if ctx.is_done() {
            return Err(Cancelled);
        }

        let now = Instant::now();
        let slot = self.reserve(now);

        if slot >= ctx.deadline() {
            self.release(slot);
            return Err(Cancelled);
        }
        if slot <= now {
            return Ok(());
        }

        tokio::select! {
            () = sleep_until(slot) => Ok(()),
            () = ctx.cancelled() => {
                self.release(slot);
                Err(Cancelled)
            }
        }
    }

    fn reserve(&self, now: Instant) -> Instant {
        let mut next_free = self
            .next_free
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let slot = match *next_free {
            Some(at) if at > now => at,
            _ => now,
        };
        *next_free = Some(slot + self.interval);
        slot
    }

    /// Hands an unused reservation back, provided nobody reserved after it.
    fn release(&self, slot: Instant) {
        let mut next_free = self
            .next_free
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if *next_free == Some(slot + self.interval) {
            *next_free = Some(slot);
        }
    }
}

/// Time between two tokens. Never zero, so even rates beyond one per nanosecond keep a ceiling.
fn refill_interval(rate: u32) -> Duration {
    Duration::from_secs_f64(1.0 / f64::from(rate.max(1))).max(Duration::from_nanos(1))
}
