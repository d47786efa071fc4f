use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::Notify;
use tokio::time::Instant;

/// Run-wide stop request (e.g. Ctrl-C). Once fired it stays fired.
#[derive(Debug, Default)]
pub struct CancelSignal {
    cancelled: AtomicBool,
    notify: Notify,
}

impl CancelSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
        self.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    pub async fn cancelled(&self) {
        loop {
            // Register before checking the flag so a concurrent `cancel` is not missed.
            let notified = self.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

/// Stand-in deadline for windows too long to add to the current instant.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// What a worker observes during one phase: the outer signal plus the phase deadline.
#[derive(Debug, Clone)]
pub struct PhaseContext {
    cancel: Arc<CancelSignal>,
    deadline: Instant,
}

impl PhaseContext {
    pub fn new(cancel: Arc<CancelSignal>, window: Duration) -> Self {
        let now = Instant::now();
        let deadline = now
            .checked_add(window)
            .or_else(|| now.checked_add(FAR_FUTURE))
            .unwrap_or(now);
        Self { cancel, deadline }
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn is_done(&self) -> bool {
        self.is_cancelled() || Instant::now() >= self.deadline
    }

    /// Resolves only when the outer signal fires.
    pub async fn cancelled(&self) {
        self.cancel.cancelled().await;
    }
}
