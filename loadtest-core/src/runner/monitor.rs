use std::fmt;
use std::sync::Mutex;
use std::time::{Duration, Instant};

#[derive(Debug)]
struct AggregateStats {
    total_requests: u64,
    success_requests: u64,
    failed_requests: u64,
    cumulative_latency: Duration,
    started: Instant,
}

impl AggregateStats {
    fn new(started: Instant) -> Self {
        Self {
            total_requests: 0,
            success_requests: 0,
            failed_requests: 0,
            cumulative_latency: Duration::ZERO,
            started,
        }
    }
}

/// Point-in-time view of the running counters.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorSnapshot {
    pub total_requests: u64,
    pub success_requests: u64,
    pub failed_requests: u64,
    pub cumulative_latency: Duration,
    /// Wall time since construction or the last reset.
    pub elapsed: Duration,
    pub requests_per_sec: f64,
    /// `None` until at least one request was recorded.
    pub avg_latency: Option<Duration>,
}

/// Running request counters shared by all workers.
///
/// Every update touches total, success-or-failed and cumulative latency under one lock, so
/// `success_requests + failed_requests == total_requests` holds for every snapshot.
#[derive(Debug)]
pub struct Monitor {
    inner: Mutex<AggregateStats>,
}

impl Default for Monitor {
    fn default() -> Self {
        Self::new()
    }
}

impl Monitor {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(AggregateStats::new(Instant::now())),
        }
    }

    pub fn record(&self, success: bool, elapsed: Duration) {
        let mut stats = self
            .inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        stats.total_requests = stats.total_requests.saturating_add(1);
        if success {
            stats.success_requests = stats.success_requests.saturating_add(1);
        } else {
            stats.failed_requests = stats.failed_requests.saturating_add(1);
        }
        stats.cumulative_latency = stats.cumulative_latency.saturating_add(elapsed);
    }

    pub fn snapshot(&self) -> MonitorSnapshot {
        let stats = self
            .inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let elapsed = stats.started.elapsed();
        let requests_per_sec = (stats.total_requests as f64) / elapsed.as_secs_f64().max(1e-9);
        let avg_latency = (stats.total_requests > 0).then(|| {
            let nanos = stats.cumulative_latency.as_nanos() / u128::from(stats.total_requests);
            Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
        });

        MonitorSnapshot {
            total_requests: stats.total_requests,
            success_requests: stats.success_requests,
            failed_requests: stats.failed_requests,
            cumulative_latency: stats.cumulative_latency,
            elapsed,
            requests_per_sec,
            avg_latency,
        }
    }

    /// Zeroes the counters and restarts the clock.
    pub fn reset(&self) {
        let mut stats = self
            .inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *stats = AggregateStats::new(Instant::now());
    }
}

impl fmt::Display for MonitorSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Test Duration: {:?}", self.elapsed)?;
        writeln!(f, "Total Requests: {}", self.total_requests)?;
        writeln!(f, "Successful Requests: {}", self.success_requests)?;
        writeln!(f, "Failed Requests: {}", self.failed_requests)?;
        writeln!(f, "Requests per second: {:.2}", self.requests_per_sec)?;
        match self.avg_latency {
            Some(avg) => writeln!(f, "Average Latency: {avg:?}"),
            None => writeln!(f, "Average Latency: n/a"),
        }
    }
}
