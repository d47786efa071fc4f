use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Default)]
struct SampleSet {
    latencies_ms: Vec<f64>,
    status_counts: HashMap<u16, u64>,
    errors: Vec<String>,
}

/// Owned copy of everything the collector holds. Mutating it never touches the collector.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleSnapshot {
    /// Latency of every recorded response, in recording order (fractional milliseconds).
    pub latencies_ms: Vec<f64>,
    /// Occurrences per status code. `0` counts transport failures.
    pub status_counts: HashMap<u16, u64>,
    pub errors: Vec<String>,
}

impl SampleSnapshot {
    pub fn responses_total(&self) -> u64 {
        self.status_counts.values().sum()
    }
}

/// Raw per-response samples shared by all workers.
#[derive(Debug, Default)]
pub struct Collector {
    inner: Mutex<SampleSet>,
}

impl Collector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one response. `status == 0` marks a transport failure.
    pub fn record(&self, status: u16, elapsed: Duration, error: Option<&str>) {
        let latency_ms = elapsed.as_nanos() as f64 / 1_000_000.0;

        let mut set = self
            .inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        set.latencies_ms.push(latency_ms);
        *set.status_counts.entry(status).or_insert(0) += 1;
        if let Some(err) = error {
            set.errors.push(err.to_string());
        }
    }

    pub fn snapshot(&self) -> SampleSnapshot {
        let set = self
            .inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        SampleSnapshot {
            latencies_ms: set.latencies_ms.clone(),
            status_counts: set.status_counts.clone(),
            errors: set.errors.clone(),
        }
    }

    pub fn reset(&self) {
        let mut set = self
            .inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *set = SampleSet::default();
    }
}
