use crate::histogram::Histogram;
use crate::runner::{Collector, Monitor, MonitorSnapshot};
use crate::stats::LatencyDistribution;

pub const DEFAULT_HISTOGRAM_BINS: usize = 20;
pub const ERROR_SAMPLE_LIMIT: usize = 5;

/// Final statistics of one run, built from the Monitor and Collector snapshots.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub monitor: MonitorSnapshot,
    /// `None` when no latency sample was recorded.
    pub distribution: Option<LatencyDistribution>,
    pub histogram: Histogram,
    /// Sorted by status code. `0` counts transport failures.
    pub status_counts: Vec<(u16, u64)>,
    pub errors_total: usize,
    /// First recorded error messages, at most [`ERROR_SAMPLE_LIMIT`].
    pub error_samples: Vec<String>,
}

impl RunReport {
    pub fn collect(monitor: &Monitor, collector: &Collector, bins: usize) -> Self {
        let monitor = monitor.snapshot();
        let samples = collector.snapshot();

        let histogram = Histogram::build(&samples.latencies_ms, bins);

        let mut status_counts: Vec<(u16, u64)> = samples.status_counts.into_iter().collect();
        status_counts.sort_unstable_by_key(|(code, _)| *code);

        let errors_total = samples.errors.len();
        let error_samples = samples
            .errors
            .into_iter()
            .take(ERROR_SAMPLE_LIMIT)
            .collect();

        Self {
            monitor,
            distribution: LatencyDistribution::from_samples(samples.latencies_ms),
            histogram,
            status_counts,
            errors_total,
            error_samples,
        }
    }

    pub fn responses_total(&self) -> u64 {
        self.status_counts.iter().map(|(_, n)| n).sum()
    }
}
