use std::collections::BTreeMap;
use std::time::Duration;

use super::error::{Error, Result};

/// Resolved configuration of one load test run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Number of concurrent virtual users during measurement.
    pub concurrency: u64,
    /// Measurement window, humantime syntax (`200ms`, `30s`, `1m30s`).
    pub duration: String,
    /// Aggregate request ceiling, requests per second across all workers.
    pub rate: u32,
    /// Per-request timeout.
    pub timeout: Duration,
    pub target_url: String,
    pub method: String,
    pub headers: BTreeMap<String, String>,
    /// Request body. Empty means no body.
    pub payload: String,
    /// Run a discarded warm-up phase before measuring.
    pub warmup: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            concurrency: 1,
            duration: "1m".to_string(),
            rate: 1,
            timeout: Duration::from_secs(30),
            target_url: String::new(),
            method: "GET".to_string(),
            headers: BTreeMap::new(),
            payload: String::new(),
            warmup: true,
        }
    }
}

impl RunConfig {
    /// Checks the run invariants and returns the parsed measurement duration.
    pub fn validate(&self) -> Result<Duration> {
        if self.concurrency == 0 {
            return Err(Error::InvalidConcurrency);
        }
        if self.rate == 0 {
            return Err(Error::InvalidRate);
        }
        parse_run_duration(&self.duration)
    }

    /// Number of workers used for the warm-up phase.
    #[must_use]
    pub fn warmup_workers(&self) -> u64 {
        (self.concurrency / 2).clamp(1, self.concurrency.max(1))
    }
}

/// Warm-up lasts a tenth of the measurement window.
#[must_use]
pub fn warmup_window(duration: Duration) -> Duration {
    duration / 10
}

pub fn parse_run_duration(input: &str) -> Result<Duration> {
    let s = input.trim();
    let d = humantime::parse_duration(s).map_err(|source| Error::InvalidDuration {
        input: s.to_string(),
        source,
    })?;
    if d.is_zero() {
        return Err(Error::NonPositiveDuration(s.to_string()));
    }
    Ok(d)
}
