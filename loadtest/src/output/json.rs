use serde::Serialize;
use std::io::Write as _;
use std::time::Duration;

use loadtest_core::{RunConfig, RunReport};

use super::{OutputFormatter, ProgressFn};

pub(crate) struct JsonOutput;

impl OutputFormatter for JsonOutput {
    fn print_header(&self, _cfg: &RunConfig, _scenarios: usize) {}

    fn progress(&self) -> Option<ProgressFn> {
        None
    }

    fn print_summary(&self, report: &RunReport, run_elapsed: Duration) -> anyhow::Result<()> {
        let line = build_summary_line(report, run_elapsed);
        emit_json_line(&line)
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct JsonSummaryLine {
    pub kind: &'static str,
    pub elapsed_secs: f64,

    pub total_requests: u64,
    pub success_requests: u64,
    pub failed_requests: u64,
    pub requests_per_sec: f64,
    pub latency_avg_ms: Option<f64>,

    pub latency: Option<JsonLatency>,
    pub histogram: Vec<JsonHistogramBin>,
    pub status_codes: Vec<JsonStatusCount>,

    pub errors_total: usize,
    pub error_samples: Vec<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct JsonLatency {
    pub count: usize,
    pub min_ms: f64,
    pub max_ms: f64,
    pub mean_ms: f64,
    pub median_ms: f64,
    pub p50_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
}

#[derive(Debug, Serialize)]
pub(crate) struct JsonHistogramBin {
    pub low_ms: f64,
    pub high_ms: f64,
    pub count: u64,
}

#[derive(Debug, Serialize)]
pub(crate) struct JsonStatusCount {
    pub code: u16,
    pub count: u64,
}

pub(crate) fn build_summary_line(report: &RunReport, run_elapsed: Duration) -> JsonSummaryLine {
    let m = &report.monitor;

    JsonSummaryLine {
        kind: "summary",
        elapsed_secs: run_elapsed.as_secs_f64(),
        total_requests: m.total_requests,
        success_requests: m.success_requests,
        failed_requests: m.failed_requests,
        requests_per_sec: m.requests_per_sec,
        latency_avg_ms: m.avg_latency.map(|d| d.as_nanos() as f64 / 1_000_000.0),
        latency: report.distribution.map(|d| JsonLatency {
            count: d.count,
            min_ms: d.min,
            max_ms: d.max,
            mean_ms: d.mean,
            median_ms: d.median,
            p50_ms: d.p50,
            p95_ms: d.p95,
            p99_ms: d.p99,
        }),
        histogram: report
            .histogram
            .counts()
            .iter()
            .enumerate()
            .map(|(i, &count)| {
                let (low_ms, high_ms) = report.histogram.bounds(i);
                JsonHistogramBin {
                    low_ms,
                    high_ms,
                    count,
                }
            })
            .collect(),
        status_codes: report
            .status_counts
            .iter()
            .map(|&(code, count)| JsonStatusCount { code, count })
            .collect(),
        errors_total: report.errors_total,
        error_samples: report.error_samples.clone(),
    }
}

fn emit_json_line<T: Serialize>(line: &T) -> anyhow::Result<()> {
    let mut out = std::io::stdout().lock();
    serde_json::to_writer(&mut out, line)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use loadtest_core::{Collector, Monitor};

    #[test]
    fn summary_line_carries_report_fields() {
        let monitor = Monitor::new();
        let collector = Collector::new();
        for (status, ms) in [(200, 10), (200, 30), (404, 20)] {
            monitor.record(true, Duration::from_millis(ms));
            collector.record(status, Duration::from_millis(ms), None);
        }

        let report = RunReport::collect(&monitor, &collector, 2);
        let v = serde_json::to_value(build_summary_line(&report, Duration::from_secs(2))).unwrap();

        assert_eq!(v["kind"], "summary");
        assert_eq!(v["elapsed_secs"], 2.0);
        assert_eq!(v["total_requests"], 3);
        assert_eq!(v["failed_requests"], 0);
        assert_eq!(v["latency_avg_ms"], 20.0);
        assert_eq!(v["latency"]["p50_ms"], 20.0);
        assert_eq!(v["histogram"].as_array().unwrap().len(), 2);
        assert_eq!(v["histogram"][0]["low_ms"], 10.0);
        assert_eq!(v["status_codes"][0]["code"], 200);
        assert_eq!(v["status_codes"][0]["count"], 2);
        assert_eq!(v["status_codes"][1]["code"], 404);
        assert_eq!(v["errors_total"], 0);
    }

    #[test]
    fn empty_report_serializes_nulls() {
        let report = RunReport::collect(&Monitor::new(), &Collector::new(), 20);
        let v = serde_json::to_value(build_summary_line(&report, Duration::ZERO)).unwrap();

        assert!(v["latency"].is_null());
        assert!(v["latency_avg_ms"].is_null());
        assert!(v["histogram"].as_array().unwrap().is_empty());
    }
}
