use std::fmt::Write as _;
use std::time::Duration;

use loadtest_core::{LatencyDistribution, RunReport};

use super::format::format_wall;

pub(crate) fn render(report: &RunReport, run_elapsed: Duration) -> String {
    let mut out = String::new();

    out.push_str("\nLoad Test Results:\n");
    writeln!(out, "Duration: {}", format_wall(run_elapsed)).ok();
    write!(out, "{}", report.monitor).ok();

    out.push_str("\nResponse Time Statistics:\n");
    match &report.distribution {
        Some(d) => render_distribution(d, &mut out),
        None => out.push_str("No response times recorded\n"),
    }

    out.push('\n');
    write!(out, "{}", report.histogram).ok();

    out.push_str("\nStatus Codes:\n");
    for (code, count) in &report.status_counts {
        writeln!(out, "{code}: {count}").ok();
    }

    writeln!(out, "\nTotal Errors: {}", report.errors_total).ok();
    if !report.error_samples.is_empty() {
        out.push_str("Error samples:\n");
        for err in &report.error_samples {
            writeln!(out, "- {err}").ok();
        }
    }

    out
}

fn render_distribution(d: &LatencyDistribution, out: &mut String) {
    writeln!(out, "Min: {:.2} ms", d.min).ok();
    writeln!(out, "Max: {:.2} ms", d.max).ok();
    writeln!(out, "Mean: {:.2} ms", d.mean).ok();
    writeln!(out, "Median: {:.2} ms", d.median).ok();
    writeln!(out, "50th percentile: {:.2} ms", d.p50).ok();
    writeln!(out, "95th percentile: {:.2} ms", d.p95).ok();
    writeln!(out, "99th percentile: {:.2} ms", d.p99).ok();
}
