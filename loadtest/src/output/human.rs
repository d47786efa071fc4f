use std::sync::Arc;
use std::time::Duration;

use loadtest_core::{RunConfig, RunReport};

mod format;
mod progress;
mod summary;

use format::{format_duration_opt, format_rate};
use progress::HumanProgress;
use summary::render;

use super::{OutputFormatter, ProgressFn};

pub(crate) struct HumanReadableOutput {
    progress: Arc<HumanProgress>,
}

impl HumanReadableOutput {
    pub(crate) fn new() -> Self {
        Self {
            progress: Arc::new(HumanProgress::new()),
        }
    }
}

impl OutputFormatter for HumanReadableOutput {
    fn print_header(&self, cfg: &RunConfig, scenarios: usize) {
        println!("Starting load test...");
        println!(
            "target: {} {} users={} rate={}/s duration={} warmup={}",
            cfg.method, cfg.target_url, cfg.concurrency, cfg.rate, cfg.duration, cfg.warmup
        );
        if scenarios > 0 {
            println!("scenarios: {scenarios}");
        }
    }

    fn progress(&self) -> Option<ProgressFn> {
        let progress = self.progress.clone();

        Some(Arc::new(move |u| {
            let s = &u.snapshot;
            let message = format!(
                "reqs={} failed={} rps={} avg={}",
                s.total_requests,
                s.failed_requests,
                format_rate(s.requests_per_sec),
                format_duration_opt(s.avg_latency)
            );
            progress.update(u.total, u.elapsed, message);
        }))
    }

    fn print_summary(&self, report: &RunReport, run_elapsed: Duration) -> anyhow::Result<()> {
        self.progress.finish();
        print!("{}", render(report, run_elapsed));
        Ok(())
    }
}
