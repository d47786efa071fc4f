use std::sync::Arc;
use std::time::Duration;

use loadtest_core::{MonitorSnapshot, RunConfig, RunReport};

use crate::cli::OutputFormat;

mod human;
mod json;

#[derive(Debug, Clone)]
pub(crate) struct ProgressUpdate {
    /// Wall time since the run started, warm-up included.
    pub elapsed: Duration,
    /// Expected wall time of the whole run.
    pub total: Duration,
    pub snapshot: MonitorSnapshot,
}

pub(crate) type ProgressFn = Arc<dyn Fn(ProgressUpdate) + Send + Sync>;

pub(crate) trait OutputFormatter: Send + Sync {
    fn print_header(&self, cfg: &RunConfig, scenarios: usize);
    fn progress(&self) -> Option<ProgressFn>;
    fn print_summary(&self, report: &RunReport, run_elapsed: Duration) -> anyhow::Result<()>;
}

pub(crate) fn formatter(format: OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::HumanReadable => Box::new(human::HumanReadableOutput::new()),
        OutputFormat::Json => Box::new(json::JsonOutput),
    }
}
