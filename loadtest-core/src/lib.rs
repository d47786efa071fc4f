mod histogram;
mod report;
mod scenario;
mod stats;
mod transport;

pub mod runner;

pub use histogram::Histogram;
pub use report::{DEFAULT_HISTOGRAM_BINS, ERROR_SAMPLE_LIMIT, RunReport};
pub use runner::{
    CancelSignal, Collector, Error, LoadGenerator, Monitor, MonitorSnapshot, Result, RunConfig,
    SampleSnapshot,
};
pub use scenario::{Scenario, ScenarioSet, ScenarioSource};
pub use stats::{LatencyDistribution, median, percentile};
pub use transport::{RequestSpec, Transport};
