mod cancel;
mod collector;
mod config;
mod error;
mod limiter;
mod monitor;
mod run;

pub use cancel::{CancelSignal, PhaseContext};
pub use collector::{Collector, SampleSnapshot};
pub use config::{RunConfig, parse_run_duration, warmup_window};
pub use error::{Error, Result};
pub use limiter::{Cancelled, RateLimiter};
pub use monitor::{Monitor, MonitorSnapshot};
pub use run::{LoadGenerator, Phase, RequestOutcome};
