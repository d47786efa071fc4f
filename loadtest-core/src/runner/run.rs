use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::scenario::ScenarioSource;
use crate::transport::{RequestSpec, Transport};

use super::cancel::{CancelSignal, PhaseContext};
use super::collector::Collector;
use super::config::{RunConfig, warmup_window};
use super::error::{Error, Result};
use super::limiter::RateLimiter;
use super::monitor::Monitor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Phase {
    Warmup,
    Measurement,
}

/// Classified result of one request attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOutcome {
    /// `0` when no HTTP response was received.
    pub status: u16,
    pub elapsed: Duration,
    /// Set iff the request failed at the transport level.
    pub error: Option<String>,
}

impl RequestOutcome {
    pub fn completed(status: u16, elapsed: Duration) -> Self {
        Self {
            status,
            elapsed,
            error: None,
        }
    }

    pub fn failed(elapsed: Duration, error: String) -> Self {
        Self {
            status: 0,
            elapsed,
            error: Some(error),
        }
    }

    /// Transport-level success. 4xx/5xx responses count as successful exchanges.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

struct Shared<T> {
    config: RunConfig,
    base_request: RequestSpec,
    transport: T,
    limiter: RateLimiter,
    monitor: Arc<Monitor>,
    collector: Arc<Collector>,
    scenarios: Option<Arc<dyn ScenarioSource>>,
}

/// Drives the warm-up and measurement phases against one target.
pub struct LoadGenerator<T> {
    shared: Arc<Shared<T>>,
}

impl<T: Transport> LoadGenerator<T> {
    pub fn new(
        config: RunConfig,
        transport: T,
        monitor: Arc<Monitor>,
        collector: Arc<Collector>,
        scenarios: Option<Arc<dyn ScenarioSource>>,
    ) -> Self {
        let base_request = RequestSpec::from_config(&config);
        let limiter = RateLimiter::new(config.rate);

        Self {
            shared: Arc::new(Shared {
                config,
                base_request,
                transport,
                limiter,
                monitor,
                collector,
                scenarios,
            }),
        }
    }

    pub fn transport(&self) -> &T {
        &self.shared.transport
    }

    pub fn monitor(&self) -> &Arc<Monitor> {
        &self.shared.monitor
    }

    pub fn collector(&self) -> &Arc<Collector> {
        &self.shared.collector
    }

    /// Runs warm-up, discards its statistics, then runs the measurement phase.
    ///
    /// Configuration errors are returned before any worker is spawned. Request failures are
    /// recorded as data and never abort the run. When `cancel` fires, workers stop issuing new
    /// requests, let the one in flight complete or time out, and `run` returns `Ok` once all of
    /// them have returned.
    pub async fn run(&self, cancel: Arc<CancelSignal>) -> Result<()> {
        let cfg = &self.shared.config;
        let duration = cfg.validate()?;

        info!(
            users = cfg.concurrency,
            rate = cfg.rate,
            duration = ?duration,
            target = %cfg.target_url,
            "starting load test"
        );

        if cfg.warmup {
            let window = warmup_window(duration);
            if window.is_zero() {
                debug!("warm-up window is empty, skipping");
            } else {
                let workers = cfg.warmup_workers();
                debug!(duration = ?window, workers, "starting warm-up period");
                self.run_phase(Phase::Warmup, &cancel, workers, window)
                    .await?;
                debug!("warm-up completed, starting full test");
            }
        }

        // All warm-up workers have returned here, so nothing lands after the reset.
        self.shared.monitor.reset();
        self.shared.collector.reset();

        if cancel.is_cancelled() {
            info!("load test cancelled before measurement");
            return Ok(());
        }

        self.run_phase(Phase::Measurement, &cancel, cfg.concurrency, duration)
            .await?;

        if cancel.is_cancelled() {
            info!("load test cancelled");
        } else {
            info!("load test finished");
        }
        Ok(())
    }

    async fn run_phase(
        &self,
        phase: Phase,
        cancel: &Arc<CancelSignal>,
        workers: u64,
        window: Duration,
    ) -> Result<()> {
        let ctx = PhaseContext::new(cancel.clone(), window);

        let mut handles = Vec::with_capacity(workers.min(usize::MAX as u64) as usize);
        for worker_id in 1..=workers {
            let shared = self.shared.clone();
            let ctx = ctx.clone();
            handles.push(tokio::spawn(async move {
                shared.worker_loop(phase, worker_id, &ctx).await
            }));
        }

        // Join every worker before reporting a failure so none outlives the phase.
        let mut join_err = None;
        let mut sent_total = 0u64;
        for h in handles {
            match h.await {
                Ok(sent) => sent_total = sent_total.saturating_add(sent),
                Err(err) => {
                    join_err.get_or_insert(err);
                }
            }
        }

        debug!(%phase, workers, requests = sent_total, "phase finished");
        match join_err {
            Some(err) => Err(Error::Join(err)),
            None => Ok(()),
        }
    }
}

impl<T: Transport> Shared<T> {
    async fn worker_loop(&self, phase: Phase, worker_id: u64, ctx: &PhaseContext) -> u64 {
        let mut sent = 0u64;

        loop {
            if ctx.is_done() {
                break;
            }

            if let Err(err) = self.limiter.acquire(ctx).await {
                debug!(%phase, worker_id, %err, "rate limiter wait ended");
                break;
            }

            // An in-flight request is never aborted; the transport timeout bounds it.
            let outcome = self.send(self.next_request()).await;
            self.record(&outcome);
            sent = sent.saturating_add(1);
        }

        sent
    }

    fn next_request(&self) -> RequestSpec {
        match self.scenarios.as_ref().and_then(|s| s.pick()) {
            Some(scenario) => RequestSpec::from_scenario(scenario),
            None => self.base_request.clone(),
        }
    }

    async fn send(&self, req: RequestSpec) -> RequestOutcome {
        let started = Instant::now();
        let res = self.transport.send(req, self.config.timeout).await;

        let elapsed = started.elapsed();
        match res {
            Ok(status) => RequestOutcome::completed(status, elapsed),
            Err(err) => RequestOutcome::failed(elapsed, err.to_string()),
        }
    }

    fn record(&self, outcome: &RequestOutcome) {
        match &outcome.error {
            Some(err) => {
                error!(error = %err, "request failed");
                self.monitor.record(false, outcome.elapsed);
                self.collector.record(0, outcome.elapsed, Some(err));
            }
            None => {
                self.monitor.record(true, outcome.elapsed);
                self.collector.record(outcome.status, outcome.elapsed, None);
                if outcome.status >= 400 {
                    warn!(
                        status_code = outcome.status,
                        "request returned error status code"
                    );
                }
            }
        }
    }
}
