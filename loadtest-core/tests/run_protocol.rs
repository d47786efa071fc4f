#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use loadtest_core::{
    CancelSignal, Collector, Error, LoadGenerator, Monitor, RequestSpec, RunConfig, RunReport,
    Scenario, ScenarioSet, Transport,
};
use tokio::time::{Instant, sleep};

/// Answers `503` before `switch_at` (measured from construction) and `200` afterwards.
struct ClockTransport {
    started: Instant,
    switch_at: Duration,
    latency: Duration,
}

impl Transport for ClockTransport {
    type Error = String;

    async fn send(&self, _req: RequestSpec, _timeout: Duration) -> Result<u16, String> {
        let status = if self.started.elapsed() < self.switch_at {
            503
        } else {
            200
        };
        sleep(self.latency).await;
        Ok(status)
    }
}

#[derive(Default)]
struct FailingTransport {
    calls: AtomicU64,
}

impl Transport for FailingTransport {
    type Error = String;

    async fn send(&self, _req: RequestSpec, _timeout: Duration) -> Result<u16, String> {
        let n = self.calls.fetch_add(1, Ordering::Relaxed);
        sleep(Duration::from_millis(2)).await;
        Err(format!("connection refused ({n})"))
    }
}

/// Answers `200` after a fixed delay.
struct SlowTransport(Duration);

impl Transport for SlowTransport {
    type Error = String;

    async fn send(&self, _req: RequestSpec, _timeout: Duration) -> Result<u16, String> {
        sleep(self.0).await;
        Ok(200)
    }
}

#[derive(Default)]
struct RecordingTransport {
    urls: Mutex<BTreeSet<String>>,
}

impl Transport for RecordingTransport {
    type Error = String;

    async fn send(&self, req: RequestSpec, _timeout: Duration) -> Result<u16, String> {
        self.urls.lock().unwrap().insert(req.url);
        Ok(204)
    }
}

struct PanickingTransport;

impl Transport for PanickingTransport {
    type Error = String;

    async fn send(&self, _req: RequestSpec, _timeout: Duration) -> Result<u16, String> {
        panic!("transport blew up");
    }
}

fn config(users: u64, rate: u32, duration: &str, warmup: bool) -> RunConfig {
    RunConfig {
        concurrency: users,
        rate,
        duration: duration.to_string(),
        target_url: "http://target.invalid/".to_string(),
        warmup,
        ..RunConfig::default()
    }
}

fn generator<T: Transport>(cfg: RunConfig, transport: T) -> LoadGenerator<T> {
    LoadGenerator::new(
        cfg,
        transport,
        Arc::new(Monitor::new()),
        Arc::new(Collector::new()),
        None,
    )
}

#[tokio::test(start_paused = true)]
async fn warmup_traffic_never_reaches_the_report() {
    // 1s run: warm-up covers the first 100ms, when the target still answers 503.
    let transport = ClockTransport {
        started: Instant::now(),
        switch_at: Duration::from_millis(100),
        latency: Duration::from_millis(5),
    };
    let lg = generator(config(4, 200, "1s", true), transport);

    lg.run(Arc::new(CancelSignal::new())).await.unwrap();

    let report = RunReport::collect(lg.monitor(), lg.collector(), 10);
    assert!(report.monitor.total_requests >= 1);
    assert_eq!(report.monitor.failed_requests, 0);
    assert_eq!(
        report.status_counts,
        vec![(200, report.monitor.total_requests)]
    );
}

#[tokio::test(start_paused = true)]
async fn aggregate_rate_is_bounded_across_workers() {
    let transport = ClockTransport {
        started: Instant::now(),
        switch_at: Duration::ZERO,
        latency: Duration::from_millis(1),
    };
    let lg = generator(config(8, 50, "1s", false), transport);

    lg.run(Arc::new(CancelSignal::new())).await.unwrap();

    let total = lg.monitor().snapshot().total_requests;
    assert!((45..=51).contains(&total), "total={total}");
}

#[tokio::test(start_paused = true)]
async fn transport_failures_are_recorded_as_data() {
    let lg = generator(config(3, 100, "500ms", true), FailingTransport::default());

    lg.run(Arc::new(CancelSignal::new())).await.unwrap();

    let report = RunReport::collect(lg.monitor(), lg.collector(), 20);
    let total = report.monitor.total_requests;
    assert!(total >= 1);
    assert_eq!(report.monitor.success_requests, 0);
    assert_eq!(report.monitor.failed_requests, total);
    assert_eq!(report.status_counts, vec![(0, total)]);
    assert_eq!(report.errors_total as u64, total);
    assert_eq!(report.error_samples.len() as u64, total.min(5));
    assert!(report.error_samples[0].starts_with("connection refused"));
}

#[tokio::test(start_paused = true)]
async fn malformed_duration_fails_before_any_request() {
    let transport = FailingTransport::default();
    let lg = generator(config(2, 10, "soon", true), transport);

    let err = lg.run(Arc::new(CancelSignal::new())).await.unwrap_err();
    assert!(matches!(err, Error::InvalidDuration { .. }), "{err}");
    assert!(err.is_config_error());
    assert_eq!(lg.monitor().snapshot().total_requests, 0);
}

#[tokio::test(start_paused = true)]
async fn cancellation_lets_in_flight_request_complete() {
    let lg = generator(
        config(2, 1, "1m", false),
        SlowTransport(Duration::from_millis(100)),
    );
    let cancel = Arc::new(CancelSignal::new());

    let started = Instant::now();
    let (res, ()) = tokio::join!(lg.run(cancel.clone()), async {
        sleep(Duration::from_millis(50)).await;
        cancel.cancel();
    });

    res.unwrap();
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(100), "elapsed={elapsed:?}");
    assert!(elapsed < Duration::from_secs(1), "elapsed={elapsed:?}");

    // The second worker was still waiting for a token and gave up without sending.
    let report = RunReport::collect(lg.monitor(), lg.collector(), 5);
    assert_eq!(report.monitor.total_requests, 1);
    assert_eq!(report.monitor.success_requests, 1);
    assert_eq!(report.status_counts, vec![(200, 1)]);
    assert!(matches!(report.distribution, Some(d) if d.min >= 100.0));
}

#[tokio::test(start_paused = true)]
async fn enormous_duration_runs_until_cancelled() {
    let lg = generator(
        config(2, 10, "300000000000y", true),
        SlowTransport(Duration::from_millis(10)),
    );
    let cancel = Arc::new(CancelSignal::new());

    let (res, ()) = tokio::join!(lg.run(cancel.clone()), async {
        sleep(Duration::from_secs(1)).await;
        cancel.cancel();
    });

    res.unwrap();
    // Still in warm-up when cancelled, so nothing is reported.
    assert_eq!(lg.monitor().snapshot().total_requests, 0);
}

#[tokio::test(start_paused = true)]
async fn scenarios_replace_the_configured_target() {
    let scenarios = ScenarioSet::new(
        ["a", "b"]
            .into_iter()
            .map(|name| Scenario {
                name: name.to_string(),
                endpoint: format!("http://scenario.invalid/{name}"),
                ..Scenario::default()
            })
            .collect(),
    );

    let transport = RecordingTransport::default();
    let lg = LoadGenerator::new(
        config(2, 1_000, "200ms", false),
        transport,
        Arc::new(Monitor::new()),
        Arc::new(Collector::new()),
        Some(Arc::new(scenarios)),
    );

    lg.run(Arc::new(CancelSignal::new())).await.unwrap();

    let report = RunReport::collect(lg.monitor(), lg.collector(), 5);
    assert_eq!(
        report.status_counts,
        vec![(204, report.monitor.total_requests)]
    );
    assert!(report.monitor.total_requests > 20);

    let urls = lg.transport().urls.lock().unwrap().clone();
    assert_eq!(
        urls,
        BTreeSet::from([
            "http://scenario.invalid/a".to_string(),
            "http://scenario.invalid/b".to_string(),
        ])
    );
}

#[tokio::test(start_paused = true)]
async fn worker_panic_surfaces_as_join_error() {
    let lg = generator(config(1, 10, "1s", false), PanickingTransport);

    let err = lg.run(Arc::new(CancelSignal::new())).await.unwrap_err();
    assert!(matches!(err, Error::Join(_)), "{err}");
    assert!(!err.is_config_error());
}
