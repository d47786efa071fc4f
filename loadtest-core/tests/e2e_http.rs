use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use loadtest_core::{CancelSignal, Collector, LoadGenerator, Monitor, RunConfig, RunReport};
use loadtest_http::{HttpClient, HttpClientOptions};
use loadtest_testserver::TestServer;

fn client() -> HttpClient {
    HttpClient::new(HttpClientOptions {
        connect_timeout: Some(Duration::from_millis(500)),
        ..HttpClientOptions::default()
    })
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn run_against_ok_endpoint_records_only_200s() -> anyhow::Result<()> {
    let server = TestServer::start().await.context("start test server")?;

    let cfg = RunConfig {
        concurrency: 1,
        rate: 1_000,
        duration: "200ms".to_string(),
        target_url: server.urls().ok.clone(),
        ..RunConfig::default()
    };
    let lg = LoadGenerator::new(
        cfg,
        client(),
        Arc::new(Monitor::new()),
        Arc::new(Collector::new()),
        None,
    );
    lg.run(Arc::new(CancelSignal::new())).await?;

    let report = RunReport::collect(lg.monitor(), lg.collector(), 20);
    anyhow::ensure!(report.monitor.total_requests >= 1);
    anyhow::ensure!(report.monitor.failed_requests == 0);
    anyhow::ensure!(
        report.status_counts == vec![(200, report.monitor.total_requests)],
        "unexpected statuses {:?}",
        report.status_counts
    );
    anyhow::ensure!(report.errors_total == 0);

    let dist = report.distribution.context("latency distribution")?;
    anyhow::ensure!(dist.min >= 5.0, "min latency {} below server delay", dist.min);

    server.shutdown().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn run_against_closed_port_records_only_failures() -> anyhow::Result<()> {
    // Bind and drop a listener to get a local port nobody listens on.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
        listener.local_addr()?.port()
    };

    let cfg = RunConfig {
        concurrency: 2,
        rate: 200,
        duration: "300ms".to_string(),
        timeout: Duration::from_millis(200),
        target_url: format!("http://127.0.0.1:{port}/"),
        ..RunConfig::default()
    };
    let lg = LoadGenerator::new(
        cfg,
        client(),
        Arc::new(Monitor::new()),
        Arc::new(Collector::new()),
        None,
    );
    lg.run(Arc::new(CancelSignal::new())).await?;

    let report = RunReport::collect(lg.monitor(), lg.collector(), 20);
    let total = report.monitor.total_requests;
    anyhow::ensure!(total >= 1);
    anyhow::ensure!(report.monitor.success_requests == 0);
    anyhow::ensure!(report.monitor.failed_requests == total);
    anyhow::ensure!(report.status_counts == vec![(0, total)]);
    anyhow::ensure!(report.error_samples.len() as u64 == total.min(5));

    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn error_statuses_count_as_completed_requests() -> anyhow::Result<()> {
    let server = TestServer::start().await.context("start test server")?;

    let cfg = RunConfig {
        concurrency: 2,
        rate: 100,
        duration: "200ms".to_string(),
        target_url: server.urls().status(500),
        warmup: false,
        ..RunConfig::default()
    };
    let lg = LoadGenerator::new(
        cfg,
        client(),
        Arc::new(Monitor::new()),
        Arc::new(Collector::new()),
        None,
    );
    lg.run(Arc::new(CancelSignal::new())).await?;

    let report = RunReport::collect(lg.monitor(), lg.collector(), 20);
    let total = report.monitor.total_requests;
    anyhow::ensure!(total >= 1);
    anyhow::ensure!(report.monitor.success_requests == total);
    anyhow::ensure!(report.status_counts == vec![(500, total)]);
    anyhow::ensure!(report.errors_total == 0);

    server.shutdown().await;
    Ok(())
}
