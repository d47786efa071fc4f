use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use loadtest_core::runner::warmup_window;
use loadtest_core::{
    CancelSignal, Collector, LoadGenerator, Monitor, RunConfig, RunReport, ScenarioSource,
};
use loadtest_http::{HttpClient, HttpClientOptions};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::info;

use crate::cli::RunArgs;
use crate::exit_codes::ExitCode;
use crate::output::{self, ProgressFn, ProgressUpdate};
use crate::run_error::RunError;
use crate::run_support::parse_headers;
use crate::scenario_file;

const PROGRESS_INTERVAL: Duration = Duration::from_secs(1);

pub async fn run(args: RunArgs) -> Result<ExitCode, RunError> {
    if args.bins == 0 {
        return Err(RunError::InvalidInput(anyhow::anyhow!(
            "--bins must be at least 1"
        )));
    }

    let headers = parse_headers(&args.headers).map_err(RunError::InvalidInput)?;
    let cfg = run_config(&args, headers);
    let duration = cfg.validate()?;

    let scenarios = match &args.scenario_file {
        Some(path) => {
            let set = scenario_file::load(path)
                .await
                .map_err(RunError::InvalidInput)?;
            info!(count = set.len(), path = %path.display(), "loaded test scenarios");
            Some(set)
        }
        None => None,
    };
    let scenario_count = scenarios.as_ref().map_or(0, |s| s.len());
    let scenarios = scenarios
        .filter(|s| !s.is_empty())
        .map(|s| Arc::new(s) as Arc<dyn ScenarioSource>);

    let client = HttpClient::new(HttpClientOptions {
        keep_alive: args.keepalive,
        ..HttpClientOptions::default()
    });

    let out = output::formatter(args.output);
    let monitor = Arc::new(Monitor::new());
    let collector = Arc::new(Collector::new());

    let total = if cfg.warmup {
        duration.saturating_add(warmup_window(duration))
    } else {
        duration
    };

    out.print_header(&cfg, scenario_count);

    let lg = LoadGenerator::new(cfg, client, monitor.clone(), collector.clone(), scenarios);

    let cancel = Arc::new(CancelSignal::new());
    let signals = tokio::spawn(cancel_on_shutdown_signal(cancel.clone()));
    let ticker = out
        .progress()
        .map(|p| spawn_progress_ticker(p, monitor.clone(), total));

    let started = Instant::now();
    let res = lg.run(cancel).await;
    let run_elapsed = started.elapsed();

    if let Some(t) = ticker {
        t.abort();
    }
    signals.abort();

    res?;

    let report = RunReport::collect(&monitor, &collector, args.bins);
    out.print_summary(&report, run_elapsed)
        .context("failed to print summary")
        .map_err(RunError::RuntimeError)?;

    Ok(ExitCode::Success)
}

fn run_config(args: &RunArgs, headers: BTreeMap<String, String>) -> RunConfig {
    RunConfig {
        concurrency: args.users,
        duration: args.duration.clone(),
        rate: args.rate,
        timeout: Duration::from_secs(args.timeout),
        target_url: args.url.clone(),
        method: args.method.clone(),
        headers,
        payload: args.payload.clone(),
        warmup: !args.no_warmup,
    }
}

fn spawn_progress_ticker(
    progress: ProgressFn,
    monitor: Arc<Monitor>,
    total: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let started = Instant::now();
        let mut interval = tokio::time::interval(PROGRESS_INTERVAL);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            interval.tick().await;
            progress(ProgressUpdate {
                elapsed: started.elapsed(),
                total,
                snapshot: monitor.snapshot(),
            });
        }
    })
}

async fn cancel_on_shutdown_signal(cancel: Arc<CancelSignal>) {
    shutdown_signal().await;
    info!("received interrupt signal, shutting down");
    cancel.cancel();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
