use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary with a live progress line.
    HumanReadable,
    /// Emit a single JSON summary line to stdout.
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "loadtest",
    author,
    version,
    about = "Synthetic HTTP load generator",
    long_about = "loadtest drives a fixed number of concurrent virtual users against one HTTP endpoint for a fixed duration, capped at an aggregate request rate, and reports throughput, latency percentiles, a latency histogram, status codes and error samples.\n\nThe first 10% of the duration is a warm-up with half the users; its results are discarded before measurement starts.",
    after_help = "Examples:\n  loadtest run -l http://localhost:8080/ -u 10 -r 100 -d 30s\n  loadtest run -l http://localhost:8080/items -m POST -H Content-Type=application/json -p '{\"id\":1}'\n  loadtest run -l http://localhost:8080/ --scenario-file scenarios.json --output json"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run a load test against a target URL
    Run(RunArgs),
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Target URL
    #[arg(short = 'l', long = "url", env = "LOADTEST_URL")]
    pub url: String,

    /// Number of concurrent users
    #[arg(short = 'u', long, env = "LOADTEST_USERS", default_value_t = 1)]
    pub users: u64,

    /// Test duration (e.g. 200ms, 30s, 1m30s)
    #[arg(short = 'd', long, env = "LOADTEST_DURATION", default_value = "1m")]
    pub duration: String,

    /// Aggregate request rate (requests per second, across all users)
    #[arg(short = 'r', long, env = "LOADTEST_RATE", default_value_t = 1)]
    pub rate: u32,

    /// HTTP method
    #[arg(short = 'm', long, env = "LOADTEST_METHOD", default_value = "GET")]
    pub method: String,

    /// Custom request header (repeatable, KEY=VALUE)
    #[arg(
        short = 'H',
        long = "header",
        visible_alias = "headers",
        value_name = "KEY=VALUE"
    )]
    pub headers: Vec<String>,

    /// Request payload for POST/PUT requests
    #[arg(short = 'p', long, env = "LOADTEST_PAYLOAD", default_value = "")]
    pub payload: String,

    /// Request timeout in seconds
    #[arg(long, env = "LOADTEST_TIMEOUT", default_value_t = 30)]
    pub timeout: u64,

    /// Reuse connections between requests
    #[arg(
        long,
        env = "LOADTEST_KEEPALIVE",
        action = ArgAction::Set,
        default_value_t = true,
        value_name = "BOOL"
    )]
    pub keepalive: bool,

    /// JSON file with request scenarios picked at random per request
    #[arg(long, env = "LOADTEST_SCENARIO_FILE")]
    pub scenario_file: Option<PathBuf>,

    /// Skip the warm-up phase
    #[arg(long)]
    pub no_warmup: bool,

    /// Number of latency histogram bins
    #[arg(long, default_value_t = 20)]
    pub bins: usize,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::HumanReadable)]
    pub output: OutputFormat,
}
