use crate::backoff::Delay;
use crate::config::{millis, DelayConfig};
use crate::output::{emit_data, OutputFormat};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value as JsonValue;
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::Instant;
use tracing::info;

pub const DEFAULT_BASE_MS: u64 = 100;

#[derive(Parser, Debug)]
#[command(
    name = "delay",
    about = "Preview backoff delay sequences",
    disable_help_subcommand = true,
    after_help = r#"Examples:
  delay --base-ms 100 --multiplier 2 --maximum-ms 800 preview --count 6
  delay --config backoff.yaml --json preview --count 10 --reset-after 4
  delay --base-ms 50 --jitter 0.2 --verbose sleep --count 3"#
)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// YAML config file (base_ms, multiplier, maximum_ms, jitter, seed)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Base interval in milliseconds
    #[arg(long = "base-ms", global = true)]
    pub base_ms: Option<u64>,
    /// Growth multiplier
    #[arg(long, global = true)]
    pub multiplier: Option<f64>,
    /// Ceiling in milliseconds (defaults to the base)
    #[arg(long = "maximum-ms", global = true)]
    pub maximum_ms: Option<u64>,
    /// Jitter fraction
    #[arg(long, global = true)]
    pub jitter: Option<f64>,
    /// Seed for reproducible jitter
    #[arg(long, global = true)]
    pub seed: Option<u64>,
    /// JSON output
    #[arg(long, global = true)]
    pub json: bool,
    /// Verbose logging
    #[arg(long, global = true)]
    pub verbose: bool,
    /// Debug logging
    #[arg(long, global = true)]
    pub debug: bool,
    /// Color control
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorChoice>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Debug, ValueEnum)]
pub enum ColorChoice {
    Always,
    Auto,
    Never,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the waits without sleeping
    Preview {
        #[arg(long, default_value_t = 5)]
        count: u32,
        /// Reset the generator after this many waits
        #[arg(long = "reset-after")]
        reset_after: Option<u32>,
    },
    /// Sleep through each wait in turn
    Sleep {
        #[arg(long, default_value_t = 3)]
        count: u32,
    },
}

pub async fn run(cli: Cli) -> Result<()> {
    let cfg = resolve_config(&cli)?;
    let mut delay = Delay::from_config(cfg).context("build delay")?;
    let fmt = fmt_from_cli(&cli);

    match &cli.command {
        Commands::Preview { count, reset_after } => {
            let data = build_preview(&mut delay, *count, *reset_after);
            emit_data(&fmt, &data)
        }
        Commands::Sleep { count } => {
            let data = run_sleep(&mut delay, *count).await;
            emit_data(&fmt, &data)
        }
    }
}

/// Flags over file over defaults.
pub fn resolve_config(cli: &Cli) -> Result<DelayConfig> {
    let mut cfg = match &cli.config {
        Some(path) => DelayConfig::load(path).context("load config")?,
        None => DelayConfig::new(Duration::from_millis(DEFAULT_BASE_MS)),
    };
    cfg.apply_cli(cli);
    Ok(cfg)
}

fn fmt_from_cli(cli: &Cli) -> OutputFormat {
    if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Yaml
    }
}

pub fn build_preview(delay: &mut Delay, count: u32, reset_after: Option<u32>) -> JsonValue {
    let mut waits = Vec::new();
    for i in 1..=count {
        let wait = delay.delay();
        waits.push(JsonValue::from(millis(wait.duration())));
        if reset_after == Some(i) {
            delay.reset();
        }
    }
    serde_json::json!({
        "config": delay.config(),
        "waits_ms": waits,
    })
}

async fn run_sleep(delay: &mut Delay, count: u32) -> JsonValue {
    let start = Instant::now();
    let mut waits = Vec::new();
    for attempt in 1..=count {
        let wait = delay.delay();
        info!(attempt, wait = ?wait.duration(), "sleeping");
        waits.push(JsonValue::from(millis(wait.duration())));
        wait.await;
    }
    serde_json::json!({
        "config": delay.config(),
        "waits_ms": waits,
        "slept_ms": millis(start.elapsed()),
    })
}
