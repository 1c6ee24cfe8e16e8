use anyhow::Result;
use clap::Parser;
use delay::cli;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Init logging to stderr only
    let filter = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };
    let use_color = match cli.color {
        Some(cli::ColorChoice::Always) => true,
        Some(cli::ColorChoice::Never) => false,
        _ => std::env::var("NO_COLOR").is_err(),
    };
    let _ = fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .with_ansi(use_color)
        .try_init();

    if let Err(err) = cli::run(cli).await {
        delay::output::emit_error(&err)?;
        return Err(err);
    }
    Ok(())
}
