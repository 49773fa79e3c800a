//! topicdeck CLI

use clap::Parser;
use console::style;
use topicdeck_core::ConvertConfig;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Reads `topics.csv` and regenerates `topics.json` next to it
#[derive(Parser)]
#[command(name = "topicdeck")]
#[command(about = "Convert a topics.csv sheet into topics.json")]
#[command(version)]
struct Cli {}

fn main() {
    // Diagnostics go to stderr; stdout carries only the summary line
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let _ = Cli::parse();

    if let Err(e) = convert() {
        eprintln!("{}", style(format!("{:#}", e)).red().bold());
        std::process::exit(1);
    }
}

fn convert() -> anyhow::Result<()> {
    let config = ConvertConfig::locate();
    debug!(
        "Input: {}, output: {}",
        config.input.display(),
        config.output.display()
    );

    let summary = topicdeck_artifacts::run(&config)?;
    println!(
        "Wrote {} topics to {}",
        summary.count,
        summary.output.display()
    );

    Ok(())
}
