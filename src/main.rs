//! Stemma CLI entry point

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod script;

#[derive(Parser)]
#[command(name = "stemma")]
#[command(about = "Replay genealogy scripts against a transactional DAG", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// TOML config file with a [genealogy] table
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a script and print the resulting genealogy
    Run {
        /// Script file to replay
        script: PathBuf,

        /// Print a JSON snapshot instead of a tree
        #[arg(long)]
        json: bool,

        /// Report failing lines and continue instead of stopping
        #[arg(long)]
        keep_going: bool,
    },
    /// Show version
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "stemma={log_level},stemma_core={log_level}"
        )))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!("Stemma v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Run {
            script,
            json,
            keep_going,
        } => {
            let settings = commands::load_settings(cli.config.as_deref())?;
            commands::run(&script, settings.genealogy, json, keep_going)
        }
        Commands::Version => {
            println!("Stemma v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
