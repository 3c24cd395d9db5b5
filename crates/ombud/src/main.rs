// SPDX-FileCopyrightText: 2026 Ombud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ombud - a support-intake bot routing client requests to branch staff.
//!
//! This is the binary entry point.

mod report;
mod serve;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Ombud - a support-intake bot routing client requests to branch staff.
#[derive(Parser, Debug)]
#[command(name = "ombud", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the intake bot against the configured Telegram token.
    Serve,
    /// Generate a CSV report for the trailing period and mail it to the head office.
    Report {
        /// Report window: "day" or "week".
        period: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup; render diagnostics on failure.
    let config = match ombud_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            ombud_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.bot.log_level);

    let result = match cli.command {
        Commands::Serve => serve::run(config).await,
        Commands::Report { period } => report::run(config, &period).await,
    };

    if let Err(e) = result {
        eprintln!("ombud: {e}");
        std::process::exit(1);
    }
}

/// Initialize the tracing subscriber, preferring RUST_LOG when set.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
