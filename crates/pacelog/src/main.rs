// SPDX-FileCopyrightText: 2026 Pacelog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pacelog - a LINE bot backend that records running distances from
//! race-result images.
//!
//! This is the binary entry point.

use clap::{Parser, Subcommand};

mod serve;

/// Pacelog - run-tracking LINE bot backend.
#[derive(Parser, Debug)]
#[command(name = "pacelog", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the webhook server.
    Serve,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup. Missing credentials or
    // malformed TOML terminate here with rendered diagnostics.
    let config = match pacelog_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            pacelog_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(err) = serve::run_serve(config).await {
                eprintln!("pacelog serve failed: {err}");
                std::process::exit(1);
            }
        }
        None => {
            println!("pacelog: use --help for available commands");
        }
    }
}
