// SPDX-FileCopyrightText: 2026 Semrouter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semrouter - semantic routing decision layer for LLM gateway traffic.
//!
//! This is the binary entry point: it runs the reference gateway and offers
//! one-off classification and health probes against the configured service.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod classify;
mod health;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use semrouter_config::model::SemrouterConfig;

/// Semrouter - semantic routing decision layer for LLM gateway traffic.
#[derive(Parser, Debug)]
#[command(name = "semrouter", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the standard locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the routing gateway in front of the configured upstream (default).
    Serve,
    /// Classify a piece of text and print the routing decision as JSON.
    Classify {
        /// Text to classify.
        text: String,
    },
    /// Probe the classification service.
    Health {
        /// Request a deeper check from the service.
        #[arg(long)]
        detailed: bool,
    },
    /// Print the effective configuration as TOML.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => semrouter_config::load_and_validate_path(path),
        None => semrouter_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            semrouter_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let code = run(cli.command.unwrap_or(Commands::Serve), config).await;
    std::process::exit(code);
}

async fn run(command: Commands, config: SemrouterConfig) -> i32 {
    match command {
        Commands::Serve => match serve::run_serve(config).await {
            Ok(()) => 0,
            Err(e) => {
                eprintln!("error: {e}");
                1
            }
        },
        Commands::Classify { text } => {
            serve::init_tracing(&config.server.log_level);
            classify::run_classify(&config, &text).await
        }
        Commands::Health { detailed } => {
            serve::init_tracing(&config.server.log_level);
            health::run_health(&config, detailed).await
        }
        Commands::Config => match semrouter_config::to_toml_string(&config) {
            Ok(rendered) => {
                print!("{rendered}");
                0
            }
            Err(e) => {
                eprintln!("error: {e}");
                1
            }
        },
    }
}
