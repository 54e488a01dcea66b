//! wait-for-db
//!
//! Blocks process startup until the configured databases accept
//! connections, then exits 0.
//!
//! # Architecture Overview
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────┐
//!   │                         wait-for-db                          │
//!   │                                                              │
//!   │  ┌─────────┐   ┌──────────┐   ┌────────────┐   ┌──────────┐  │
//!   │  │   cli   │──▶│  config  │──▶│ lifecycle  │──▶│resilience│  │
//!   │  │  flags  │   │file + env│   │  startup   │   │  retries │  │
//!   │  └─────────┘   └──────────┘   └────────────┘   └────┬─────┘  │
//!   │                                                     │        │
//!   │                                                     ▼        │
//!   │                                              ┌────────────┐  │
//!   │                                              │   health   │──┼──▶ Database
//!   │                                              │ pg / tcp   │  │
//!   │                                              └────────────┘  │
//!   └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Exit Codes
//! - 0: every database answered
//! - 1: attempts exhausted
//! - 2: non-retryable error or invalid configuration
//! - 130: cancelled by signal

use std::process::ExitCode;

use clap::Parser;

use wait_for_db::cli::{config_error_report, wait_report, Cli};
use wait_for_db::config::{load_layered, ConfigError, WaitConfig};
use wait_for_db::health::types::{display_set, Alias};
use wait_for_db::lifecycle::{signals, startup, Shutdown};
use wait_for_db::observability::logging;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            if cli.json {
                let targets = requested_targets(&cli);
                println!("{}", config_error_report(&targets, &e));
            }
            eprintln!("wait-for-db: {}", e);
            return ExitCode::from(2);
        }
    };

    logging::init_logging(&config.observability.log_level);

    tracing::info!(
        targets = %display_set(&config.targets),
        max_attempts = ?config.retry.max_attempts,
        base_delay_ms = config.retry.base_delay_ms,
        backoff = ?config.retry.backoff,
        "Configuration loaded"
    );

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(shutdown.clone());

    let result = startup::run(&config, &shutdown).await;

    if cli.json {
        println!("{}", wait_report(&config.targets, &result));
    }

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Database not ready");
            ExitCode::from(e.exit_code())
        }
    }
}

fn build_config(cli: &Cli) -> Result<WaitConfig, ConfigError> {
    load_layered(
        cli.config.as_deref(),
        |var| std::env::var(var).ok(),
        |config| cli.apply(config),
    )
}

// Config never loaded, so only the flags say what was asked for.
fn requested_targets(cli: &Cli) -> Vec<Alias> {
    if cli.databases.is_empty() {
        vec![Alias::default()]
    } else {
        cli.databases.iter().map(|d| Alias::from(d.as_str())).collect()
    }
}
