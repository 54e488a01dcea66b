//! Command-line interface for the `wait-for-db` binary.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use serde_json::{json, Value};

use crate::config::loader::{set_url, ConfigError};
use crate::config::schema::{BackoffKind, WaitConfig};
use crate::health::types::Alias;
use crate::resilience::retries::{WaitError, WaitOutcome};

#[derive(Debug, Parser)]
#[command(name = "wait-for-db")]
#[command(about = "Block until the configured databases accept connections", long_about = None)]
pub struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Database alias to wait for; repeat for several (default: "default").
    #[arg(short = 'd', long = "database", value_name = "ALIAS")]
    pub databases: Vec<String>,

    /// Database URL as ALIAS=URL, or a bare URL for the default alias.
    #[arg(short, long = "url", value_name = "[ALIAS=]URL")]
    pub urls: Vec<String>,

    /// Give up after this many attempts (default: wait forever).
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Delay after a failed attempt, in milliseconds.
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Upper bound for exponential backoff, in milliseconds.
    #[arg(long)]
    pub max_delay_ms: Option<u64>,

    /// Backoff shape between attempts.
    #[arg(long, value_enum)]
    pub backoff: Option<BackoffArg>,

    /// Add up to 10% random jitter to each delay.
    #[arg(long)]
    pub jitter: bool,

    /// Per-attempt connect timeout in seconds, applied to every database.
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Print the outcome as JSON on stdout.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackoffArg {
    Fixed,
    Exponential,
}

impl From<BackoffArg> for BackoffKind {
    fn from(arg: BackoffArg) -> Self {
        match arg {
            BackoffArg::Fixed => BackoffKind::Fixed,
            BackoffArg::Exponential => BackoffKind::Exponential,
        }
    }
}

impl Cli {
    /// Layer flags over `config`. Flags win over file and environment.
    pub fn apply(&self, config: &mut WaitConfig) -> Result<(), ConfigError> {
        if !self.databases.is_empty() {
            config.targets = self.databases.iter().map(|d| Alias::from(d.as_str())).collect();
        }

        for spec in &self.urls {
            let (alias, url) = parse_url_arg(spec)?;
            set_url(config, alias, url);
        }

        if let Some(n) = self.max_attempts {
            config.retry.max_attempts = Some(n);
        }
        if let Some(ms) = self.delay_ms {
            config.retry.base_delay_ms = ms;
        }
        if let Some(ms) = self.max_delay_ms {
            config.retry.max_delay_ms = ms;
        }
        if let Some(backoff) = self.backoff {
            config.retry.backoff = backoff.into();
        }
        if self.jitter {
            config.retry.jitter = true;
        }
        if let Some(secs) = self.timeout_secs {
            for db in config.databases.values_mut() {
                db.connect_timeout_secs = secs;
            }
        }
        if let Some(level) = &self.log_level {
            config.observability.log_level = level.clone();
        }

        Ok(())
    }
}

/// `--json` report for a finished wait.
pub fn wait_report(targets: &[Alias], result: &Result<WaitOutcome, WaitError>) -> Value {
    match result {
        Ok(outcome) => json!({
            "ready": true,
            "databases": targets,
            "attempts": outcome.attempts,
            "elapsed_ms": outcome.elapsed.as_millis() as u64,
        }),
        Err(e) => json!({
            "ready": false,
            "databases": targets,
            "attempts": e.attempts(),
            "error": e.to_string(),
        }),
    }
}

/// `--json` report when no wait was started because the configuration failed.
pub fn config_error_report(targets: &[Alias], err: &ConfigError) -> Value {
    json!({
        "ready": false,
        "databases": targets,
        "attempts": 0,
        "error": err.to_string(),
    })
}

/// Split `ALIAS=URL`. A value whose `=` comes after `://` is a bare URL.
fn parse_url_arg(spec: &str) -> Result<(Alias, String), ConfigError> {
    let scheme_at = spec.find("://");
    match spec.find('=') {
        Some(eq) if scheme_at.map_or(true, |s| eq < s) => {
            let (alias, url) = (&spec[..eq], &spec[eq + 1..]);
            if alias.is_empty() || url.is_empty() {
                return Err(ConfigError::Argument(format!(
                    "expected ALIAS=URL, got {:?}",
                    spec
                )));
            }
            Ok((Alias::from(alias), url.to_string()))
        }
        _ if spec.is_empty() => Err(ConfigError::Argument("empty --url".to_string())),
        _ => Ok((Alias::default(), spec.to_string())),
    }
}
