//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.
//! Every field has a default so an empty file is a valid configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::health::types::Alias;

/// Root configuration for a wait.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WaitConfig {
    /// Aliases that must all answer before the wait succeeds.
    pub targets: Vec<Alias>,

    /// Database connection definitions keyed by alias.
    pub databases: BTreeMap<Alias, DatabaseConfig>,

    /// Retry ceiling and backoff.
    pub retry: RetryConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            targets: vec![Alias::default()],
            databases: BTreeMap::new(),
            retry: RetryConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// One database connection.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Connection URL, e.g. `postgres://app:secret@db:5432/app` or `tcp://db:3306`.
    pub url: String,

    /// Per-attempt connect timeout in seconds.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

fn default_connect_timeout_secs() -> u64 {
    5
}

/// Backoff shape between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackoffKind {
    /// Same delay after every failure.
    #[default]
    Fixed,
    /// Delay doubles after every failure, capped at `max_delay_ms`.
    Exponential,
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of attempts. `None` waits forever.
    pub max_attempts: Option<u32>,

    /// Delay after the first failure in milliseconds.
    pub base_delay_ms: u64,

    /// Upper bound for exponential backoff in milliseconds.
    pub max_delay_ms: u64,

    /// Backoff shape.
    pub backoff: BackoffKind,

    /// Add up to 10% random jitter to each delay.
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: None,
            base_delay_ms: 1000,
            max_delay_ms: 30_000,
            backoff: BackoffKind::Fixed,
            jitter: false,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
