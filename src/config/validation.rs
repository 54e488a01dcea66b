//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (targets reference configured databases)
//! - Validate value ranges (timeouts > 0, attempts > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: WaitConfig → Result<(), Vec<ValidationError>>

use std::collections::BTreeSet;

use thiserror::Error;
use url::Url;

use crate::config::schema::{BackoffKind, WaitConfig};
use crate::health::database::SUPPORTED_SCHEMES;
use crate::health::types::Alias;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Longest delay accepted between attempts: one hour.
pub const MAX_DELAY_MS: u64 = 3_600_000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no target databases")]
    NoTargets,

    #[error("target '{0}' is listed more than once")]
    DuplicateTarget(Alias),

    #[error("target '{0}' has no [databases.{0}] entry")]
    UnknownTarget(Alias),

    #[error("database '{alias}' has an invalid URL: {reason}")]
    InvalidUrl { alias: Alias, reason: String },

    #[error("database '{alias}' uses unsupported scheme '{scheme}'")]
    UnsupportedScheme { alias: Alias, scheme: String },

    #[error("database '{0}' has a zero connect timeout")]
    ZeroTimeout(Alias),

    #[error("retry.max_attempts must be at least 1")]
    ZeroMaxAttempts,

    #[error("retry.base_delay_ms ({base}) exceeds retry.max_delay_ms ({max})")]
    DelayOrder { base: u64, max: u64 },

    #[error("retry.{field} ({value}) exceeds {max} ms", max = MAX_DELAY_MS)]
    DelayTooLong { field: &'static str, value: u64 },

    #[error("unknown log level '{0}'")]
    UnknownLogLevel(String),
}

pub fn validate_config(config: &WaitConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.targets.is_empty() {
        errors.push(ValidationError::NoTargets);
    }

    let mut seen = BTreeSet::new();
    for target in &config.targets {
        if !seen.insert(target) {
            errors.push(ValidationError::DuplicateTarget(target.clone()));
        } else if !config.databases.contains_key(target) {
            errors.push(ValidationError::UnknownTarget(target.clone()));
        }
    }

    for (alias, db) in &config.databases {
        match Url::parse(&db.url) {
            Ok(url) if !SUPPORTED_SCHEMES.contains(&url.scheme()) => {
                errors.push(ValidationError::UnsupportedScheme {
                    alias: alias.clone(),
                    scheme: url.scheme().to_string(),
                });
            }
            Ok(_) => {}
            Err(e) => errors.push(ValidationError::InvalidUrl {
                alias: alias.clone(),
                reason: e.to_string(),
            }),
        }
        if db.connect_timeout_secs == 0 {
            errors.push(ValidationError::ZeroTimeout(alias.clone()));
        }
    }

    if config.retry.max_attempts == Some(0) {
        errors.push(ValidationError::ZeroMaxAttempts);
    }

    for (field, value) in [
        ("base_delay_ms", config.retry.base_delay_ms),
        ("max_delay_ms", config.retry.max_delay_ms),
    ] {
        if value > MAX_DELAY_MS {
            errors.push(ValidationError::DelayTooLong { field, value });
        }
    }

    if config.retry.backoff == BackoffKind::Exponential
        && config.retry.base_delay_ms > config.retry.max_delay_ms
    {
        errors.push(ValidationError::DelayOrder {
            base: config.retry.base_delay_ms,
            max: config.retry.max_delay_ms,
        });
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
