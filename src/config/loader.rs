//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{DatabaseConfig, WaitConfig};
use crate::config::validation::{validate_config, ValidationError};
use crate::health::types::Alias;

/// Fills the `default` alias URL.
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
pub const ENV_MAX_ATTEMPTS: &str = "WAIT_FOR_DB_MAX_ATTEMPTS";
pub const ENV_DELAY_MS: &str = "WAIT_FOR_DB_DELAY_MS";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value {value:?} for {var}")]
    Env { var: String, value: String },

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Read and parse a TOML file without validating it.
pub fn read_config(path: &Path) -> Result<WaitConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: WaitConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file, with the process
/// environment layered on top.
pub fn load_config(path: &Path) -> Result<WaitConfig, ConfigError> {
    load_layered(Some(path), |var| std::env::var(var).ok(), |_| Ok(()))
}

/// Build a validated configuration: defaults, then the optional file, then
/// the environment, then `overrides` (command-line flags).
pub fn load_layered<E, O>(
    path: Option<&Path>,
    lookup: E,
    overrides: O,
) -> Result<WaitConfig, ConfigError>
where
    E: Fn(&str) -> Option<String>,
    O: FnOnce(&mut WaitConfig) -> Result<(), ConfigError>,
{
    let mut config = match path {
        Some(path) => read_config(path)?,
        None => WaitConfig::default(),
    };
    apply_env(&mut config, lookup)?;
    overrides(&mut config)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay environment variables onto `config`.
///
/// `lookup` is `std::env::var` in production; tests pass a map.
pub fn apply_env<F>(config: &mut WaitConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_DATABASE_URL).filter(|u| !u.is_empty()) {
        set_url(config, Alias::default(), url);
    }

    if let Some(value) = lookup(ENV_MAX_ATTEMPTS) {
        let attempts = parse_env(ENV_MAX_ATTEMPTS, &value)?;
        config.retry.max_attempts = Some(attempts);
    }

    if let Some(value) = lookup(ENV_DELAY_MS) {
        config.retry.base_delay_ms = parse_env(ENV_DELAY_MS, &value)?;
    }

    Ok(())
}

/// Set the URL for `alias`, keeping its other settings if it already exists.
pub fn set_url(config: &mut WaitConfig, alias: Alias, url: String) {
    config
        .databases
        .entry(alias)
        .and_modify(|db| db.url = url.clone())
        .or_insert_with(|| DatabaseConfig::new(url));
}

fn parse_env<T: std::str::FromStr>(var: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Env {
        var: var.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn test_read_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [databases.default]
            url = "postgres://app@db/app"
            connect_timeout_secs = 3

            [retry]
            max_attempts = 10
            "#
        )
        .unwrap();

        let config = read_config(file.path()).unwrap();
        let db = &config.databases[&Alias::default()];
        assert_eq!(db.url, "postgres://app@db/app");
        assert_eq!(db.connect_timeout_secs, 3);
        assert_eq!(config.retry.max_attempts, Some(10));
    }

    #[test]
    fn test_load_config_validates() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "targets = []").unwrap();
        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Validation(ref errors) if errors.contains(&ValidationError::NoTargets)
        ));
    }

    #[test]
    fn test_layer_precedence() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [databases.default]
            url = "tcp://file:5432"

            [retry]
            max_attempts = 3
            base_delay_ms = 100
            "#
        )
        .unwrap();

        let config = load_layered(
            Some(file.path()),
            env(&[(ENV_DATABASE_URL, "tcp://env:5432"), (ENV_MAX_ATTEMPTS, "7")]),
            |config| {
                config.retry.max_attempts = Some(9);
                Ok(())
            },
        )
        .unwrap();

        assert_eq!(config.databases[&Alias::default()].url, "tcp://env:5432");
        assert_eq!(config.retry.max_attempts, Some(9));
        assert_eq!(config.retry.base_delay_ms, 100);
    }

    #[test]
    fn test_overrides_are_validated() {
        let err = load_layered(None, env(&[(ENV_DATABASE_URL, "tcp://db:5432")]), |config| {
            config.retry.base_delay_ms = u64::MAX;
            Ok(())
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));

        let err = load_layered(None, env(&[]), |_| {
            Err(ConfigError::Argument("bad flag".into()))
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::Argument(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = read_config(Path::new("/nonexistent/wait-for-db.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "targets = 3").unwrap();
        let err = read_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_env_overlay() {
        let mut config = WaitConfig::default();
        config.databases.insert(Alias::default(), DatabaseConfig {
            url: "postgres://old@db/app".into(),
            connect_timeout_secs: 9,
        });

        apply_env(
            &mut config,
            env(&[
                (ENV_DATABASE_URL, "postgres://new@db/app"),
                (ENV_MAX_ATTEMPTS, "12"),
                (ENV_DELAY_MS, " 250 "),
            ]),
        )
        .unwrap();

        let db = &config.databases[&Alias::default()];
        assert_eq!(db.url, "postgres://new@db/app");
        assert_eq!(db.connect_timeout_secs, 9);
        assert_eq!(config.retry.max_attempts, Some(12));
        assert_eq!(config.retry.base_delay_ms, 250);
    }

    #[test]
    fn test_env_fills_missing_default() {
        let mut config = WaitConfig::default();
        apply_env(&mut config, env(&[(ENV_DATABASE_URL, "tcp://db:5432")])).unwrap();
        assert_eq!(config.databases[&Alias::default()].url, "tcp://db:5432");
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_env_rejects_garbage() {
        let mut config = WaitConfig::default();
        let err = apply_env(&mut config, env(&[(ENV_MAX_ATTEMPTS, "lots")])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid value \"lots\" for WAIT_FOR_DB_MAX_ATTEMPTS"
        );
    }

    #[test]
    fn test_validation_error_message() {
        let err = ConfigError::Validation(vec![
            ValidationError::NoTargets,
            ValidationError::ZeroMaxAttempts,
        ]);
        assert_eq!(
            err.to_string(),
            "Validation failed: no target databases, retry.max_attempts must be at least 1"
        );
    }
}
