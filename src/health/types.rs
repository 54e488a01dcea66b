//! Database aliases and probe error definitions.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Alias used when no database is named explicitly.
pub const DEFAULT_ALIAS: &str = "default";

/// Logical name of one configured database connection.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Alias(String);

impl Alias {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Alias {
    fn default() -> Self {
        Self(DEFAULT_ALIAS.to_string())
    }
}

impl fmt::Display for Alias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Alias {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for Alias {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl AsRef<str> for Alias {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Render an alias set for log fields, e.g. `default,replica`.
pub fn display_set(aliases: &[Alias]) -> String {
    aliases
        .iter()
        .map(Alias::as_str)
        .collect::<Vec<_>>()
        .join(",")
}

/// Classification of a failed availability check.
///
/// | kind             | retryable |
/// |------------------|-----------|
/// | `Connection`     | yes       |
/// | `Operational`    | yes       |
/// | `Authentication` | no        |
/// | `Configuration`  | no        |
/// | `Other`          | no        |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbeErrorKind {
    /// The driver could not open a socket or session yet.
    Connection,
    /// The server answered but is not accepting work yet (starting up,
    /// recovering, database still being created).
    Operational,
    /// Credentials were rejected.
    Authentication,
    /// Bad URL, unknown alias or unsupported scheme.
    Configuration,
    /// Anything unrecognized.
    Other,
}

impl ProbeErrorKind {
    pub fn is_retryable(self) -> bool {
        matches!(self, ProbeErrorKind::Connection | ProbeErrorKind::Operational)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ProbeErrorKind::Connection => "connection",
            ProbeErrorKind::Operational => "operational",
            ProbeErrorKind::Authentication => "authentication",
            ProbeErrorKind::Configuration => "configuration",
            ProbeErrorKind::Other => "other",
        }
    }
}

impl fmt::Display for ProbeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed availability check for one database alias.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} error on database '{alias}': {message}")]
pub struct ProbeError {
    pub alias: Alias,
    pub kind: ProbeErrorKind,
    pub message: String,
}

impl ProbeError {
    pub fn new(alias: impl Into<Alias>, kind: ProbeErrorKind, message: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            kind,
            message: message.into(),
        }
    }

    pub fn connection(alias: impl Into<Alias>, message: impl Into<String>) -> Self {
        Self::new(alias, ProbeErrorKind::Connection, message)
    }

    pub fn operational(alias: impl Into<Alias>, message: impl Into<String>) -> Self {
        Self::new(alias, ProbeErrorKind::Operational, message)
    }

    pub fn configuration(alias: impl Into<Alias>, message: impl Into<String>) -> Self {
        Self::new(alias, ProbeErrorKind::Configuration, message)
    }

    pub fn other(alias: impl Into<Alias>, message: impl Into<String>) -> Self {
        Self::new(alias, ProbeErrorKind::Other, message)
    }

    /// Whether waiting and checking again can make this error go away.
    pub fn retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_kinds() {
        assert!(ProbeError::connection("default", "refused").retryable());
        assert!(ProbeError::operational("default", "starting up").retryable());
        assert!(!ProbeError::configuration("default", "bad url").retryable());
        assert!(!ProbeError::other("default", "boom").retryable());
        assert!(!ProbeError::new("default", ProbeErrorKind::Authentication, "denied").retryable());
    }

    #[test]
    fn test_error_display() {
        let err = ProbeError::connection("replica", "connection refused");
        assert_eq!(
            err.to_string(),
            "connection error on database 'replica': connection refused"
        );
    }

    #[test]
    fn test_display_set() {
        let aliases = vec![Alias::from("default"), Alias::from("replica")];
        assert_eq!(display_set(&aliases), "default,replica");
        assert_eq!(display_set(&[]), "");
    }
}
