//! Availability check backed by the configured database drivers.
//!
//! # Responsibilities
//! - Resolve each alias to a driver from its URL scheme
//! - Probe every requested alias in order, failing on the first error

use std::collections::BTreeMap;
use std::time::Duration;

use url::Url;

use crate::config::schema::{DatabaseConfig, WaitConfig};
use crate::health::check::AvailabilityCheck;
use crate::health::postgres::{redact, PostgresProbe};
use crate::health::tcp::TcpProbe;
use crate::health::types::{Alias, ProbeError};

/// URL schemes a database can be probed through.
pub const SUPPORTED_SCHEMES: &[&str] = &["postgres", "postgresql", "tcp"];

/// One alias's probe, chosen by URL scheme.
pub enum Driver {
    Postgres(PostgresProbe),
    Tcp(TcpProbe),
}

impl Driver {
    pub fn from_config(alias: &Alias, config: &DatabaseConfig) -> Result<Self, ProbeError> {
        let url = Url::parse(&config.url).map_err(|e| {
            ProbeError::configuration(alias.clone(), format!("invalid database URL: {}", e))
        })?;
        let connect_timeout = Duration::from_secs(config.connect_timeout_secs);

        match url.scheme() {
            "postgres" | "postgresql" => Ok(Driver::Postgres(PostgresProbe::new(url, connect_timeout))),
            "tcp" => {
                let host = url.host_str().ok_or_else(|| {
                    ProbeError::configuration(alias.clone(), "tcp URL has no host")
                })?;
                let port = url.port().ok_or_else(|| {
                    ProbeError::configuration(alias.clone(), "tcp URL has no port")
                })?;
                Ok(Driver::Tcp(TcpProbe::new(host, port, connect_timeout)))
            }
            other => Err(ProbeError::configuration(
                alias.clone(),
                format!("unsupported scheme '{}' in {}", other, redact(&url)),
            )),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Driver::Postgres(p) => p.redacted_url(),
            Driver::Tcp(t) => format!("tcp://{}", t.endpoint()),
        }
    }

    pub async fn probe(&self, alias: &Alias) -> Result<(), ProbeError> {
        match self {
            Driver::Postgres(p) => p.probe(alias).await,
            Driver::Tcp(t) => t.probe(alias).await,
        }
    }
}

/// Checks aliases against the databases named in a [`WaitConfig`].
pub struct DatabaseCheck {
    drivers: BTreeMap<Alias, Driver>,
}

impl DatabaseCheck {
    pub fn new(drivers: BTreeMap<Alias, Driver>) -> Self {
        Self { drivers }
    }

    pub fn from_config(config: &WaitConfig) -> Result<Self, ProbeError> {
        let mut drivers = BTreeMap::new();
        for (alias, db) in &config.databases {
            let driver = Driver::from_config(alias, db)?;
            tracing::debug!(alias = %alias, target = %driver.describe(), "Database probe configured");
            drivers.insert(alias.clone(), driver);
        }
        Ok(Self::new(drivers))
    }
}

impl AvailabilityCheck for DatabaseCheck {
    async fn check(&self, databases: &[Alias]) -> Result<bool, ProbeError> {
        for alias in databases {
            let driver = self.drivers.get(alias).ok_or_else(|| {
                ProbeError::configuration(alias.clone(), "no database configured under this alias")
            })?;
            driver.probe(alias).await?;
            tracing::debug!(alias = %alias, "Database answered");
        }
        Ok(true)
    }
}
