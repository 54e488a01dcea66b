//! PostgreSQL availability probe.
//!
//! # Responsibilities
//! - Open a fresh connection (no pool) and run `SELECT 1`
//! - Bound the whole exchange by the configured connect timeout
//! - Map driver errors onto [`ProbeErrorKind`]

use std::time::Duration;

use sqlx::{Connection, PgConnection};
use tokio::time::timeout;
use url::Url;

use crate::health::types::{Alias, ProbeError, ProbeErrorKind};

pub struct PostgresProbe {
    url: Url,
    connect_timeout: Duration,
}

impl PostgresProbe {
    pub fn new(url: Url, connect_timeout: Duration) -> Self {
        Self {
            url,
            connect_timeout,
        }
    }

    /// Connection URL with the password masked, for logs.
    pub fn redacted_url(&self) -> String {
        redact(&self.url)
    }

    pub async fn probe(&self, alias: &Alias) -> Result<(), ProbeError> {
        let exchange = async {
            let mut conn = PgConnection::connect(self.url.as_str()).await?;
            sqlx::query("SELECT 1").execute(&mut conn).await?;
            conn.close().await?;
            Ok::<_, sqlx::Error>(())
        };

        match timeout(self.connect_timeout, exchange).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(classify(alias, &e)),
            Err(_) => Err(ProbeError::connection(
                alias.clone(),
                format!(
                    "no answer from {} within {}s",
                    self.redacted_url(),
                    self.connect_timeout.as_secs()
                ),
            )),
        }
    }
}

/// Map a driver error to a probe error.
pub fn classify(alias: &Alias, err: &sqlx::Error) -> ProbeError {
    let kind = match err {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Protocol(_) => ProbeErrorKind::Connection,
        sqlx::Error::Database(db_err) => match db_err.code() {
            Some(code) => classify_sqlstate(&code),
            None => ProbeErrorKind::Other,
        },
        sqlx::Error::Configuration(_) => ProbeErrorKind::Configuration,
        _ => ProbeErrorKind::Other,
    };
    ProbeError::new(alias.clone(), kind, err.to_string())
}

/// Classify a server-reported SQLSTATE.
pub fn classify_sqlstate(code: &str) -> ProbeErrorKind {
    match code {
        // cannot_connect_now: server is starting up or in recovery
        "57P03" => ProbeErrorKind::Operational,
        // too_many_connections
        "53300" => ProbeErrorKind::Operational,
        // invalid_catalog_name: init scripts may still be creating it
        "3D000" => ProbeErrorKind::Operational,
        c if c.starts_with("08") => ProbeErrorKind::Operational,
        c if c.starts_with("28") => ProbeErrorKind::Authentication,
        _ => ProbeErrorKind::Other,
    }
}

pub(crate) fn redact(url: &Url) -> String {
    let mut masked = url.clone();
    if masked.password().is_some() {
        let _ = masked.set_password(Some("***"));
    }
    masked.to_string()
}
