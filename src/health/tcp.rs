//! Plain TCP reachability probe.
//!
//! Used for `tcp://host:port` endpoints, where no driver handshake is
//! available and an accepted socket is the best readiness signal.

use std::time::Duration;

use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::health::types::{Alias, ProbeError};

pub struct TcpProbe {
    host: String,
    port: u16,
    connect_timeout: Duration,
}

impl TcpProbe {
    pub fn new(host: impl Into<String>, port: u16, connect_timeout: Duration) -> Self {
        Self {
            host: host.into(),
            port,
            connect_timeout,
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub async fn probe(&self, alias: &Alias) -> Result<(), ProbeError> {
        let connect = TcpStream::connect((self.host.as_str(), self.port));
        match timeout(self.connect_timeout, connect).await {
            Ok(Ok(_stream)) => Ok(()),
            // Refused, reset and unresolvable hosts all clear up once the
            // container is scheduled and listening.
            Ok(Err(e)) => Err(ProbeError::connection(
                alias.clone(),
                format!("{}: {}", self.endpoint(), e),
            )),
            Err(_) => Err(ProbeError::connection(
                alias.clone(),
                format!(
                    "{}: no answer within {}s",
                    self.endpoint(),
                    self.connect_timeout.as_secs()
                ),
            )),
        }
    }
}
