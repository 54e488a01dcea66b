//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the database check from a validated configuration
//! - Run the wait with the configured retry policy
//! - Stop early when the shutdown handle fires

use crate::config::schema::WaitConfig;
use crate::health::database::DatabaseCheck;
use crate::lifecycle::shutdown::Shutdown;
use crate::resilience::backoff::RetryPolicy;
use crate::resilience::retries::{wait_for_db_until, WaitError, WaitOutcome};

/// Wait for every target in `config` to accept connections.
pub async fn run(config: &WaitConfig, shutdown: &Shutdown) -> Result<WaitOutcome, WaitError> {
    let check = DatabaseCheck::from_config(config)
        .map_err(|source| WaitError::Fatal { attempts: 0, source })?;
    let policy = RetryPolicy::from(&config.retry);

    wait_for_db_until(&check, &config.targets, &policy, shutdown.cancelled()).await
}
