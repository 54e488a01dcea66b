//! Startup readiness probe for databases.
//!
//! Blocks until every requested database alias accepts connections,
//! retrying connection and operational errors with a configurable
//! attempt ceiling and backoff.

pub mod cli;
pub mod config;
pub mod health;
pub mod lifecycle;
pub mod observability;
pub mod resilience;

pub use config::schema::WaitConfig;
pub use health::{Alias, AvailabilityCheck, DatabaseCheck, ProbeError, ProbeErrorKind};
pub use lifecycle::Shutdown;
pub use resilience::{wait_for_db, wait_for_db_until, RetryPolicy, WaitError, WaitOutcome};
