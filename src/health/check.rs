//! The availability check contract consumed by the prober.

use std::future::Future;

use crate::health::types::{Alias, ProbeError};

/// Answers whether a set of databases is reachable right now.
///
/// Implementations return `Ok(true)` once every requested alias answered,
/// `Ok(false)` when they can tell the databases are not ready without an
/// error to report, and a [`ProbeError`] otherwise. The prober retries only
/// errors whose [`ProbeError::retryable`] is true.
pub trait AvailabilityCheck {
    fn check(&self, databases: &[Alias]) -> impl Future<Output = Result<bool, ProbeError>> + Send;
}
