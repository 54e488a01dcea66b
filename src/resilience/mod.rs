//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! wait_for_db:
//!     → health::AvailabilityCheck (one check of the full alias set)
//!     → On retryable failure: backoff.rs (fixed or exponential delay)
//!     → retries.rs (attempt ceiling, cancellation, outcome)
//! ```
//!
//! # Design Decisions
//! - Only connection and operational errors are retried
//! - Attempt ceiling and delay come from configuration; unset ceiling waits forever
//! - Jitter is opt-in

pub mod backoff;
pub mod retries;

pub use backoff::{Backoff, RetryPolicy};
pub use retries::{wait_for_db, wait_for_db_until, WaitError, WaitOutcome};
