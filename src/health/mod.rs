//! Database availability checking.
//!
//! # Data Flow
//! ```text
//! Prober attempt:
//!     → check.rs (AvailabilityCheck::check with the full alias set)
//!     → database.rs (resolve each alias to a driver)
//!     → postgres.rs / tcp.rs (one probe per alias)
//!     → types.rs (ProbeError tagged connection/operational/...)
//! ```
//!
//! # Design Decisions
//! - Every probe opens a fresh connection; nothing is pooled between attempts
//! - Error kinds carry the retry decision, not the prober

pub mod check;
pub mod database;
pub mod postgres;
pub mod tcp;
pub mod types;

pub use check::AvailabilityCheck;
pub use database::DatabaseCheck;
pub use types::{Alias, ProbeError, ProbeErrorKind, DEFAULT_ALIAS};
