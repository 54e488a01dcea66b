//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Validated config → Build database check → Wait
//!
//! Cancellation (signals.rs → shutdown.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger → wait returns Cancelled
//! ```

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
