//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Prober and probes produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters and histograms via the metrics facade)
//!
//! Consumers:
//!     → stderr (fmt layer installed by the binary)
//!     → whatever recorder an embedding application installs
//! ```
//!
//! # Design Decisions
//! - The library only emits; subscriber and recorder setup belong to the binary
//! - No recorder installed means metric calls are no-ops

pub mod logging;
pub mod metrics;
