//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs apply_env (DATABASE_URL, WAIT_FOR_DB_*)
//!     → cli.rs overrides (flags win)
//!     → validation.rs (semantic checks)
//!     → WaitConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Precedence: defaults < file < environment < flags
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_layered, ConfigError};
pub use schema::{BackoffKind, DatabaseConfig, ObservabilityConfig, RetryConfig, WaitConfig};
