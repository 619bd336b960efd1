//! Settings subsystem.
//!
//! # Data Flow
//! ```text
//! settings file (TOML)
//!     → loader.rs (parse & deserialize, env overrides)
//!     → validation.rs (semantic checks)
//!     → AppSettings (validated, immutable)
//!     → connection descriptor + refresh policy for the Vault layer
//!
//! On file change:
//!     watcher.rs detects change
//!     → file layer re-reads and flattens the file
//!     → atomic swap of the file snapshot
//! ```
//!
//! # Design Decisions
//! - Settings are read once; only the file layer's snapshot hot-reloads
//! - All fields have defaults to allow minimal files
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_settings, ConfigError};
pub use schema::{AppSettings, LogFormat, LoggingSettings, MetricsSettings, VaultSettings};
pub use validation::ValidationError;
pub use watcher::ConfigWatcher;
