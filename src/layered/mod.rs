//! Layered configuration subsystem.
//!
//! # Data Flow
//! ```text
//! settings file (TOML)
//!     → file.rs (flatten to "section:key" entries)
//!     → layer 0
//!
//! remote secret store
//!     → vault::VaultConfigProvider
//!     → layer 1
//!
//! ConfigLayers::get(key)
//!     → walk layers top-down, first layer holding the key wins
//! ```
//!
//! # Design Decisions
//! - Every layer is a `ConfigProvider`: a readable snapshot plus `reload`
//! - Snapshots are replaced wholesale through `ArcSwap`, never mutated
//! - An explicit `null` in an upper layer shadows lower values

pub mod file;
pub mod provider;
pub mod snapshot;
pub mod stack;

pub use file::FileConfigProvider;
pub use provider::{ConfigMap, ConfigProvider, ReloadOutcome};
pub use snapshot::{Snapshot, SnapshotDiff};
pub use stack::ConfigLayers;
