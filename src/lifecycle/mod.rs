//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Settings → file layer → Vault layer (initial load) → scheduler + watcher
//!
//! Shutdown (shutdown.rs):
//!     Signal received → cancel token → scheduler exits → watcher dropped
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Ordered startup: settings first, then layers bottom-up, then background tasks
//! - One cancellation token for the process, threaded into every wait and fetch
//! - A failed initial Vault load is tolerated; a broken settings file is fatal

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{start, Mode, Running};
