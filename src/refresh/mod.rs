//! Periodic refresh subsystem.
//!
//! # State Machine
//! ```text
//! Idle      interval = 0, run() returns immediately
//! Waiting   next tick or cancellation
//! Reloading provider.reload() in its own task
//! Stopped   cancellation observed (terminal)
//!
//! Waiting → Reloading → Waiting → ... → Stopped
//! ```
//!
//! # Design Decisions
//! - One reload in flight at a time; ticks missed during a slow reload are delayed
//! - Each reload runs as a child task so a panic is isolated and logged
//! - Only external cancellation ends the loop

pub mod policy;
pub mod scheduler;

pub use policy::RefreshPolicy;
pub use scheduler::RefreshScheduler;
