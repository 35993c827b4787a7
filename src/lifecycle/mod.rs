//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Drain in-flight requests → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//!     SIGHUP → Reload config file into the live snapshot
//! ```
//!
//! # Design Decisions
//! - Startup is linear in main: config, logging, metrics, listener, server
//! - Listener binds last so traffic only arrives when ready

pub mod shutdown;
pub mod signals;

pub use shutdown::{Shutdown, ShutdownSignal};
