//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Validate → Register resources → Freeze registry
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Drain connections → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Registration finishes before any listener is bound
//! - A registration error aborts startup; no partial schema is served

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
