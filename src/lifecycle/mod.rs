//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Validate → RouteSupervisor::start → wait
//!
//! Shutdown (signals.rs):
//!     SIGTERM/SIGINT → cancel token → RouteSupervisor::stop(timeout) → Exit
//!
//! Restart (restart.rs):
//!     RuntimeFault + on-failure policy → backoff → fresh RouteSupervisor
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then engine, then route
//! - Shutdown has timeout: the engine is dropped after the deadline
//! - Runtime faults end the process unless a restart policy is configured

pub mod restart;
pub mod signals;
pub mod startup;

pub use restart::RestartPolicy;
pub use startup::run_service;
