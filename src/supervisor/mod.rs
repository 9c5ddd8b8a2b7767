//! Route supervisor subsystem.
//!
//! # Data Flow
//! ```text
//! RouteSupervisor::start (service.rs)
//!     → Route::from_configuration
//!     → spawn LifecycleController::run (controller.rs)
//!         → EngineFactory::construct → add_route → start
//!         → engine StatusReporter → StatusMonitor (monitor.rs, dedup)
//!         → state transitions (state.rs) → watch + records + log
//! RouteSupervisor::stop
//!     → Control::Stop over the control channel → ShuttingDown → Stopped
//! ```
//!
//! # Design Decisions
//! - Message passing instead of callbacks: the engine never touches state
//! - One instance per run; terminal states are never left
//! - Errors are returned as `SupervisorError`, never only logged

pub mod controller;
pub mod monitor;
pub mod record;
pub mod service;
pub mod state;

pub use controller::{Control, LifecycleController};
pub use monitor::StatusMonitor;
pub use record::{LifecycleRecord, RecordSink};
pub use service::{Lifecycle, RouteSupervisor};
pub use state::SupervisorState;
