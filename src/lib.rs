//! ADS Router Service Library
//!
//! Supervises a router engine for one static route: validates the endpoint
//! configuration, builds the route, drives the engine lifecycle and relays
//! its status transitions to the log.

pub mod config;
pub mod engine;
pub mod error;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod supervisor;

pub use config::ServiceConfig;
pub use error::SupervisorError;
pub use supervisor::{Lifecycle, RouteSupervisor, SupervisorState};
