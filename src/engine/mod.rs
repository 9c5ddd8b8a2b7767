//! Router engine contract.
//!
//! # Data Flow
//! ```text
//! LifecycleController
//!     → EngineFactory::construct(params, reporter)   (binds resources)
//!     → RouterEngine::add_route(route)
//!     → RouterEngine::start(cancel)                   (runs until stop/fault)
//!          └─ StatusReporter::report(..) → status channel → StatusMonitor
//! ```
//!
//! # Design Decisions
//! - The engine is opaque: protocol framing and forwarding live behind the trait
//! - Construction and start are separate so bind failures surface before start
//! - Cancellation is cooperative via `CancellationToken`
//! - The controller owns the engine by value; dropping it releases everything

pub mod listener;
pub mod status;

use std::net::IpAddr;

use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::routing::{AmsNetId, Route};

pub use listener::{TcpEngineFactory, TcpRouterEngine};
pub use status::{status_channel, RouterStatus, StatusEvent, StatusReporter};

/// Errors reported by a router engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Listener could not be bound (port in use, permission denied).
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Engine construction failed for a reason other than binding.
    #[error("engine construction failed: {0}")]
    Construction(String),

    /// A route with the same name is already registered.
    #[error("route {0:?} already exists")]
    DuplicateRoute(String),

    /// The route was rejected for another reason.
    #[error("route {name:?} rejected: {reason}")]
    RouteRejected { name: String, reason: String },

    /// The engine stopped because of an unrecoverable error.
    #[error("engine fault: {0}")]
    Fault(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Parameters an engine is constructed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineParams {
    pub local_address: AmsNetId,
    pub local_port: u16,
    pub bind_address: IpAddr,
    pub remote_port: u16,
}

/// A running router instance.
#[async_trait]
pub trait RouterEngine: Send {
    /// Register a static route. Must be called before `start`.
    fn add_route(&mut self, route: &Route) -> Result<(), EngineError>;

    /// Run the engine until `cancel` fires or a fault occurs.
    async fn start(&mut self, cancel: CancellationToken) -> Result<(), EngineError>;
}

/// Creates engine instances. One instance per supervisor run.
pub trait EngineFactory: Send + Sync + 'static {
    type Engine: RouterEngine + 'static;

    fn construct(
        &self,
        params: EngineParams,
        status: StatusReporter,
    ) -> Result<Self::Engine, EngineError>;
}
