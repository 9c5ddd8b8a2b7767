//! Supervisor error taxonomy.
//!
//! Startup errors (`Configuration`, `RouteRegistration`, `EngineStart`) are
//! fatal and never retried. `RuntimeFault` and `ShutdownTimeout` happen after
//! the engine was running and are surfaced to the host as a distinct failure.

use std::time::Duration;

use thiserror::Error;

use crate::supervisor::state::SupervisorState;

/// Exit code for an unusable configuration (EX_CONFIG from sysexits.h).
pub const EXIT_CONFIG: u8 = 78;

/// Errors produced by the route supervisor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SupervisorError {
    /// A configuration value is malformed or unusable.
    #[error("invalid {field} {value:?}: {reason}")]
    Configuration {
        field: String,
        value: String,
        reason: String,
    },

    /// The router engine rejected the route.
    #[error("route registration failed: {0}")]
    RouteRegistration(String),

    /// The router engine could not be constructed or started.
    #[error("engine start failed: {0}")]
    EngineStart(String),

    /// The engine reported an unrecoverable fault after it was running.
    #[error("router fault: {0}")]
    RuntimeFault(String),

    /// The engine did not acknowledge a stop within the bound.
    #[error("shutdown did not complete within {0:?}")]
    ShutdownTimeout(Duration),

    /// `start` was called on an instance that was already started.
    #[error("supervisor was already started")]
    AlreadyStarted,

    /// `stop` or `wait` was called before `start`.
    #[error("supervisor was not started")]
    NotStarted,

    /// The state machine was asked for a transition it does not allow.
    #[error("invalid state transition {from} -> {to}")]
    InvalidTransition {
        from: SupervisorState,
        to: SupervisorState,
    },
}

impl SupervisorError {
    pub fn configuration(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Configuration {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Short stable label for logs and metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            Self::Configuration { .. } => "configuration",
            Self::RouteRegistration(_) => "route_registration",
            Self::EngineStart(_) => "engine_start",
            Self::RuntimeFault(_) => "runtime_fault",
            Self::ShutdownTimeout(_) => "shutdown_timeout",
            Self::AlreadyStarted => "already_started",
            Self::NotStarted => "not_started",
            Self::InvalidTransition { .. } => "invalid_transition",
        }
    }

    /// True for errors raised before the engine reached `Running`.
    pub fn is_startup(&self) -> bool {
        matches!(
            self,
            Self::Configuration { .. } | Self::RouteRegistration(_) | Self::EngineStart(_)
        )
    }

    /// True for faults the restart policy may act on.
    pub fn is_runtime(&self) -> bool {
        matches!(self, Self::RuntimeFault(_))
    }

    /// Process exit code reported to the service host.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Configuration { .. } => EXIT_CONFIG,
            Self::RouteRegistration(_) | Self::EngineStart(_) => 2,
            Self::RuntimeFault(_) => 3,
            Self::ShutdownTimeout(_) => 4,
            Self::AlreadyStarted | Self::NotStarted | Self::InvalidTransition { .. } => 70,
        }
    }
}
