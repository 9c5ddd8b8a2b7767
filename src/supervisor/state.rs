//! Supervisor lifecycle state machine.
//!
//! # States
//! - Idle: constructed, not started
//! - Initializing: engine being constructed and route registered
//! - Running: engine reported `Running`
//! - ShuttingDown: stop requested, waiting for the engine
//! - Stopped: engine acknowledged the stop (terminal)
//! - Faulted: startup error, runtime fault or shutdown timeout (terminal)
//!
//! # State Transitions
//! ```text
//! Idle → Initializing: start
//! Initializing → Running: first Running status
//! Initializing → ShuttingDown: stop before the engine came up
//! Initializing → Faulted: construct/add_route/start failure
//! Running → ShuttingDown: stop
//! Running → Faulted: Faulted status or unrequested engine exit
//! ShuttingDown → Stopped: Stopped status within the timeout
//! ShuttingDown → Faulted: timeout or fault during shutdown
//! ```

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SupervisorState {
    Idle,
    Initializing,
    Running,
    ShuttingDown,
    Stopped,
    Faulted,
}

impl SupervisorState {
    pub const ALL: [SupervisorState; 6] = [
        SupervisorState::Idle,
        SupervisorState::Initializing,
        SupervisorState::Running,
        SupervisorState::ShuttingDown,
        SupervisorState::Stopped,
        SupervisorState::Faulted,
    ];

    pub fn can_transition_to(self, next: SupervisorState) -> bool {
        use SupervisorState::*;
        matches!(
            (self, next),
            (Idle, Initializing)
                | (Initializing, Running)
                | (Initializing, ShuttingDown)
                | (Initializing, Faulted)
                | (Running, ShuttingDown)
                | (Running, Faulted)
                | (ShuttingDown, Stopped)
                | (ShuttingDown, Faulted)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, SupervisorState::Stopped | SupervisorState::Faulted)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SupervisorState::Idle => "Idle",
            SupervisorState::Initializing => "Initializing",
            SupervisorState::Running => "Running",
            SupervisorState::ShuttingDown => "ShuttingDown",
            SupervisorState::Stopped => "Stopped",
            SupervisorState::Faulted => "Faulted",
        }
    }

    /// Numeric value exported on the state gauge.
    pub fn code(self) -> f64 {
        match self {
            SupervisorState::Idle => 0.0,
            SupervisorState::Initializing => 1.0,
            SupervisorState::Running => 2.0,
            SupervisorState::ShuttingDown => 3.0,
            SupervisorState::Stopped => 4.0,
            SupervisorState::Faulted => 5.0,
        }
    }
}

impl fmt::Display for SupervisorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
