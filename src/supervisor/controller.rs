//! Lifecycle controller.
//!
//! # Responsibilities
//! - Own the supervisor state and the engine instance
//! - Sequence construct → add_route → start, then supervise until terminal
//! - Translate status transitions and stop requests into state changes
//!
//! # Design Decisions
//! - One loop consumes both the status channel and the control channel, so
//!   state has exactly one writer
//! - Status events are polled before anything else to keep arrival order
//! - The engine lives on this function's stack: every return path drops it
//! - Queued statuses are drained when `start` completes, before acting on it
//! - A controller dropped mid-run (task aborted) records its own fault

use std::time::Duration;

use chrono::Utc;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::config::SupervisorSettings;
use crate::engine::{EngineFactory, EngineParams, RouterEngine, RouterStatus, StatusEvent};
use crate::error::SupervisorError;
use crate::observability::metrics;
use crate::routing::{AmsNetId, Route};
use crate::supervisor::monitor::StatusMonitor;
use crate::supervisor::record::{LifecycleRecord, RecordSink};
use crate::supervisor::state::SupervisorState;

/// Requests from the host to a running controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Stop { timeout: Duration },
}

pub struct LifecycleController {
    id: Uuid,
    state: SupervisorState,
    state_tx: watch::Sender<SupervisorState>,
    records: RecordSink,
    /// Bound of the stop in progress, once one was requested.
    stop_timeout: Option<Duration>,
}

impl LifecycleController {
    pub fn new(id: Uuid, records: RecordSink) -> (Self, watch::Receiver<SupervisorState>) {
        let (state_tx, state_rx) = watch::channel(SupervisorState::Idle);
        (
            Self {
                id,
                state: SupervisorState::Idle,
                state_tx,
                records,
                stop_timeout: None,
            },
            state_rx,
        )
    }

    pub fn state(&self) -> SupervisorState {
        self.state
    }

    fn advance(&mut self, next: SupervisorState) -> Result<(), SupervisorError> {
        let from = self.state;
        if !from.can_transition_to(next) {
            return Err(SupervisorError::InvalidTransition { from, to: next });
        }
        self.state = next;

        tracing::info!(supervisor = %self.id, from = %from, to = %next, "Supervisor state changed");
        metrics::record_transition(from, next);
        self.records.publish(LifecycleRecord::Transition {
            from,
            to: next,
            at: Utc::now(),
        });
        // Watchers wake last, so a woken host already sees the record.
        self.state_tx.send_replace(next);
        Ok(())
    }

    /// Move to `Faulted` and hand back the error for the caller to return.
    fn fault(&mut self, err: SupervisorError) -> SupervisorError {
        match &err {
            SupervisorError::Configuration { field, value, reason } => tracing::error!(
                supervisor = %self.id,
                field = %field,
                value = %value,
                reason = %reason,
                "Invalid configuration"
            ),
            other => tracing::error!(
                supervisor = %self.id,
                kind = other.as_label(),
                error = %other,
                "Supervisor faulted"
            ),
        }
        metrics::record_error(err.as_label());
        self.records.publish(LifecycleRecord::error(&err));

        if let Err(invalid) = self.advance(SupervisorState::Faulted) {
            tracing::error!(supervisor = %self.id, error = %invalid, "Fault raised outside a live state");
        }
        err
    }

    /// Apply a distinct status seen before any stop request.
    fn on_live_status(&mut self, event: StatusEvent) -> Result<(), SupervisorError> {
        let detail = event.detail.unwrap_or_else(|| event.status.to_string());
        match (self.state, event.status) {
            (SupervisorState::Initializing, RouterStatus::Running) => {
                self.advance(SupervisorState::Running)
            }
            (SupervisorState::Initializing, RouterStatus::Faulted | RouterStatus::Stopped) => {
                Err(self.fault(SupervisorError::EngineStart(detail)))
            }
            (_, RouterStatus::Faulted) => Err(self.fault(SupervisorError::RuntimeFault(detail))),
            (_, RouterStatus::Stopped) => Err(self.fault(SupervisorError::RuntimeFault(
                "engine stopped without a stop request".to_string(),
            ))),
            (_, status) => {
                tracing::debug!(supervisor = %self.id, status = %status, "Status does not change supervisor state");
                Ok(())
            }
        }
    }

    /// Apply a distinct status seen while shutting down. `true` once the engine stopped.
    fn on_shutdown_status(&mut self, event: StatusEvent) -> Result<bool, SupervisorError> {
        match event.status {
            RouterStatus::Stopped => Ok(true),
            RouterStatus::Faulted => {
                let detail = event.detail.unwrap_or_else(|| "fault during shutdown".to_string());
                Err(self.fault(SupervisorError::RuntimeFault(detail)))
            }
            status => {
                tracing::debug!(supervisor = %self.id, status = %status, "Waiting for engine to stop");
                Ok(false)
            }
        }
    }

    /// Run one supervisor lifetime. `Ok` means the engine stopped on request.
    pub async fn run<F: EngineFactory>(
        mut self,
        route: Route,
        local_address: AmsNetId,
        settings: SupervisorSettings,
        factory: &F,
        mut control: mpsc::UnboundedReceiver<Control>,
    ) -> Result<(), SupervisorError> {
        self.advance(SupervisorState::Initializing)?;

        if !route.resolved {
            return Err(self.fault(SupervisorError::configuration(
                crate::config::validation::TARGET_IP_KEY,
                &route.remote_ip,
                "route is not resolved to a network address",
            )));
        }

        let params = EngineParams {
            local_address,
            local_port: settings.local_port,
            bind_address: settings.bind_address,
            remote_port: settings.remote_port,
        };
        let (reporter, mut monitor) = StatusMonitor::channel(self.records.clone());

        let mut engine = match factory.construct(params, reporter) {
            Ok(engine) => engine,
            Err(e) => return Err(self.fault(SupervisorError::EngineStart(e.to_string()))),
        };
        if let Err(e) = engine.add_route(&route) {
            return Err(self.fault(SupervisorError::RouteRegistration(e.to_string())));
        }

        let cancel = CancellationToken::new();
        let _cancel_on_exit = cancel.clone().drop_guard();
        let mut start = engine.start(cancel.clone());
        let mut engine_done = false;

        // Initializing / Running
        let timeout = loop {
            tokio::select! {
                biased;

                Some(event) = monitor.next_transition() => self.on_live_status(event)?,

                result = &mut start, if !engine_done => {
                    engine_done = true;
                    for event in monitor.drain_ready() {
                        self.on_live_status(event)?;
                    }
                    let message = match result {
                        Ok(()) => "engine exited without a stop request".to_string(),
                        Err(e) => e.to_string(),
                    };
                    let err = if self.state == SupervisorState::Running {
                        SupervisorError::RuntimeFault(message)
                    } else {
                        SupervisorError::EngineStart(message)
                    };
                    return Err(self.fault(err));
                }

                Some(Control::Stop { timeout }) = control.recv() => {
                    break timeout;
                }
            }
        };

        // ShuttingDown
        self.stop_timeout = Some(timeout);
        self.advance(SupervisorState::ShuttingDown)?;
        cancel.cancel();
        let deadline = tokio::time::sleep(timeout);
        tokio::pin!(deadline);

        loop {
            tokio::select! {
                biased;

                Some(event) = monitor.next_transition() => {
                    if self.on_shutdown_status(event)? {
                        break;
                    }
                }

                result = &mut start, if !engine_done => {
                    engine_done = true;
                    let mut stopped = false;
                    for event in monitor.drain_ready() {
                        stopped |= self.on_shutdown_status(event)?;
                    }
                    match result {
                        Ok(()) => {
                            tracing::debug!(supervisor = %self.id, "Engine returned from start");
                            break;
                        }
                        Err(e) if stopped => {
                            tracing::warn!(supervisor = %self.id, error = %e, "Engine stopped with an error");
                            break;
                        }
                        Err(e) => return Err(self.fault(SupervisorError::RuntimeFault(e.to_string()))),
                    }
                }

                _ = &mut deadline => {
                    return Err(self.fault(SupervisorError::ShutdownTimeout(timeout)));
                }
            }
        }

        self.advance(SupervisorState::Stopped)?;
        Ok(())
    }
}

impl Drop for LifecycleController {
    fn drop(&mut self) {
        if self.state == SupervisorState::Idle || self.state.is_terminal() {
            return;
        }
        // The run future was dropped before reaching a terminal state.
        let err = match self.stop_timeout {
            Some(timeout) if self.state == SupervisorState::ShuttingDown => {
                SupervisorError::ShutdownTimeout(timeout)
            }
            _ => SupervisorError::RuntimeFault(
                "supervisor task ended before the engine stopped".to_string(),
            ),
        };
        self.fault(err);
    }
}
