//! Route supervisor: the composition root exposed to service hosts.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::{AmsConfiguration, SupervisorSettings};
use crate::engine::EngineFactory;
use crate::error::SupervisorError;
use crate::routing::Route;
use crate::supervisor::controller::{Control, LifecycleController};
use crate::supervisor::record::{LifecycleRecord, RecordSink};
use crate::supervisor::state::SupervisorState;

/// Slack on top of the engine shutdown timeout before the controller task is aborted.
const STOP_GRACE: Duration = Duration::from_millis(250);

/// Start/stop entry points for any host: service manager, CLI or test harness.
#[async_trait]
pub trait Lifecycle {
    /// Start the engine. Returns once it is running, or with the startup error.
    async fn start(&mut self) -> Result<(), SupervisorError>;

    /// Request a stop and wait at most `timeout` for the engine to acknowledge it.
    async fn stop(&mut self, timeout: Duration) -> Result<(), SupervisorError>;
}

/// Supervises one router engine for one configuration snapshot.
///
/// Single use: once stopped or faulted, build a new instance to start again.
pub struct RouteSupervisor<F: EngineFactory> {
    id: Uuid,
    config: AmsConfiguration,
    settings: SupervisorSettings,
    factory: Arc<F>,
    records: RecordSink,
    state: watch::Receiver<SupervisorState>,
    controller: Option<LifecycleController>,
    control: Option<mpsc::UnboundedSender<Control>>,
    task: Option<JoinHandle<Result<(), SupervisorError>>>,
    outcome: Option<Result<(), SupervisorError>>,
}

impl<F: EngineFactory> RouteSupervisor<F> {
    pub fn new(config: AmsConfiguration, settings: SupervisorSettings, factory: Arc<F>) -> Self {
        let id = Uuid::new_v4();
        let records = RecordSink::new();
        let (controller, state) = LifecycleController::new(id, records.clone());
        Self {
            id,
            config,
            settings,
            factory,
            records,
            state,
            controller: Some(controller),
            control: None,
            task: None,
            outcome: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Current supervisor state.
    pub fn state(&self) -> SupervisorState {
        *self.state.borrow()
    }

    /// Healthy means the engine is running.
    pub fn is_healthy(&self) -> bool {
        self.state() == SupervisorState::Running
    }

    pub fn watch_state(&self) -> watch::Receiver<SupervisorState> {
        self.state.clone()
    }

    /// Subscribe to lifecycle records. Subscribe before `start` to see them all.
    pub fn records(&self) -> broadcast::Receiver<LifecycleRecord> {
        self.records.subscribe()
    }

    /// Wait until the supervisor reaches a terminal state and return its outcome.
    ///
    /// Cancel safe. `Ok` means the engine was stopped on request.
    pub async fn wait(&mut self) -> Result<(), SupervisorError> {
        if let Some(outcome) = &self.outcome {
            return outcome.clone();
        }
        let task = self.task.as_mut().ok_or(SupervisorError::NotStarted)?;

        let outcome = match task.await {
            Ok(result) => result,
            Err(e) => Err(SupervisorError::RuntimeFault(format!(
                "supervisor task ended abnormally: {e}"
            ))),
        };
        self.task = None;
        self.control = None;
        self.outcome = Some(outcome.clone());
        outcome
    }
}

#[async_trait]
impl<F: EngineFactory> Lifecycle for RouteSupervisor<F> {
    async fn start(&mut self) -> Result<(), SupervisorError> {
        let controller = self.controller.take().ok_or(SupervisorError::AlreadyStarted)?;
        let route = Route::from_configuration(&self.config);

        tracing::info!(
            supervisor = %self.id,
            local_address = %self.config.local_address,
            route = %route.name,
            remote_address = %route.remote_address,
            remote_ip = %route.remote_ip,
            resolved = route.resolved,
            "Starting route supervisor"
        );

        let (control_tx, control_rx) = mpsc::unbounded_channel();
        let factory = self.factory.clone();
        let local_address = self.config.local_address;
        let settings = self.settings.clone();
        let span = tracing::info_span!("supervisor", id = %self.id);

        self.task = Some(tokio::spawn(
            async move {
                controller
                    .run(route, local_address, settings, factory.as_ref(), control_rx)
                    .await
            }
            .instrument(span),
        ));
        self.control = Some(control_tx);

        let mut state = self.state.clone();
        let reached = state
            .wait_for(|s| *s == SupervisorState::Running || s.is_terminal())
            .await
            .map(|s| *s);

        match reached {
            Ok(SupervisorState::Running) => Ok(()),
            _ => self.wait().await,
        }
    }

    async fn stop(&mut self, timeout: Duration) -> Result<(), SupervisorError> {
        if let Some(outcome) = &self.outcome {
            return outcome.clone();
        }
        if self.task.is_none() {
            return Err(SupervisorError::NotStarted);
        }

        tracing::info!(supervisor = %self.id, timeout = ?timeout, "Stop requested");
        if let Some(control) = &self.control {
            // A closed channel means the controller already finished; wait() reports it.
            let _ = control.send(Control::Stop { timeout });
        }

        match tokio::time::timeout(timeout + STOP_GRACE, self.wait()).await {
            Ok(outcome) => outcome,
            Err(_) => {
                let err = SupervisorError::ShutdownTimeout(timeout);
                let outcome = match self.task.take() {
                    Some(task) => {
                        task.abort();
                        // The dropped controller records the fault; wait until it has.
                        match task.await {
                            Ok(finished) => finished,
                            Err(_) => Err(err),
                        }
                    }
                    None => Err(err),
                };
                tracing::error!(supervisor = %self.id, state = %self.state(), "Supervisor task aborted");
                self.control = None;
                self.outcome = Some(outcome.clone());
                outcome
            }
        }
    }
}

impl<F: EngineFactory> Drop for RouteSupervisor<F> {
    fn drop(&mut self) {
        // Aborting drops the controller future, which drops the engine.
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
