//! Service orchestration.
//!
//! # Responsibilities
//! - Validate the endpoint configuration once per process
//! - Run route supervisors until shutdown, applying the restart policy
//!
//! # Design Decisions
//! - Fail fast: any startup error ends the service, no retry
//! - Each restart uses a fresh `RouteSupervisor`; instances are never reset
//! - A shutdown signal always ends in a bounded stop
//! - Shutdown during a restart backoff returns the fault that caused it

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::config::{validate_ams_options, ServiceConfig};
use crate::engine::EngineFactory;
use crate::error::SupervisorError;
use crate::lifecycle::restart::RestartPolicy;
use crate::observability::metrics;
use crate::supervisor::{Lifecycle, RouteSupervisor};

/// Run the service until `shutdown` fires or a non-restartable error occurs.
pub async fn run_service<F: EngineFactory>(
    config: &ServiceConfig,
    factory: Arc<F>,
    shutdown: CancellationToken,
) -> Result<(), SupervisorError> {
    let ams = match validate_ams_options(&config.ams) {
        Ok(ams) => ams,
        Err(err) => {
            if let SupervisorError::Configuration { field, value, reason } = &err {
                tracing::error!(field = %field, value = %value, reason = %reason, "Invalid configuration");
            }
            metrics::record_error(err.as_label());
            return Err(err);
        }
    };

    tracing::info!(
        local_address = %ams.local_address,
        target_address = %ams.target_address,
        target_ip = %ams.target_ip,
        "Configuration loaded"
    );

    let policy = RestartPolicy::from_config(&config.supervisor.restart);
    let timeout = config.supervisor.shutdown_timeout();
    let mut restarts = 0u32;

    loop {
        let mut supervisor =
            RouteSupervisor::new(ams.clone(), config.supervisor.clone(), factory.clone());

        let started = tokio::select! {
            started = supervisor.start() => started,
            _ = shutdown.cancelled() => return stop_supervisor(&mut supervisor, timeout).await,
        };

        let outcome = match started {
            Ok(()) => {
                tracing::info!(supervisor = %supervisor.id(), "Route supervisor running");
                tokio::select! {
                    outcome = supervisor.wait() => outcome,
                    _ = shutdown.cancelled() => stop_supervisor(&mut supervisor, timeout).await,
                }
            }
            Err(err) => Err(err),
        };

        match outcome {
            Err(err) if policy.should_restart(&err, restarts) => {
                restarts += 1;
                let delay = policy.delay(restarts);
                tracing::warn!(
                    error = %err,
                    restart = restarts,
                    max_restarts = policy.max_restarts,
                    delay = ?delay,
                    "Restarting route supervisor after fault"
                );
                metrics::record_restart();

                tokio::select! {
                    _ = tokio::time::sleep(delay) => {}
                    _ = shutdown.cancelled() => {
                        // The fault was never recovered; report it rather than a clean stop.
                        tracing::error!(error = %err, "Shutdown requested during restart backoff");
                        return Err(err);
                    }
                }
            }
            other => return other,
        }
    }
}

async fn stop_supervisor<F: EngineFactory>(
    supervisor: &mut RouteSupervisor<F>,
    timeout: Duration,
) -> Result<(), SupervisorError> {
    match supervisor.stop(timeout).await {
        // Shutdown arrived before the supervisor was started.
        Err(SupervisorError::NotStarted) => Ok(()),
        other => other,
    }
}
