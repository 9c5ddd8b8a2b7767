//! OS signal handling.
//!
//! SIGINT and SIGTERM (Ctrl-C on other platforms) cancel the process-wide
//! shutdown token. Everything long-running selects on that token.

use tokio_util::sync::CancellationToken;

/// Wait for a termination signal.
#[cfg(unix)]
pub async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;
    tokio::select! {
        result = tokio::signal::ctrl_c() => result?,
        _ = sigterm.recv() => {}
    }
    Ok(())
}

/// Wait for a termination signal.
#[cfg(not(unix))]
pub async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}

/// Cancel `shutdown` when a termination signal arrives.
pub fn spawn_shutdown_listener(shutdown: CancellationToken) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        match wait_for_shutdown_signal().await {
            Ok(()) => tracing::info!("Shutdown signal received"),
            Err(e) => tracing::error!(error = %e, "Failed to install signal handlers, shutting down"),
        }
        shutdown.cancel();
    })
}
