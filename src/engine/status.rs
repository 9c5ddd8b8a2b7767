//! Router status notifications.
//!
//! The engine may report from any thread it owns. Every report goes into one
//! unbounded channel, so the supervisor sees a single ordered sequence.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc;

/// Operational state reported by the router engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RouterStatus {
    Idle,
    Starting,
    Running,
    Stopping,
    Stopped,
    Faulted,
}

impl RouterStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouterStatus::Idle => "Idle",
            RouterStatus::Starting => "Starting",
            RouterStatus::Running => "Running",
            RouterStatus::Stopping => "Stopping",
            RouterStatus::Stopped => "Stopped",
            RouterStatus::Faulted => "Faulted",
        }
    }
}

impl fmt::Display for RouterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One status notification from the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusEvent {
    pub status: RouterStatus,
    pub detail: Option<String>,
    pub observed_at: DateTime<Utc>,
}

impl StatusEvent {
    pub fn new(status: RouterStatus, detail: Option<String>) -> Self {
        Self {
            status,
            detail,
            observed_at: Utc::now(),
        }
    }
}

/// Handle the engine uses to publish status changes. Cheap to clone.
#[derive(Debug, Clone)]
pub struct StatusReporter {
    tx: mpsc::UnboundedSender<StatusEvent>,
}

impl StatusReporter {
    /// Report a status change. Returns false once the supervisor has gone away.
    pub fn report(&self, status: RouterStatus, detail: Option<String>) -> bool {
        self.send(StatusEvent::new(status, detail))
    }

    pub fn send(&self, event: StatusEvent) -> bool {
        self.tx.send(event).is_ok()
    }
}

/// Create a connected reporter/receiver pair.
pub fn status_channel() -> (StatusReporter, mpsc::UnboundedReceiver<StatusEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (StatusReporter { tx }, rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reporter_preserves_order() {
        let (reporter, mut rx) = status_channel();
        assert!(reporter.report(RouterStatus::Starting, None));
        assert!(reporter.report(RouterStatus::Running, Some("listening".into())));

        assert_eq!(rx.recv().await.unwrap().status, RouterStatus::Starting);
        let running = rx.recv().await.unwrap();
        assert_eq!(running.status, RouterStatus::Running);
        assert_eq!(running.detail.as_deref(), Some("listening"));
    }

    #[test]
    fn test_report_after_receiver_dropped() {
        let (reporter, rx) = status_channel();
        drop(rx);
        assert!(!reporter.report(RouterStatus::Running, None));
    }
}
