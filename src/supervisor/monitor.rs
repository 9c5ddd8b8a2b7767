//! Router status monitor.
//!
//! # Responsibilities
//! - Consume the engine's status channel as the only reader
//! - Drop a status equal to the immediately preceding one
//! - Log and publish each distinct status in arrival order

use tokio::sync::mpsc;

use crate::engine::{status_channel, RouterStatus, StatusEvent, StatusReporter};
use crate::observability::metrics;
use crate::supervisor::record::{LifecycleRecord, RecordSink};

pub struct StatusMonitor {
    rx: mpsc::UnboundedReceiver<StatusEvent>,
    last: Option<RouterStatus>,
    records: RecordSink,
}

impl StatusMonitor {
    /// Create a monitor and the reporter handed to the engine.
    pub fn channel(records: RecordSink) -> (StatusReporter, Self) {
        let (reporter, rx) = status_channel();
        (
            reporter,
            Self {
                rx,
                last: None,
                records,
            },
        )
    }

    /// Wait for the next distinct status. `None` once every reporter is gone.
    ///
    /// Cancel safe: a dropped call loses no distinct event.
    pub async fn next_transition(&mut self) -> Option<StatusEvent> {
        loop {
            let event = self.rx.recv().await?;
            if let Some(event) = self.observe(event) {
                return Some(event);
            }
        }
    }

    /// Take every event already queued, without waiting. Returns the distinct ones.
    ///
    /// An engine may report and return in the same poll; call this once its
    /// `start` future completes so those reports are not lost.
    pub fn drain_ready(&mut self) -> Vec<StatusEvent> {
        let mut ready = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            if let Some(event) = self.observe(event) {
                ready.push(event);
            }
        }
        ready
    }

    /// Deduplicate one event. Returns it if it is a new status.
    pub fn observe(&mut self, event: StatusEvent) -> Option<StatusEvent> {
        if self.last == Some(event.status) {
            tracing::trace!(status = %event.status, "Duplicate router status suppressed");
            return None;
        }
        self.last = Some(event.status);

        match &event.detail {
            Some(detail) => tracing::info!(status = %event.status, detail = %detail, "Router status changed"),
            None => tracing::info!(status = %event.status, "Router status changed"),
        }
        metrics::record_router_status(event.status);
        self.records.publish(LifecycleRecord::Status(event.clone()));

        Some(event)
    }

    pub fn last_status(&self) -> Option<RouterStatus> {
        self.last
    }
}
