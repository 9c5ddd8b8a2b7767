//! Lifecycle records for external observers.
//!
//! Every distinct router status, supervisor transition and error is
//! published on a broadcast channel alongside the log line, so hosts and
//! tests can follow a supervisor without scraping logs.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;

use crate::engine::StatusEvent;
use crate::error::SupervisorError;
use crate::supervisor::state::SupervisorState;

const RECORD_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LifecycleRecord {
    /// A distinct engine status, after deduplication.
    Status(StatusEvent),
    Transition {
        from: SupervisorState,
        to: SupervisorState,
        at: DateTime<Utc>,
    },
    Error {
        label: &'static str,
        message: String,
    },
}

impl LifecycleRecord {
    pub fn error(err: &SupervisorError) -> Self {
        Self::Error {
            label: err.as_label(),
            message: err.to_string(),
        }
    }
}

/// Sending half of the record channel. Sending never blocks or fails.
#[derive(Debug, Clone)]
pub struct RecordSink {
    tx: broadcast::Sender<LifecycleRecord>,
}

impl RecordSink {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(RECORD_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LifecycleRecord> {
        self.tx.subscribe()
    }

    pub fn publish(&self, record: LifecycleRecord) {
        // No subscribers is fine.
        let _ = self.tx.send(record);
    }
}

impl Default for RecordSink {
    fn default() -> Self {
        Self::new()
    }
}
