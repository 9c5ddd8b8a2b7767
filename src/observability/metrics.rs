//! Metrics collection and exposition.
//!
//! # Metrics
//! - `ads_supervisor_transitions_total` (counter): state transitions by from/to
//! - `ads_supervisor_state` (gauge): current state, see `SupervisorState::code`
//! - `ads_router_status_events_total` (counter): distinct engine statuses
//! - `ads_supervisor_errors_total` (counter): errors by label
//! - `ads_supervisor_restarts_total` (counter): restarts after runtime faults
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;

use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::engine::RouterStatus;
use crate::supervisor::state::SupervisorState;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_transition(from: SupervisorState, to: SupervisorState) {
    counter!(
        "ads_supervisor_transitions_total",
        "from" => from.as_str(),
        "to" => to.as_str()
    )
    .increment(1);
    gauge!("ads_supervisor_state").set(to.code());
}

pub fn record_router_status(status: RouterStatus) {
    counter!("ads_router_status_events_total", "status" => status.as_str()).increment(1);
}

pub fn record_error(label: &'static str) {
    counter!("ads_supervisor_errors_total", "kind" => label).increment(1);
}

pub fn record_restart() {
    counter!("ads_supervisor_restarts_total").increment(1);
}
