//! Static route construction.
//!
//! # Responsibilities
//! - Build the single `Target` route from a validated configuration
//! - Decide whether the route's network address is resolved
//!
//! # Design Decisions
//! - Pure and infallible: validation already happened
//! - Resolution is literal-only; host names yield an unresolved route
//! - Immutable after construction

use std::net::IpAddr;

use serde::Serialize;

use crate::config::validation::AmsConfiguration;
use crate::routing::address::AmsNetId;

/// Name of the static route registered with the engine.
pub const TARGET_ROUTE_NAME: &str = "Target";

/// Mapping from a remote endpoint to a reachable network address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    pub name: String,
    pub remote_address: AmsNetId,
    pub remote_ip: String,
    pub resolved: bool,
}

impl Route {
    /// Build the `Target` route for a configuration snapshot.
    pub fn from_configuration(config: &AmsConfiguration) -> Self {
        Self {
            name: TARGET_ROUTE_NAME.to_string(),
            remote_address: config.target_address,
            remote_ip: config.target_ip.clone(),
            resolved: config.target_ip.parse::<IpAddr>().is_ok(),
        }
    }

    /// Parsed network address, if the route is resolved.
    pub fn ip_addr(&self) -> Option<IpAddr> {
        self.remote_ip.parse().ok()
    }
}
