//! Configuration validation.
//!
//! # Responsibilities
//! - Turn the raw `AMSConfigurationOptions` strings into typed addresses
//! - Check the target IP is an address literal or a well-formed host name
//! - Reject a target that equals the local endpoint
//!
//! # Design Decisions
//! - Fail fast: the first invalid field is reported, nothing is accumulated
//! - Errors name the config key, so operators can find the offending line
//! - Pure function, runs before any engine is constructed

use std::net::IpAddr;

use serde::Serialize;

use crate::config::schema::AmsConfigurationOptions;
use crate::error::SupervisorError;
use crate::routing::address::AmsNetId;

pub const LOCAL_NET_ID_KEY: &str = "LocalAMSNetID";
pub const TARGET_NET_ID_KEY: &str = "TargetAMSNetID";
pub const TARGET_IP_KEY: &str = "TargetIPAddress";

/// Validated endpoint configuration. Immutable snapshot for one supervisor run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AmsConfiguration {
    pub local_address: AmsNetId,
    pub target_address: AmsNetId,
    pub target_ip: String,
}

/// Validate raw options into an [`AmsConfiguration`].
pub fn validate_ams_options(
    options: &AmsConfigurationOptions,
) -> Result<AmsConfiguration, SupervisorError> {
    let local_address = parse_net_id(LOCAL_NET_ID_KEY, &options.local_ams_net_id)?;
    let target_address = parse_net_id(TARGET_NET_ID_KEY, &options.target_ams_net_id)?;

    let target_ip = options.target_ip_address.trim();
    check_target_host(target_ip)
        .map_err(|reason| SupervisorError::configuration(TARGET_IP_KEY, target_ip, reason))?;

    if local_address == target_address {
        return Err(SupervisorError::configuration(
            TARGET_NET_ID_KEY,
            &options.target_ams_net_id,
            format!("must differ from {LOCAL_NET_ID_KEY}"),
        ));
    }

    Ok(AmsConfiguration {
        local_address,
        target_address,
        target_ip: target_ip.to_string(),
    })
}

fn parse_net_id(field: &str, raw: &str) -> Result<AmsNetId, SupervisorError> {
    if raw.trim().is_empty() {
        return Err(SupervisorError::configuration(field, raw, "missing"));
    }
    raw.trim()
        .parse()
        .map_err(|e| SupervisorError::configuration(field, raw, format!("{e}")))
}

/// Accepts IP literals and RFC 1123 host names.
fn check_target_host(host: &str) -> Result<(), String> {
    if host.is_empty() {
        return Err("missing".to_string());
    }
    if host.parse::<IpAddr>().is_ok() {
        return Ok(());
    }
    if host.len() > 253 {
        return Err("host name longer than 253 characters".to_string());
    }

    let host = host.strip_suffix('.').unwrap_or(host);
    for label in host.split('.') {
        if label.is_empty() || label.len() > 63 {
            return Err(format!("invalid host label {label:?}"));
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(format!("host label {label:?} starts or ends with '-'"));
        }
        if !label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-') {
            return Err(format!("host label {label:?} has invalid characters"));
        }
    }

    // An all-numeric last label means a mistyped address literal, e.g. 10.0.0.256.
    let last = host.rsplit('.').next().unwrap_or(host);
    if last.bytes().all(|b| b.is_ascii_digit()) {
        return Err("not a valid IP address".to_string());
    }

    Ok(())
}
