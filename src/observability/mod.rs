//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! StatusMonitor / LifecycleController / restart loop produce:
//!     → logging.rs (one structured record per transition and per error)
//!     → metrics.rs (counters and the current-state gauge)
//!
//! Consumers:
//!     → stdout (fmt layer), filtered by RUST_LOG or config
//!     → Prometheus scrape endpoint (optional)
//! ```

pub mod logging;
pub mod metrics;
