//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! AMSConfiguration.json / *.toml
//!     → loader.rs (parse & deserialize, environment overrides)
//!     → ServiceConfig (raw strings for the endpoint section)
//!     → validation.rs (typed, checked AmsConfiguration)
//!     → passed by value into one supervisor run
//! ```
//!
//! # Design Decisions
//! - Config is a snapshot: loaded once per process, never re-read mid-run
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::AmsConfigurationOptions;
pub use schema::ObservabilityConfig;
pub use schema::RestartConfig;
pub use schema::RestartMode;
pub use schema::ServiceConfig;
pub use schema::SupervisorSettings;
pub use validation::{validate_ams_options, AmsConfiguration};
