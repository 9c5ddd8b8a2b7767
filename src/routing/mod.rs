//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! AmsConfiguration (validated)
//!     → address.rs (AmsNetId parsing, used by validation)
//!     → route.rs (build the static Target route)
//!     → Route handed to the lifecycle controller
//! ```
//!
//! # Design Decisions
//! - One static route per supervisor run, immutable once built
//! - Route names are unique within an engine; the engine enforces it

pub mod address;
pub mod route;

pub use address::AmsNetId;
pub use route::{Route, TARGET_ROUTE_NAME};
