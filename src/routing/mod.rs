//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path)
//!     → router.rs (ordered rule scan)
//!     → matcher.rs (evaluate match conditions)
//!     → rewrite.rs (transform path for the backend)
//!     → Return: Forward(target, path), Health or NotFound
//!
//! Route Compilation (at startup):
//!     BackendsConfig
//!     → target.rs (parse backend URLs)
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path
//! - Deterministic: same input always matches same route
//! - First match wins (table order is priority order)

pub mod matcher;
pub mod rewrite;
pub mod router;
pub mod target;

pub use rewrite::Rewrite;
pub use router::{Classification, RouteAction, RouteRule, RouteTable, HEALTH_PATH, SHORT_CODE_LEN};
pub use target::BackendTarget;
