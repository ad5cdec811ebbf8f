//! Security-relevant request/response shaping.
//!
//! # Data Flow
//! ```text
//! Client request
//!     → headers.rs (strip hop-by-hop, optional X-Forwarded-*)
//!     → Forward to backend
//!
//! Backend response
//!     → headers.rs (strip hop-by-hop)
//!     → CORS decoration (http::cors)
//!     → Client
//! ```
//!
//! # Design Decisions
//! - Backend internals never reach the client on failure (see proxy::error)
//! - Only connection-scoped headers are dropped; payload is never inspected

pub mod headers;
