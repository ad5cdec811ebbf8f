//! Proxy forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! Classified request (target, rewritten path)
//!     → forwarder.rs (build upstream URI, strip hop-by-hop, send)
//!     → tokio timeout around the response head
//!     → backend response streamed back
//!     → on failure: error.rs (log detail, generic 500 to client)
//! ```

pub mod error;
pub mod forwarder;

pub use error::ProxyError;
pub use forwarder::ProxyForwarder;
