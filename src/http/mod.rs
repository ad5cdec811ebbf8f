//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID, per-request context)
//!     → cors.rs (preflight short-circuit)
//!     → routing (classify)
//!     → proxy forwarder / local health / 404
//!     → cors.rs (decorate response)
//!     → Send to client
//! ```

pub mod cors;
pub mod request;
pub mod response;
pub mod server;

pub use cors::CorsHeaders;
pub use request::{RequestContext, X_REQUEST_ID};
pub use server::{HttpServer, ServerError};
