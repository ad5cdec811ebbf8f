//! Upstream failure taxonomy.

use std::time::Duration;

use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::http::response;

/// Why a proxied call produced no usable response.
///
/// The detail is for logs only; every variant maps to the same generic
/// `500` on the client side.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("could not build upstream request: {0}")]
    InvalidUri(#[from] axum::http::Error),

    #[error("connect to {target} failed: {source}")]
    Connect {
        target: String,
        #[source]
        source: hyper_util::client::legacy::Error,
    },

    #[error("request to {target} failed: {source}")]
    Upstream {
        target: String,
        #[source]
        source: hyper_util::client::legacy::Error,
    },

    #[error("no response from {target} within {limit:?}")]
    Timeout { target: String, limit: Duration },
}

impl ProxyError {
    /// Stable label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ProxyError::InvalidUri(_) => "invalid_uri",
            ProxyError::Connect { .. } => "connect",
            ProxyError::Upstream { .. } => "upstream",
            ProxyError::Timeout { .. } => "timeout",
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        response::internal_error()
    }
}
