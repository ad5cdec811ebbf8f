//! Cross-origin decoration.
//!
//! Every response leaving the gateway gets the same three
//! `Access-Control-Allow-*` headers, overwriting any a backend sent.
//! `OPTIONS` requests are answered here with `204` and never reach
//! classification or the backends.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Request, State},
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN,
        },
        header::InvalidHeaderValue,
        HeaderMap, HeaderValue, Method, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::config::CorsConfig;
use crate::observability::metrics;

/// Pre-rendered CORS header values.
#[derive(Debug, Clone)]
pub struct CorsHeaders {
    allow_origin: HeaderValue,
    allow_methods: HeaderValue,
    allow_headers: HeaderValue,
}

impl CorsHeaders {
    pub fn from_config(config: &CorsConfig) -> Result<Self, InvalidHeaderValue> {
        Ok(Self {
            allow_origin: HeaderValue::from_str(&config.allow_origin)?,
            allow_methods: HeaderValue::from_str(&config.allow_methods.join(", "))?,
            allow_headers: HeaderValue::from_str(&config.allow_headers.join(","))?,
        })
    }

    /// Insert the headers, replacing existing values.
    pub fn apply(&self, headers: &mut HeaderMap) {
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, self.allow_origin.clone());
        headers.insert(ACCESS_CONTROL_ALLOW_METHODS, self.allow_methods.clone());
        headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, self.allow_headers.clone());
    }

    /// `204 No Content` answer to a preflight.
    pub fn preflight(&self) -> Response {
        let mut response = StatusCode::NO_CONTENT.into_response();
        self.apply(response.headers_mut());
        response
    }
}

/// Middleware applying [`CorsHeaders`] to everything below it.
pub async fn cors_middleware(
    State(cors): State<Arc<CorsHeaders>>,
    request: Request,
    next: Next,
) -> Response {
    if request.method() == Method::OPTIONS {
        let started = Instant::now();
        let response = cors.preflight();
        let status = response.status().as_u16();
        metrics::record_request(&Method::OPTIONS, status, "preflight", started);
        tracing::debug!(
            route = "preflight",
            path = %request.uri().path(),
            status,
            "Request completed"
        );
        return response;
    }

    let mut response = next.run(request).await;
    cors.apply(response.headers_mut());
    response
}
