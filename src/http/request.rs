//! Request identification and per-request context.
//!
//! # Responsibilities
//! - Generate unique request ID (UUID v4) as early as possible
//! - Echo the ID back on the response and forward it to the backend
//! - Carry the transient facts logged when a request completes
//!
//! # Design Decisions
//! - An ID supplied by the client is kept, not replaced
//! - Context lives for one exchange and is never shared

use std::time::Instant;

use axum::http::{HeaderName, HeaderValue, Method, Request};
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use uuid::Uuid;

/// Header carrying the correlation ID.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// UUID v4 request ID generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV4;

impl MakeRequestId for MakeRequestUuidV4 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Layer that stamps inbound requests lacking an ID.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuidV4> {
    SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuidV4)
}

/// Layer that copies the request ID onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(X_REQUEST_ID)
}

/// Read the request ID, or `"unknown"`.
pub fn request_id<B>(request: &Request<B>) -> String {
    request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}

/// Transient state of one request/response exchange.
#[derive(Debug)]
pub struct RequestContext {
    pub request_id: String,
    pub method: Method,
    pub path: String,
    pub rule: Option<&'static str>,
    pub rewritten: Option<String>,
    pub started: Instant,
}

impl RequestContext {
    pub fn from_request<B>(request: &Request<B>) -> Self {
        Self {
            request_id: request_id(request),
            method: request.method().clone(),
            path: request.uri().path().to_string(),
            rule: None,
            rewritten: None,
            started: Instant::now(),
        }
    }

    /// Route label for metrics.
    pub fn route_label(&self) -> &'static str {
        self.rule.unwrap_or("none")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_uuids() {
        let request = Request::builder().body(()).unwrap();
        let mut make = MakeRequestUuidV4;
        let id = make.make_request_id(&request).unwrap();
        let value = id.header_value().to_str().unwrap();
        assert!(Uuid::parse_str(value).is_ok());
    }

    #[test]
    fn context_reads_request() {
        let request = Request::builder()
            .method(Method::PUT)
            .uri("/api/generate?x=1")
            .header(X_REQUEST_ID, "abc-123")
            .body(())
            .unwrap();

        let ctx = RequestContext::from_request(&request);
        assert_eq!(ctx.request_id, "abc-123");
        assert_eq!(ctx.method, Method::PUT);
        assert_eq!(ctx.path, "/api/generate");
        assert_eq!(ctx.route_label(), "none");
    }
}
