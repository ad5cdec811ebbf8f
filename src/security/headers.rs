//! Header manipulation for forwarded traffic.
//!
//! # Responsibilities
//! - Strip hop-by-hop headers in both directions
//! - Optionally add X-Forwarded-For, X-Forwarded-Proto, X-Forwarded-Host
//!
//! # Design Decisions
//! - End-to-end headers pass through untouched
//! - Headers named by `Connection` are treated as hop-by-hop too
//! - Existing X-Forwarded-For is appended to, never replaced

use std::net::IpAddr;

use axum::http::header::{CONNECTION, HOST};
use axum::http::{HeaderMap, HeaderName, HeaderValue};

/// Connection-scoped headers that must not be relayed (RFC 9110 §7.6.1).
pub const HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-connection",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_FORWARDED_PROTO: &str = "x-forwarded-proto";
const X_FORWARDED_HOST: &str = "x-forwarded-host";

/// Remove hop-by-hop headers, including any listed in `Connection`.
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let listed: Vec<HeaderName> = headers
        .get_all(CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();

    for name in listed {
        headers.remove(name);
    }
    for name in HOP_BY_HOP {
        headers.remove(*name);
    }
}

/// Record the client hop on a request about to be forwarded.
pub fn add_forwarded(headers: &mut HeaderMap, client: Option<IpAddr>) {
    if let Some(ip) = client {
        let value = match headers.get(X_FORWARDED_FOR).and_then(|v| v.to_str().ok()) {
            Some(prev) => format!("{}, {}", prev, ip),
            None => ip.to_string(),
        };
        if let Ok(value) = HeaderValue::from_str(&value) {
            headers.insert(X_FORWARDED_FOR, value);
        }
    }

    headers.insert(X_FORWARDED_PROTO, HeaderValue::from_static("http"));

    if let Some(host) = headers.get(HOST).cloned() {
        headers.insert(X_FORWARDED_HOST, host);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_standard_and_listed_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("connection", HeaderValue::from_static("keep-alive, x-session"));
        headers.insert("keep-alive", HeaderValue::from_static("timeout=5"));
        headers.insert("transfer-encoding", HeaderValue::from_static("chunked"));
        headers.insert("x-session", HeaderValue::from_static("abc"));
        headers.insert("content-type", HeaderValue::from_static("application/json"));
        headers.insert("authorization", HeaderValue::from_static("Bearer t"));

        strip_hop_by_hop(&mut headers);

        assert_eq!(headers.len(), 2);
        assert!(headers.contains_key("content-type"));
        assert!(headers.contains_key("authorization"));
    }

    #[test]
    fn forwarded_headers_append_client() {
        let mut headers = HeaderMap::new();
        headers.insert("host", HeaderValue::from_static("short.example"));
        headers.insert(X_FORWARDED_FOR, HeaderValue::from_static("10.0.0.1"));

        add_forwarded(&mut headers, Some("192.168.1.7".parse().unwrap()));

        assert_eq!(headers[X_FORWARDED_FOR], "10.0.0.1, 192.168.1.7");
        assert_eq!(headers[X_FORWARDED_PROTO], "http");
        assert_eq!(headers[X_FORWARDED_HOST], "short.example");
    }
}
