//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Addresses of the three backend services.
    pub backends: BackendsConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Upstream client behaviour.
    pub proxy: ProxySettings,

    /// Cross-origin headers attached to every response.
    pub cors: CorsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Base URLs of the proxied services.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendsConfig {
    /// Link-management service (generate / delete).
    pub link: String,

    /// Redirect service.
    pub redirect: String,

    /// Statistics service.
    pub stats: String,
}

impl Default for BackendsConfig {
    fn default() -> Self {
        Self {
            link: "http://127.0.0.1:8001".to_string(),
            redirect: "http://127.0.0.1:8002".to_string(),
            stats: "http://127.0.0.1:8003".to_string(),
        }
    }
}

/// Timeout configuration for upstream calls.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Maximum wait for the backend's response head, in seconds.
    pub upstream_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            upstream_secs: 10,
        }
    }
}

/// Upstream client settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProxySettings {
    /// Idle connections kept per backend. Zero disables reuse.
    pub pool_idle_per_host: usize,

    /// Add X-Forwarded-For / -Proto / -Host to forwarded requests.
    pub forwarded_headers: bool,
}

impl Default for ProxySettings {
    fn default() -> Self {
        Self {
            pool_idle_per_host: 0,
            forwarded_headers: false,
        }
    }
}

/// CORS allow-lists.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    pub allow_origin: String,
    pub allow_methods: Vec<String>,
    pub allow_headers: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origin: "*".to_string(),
            allow_methods: ["GET", "POST", "PUT", "DELETE", "OPTIONS"]
                .iter()
                .map(|m| m.to_string())
                .collect(),
            allow_headers: [
                "DNT",
                "User-Agent",
                "X-Requested-With",
                "If-Modified-Since",
                "Cache-Control",
                "Content-Type",
                "Range",
                "Authorization",
            ]
            .iter()
            .map(|h| h.to_string())
            .collect(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format: "pretty" or "json".
    pub log_format: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
