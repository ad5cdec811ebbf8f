//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate backend URLs and the bind address
//! - Validate value ranges (timeouts > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::routing::BackendTarget;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address {0:?} is not a socket address")]
    BindAddress(String),

    #[error("backends.{name} {url:?}: {reason}")]
    Backend {
        name: &'static str,
        url: String,
        reason: String,
    },

    #[error("timeouts.{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("cors.allow_methods must not be empty")]
    NoCorsMethods,

    #[error("cors header value {0:?} contains invalid characters")]
    CorsValue(String),

    #[error("observability.log_format {0:?} is not one of \"pretty\", \"json\"")]
    LogFormat(String),

    #[error("observability.metrics_address {0:?} is not a socket address")]
    MetricsAddress(String),
}

/// Validate a configuration, collecting every error found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    let backends = [
        ("link", &config.backends.link),
        ("redirect", &config.backends.redirect),
        ("stats", &config.backends.stats),
    ];
    for (name, url) in backends {
        if let Err(reason) = BackendTarget::parse(name, url) {
            errors.push(ValidationError::Backend {
                name,
                url: url.clone(),
                reason,
            });
        }
    }

    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("connect_secs"));
    }
    if config.timeouts.upstream_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("upstream_secs"));
    }

    if config.cors.allow_methods.is_empty() {
        errors.push(ValidationError::NoCorsMethods);
    }
    let cors_values = std::iter::once(&config.cors.allow_origin)
        .chain(&config.cors.allow_methods)
        .chain(&config.cors.allow_headers);
    for value in cors_values {
        if axum::http::HeaderValue::from_str(value).is_err() {
            errors.push(ValidationError::CorsValue(value.clone()));
        }
    }

    match config.observability.log_format.as_str() {
        "pretty" | "json" => {}
        other => errors.push(ValidationError::LogFormat(other.to_string())),
    }
    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
