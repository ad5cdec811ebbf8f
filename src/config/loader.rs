//! Configuration loading from disk and the environment.

use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::Path;

use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load, override from the process environment, and validate a TOML file.
pub fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: GatewayConfig = toml::from_str(&content)?;
    finalize(config)
}

/// Defaults plus environment overrides, validated.
pub fn load_from_env() -> Result<GatewayConfig, ConfigError> {
    finalize(GatewayConfig::default())
}

fn finalize(mut config: GatewayConfig) -> Result<GatewayConfig, ConfigError> {
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Apply environment overrides using `lookup` to read variables.
///
/// Recognised keys:
/// - `PORT`: replaces the port of `listener.bind_address`
/// - `LINK_SERVICE_URL`, `REDIRECT_SERVICE_URL`, `STATS_SERVICE_URL`
/// - `GATEWAY_LOG_LEVEL`
///
/// Empty values are ignored.
pub fn apply_env_overrides<F>(config: &mut GatewayConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

    if let Some(port) = get("PORT") {
        config.listener.bind_address = replace_port(&config.listener.bind_address, &port);
    }
    if let Some(url) = get("LINK_SERVICE_URL") {
        config.backends.link = url;
    }
    if let Some(url) = get("REDIRECT_SERVICE_URL") {
        config.backends.redirect = url;
    }
    if let Some(url) = get("STATS_SERVICE_URL") {
        config.backends.stats = url;
    }
    if let Some(level) = get("GATEWAY_LOG_LEVEL") {
        config.observability.log_level = level;
    }
}

/// `bind` with its port set to `port`. `bind` may be a socket address or a
/// bare IP, bracketed or not.
fn replace_port(bind: &str, port: &str) -> String {
    let host = match bind.parse::<SocketAddr>() {
        Ok(addr) => Some(addr.ip()),
        Err(_) => bind
            .trim_start_matches('[')
            .trim_end_matches(']')
            .parse::<IpAddr>()
            .ok(),
    };

    match (host, port.parse::<u16>()) {
        (Some(ip), Ok(port)) => SocketAddr::new(ip, port).to_string(),
        // Left unparseable so validation reports it.
        _ => format!("{}:{}", bind, port),
    }
}
