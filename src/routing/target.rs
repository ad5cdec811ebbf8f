//! Backend addresses.

use std::fmt;
use std::str::FromStr;

use axum::http::uri::Authority;
use url::Url;

/// Network address of a proxied service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendTarget {
    name: &'static str,
    authority: Authority,
}

impl BackendTarget {
    /// Parse a base URL such as `http://127.0.0.1:8001`.
    ///
    /// Only plain `http` URLs with a host and no path are accepted. The
    /// error is a human-readable reason used by config validation.
    pub fn parse(name: &'static str, url: &str) -> Result<Self, String> {
        let parsed = Url::parse(url).map_err(|e| e.to_string())?;
        if parsed.scheme() != "http" {
            return Err(format!("unsupported scheme {:?}", parsed.scheme()));
        }
        let host = parsed.host_str().ok_or_else(|| "missing host".to_string())?;
        if !matches!(parsed.path(), "" | "/") || parsed.query().is_some() {
            return Err("base URL must not carry a path or query".to_string());
        }
        let port = parsed
            .port_or_known_default()
            .ok_or_else(|| "missing port".to_string())?;
        let authority =
            Authority::from_str(&format!("{}:{}", host, port)).map_err(|e| e.to_string())?;

        Ok(Self { name, authority })
    }

    /// Service name used in logs and metrics.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn authority(&self) -> &Authority {
        &self.authority
    }
}

impl fmt::Display for BackendTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.authority)
    }
}
