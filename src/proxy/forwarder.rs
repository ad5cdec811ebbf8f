//! Request forwarding to backend services.
//!
//! # Responsibilities
//! - Point the request at the backend with the rewritten path
//! - Stream request and response bodies without buffering
//! - Bound the wait for the backend's response head
//!
//! # Design Decisions
//! - Query string of the inbound request is preserved
//! - Host header is forwarded as received
//! - Upstream is always spoken to over HTTP/1.1
//! - Dropping the returned future drops the backend call
//! - A connect that runs out of time counts as a timeout, not a connect failure

use std::error::Error as StdError;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use axum::body::Body;
use axum::http::uri::{PathAndQuery, Scheme};
use axum::http::{Request, Response, Uri, Version};
use hyper::body::Incoming;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

use crate::config::{ProxySettings, TimeoutConfig};
use crate::proxy::error::ProxyError;
use crate::routing::BackendTarget;
use crate::security::headers;

/// Relays classified requests to their backend.
#[derive(Clone)]
pub struct ProxyForwarder {
    client: Client<HttpConnector, Body>,
    connect_timeout: Duration,
    upstream_timeout: Duration,
    forwarded_headers: bool,
}

impl ProxyForwarder {
    pub fn new(timeouts: &TimeoutConfig, settings: &ProxySettings) -> Self {
        let connect_timeout = Duration::from_secs(timeouts.connect_secs);
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(connect_timeout));
        connector.set_nodelay(true);

        let client = Client::builder(TokioExecutor::new())
            .pool_max_idle_per_host(settings.pool_idle_per_host)
            .build(connector);

        Self {
            client,
            connect_timeout,
            upstream_timeout: Duration::from_secs(timeouts.upstream_secs),
            forwarded_headers: settings.forwarded_headers,
        }
    }

    /// Override the response-head deadline.
    pub fn with_upstream_timeout(mut self, timeout: Duration) -> Self {
        self.upstream_timeout = timeout;
        self
    }

    pub fn upstream_timeout(&self) -> Duration {
        self.upstream_timeout
    }

    /// Forward `request` to `target` at `path`, returning the backend's
    /// response with its body still streaming.
    pub async fn forward(
        &self,
        target: &BackendTarget,
        path: &str,
        request: Request<Body>,
        client_addr: Option<SocketAddr>,
    ) -> Result<Response<Body>, ProxyError> {
        let (mut parts, body) = request.into_parts();

        parts.uri = upstream_uri(target, path, parts.uri.query())?;
        parts.version = Version::HTTP_11;
        parts.extensions.clear();
        headers::strip_hop_by_hop(&mut parts.headers);
        if self.forwarded_headers {
            headers::add_forwarded(&mut parts.headers, client_addr.map(|a| a.ip()));
        }

        let upstream = Request::from_parts(parts, body);
        let call = self.client.request(upstream);

        let response: Response<Incoming> = match tokio::time::timeout(self.upstream_timeout, call).await {
            Ok(Ok(response)) => response,
            Ok(Err(source)) if source.is_connect() && timed_out(&source) => {
                return Err(ProxyError::Timeout {
                    target: target.to_string(),
                    limit: self.connect_timeout,
                });
            }
            Ok(Err(source)) if source.is_connect() => {
                return Err(ProxyError::Connect {
                    target: target.to_string(),
                    source,
                });
            }
            Ok(Err(source)) => {
                return Err(ProxyError::Upstream {
                    target: target.to_string(),
                    source,
                });
            }
            Err(_) => {
                return Err(ProxyError::Timeout {
                    target: target.to_string(),
                    limit: self.upstream_timeout,
                });
            }
        };

        let mut response = response.map(Body::new);
        headers::strip_hop_by_hop(response.headers_mut());
        Ok(response)
    }
}

/// Whether an `io::ErrorKind::TimedOut` sits anywhere in the source chain.
fn timed_out(err: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(io) = e.downcast_ref::<io::Error>() {
            if io.kind() == io::ErrorKind::TimedOut {
                return true;
            }
        }
        current = e.source();
    }
    false
}

/// `http://{target}{path}[?query]`
fn upstream_uri(target: &BackendTarget, path: &str, query: Option<&str>) -> Result<Uri, ProxyError> {
    let path_and_query = match query {
        Some(q) => format!("{}?{}", path, q),
        None => path.to_string(),
    };
    let path_and_query = PathAndQuery::try_from(path_and_query).map_err(axum::http::Error::from)?;

    Ok(Uri::builder()
        .scheme(Scheme::HTTP)
        .authority(target.authority().clone())
        .path_and_query(path_and_query)
        .build()?)
}
