//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the gateway handler
//! - Wire up middleware (CORS, request ID, tracing)
//! - Bind server to listener
//! - Dispatch requests to the route table
//! - Forward requests to backend services
//! - Observability (metrics, correlation IDs)

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header::InvalidHeaderValue, Request},
    middleware,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::GatewayConfig;
use crate::health;
use crate::http::cors::{cors_middleware, CorsHeaders};
use crate::http::request::{
    propagate_request_id_layer, set_request_id_layer, RequestContext, X_REQUEST_ID,
};
use crate::http::response;
use crate::lifecycle::shutdown;
use crate::observability::metrics;
use crate::proxy::ProxyForwarder;
use crate::routing::{Classification, RouteTable};

/// Errors building the server from configuration.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid route table: {0}")]
    Routes(String),

    #[error("invalid CORS header value: {0}")]
    Cors(#[from] InvalidHeaderValue),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub routes: Arc<RouteTable>,
    pub forwarder: ProxyForwarder,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, ServerError> {
        let forwarder = ProxyForwarder::new(&config.timeouts, &config.proxy);
        let routes = RouteTable::from_config(&config.backends).map_err(ServerError::Routes)?;
        let cors = CorsHeaders::from_config(&config.cors)?;

        tracing::info!(
            rules = routes.rule_count(),
            link = %config.backends.link,
            redirect = %config.backends.redirect,
            stats = %config.backends.stats,
            upstream_timeout = ?forwarder.upstream_timeout(),
            "Route table compiled"
        );

        let state = AppState {
            routes: Arc::new(routes),
            forwarder,
        };

        let router = Self::build_router(cors, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Outermost first: request ID → trace → ID propagation → CORS → handler.
    fn build_router(cors: CorsHeaders, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(gateway_handler))
            .route("/", any(gateway_handler))
            .with_state(state)
            .layer(middleware::from_fn_with_state(Arc::new(cors), cors_middleware))
            .layer(propagate_request_id_layer())
            .layer(
                TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                    let request_id = request
                        .headers()
                        .get(X_REQUEST_ID)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("unknown");
                    tracing::info_span!(
                        "request",
                        request_id = %request_id,
                        method = %request.method(),
                        path = %request.uri().path()
                    )
                }),
            )
            .layer(set_request_id_layer())
    }

    /// The fully layered router, for serving or in-process tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Gateway listening");

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown::recv(shutdown))
            .await?;

        tracing::info!("Gateway stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// Classify, then answer locally or forward.
async fn gateway_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let mut ctx = RequestContext::from_request(&request);
    let client_addr = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    let response = match state.routes.classify(&ctx.method, &ctx.path) {
        Classification::NotFound => {
            tracing::debug!(path = %ctx.path, "No route matched");
            response::not_found()
        }
        Classification::Health => {
            ctx.rule = Some("health");
            health::local_response()
        }
        Classification::Forward { rule, target, path } => {
            ctx.rule = Some(rule);
            ctx.rewritten = Some(path.clone());

            tracing::debug!(
                rule,
                target = %target,
                upstream_path = %path,
                "Proxying request"
            );

            match state
                .forwarder
                .forward(target, &path, request, client_addr)
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    tracing::error!(
                        request_id = %ctx.request_id,
                        rule,
                        backend = target.name(),
                        target = %target,
                        kind = e.kind(),
                        error = %e,
                        "Upstream request failed"
                    );
                    metrics::record_upstream_failure(rule, e.kind());
                    e.into_response()
                }
            }
        }
    };

    let status = response.status().as_u16();
    metrics::record_request(&ctx.method, status, ctx.route_label(), ctx.started);
    tracing::debug!(
        route = ctx.route_label(),
        upstream_path = ctx.rewritten.as_deref().unwrap_or("-"),
        status,
        elapsed_ms = ctx.started.elapsed().as_millis() as u64,
        "Request completed"
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Method, StatusCode};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use tower::ServiceExt;

    fn server() -> HttpServer {
        let mut config = GatewayConfig::default();
        // Nothing listens on port 1; any proxied call fails fast.
        config.backends.link = "http://127.0.0.1:1".into();
        config.backends.redirect = "http://127.0.0.1:1".into();
        config.backends.stats = "http://127.0.0.1:1".into();
        HttpServer::new(config).unwrap()
    }

    async fn send(method: Method, uri: &str) -> Response {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        server().router().oneshot(request).await.unwrap()
    }

    fn assert_cors(response: &Response) {
        let headers = response.headers();
        assert_eq!(headers["access-control-allow-origin"], "*");
        assert!(headers.contains_key("access-control-allow-methods"));
        assert!(headers.contains_key("access-control-allow-headers"));
    }

    #[tokio::test]
    async fn health_is_local() {
        let response = send(Method::GET, "/health").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_cors(&response);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn unknown_path_is_404_with_cors() {
        let response = send(Method::GET, "/toolongcode123").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_cors(&response);
    }

    #[tokio::test]
    async fn preflight_short_circuits() {
        let response = send(Method::OPTIONS, "/api/generate").await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_cors(&response);
    }

    #[test]
    fn preflight_is_counted() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        let response = ::metrics::with_local_recorder(&recorder, || {
            runtime.block_on(send(Method::OPTIONS, "/api/generate"))
        });
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let rendered = handle.render();
        let line = rendered
            .lines()
            .find(|l| l.starts_with("gateway_requests_total{") && l.contains(r#"route="preflight""#))
            .unwrap_or_else(|| panic!("no preflight counter in:\n{}", rendered));
        assert!(line.contains(r#"method="OPTIONS""#), "{}", line);
        assert!(line.contains(r#"status="204""#), "{}", line);
        assert!(line.ends_with(" 1"), "{}", line);
    }

    #[tokio::test]
    async fn unreachable_backend_is_500_with_cors() {
        let response = send(Method::GET, "/AbC12345").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_cors(&response);

        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"Internal Server Error");
    }

    #[test]
    fn rejects_invalid_backend() {
        let mut config = GatewayConfig::default();
        config.backends.stats = "not a url".into();
        assert!(matches!(HttpServer::new(config), Err(ServerError::Routes(_))));
    }
}
