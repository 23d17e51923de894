//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the proxy endpoint and the bridge assets
//! - Wire up middleware (tracing, request timeout, request ID)
//! - Fetch the upstream target and hand HTML to the rewrite pipeline
//! - Record per-request metrics
//! - Serve until the shutdown broadcast fires

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header, Request},
    response::{Html, IntoResponse, Response},
    routing::{any, get},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use url::Url;

use crate::bridge::{BridgeAssets, BRIDGE_SCRIPT_PATH};
use crate::config::ProxyConfig;
use crate::error::ProxyError;
use crate::http::request::{
    propagate_request_id_layer, request_id, requested_url, set_request_id_layer, user_agent,
};
use crate::http::response::{html_response, passthrough_response, ResponseKind};
use crate::observability::metrics;
use crate::rewrite::{rewrite_document, RewriteContext, PROXY_ENDPOINT};
use crate::upstream::{FetchedBody, UpstreamClient, UpstreamTarget};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub target: Arc<UpstreamTarget>,
    pub upstream: UpstreamClient,
    pub bridge: Arc<BridgeAssets>,
    pub follow_url_param: bool,
}

impl AppState {
    /// Pick the URL to fetch for one request.
    ///
    /// The configured target unless `url` following is enabled and the
    /// requested URL is on the target's origin.
    fn select_target(&self, requested: Option<&str>) -> Result<Url, ProxyError> {
        match requested {
            Some(raw) if self.follow_url_param => {
                let url = Url::parse(raw)
                    .map_err(|e| ProxyError::InvalidTarget(format!("{}: {}", raw, e)))?;
                if self.target.admits(&url) {
                    Ok(url)
                } else {
                    Err(ProxyError::ForeignTarget(url.to_string()))
                }
            }
            _ => Ok(self.target.url().clone()),
        }
    }
}

/// HTTP server for the embedding proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Result<Self, ProxyError> {
        let target = UpstreamTarget::parse(&config.upstream.target_url)
            .map_err(|e| ProxyError::InvalidTarget(e.to_string()))?;
        let upstream = UpstreamClient::new(&config.upstream, &config.timeouts)?;

        let state = AppState {
            target: Arc::new(target),
            upstream,
            bridge: Arc::new(BridgeAssets::render(config.bridge.mode)),
            follow_url_param: config.upstream.follow_url_param,
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        Router::new()
            .route(PROXY_ENDPOINT, any(proxy_handler))
            .route("/", get(host_page))
            .route(BRIDGE_SCRIPT_PATH, get(bridge_script))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            target = %self.config.upstream.target_url,
            bridge_mode = self.config.bridge.mode.as_str(),
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

/// Proxy handler: every method, every query string.
async fn proxy_handler(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    request: Request<Body>,
) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(request.headers());
    let method = request.method().to_string();
    let user_agent = user_agent(request.headers());
    let requested = requested_url(request.uri());

    tracing::debug!(
        request_id = %request_id,
        peer = %peer,
        method = %method,
        requested = requested.as_deref().unwrap_or(""),
        "Proxying request"
    );

    match serve_proxied(&state, requested.as_deref(), user_agent.as_deref()).await {
        Ok((kind, response)) => {
            let status = response.status().as_u16();
            tracing::info!(
                request_id = %request_id,
                status,
                kind = kind.as_str(),
                elapsed_ms = start_time.elapsed().as_millis() as u64,
                "Request proxied"
            );
            metrics::record_request(&method, status, kind.as_str(), start_time);
            response
        }
        Err(e) => {
            let status = e.status_code().as_u16();
            tracing::error!(
                request_id = %request_id,
                status,
                error = %e,
                "Proxy request failed"
            );
            metrics::record_request(&method, status, "error", start_time);
            e.into_response()
        }
    }
}

async fn serve_proxied(
    state: &AppState,
    requested: Option<&str>,
    user_agent: Option<&str>,
) -> Result<(ResponseKind, Response), ProxyError> {
    let url = state.select_target(requested)?;
    let fetched = state.upstream.fetch(&url, user_agent).await?;

    match fetched.body {
        FetchedBody::Html(text) => {
            let ctx = RewriteContext::new(&fetched.url);
            let rewritten = rewrite_document(&text, &ctx)?;
            Ok((ResponseKind::Html, html_response(rewritten)))
        }
        FetchedBody::Raw(bytes) => Ok((
            ResponseKind::Passthrough,
            passthrough_response(
                fetched.status,
                fetched.content_type.as_deref(),
                fetched.cache_control.as_deref(),
                bytes,
            ),
        )),
    }
}

async fn host_page(State(state): State<AppState>) -> Html<String> {
    Html(state.bridge.host_page().to_string())
}

async fn bridge_script(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        state.bridge.handler_script().to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{TimeoutConfig, UpstreamConfig};
    use axum::extract::connect_info::MockConnectInfo;
    use axum::http::StatusCode;
    use tower::ServiceExt;

    fn state(follow_url_param: bool) -> AppState {
        let upstream = UpstreamConfig {
            use_env_proxy: false,
            ..UpstreamConfig::default()
        };
        AppState {
            target: Arc::new(UpstreamTarget::parse("https://example.com/docs/index.html").unwrap()),
            upstream: UpstreamClient::new(&upstream, &TimeoutConfig::default()).unwrap(),
            bridge: Arc::new(BridgeAssets::render(Default::default())),
            follow_url_param,
        }
    }

    #[test]
    fn url_parameter_ignored_by_default() {
        let url = state(false)
            .select_target(Some("https://evil.test/"))
            .unwrap();
        assert_eq!(url.as_str(), "https://example.com/docs/index.html");
    }

    #[test]
    fn url_parameter_followed_on_target_origin() {
        let state = state(true);
        let url = state.select_target(Some("https://example.com/img/a.png")).unwrap();
        assert_eq!(url.as_str(), "https://example.com/img/a.png");

        assert_eq!(
            state.select_target(None).unwrap().as_str(),
            "https://example.com/docs/index.html"
        );
    }

    #[test]
    fn foreign_or_malformed_url_parameter_rejected() {
        let state = state(true);
        assert!(matches!(
            state.select_target(Some("https://evil.test/x")),
            Err(ProxyError::ForeignTarget(_))
        ));
        assert!(matches!(
            state.select_target(Some("/relative")),
            Err(ProxyError::InvalidTarget(_))
        ));
    }

    #[test]
    fn invalid_target_fails_construction() {
        let mut config = ProxyConfig::default();
        config.upstream.target_url = "not a url".into();
        assert!(matches!(HttpServer::new(config), Err(ProxyError::InvalidTarget(_))));
    }

    fn test_router() -> Router {
        let config = ProxyConfig::default();
        HttpServer::build_router(&config, state(false))
            .layer(MockConnectInfo(SocketAddr::from(([127, 0, 0, 1], 4000))))
    }

    #[tokio::test]
    async fn host_page_embeds_proxy_and_bridge() {
        let response = test_router()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(crate::http::X_REQUEST_ID));

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let page = String::from_utf8(body.to_vec()).unwrap();
        assert!(page.contains(PROXY_ENDPOINT));
        assert!(page.contains(BRIDGE_SCRIPT_PATH));
    }

    #[tokio::test]
    async fn bridge_script_is_javascript() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .uri(BRIDGE_SCRIPT_PATH)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/javascript; charset=utf-8"
        );
    }

    #[tokio::test]
    async fn foreign_url_parameter_is_bad_request() {
        let config = ProxyConfig::default();
        let router = HttpServer::build_router(&config, state(true))
            .layer(MockConnectInfo(SocketAddr::from(([127, 0, 0, 1], 4000))));
        let response = router
            .oneshot(
                Request::builder()
                    .uri("/api/proxy?url=https%3A%2F%2Fevil.test%2F")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&body).starts_with("Proxy error: "));
    }
}
