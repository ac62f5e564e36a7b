//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with a single dispatching handler
//! - Wire up middleware (request ID, tracing)
//! - Classify each request and hand it to the config, proxy or static handler
//! - Serve until the shutdown signal fires

use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::Response,
    Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::assets::AssetStore;
use crate::config::GatewayConfig;
use crate::handlers::{ConfigHandler, ProxyHandler, StaticHandler};
use crate::http::request;
use crate::lifecycle::shutdown;
use crate::observability::metrics;
use crate::routing::{RouteTarget, Router as PathRouter};
use crate::upstream::{UpstreamClient, UpstreamError};

/// Reasons the server cannot be assembled from a configuration.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Upstream setup failed: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("Static root {} is unusable: {source}", .path.display())]
    ServedRoot {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Storage document could not be encoded: {0}")]
    ConfigDocument(#[from] serde_json::Error),
}

/// Application state injected into the dispatcher.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<PathRouter>,
    pub config: Arc<ConfigHandler>,
    pub proxy: Arc<ProxyHandler>,
    pub static_files: Arc<StaticHandler>,
}

/// HTTP server for the edge gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// Fails if the upstream client cannot be built, the static root does
    /// not exist, or the storage document cannot be encoded.
    pub fn new(config: GatewayConfig) -> Result<Self, ServerError> {
        let path_router = Arc::new(PathRouter::from_config(&config.routes));

        let config_handler = Arc::new(ConfigHandler::new(&config.storage)?);

        let upstream = UpstreamClient::from_config(&config.upstream)?;
        let proxy = Arc::new(ProxyHandler::new(
            upstream,
            config.upstream.diagnostic_capture_bytes,
        ));

        let store = AssetStore::from_config(&config.static_files).map_err(|source| {
            ServerError::ServedRoot {
                path: config.static_files.root.clone(),
                source,
            }
        })?;
        let static_files = Arc::new(StaticHandler::new(store));

        let state = AppState {
            router: path_router,
            config: config_handler,
            proxy,
            static_files,
        };

        let router = Self::build_router(state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Layers run outermost last: the request ID is assigned before the
    /// trace span opens, and copied to the response on the way out.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .fallback(dispatch)
            .with_state(state)
            .layer(request::propagate_request_id_layer())
            .layer(TraceLayer::new_for_http().make_span_with(request::make_span::<Body>))
            .layer(request::set_request_id_layer())
    }

    /// The assembled router, for driving the server without a socket.
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires. In-flight requests are allowed to finish.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.url,
            static_root = %self.config.static_files.root.display(),
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown::wait(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Single entry point: classify the path and hand off.
async fn dispatch(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let target = state.router.match_path(&path);
    tracing::debug!(
        request_id = %request::request_id(request.headers()),
        route = %target,
        path = %path,
        "Request classified"
    );

    let response = match target {
        RouteTarget::Config => state.config.respond(),
        RouteTarget::Proxy => state.proxy.forward(request).await,
        RouteTarget::Static => state.static_files.serve(&path).await,
    };

    metrics::record_request(
        target.as_str(),
        method.as_str(),
        response.status().as_u16(),
        start,
    );
    response
}
