//! HTTP API server for the call agent

pub mod agent;
pub mod health;
pub mod rate_limit;

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::config::ApiServerConfig;
use crate::resolver::ReplyResolver;
use crate::Result;

/// Shared state for API handlers
pub struct ApiState {
    pub resolver: ReplyResolver,
    pub rate_limiter: Option<rate_limit::SharedLimiter>,
}

impl ApiState {
    /// State with no rate limiting
    #[must_use]
    pub const fn new(resolver: ReplyResolver) -> Self {
        Self {
            resolver,
            rate_limiter: None,
        }
    }
}

/// Build the API router (no static files, CORS, or tracing layers)
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .nest("/api", agent::router(state.clone()))
        .merge(health::router(state.clone()))
        .layer(axum::middleware::from_fn_with_state(
            state,
            rate_limit::rate_limit_middleware,
        ))
}

/// Configuration for building an API server
pub struct ApiServerBuilder {
    resolver: ReplyResolver,
    host: String,
    port: u16,
    static_dir: Option<PathBuf>,
    rate_limit_per_minute: Option<u32>,
}

impl ApiServerBuilder {
    /// Create a new API server builder
    #[must_use]
    pub fn new(resolver: ReplyResolver) -> Self {
        let defaults = ApiServerConfig::default();
        Self {
            resolver,
            host: defaults.host,
            port: defaults.port,
            static_dir: None,
            rate_limit_per_minute: None,
        }
    }

    /// Apply server settings from `ApiServerConfig`
    #[must_use]
    pub fn server_config(mut self, config: &ApiServerConfig) -> Self {
        self.host.clone_from(&config.host);
        self.port = config.port;
        self.static_dir.clone_from(&config.static_dir);
        self.rate_limit_per_minute = config.rate_limit_per_minute;
        self
    }

    /// Set the bind host
    #[must_use]
    pub fn host(mut self, host: String) -> Self {
        self.host = host;
        self
    }

    /// Set the port
    #[must_use]
    pub const fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Build the API server
    #[must_use]
    pub fn build(self) -> ApiServer {
        let rate_limiter = self.rate_limit_per_minute.map(|rpm| {
            tracing::info!(requests_per_minute = rpm, "rate limiting active");
            rate_limit::create_limiter(rpm)
        });

        let state = Arc::new(ApiState {
            resolver: self.resolver,
            rate_limiter,
        });

        ApiServer {
            state,
            host: self.host,
            port: self.port,
            static_dir: self.static_dir,
        }
    }
}

/// API server
pub struct ApiServer {
    state: Arc<ApiState>,
    host: String,
    port: u16,
    static_dir: Option<PathBuf>,
}

impl ApiServer {
    /// Build the router with all routes and layers
    fn router(&self) -> Router {
        let mut router = router(self.state.clone());

        // Serve static files if configured
        if let Some(static_dir) = &self.static_dir {
            let index_file = static_dir.join("index.html");
            let serve_dir =
                ServeDir::new(static_dir).not_found_service(ServeFile::new(&index_file));

            router = router.fallback_service(serve_dir);
            tracing::info!(path = %static_dir.display(), "serving static files");
        }

        // CORS layer for cross-origin requests from the browser page
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        router.layer(cors).layer(TraceLayer::new_for_http())
    }

    /// Run the API server
    ///
    /// # Errors
    ///
    /// Returns error if server fails to bind or run
    pub async fn run(self) -> Result<()> {
        let addr = format!("{}:{}", self.host, self.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| crate::Error::Server(format!("failed to bind API server: {e}")))?;

        tracing::info!(
            addr = %addr,
            remote_completion = self.state.resolver.has_remote(),
            "API server listening"
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| crate::Error::Server(format!("API server error: {e}")))?;

        tracing::info!("API server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
