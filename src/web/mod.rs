//! Web layer module
//!
//! Thin axum handlers over the [`CountryRegistry`]. Handlers parse the
//! request, delegate to the registry and map errors through
//! [`responses::handle_error`].

use anyhow::Result;
use axum::{
    Router,
    routing::{get, post},
};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::WebConfig;
use crate::countries::CountryRegistry;

pub mod handlers;
pub mod responses;

pub use responses::{ApiResponse, handle_error};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<CountryRegistry>,
    pub start_time: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    pub fn new(registry: Arc<CountryRegistry>) -> Self {
        Self {
            registry,
            start_time: chrono::Utc::now(),
        }
    }
}

/// Web server configuration and setup
pub struct WebServer {
    app: Router,
    addr: SocketAddr,
}

impl WebServer {
    pub fn new(config: &WebConfig, registry: Arc<CountryRegistry>) -> Result<Self> {
        let app = Self::create_router(AppState::new(registry));
        let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
        Ok(Self { app, addr })
    }

    /// Create the router with all routes and middleware
    pub fn create_router(state: AppState) -> Router {
        Router::new()
            .route("/health", get(handlers::health::health_check))
            .route("/api/check-gtin", post(handlers::gtin::check_gtin))
            .route("/api/countries", get(handlers::countries::list_countries))
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    /// Serve until `shutdown` resolves, then finish in-flight requests
    pub async fn serve_with_shutdown<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = tokio::net::TcpListener::bind(&self.addr)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", self.addr, e))?;
        info!("Web server listening on {}", self.addr);

        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown)
            .await?;
        Ok(())
    }
}
