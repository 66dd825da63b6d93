//! Web server module.

mod handlers;

pub use handlers::*;

use crate::batch::BatchRunner;
use crate::config::ServerConfig;
use crate::snapshot::SnapshotStore;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: ServerConfig,
    pub runner: Arc<BatchRunner>,
    pub snapshots: SnapshotStore,
}

/// Web server for sitewatch.
pub struct Server {
    state: AppState,
}

impl Server {
    /// Create a new server with the given dependencies.
    pub fn new(config: ServerConfig, runner: Arc<BatchRunner>, snapshots: SnapshotStore) -> Self {
        Self {
            state: AppState {
                config,
                runner,
                snapshots,
            },
        }
    }

    /// Build the router with all routes.
    fn routes(&self) -> Router {
        routes(self.state.clone())
    }

    /// Start the server on the configured address.
    pub async fn start(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let addr = format!("{}:{}", self.state.config.host, self.state.config.http_port);
        let router = self.routes();

        let listener = tokio::net::TcpListener::bind(&addr).await?;
        tracing::info!("Web server listening on {}", listener.local_addr()?);

        axum::serve(listener, router).await?;

        Ok(())
    }
}

pub(crate) fn routes(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Page
        .route("/", get(handlers::handle_index))
        // API endpoints
        .route("/status", get(handlers::handle_status))
        .route("/snapshot", get(handlers::handle_snapshot))
        // Static assets
        .route("/favicon.ico", get(handlers::handle_favicon))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
