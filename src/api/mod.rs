//! HTTP surface: three JSON endpoints in front of the studio.

pub mod errors;
pub mod handlers;
pub mod operations;
pub mod request;
pub mod response;
pub mod validation;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::ServerConfig;
use crate::error::StudioError;
use crate::studio::Studio;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    /// Studio facade all handlers call through.
    pub studio: Arc<Studio>,
}

/// Build the router with the given body size limit.
pub fn router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/api/director", post(handlers::treatment_handler))
        .route("/api/rewrite", post(handlers::rewrite_handler))
        .route("/api/generate", post(handlers::generate_handler))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve the studio until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve(studio: Studio, config: &ServerConfig) -> Result<(), StudioError> {
    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    info!(
        text_model = %studio.profiles().director.model,
        image_model = %studio.profiles().image.model,
        "Listening on http://{}",
        listener.local_addr()?
    );

    let state = AppState { studio: Arc::new(studio) };
    axum::serve(listener, router(state, config.max_body_bytes))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
}
