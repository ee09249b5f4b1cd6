//! HTTP transport module for the peer-feedback server
//!
//! Axum router with the JSON API nested under `/api`, plus plain health and
//! info endpoints.

use crate::error::Result;
use crate::server::{FeedbackServer, router::api_routes};
use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};
use serde_json::json;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

/// Health check endpoint
pub async fn health_handler() -> impl IntoResponse {
    "ok"
}

/// Info endpoint
pub async fn info_handler(State(server): State<FeedbackServer>) -> Result<impl IntoResponse> {
    let (projects, feedback) = server.store.counts()?;
    Ok(Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "db": {
            "path": server.store.path(),
            "projects_count": projects,
            "feedback_count": feedback
        },
        "mail": {
            "enabled": server.config.mail.enabled()
        },
        "server": {
            "bind": server.config.server.http_bind.to_string()
        }
    })))
}

/// Build the full application router
pub fn build_router(server: FeedbackServer) -> Router {
    let timeout = Duration::from_millis(server.config.server.request_timeout_ms);
    Router::new()
        .route("/health", get(health_handler))
        .route("/info", get(info_handler))
        .nest("/api", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(timeout))
                .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)),
        )
        .with_state(server)
}

/// Start the HTTP server
pub async fn start_http_server(server: FeedbackServer) -> Result<()> {
    let bind = server.config.server.http_bind;
    let app = build_router(server);

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind HTTP listener: {}", e))?;

    tracing::info!("Starting HTTP server on {} (API at /api)", bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("HTTP server error: {}", e))?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
    }
}
