//! HTTP adapter for LogSift: a single multipart upload endpoint that runs
//! the core pipeline inside a temporary workspace and returns the output
//! tree as a downloadable zip.

pub mod archive;
pub mod config;
pub mod error;
pub mod handlers;
pub mod validation;

use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

pub use config::WebConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: WebConfig,
}

pub fn build_router(config: WebConfig) -> Router {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    let cors = CorsLayer::new().allow_origin(AllowOrigin::list(origins));

    let max_upload_size = config.max_upload_size;
    Router::new()
        .route("/health", get(handlers::health))
        .route("/process", post(handlers::process))
        .layer(DefaultBodyLimit::max(max_upload_size))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(AppState { config })
}

pub async fn serve(config: WebConfig) -> Result<()> {
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    tracing::info!("logsift-web listening on {}", addr);

    let router = build_router(config);
    axum::serve(listener, router).await.context("serving HTTP")
}
