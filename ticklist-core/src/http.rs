//! Stub HTTP API.
//!
//! Placeholder routes for resources, prompts and RAG queries. They return
//! acknowledgement payloads only and share no state with the catalog.

use crate::config::HttpConfig;
use crate::error::{Result, TicklistError};
use axum::{
    Json, Router,
    extract::{Path, Request},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use std::time::Instant;
use tracing::{info, instrument};

/// Creates the stub API router.
pub fn create_router(config: &HttpConfig) -> Router {
    let api = Router::new()
        .route("/resources", get(list_resources).post(create_resource))
        .route("/resources/:id", get(get_resource))
        .route("/prompts", get(list_prompts).post(log_prompt))
        .route("/rag/query", post(rag_query));

    let router = Router::new().route("/", get(root));
    let router = if config.base_path == "/" {
        router.merge(api)
    } else {
        router.nest(config.base_path.trim_end_matches('/'), api)
    };

    router.layer(middleware::from_fn(log_requests))
}

/// Bind the configured address and serve until the process is stopped.
pub async fn serve(config: &HttpConfig) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!(addr = %listener.local_addr()?, base_path = %config.base_path, "HTTP API listening");

    axum::serve(listener, create_router(config))
        .await
        .map_err(|e| TicklistError::Transport(format!("HTTP server failed: {}", e)))
}

/// One event per request: method, path, status, latency.
async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    info!(
        %method,
        %path,
        status = response.status().as_u16(),
        latency_ms = started.elapsed().as_millis() as u64,
        "request"
    );
    response
}

#[instrument(skip_all)]
async fn root() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "message": "Ticklist API",
            "version": crate::VERSION,
            "status": "running"
        })),
    )
}

#[instrument(skip_all)]
async fn list_resources() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "message": "Resources API" })))
}

#[instrument(skip_all)]
async fn create_resource() -> impl IntoResponse {
    (StatusCode::CREATED, Json(json!({ "message": "Resource created" })))
}

#[instrument]
async fn get_resource(Path(id): Path<String>) -> impl IntoResponse {
    let message = format!("Resource {}", id);
    (StatusCode::OK, Json(json!({ "id": id, "message": message })))
}

#[instrument(skip_all)]
async fn list_prompts() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "message": "Prompts API" })))
}

#[instrument(skip_all)]
async fn log_prompt() -> impl IntoResponse {
    (StatusCode::CREATED, Json(json!({ "message": "Prompt logged" })))
}

#[instrument(skip_all)]
async fn rag_query() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "message": "RAG query processed" })))
}
