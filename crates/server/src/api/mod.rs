use crate::config::{AppState, ServerConfig};
use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};

mod handlers;

/// Start the multi-tenant HTTP transport
pub async fn serve(config: &ServerConfig) -> Result<()> {
    let state = AppState::new(config)?;
    let app = create_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("MCP HTTP transport listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the API router
pub(crate) fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/health", get(health_check))
        .route("/mcp", post(handlers::mcp))
        .route("/mcp/{api_key}", post(handlers::mcp_with_key))
        .fallback(not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new())
                .on_response(DefaultOnResponse::new()),
        )
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

/// Health check endpoint
async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": instantly_mcp::protocol::SERVER_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "transport": "http",
        "tools": state.mcp.registry().tool_names().len(),
        "endpoints": {
            "mcp": "/mcp",
            "mcp_with_key": "/mcp/{api_key}",
            "health": "/health",
        },
        "auth_methods": [
            "URL path: /mcp/{api_key}",
            "Header: x-instantly-api-key",
            "Header: Authorization: Bearer {api_key}",
        ],
    }))
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::with_details(
            "Not found",
            "MCP requests go to POST /mcp or POST /mcp/{api_key}",
        )),
    )
}

/// API error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}
