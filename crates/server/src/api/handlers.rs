use crate::config::AppState;
use crate::middleware::auth::extract_api_key;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use instantly_mcp::protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
use instantly_mcp::CallContext;
use std::sync::Arc;

/// Session header issued on `initialize`.
pub const SESSION_HEADER: &str = "mcp-session-id";

/// MCP endpoint; key from headers
pub async fn mcp(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: String,
) -> Response {
    handle(&state, None, &headers, &body).await
}

/// MCP endpoint; key in the URL path
pub async fn mcp_with_key(
    State(state): State<Arc<AppState>>,
    Path(api_key): Path<String>,
    headers: HeaderMap,
    body: String,
) -> Response {
    handle(&state, Some(&api_key), &headers, &body).await
}

async fn handle(state: &AppState, path_key: Option<&str>, headers: &HeaderMap, body: &str) -> Response {
    let request: JsonRpcRequest = match serde_json::from_str(body) {
        Ok(request) => request,
        Err(e) => {
            return Json(JsonRpcResponse::error(
                None,
                JsonRpcError::parse_error(format!("Invalid JSON: {}", e)),
            ))
            .into_response();
        }
    };

    let is_initialize = request.method == "initialize";
    let call = CallContext::with_api_key(extract_api_key(path_key, headers));

    let Some(response) = state.mcp.handle_request(request, &call).await else {
        return StatusCode::ACCEPTED.into_response();
    };

    let mut http_response = Json(response).into_response();
    if is_initialize {
        let session_id = uuid::Uuid::new_v4().to_string();
        tracing::debug!(session_id = %session_id, "Issued MCP session");
        if let Ok(value) = HeaderValue::from_str(&session_id) {
            http_response.headers_mut().insert(SESSION_HEADER, value);
        }
    }

    http_response
}
