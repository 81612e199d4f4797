// Shared fixtures for handler tests

use crate::tools::registry::{CallContext, ToolRegistry};
use instantly_core::CategorySelection;
use instantly_sdk::InstantlyClient;
use serde_json::Value;
use wiremock::MockServer;

pub fn mock_client(server: &MockServer) -> InstantlyClient {
    InstantlyClient::builder()
        .base_url(server.uri())
        .api_key("test-key")
        .private_rate_limits()
        .build()
        .unwrap()
}

pub fn mock_registry(server: &MockServer) -> ToolRegistry {
    ToolRegistry::standard(mock_client(server), CategorySelection::all())
}

/// Call a tool and decode its JSON text content.
pub async fn call(registry: &ToolRegistry, name: &str, arguments: Value) -> (bool, Value) {
    let result = registry.call(name, arguments, &CallContext::default()).await;
    let payload = serde_json::from_str(result.text().unwrap_or("null")).unwrap();
    (result.is_error(), payload)
}
