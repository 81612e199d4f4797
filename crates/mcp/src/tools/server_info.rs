// Local server status tool

use crate::error::ToolError;
use crate::protocol::SERVER_NAME;
use crate::tools::catalog::ToolName;
use crate::tools::registry::{ToolContext, ToolHandler};
use crate::tools::schema::{ObjectSpec, ToolHints, ToolSpec, ValidatedArgs};
use serde_json::{json, Map, Value};

pub static GET_SERVER_INFO: ToolSpec = ToolSpec {
    name: "get_server_info",
    description: "Server version, whether an API key is configured, loaded tool categories, \
        tool counts and the last observed Instantly rate limit. Makes no API call.",
    args: ObjectSpec::NONE,
    hints: ToolHints::READ_ONLY,
};

/// Reports on the server itself. Always registered.
pub struct ServerInfoTool;

#[async_trait::async_trait]
impl ToolHandler for ServerInfoTool {
    fn tools(&self) -> &'static [ToolName] {
        &[ToolName::GetServerInfo]
    }

    async fn execute(
        &self,
        _tool: ToolName,
        _args: &ValidatedArgs,
        ctx: &ToolContext<'_>,
    ) -> Result<Value, ToolError> {
        let registry = ctx.registry();
        let tools = registry.tool_names();

        let mut counts = Map::new();
        for tool in &tools {
            if let Some(category) = tool.category() {
                let count = counts.entry(category.as_str()).or_insert_with(|| json!(0));
                *count = json!(count.as_u64().unwrap_or(0) + 1);
            }
        }

        let categories = registry.categories();
        Ok(json!({
            "server": SERVER_NAME,
            "version": env!("CARGO_PKG_VERSION"),
            "api_key_configured": ctx.has_credential(),
            "loaded_categories": categories.enabled.iter().map(|c| c.as_str()).collect::<Vec<_>>(),
            "category_filter_applied": categories.filtered,
            "tool_counts": counts,
            "total_tools": tools.len(),
            "rate_limit": ctx.client().rate_limit(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use crate::tools::registry::{CallContext, ToolRegistry};
    use crate::tools::testing::{call, mock_registry};
    use instantly_core::CategorySelection;
    use instantly_sdk::InstantlyClient;
    use serde_json::{json, Value};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_server_info_counts() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let registry = mock_registry(&server);
        let (is_error, info) = call(&registry, "get_server_info", json!({})).await;

        assert!(!is_error, "{}", info);
        assert_eq!(info["server"], "instantly-mcp");
        assert_eq!(info["api_key_configured"], true);
        assert_eq!(info["total_tools"], 36);
        assert_eq!(info["tool_counts"]["accounts"], 6);
        assert_eq!(info["tool_counts"]["leads"], 12);
        assert_eq!(info["tool_counts"]["background_jobs"], 2);
        assert!(info["rate_limit"].get("remaining").is_some());
    }

    #[tokio::test]
    async fn test_server_info_with_filter_and_no_key() {
        let server = MockServer::start().await;
        let client = InstantlyClient::builder()
            .base_url(server.uri())
            .private_rate_limits()
            .build()
            .unwrap();
        let registry = ToolRegistry::standard(client, CategorySelection::from_csv(Some("emails")));

        let result = registry
            .call("get_server_info", json!({}), &CallContext::default())
            .await;
        let info: Value = serde_json::from_str(result.text().unwrap()).unwrap();

        assert_eq!(info["loaded_categories"], json!(["emails"]));
        assert_eq!(info["category_filter_applied"], true);
        assert_eq!(info["total_tools"], 7);
        assert_eq!(info["api_key_configured"], false);
    }
}
