// Tool registry: category filtering, confirmation gate and dispatch

use crate::error::ToolError;
use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::catalog::ToolName;
use crate::tools::schema::{validate, ValidatedArgs};
use crate::tools::{
    AccountTools, AnalyticsTools, BackgroundJobTools, CampaignTools, EmailTools, LeadListTools,
    LeadTools, ServerInfoTool,
};
use instantly_core::CategorySelection;
use instantly_sdk::{Credential, CredentialSources, InstantlyClient};
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Executes one or more catalog tools.
#[async_trait::async_trait]
pub trait ToolHandler: Send + Sync {
    /// Tools this handler serves.
    fn tools(&self) -> &'static [ToolName];

    /// Run an already validated and confirmed call.
    async fn execute(
        &self,
        tool: ToolName,
        args: &ValidatedArgs,
        ctx: &ToolContext<'_>,
    ) -> Result<Value, ToolError>;
}

/// Per-call state handed to a handler.
pub struct ToolContext<'a> {
    registry: &'a ToolRegistry,
    sources: CredentialSources,
}

impl<'a> ToolContext<'a> {
    pub fn client(&self) -> &'a InstantlyClient {
        &self.registry.client
    }

    pub fn registry(&self) -> &'a ToolRegistry {
        self.registry
    }

    /// Resolve the key for this call: argument, then transport, then process.
    pub fn credential(&self) -> Result<Credential, ToolError> {
        Ok(self.registry.client.credential(self.sources.clone())?)
    }

    pub fn has_credential(&self) -> bool {
        self.credential().is_ok()
    }
}

/// What the transport knows about the caller.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    /// Key from the URL path or request headers (HTTP transport only).
    pub header_api_key: Option<String>,
}

impl CallContext {
    pub fn with_api_key(key: Option<String>) -> Self {
        Self { header_api_key: key }
    }
}

/// Tool registry for managing available tools
pub struct ToolRegistry {
    client: InstantlyClient,
    categories: CategorySelection,
    handlers: HashMap<ToolName, Arc<dyn ToolHandler>>,
}

impl ToolRegistry {
    /// Empty registry; tools outside `categories` are skipped on register.
    pub fn new(client: InstantlyClient, categories: CategorySelection) -> Self {
        Self {
            client,
            categories,
            handlers: HashMap::new(),
        }
    }

    /// Registry with every Instantly tool the category selection allows.
    pub fn standard(client: InstantlyClient, categories: CategorySelection) -> Self {
        let mut registry = Self::new(client, categories);

        registry.register(Arc::new(AccountTools));
        registry.register(Arc::new(CampaignTools));
        registry.register(Arc::new(LeadTools));
        registry.register(Arc::new(LeadListTools));
        registry.register(Arc::new(EmailTools));
        registry.register(Arc::new(AnalyticsTools));
        registry.register(Arc::new(BackgroundJobTools));
        registry.register(Arc::new(ServerInfoTool));

        registry
    }

    /// Register a handler for each of its tools that is enabled.
    pub fn register(&mut self, handler: Arc<dyn ToolHandler>) {
        for tool in handler.tools() {
            let enabled = tool
                .category()
                .map_or(true, |category| self.categories.contains(category));
            if enabled {
                self.handlers.insert(*tool, handler.clone());
            }
        }
    }

    pub fn contains(&self, tool: ToolName) -> bool {
        self.handlers.contains_key(&tool)
    }

    /// Registered tools in catalog order.
    pub fn tool_names(&self) -> Vec<ToolName> {
        ToolName::ALL
            .into_iter()
            .filter(|tool| self.contains(*tool))
            .collect()
    }

    /// List all tool schemas
    pub fn list_schemas(&self) -> Vec<ToolSchema> {
        self.tool_names()
            .iter()
            .map(|tool| tool.spec().to_schema())
            .collect()
    }

    pub fn categories(&self) -> &CategorySelection {
        &self.categories
    }

    pub fn client(&self) -> &InstantlyClient {
        &self.client
    }

    /// Run a tool. Every failure becomes an `isError` result.
    pub async fn call(&self, name: &str, arguments: Value, call: &CallContext) -> CallToolResult {
        match self.dispatch(name, arguments, call).await {
            Ok(value) => CallToolResult::json(&value),
            Err(error) => {
                warn!(tool = name, code = error.code(), "Tool call failed: {}", error);
                error.into_call_result()
            }
        }
    }

    async fn dispatch(&self, name: &str, arguments: Value, call: &CallContext) -> Result<Value, ToolError> {
        let tool: ToolName = name.parse()?;
        let handler = self
            .handlers
            .get(&tool)
            .cloned()
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;

        let mut arguments = match arguments {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            _ => return Err(ToolError::validation("arguments", "must be an object")),
        };
        let api_key = arguments
            .remove("api_key")
            .and_then(|key| key.as_str().map(str::to_string));
        let confirm = arguments.remove("confirm");

        if tool.requires_confirmation() && !is_confirmed(confirm.as_ref()) {
            return Err(ToolError::ConfirmationRequired {
                tool: tool.to_string(),
            });
        }

        let args = validate(tool, &Value::Object(arguments))?;
        let ctx = ToolContext {
            registry: self,
            sources: CredentialSources::new()
                .with_call(api_key)
                .with_header(call.header_api_key.clone()),
        };

        debug!(tool = %tool, "Executing tool");
        let mut result = handler.execute(tool, &args, &ctx).await?;

        if !args.warnings().is_empty() {
            if let Value::Object(map) = &mut result {
                map.insert("_warnings".to_string(), json!(args.warnings()));
            }
        }

        Ok(result)
    }
}

fn is_confirmed(confirm: Option<&Value>) -> bool {
    match confirm {
        Some(Value::Bool(confirmed)) => *confirmed,
        Some(Value::String(s)) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    }
}
