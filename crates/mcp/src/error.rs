//! Tool-level error taxonomy.

use crate::protocol::CallToolResult;
use instantly_sdk::{InstantlyError, MISSING_CREDENTIAL_HELP};
use serde_json::{json, Value};
use std::time::Duration;

/// Every way a tool call can fail. All of them end up as an `isError` tool
/// result; none of them tear down the server.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("{}", MISSING_CREDENTIAL_HELP)]
    MissingCredential,

    #[error("Invalid argument '{field}': {message}")]
    Validation { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}'. Allowed values: {}", allowed.join(", "))]
    InvalidEnum {
        field: String,
        value: String,
        allowed: Vec<String>,
    },

    #[error(
        "{tool} is irreversible and requires explicit confirmation. Ask the user to approve, then call it again with confirm: true."
    )]
    ConfirmationRequired { tool: String },

    #[error("Instantly API error (HTTP {status}): {message}")]
    Upstream {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("{0}")]
    Transport(String),

    #[error(
        "Request timed out after {}s. For large datasets, page through results with a smaller limit.",
        after.as_secs()
    )]
    Timeout { after: Duration },

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ToolError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingCredential => "missing_credential",
            Self::Validation { .. } => "validation_error",
            Self::InvalidEnum { .. } => "invalid_enum",
            Self::ConfirmationRequired { .. } => "confirmation_required",
            Self::Upstream { .. } => "upstream_error",
            Self::Transport(_) => "transport_error",
            Self::Timeout { .. } => "timeout",
            Self::UnknownTool(_) => "unknown_tool",
            Self::Internal(_) => "internal_error",
        }
    }

    /// Structured `{code, message, ...}` payload.
    pub fn to_payload(&self) -> Value {
        let mut payload = json!({
            "code": self.code(),
            "message": self.to_string(),
        });

        match self {
            Self::Validation { field, .. } => {
                payload["field"] = json!(field);
            }
            Self::InvalidEnum { field, value, allowed } => {
                payload["field"] = json!(field);
                payload["value"] = json!(value);
                payload["allowed"] = json!(allowed);
            }
            Self::ConfirmationRequired { tool } => {
                payload["tool"] = json!(tool);
                payload["required_argument"] = json!({ "confirm": true });
            }
            Self::Upstream { status, code, .. } => {
                payload["status"] = json!(status);
                if let Some(code) = code {
                    payload["upstream_code"] = json!(code);
                }
            }
            Self::Timeout { after } => {
                payload["timeout_seconds"] = json!(after.as_secs());
            }
            _ => {}
        }

        payload
    }

    pub fn into_call_result(self) -> CallToolResult {
        CallToolResult::error_json(&self.to_payload())
    }
}

impl From<InstantlyError> for ToolError {
    fn from(error: InstantlyError) -> Self {
        match error {
            InstantlyError::MissingCredential => Self::MissingCredential,
            InstantlyError::Upstream {
                status,
                code,
                message,
            } => Self::Upstream {
                status,
                code,
                message,
            },
            InstantlyError::Timeout { after } => Self::Timeout { after },
            err @ InstantlyError::Transport(_) => Self::Transport(err.to_string()),
            other => Self::Internal(other.to_string()),
        }
    }
}
