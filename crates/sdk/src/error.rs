//! Error types for the Instantly SDK.

use serde_json::Value;
use std::time::Duration;

/// Result type for SDK operations.
pub type InstantlyResult<T> = Result<T, InstantlyError>;

/// Shown whenever no API key could be found for a call.
pub const MISSING_CREDENTIAL_HELP: &str = "Instantly API key is required. Provide it via:\n  \
     - URL path: /mcp/YOUR_API_KEY\n  \
     - Header: x-instantly-api-key: YOUR_API_KEY\n  \
     - Header: Authorization: Bearer YOUR_API_KEY (Bearer prefix optional)\n  \
     - Tool argument: api_key\n  \
     - Environment: INSTANTLY_API_KEY";

const BODY_EXCERPT_CHARS: usize = 200;

/// Error types that can occur when using the Instantly SDK.
#[derive(Debug, thiserror::Error)]
pub enum InstantlyError {
    /// No API key was supplied by any source.
    #[error("{}", MISSING_CREDENTIAL_HELP)]
    MissingCredential,

    /// API returned a non-2xx response.
    #[error("Instantly API error (status {status}): {message}")]
    Upstream {
        status: u16,
        code: Option<String>,
        message: String,
    },

    /// The request never produced a response.
    #[error("Failed to connect to the Instantly API: {0}")]
    Transport(#[source] reqwest::Error),

    /// The request exceeded its timeout.
    #[error(
        "Request timed out after {}s. For large datasets, page through results with a smaller limit.",
        after.as_secs()
    )]
    Timeout { after: Duration },

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl InstantlyError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingCredential => "missing_credential",
            Self::Upstream { .. } => "upstream_error",
            Self::Transport(_) => "transport_error",
            Self::Timeout { .. } => "timeout",
            Self::Config(_) => "config_error",
            Self::Json(_) => "json_error",
            Self::InvalidUrl(_) => "invalid_url",
        }
    }

    /// HTTP status for upstream errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Create an upstream error from a status code and response body.
    ///
    /// Understands `{"error": {"message", "code"}}`, `{"error": "..."}`,
    /// `{"statusCode", "error", "message"}` and `{"detail": "..."}`.
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|value| parse_error_body(&value));

        match parsed {
            Some((code, message)) => Self::Upstream {
                status,
                code,
                message,
            },
            None => Self::Upstream {
                status,
                code: None,
                message: fallback_message(status, body),
            },
        }
    }
}

fn parse_error_body(value: &Value) -> Option<(Option<String>, String)> {
    let obj = value.as_object()?;

    if let Some(Value::Object(error)) = obj.get("error") {
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| Value::Object(error.clone()).to_string());
        return Some((error.get("code").and_then(scalar_string), message));
    }

    let error_label = obj.get("error").and_then(Value::as_str);
    let message = obj
        .get("message")
        .and_then(Value::as_str)
        .or_else(|| obj.get("detail").and_then(Value::as_str));

    match (message, error_label) {
        (Some(message), label) => {
            let code = obj
                .get("code")
                .and_then(scalar_string)
                .or_else(|| label.map(str::to_string));
            Some((code, message.to_string()))
        }
        (None, Some(label)) => Some((obj.get("code").and_then(scalar_string), label.to_string())),
        (None, None) => None,
    }
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn fallback_message(status: u16, body: &str) -> String {
    let excerpt: String = body.trim().chars().take(BODY_EXCERPT_CHARS).collect();
    if excerpt.is_empty() {
        format!("HTTP {}", status)
    } else {
        format!("HTTP {}: {}", status, excerpt)
    }
}
