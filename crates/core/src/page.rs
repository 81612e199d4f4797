use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Largest page size any list endpoint accepts.
pub const MAX_PAGE_SIZE: usize = 100;

/// One page of a cursor-paginated list.
///
/// `next_cursor` is opaque: it must be sent back verbatim as
/// `starting_after` to fetch the following page. `None` marks the end of the
/// sequence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub items: Vec<Value>,
    pub next_cursor: Option<String>,
}

impl Page {
    pub fn new(items: Vec<Value>, next_cursor: Option<String>) -> Self {
        Self { items, next_cursor }
    }

    /// Parse an upstream list response.
    ///
    /// Items live under `items` (or `data`), or the body is a bare array. The
    /// cursor is `next_starting_after`, either at the top level or nested in a
    /// `pagination` object. Empty cursors count as absent.
    pub fn from_response(body: Value) -> Self {
        match body {
            Value::Array(items) => Self::new(items, None),
            Value::Object(mut map) => {
                let next_cursor = map
                    .get("next_starting_after")
                    .and_then(cursor_value)
                    .or_else(|| {
                        map.get("pagination")
                            .and_then(|p| p.get("next_starting_after"))
                            .and_then(cursor_value)
                    });

                let items = match map.remove("items").or_else(|| map.remove("data")) {
                    Some(Value::Array(items)) => items,
                    Some(Value::Null) | None => Vec::new(),
                    Some(other) => vec![other],
                };

                Self::new(items, next_cursor)
            }
            Value::Null => Self::default(),
            other => Self::new(vec![other], None),
        }
    }

    pub fn has_more(&self) -> bool {
        self.next_cursor.is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn cursor_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
