// Shared plumbing for cursor-paginated list tools

use crate::error::ToolError;
use crate::tools::catalog::ToolName;
use crate::tools::registry::ToolContext;
use crate::tools::schema::{FieldSpec, ValidatedArgs};
use instantly_core::MAX_PAGE_SIZE;
use instantly_sdk::{ListEndpoint, ListParams};
use serde_json::{json, Value};

pub const LIMIT: FieldSpec = FieldSpec::integer(
    "limit",
    Some(1),
    Some(100),
    "Results per page (1-100, default: 100)",
);

pub const STARTING_AFTER: FieldSpec = FieldSpec::string(
    "starting_after",
    "Cursor from next_cursor of the previous page. Omit for the first page.",
);

pub const MAX_ITEMS: FieldSpec = FieldSpec::integer(
    "max_items",
    Some(1),
    Some(1000),
    "Follow cursors across pages until this many records are collected (1-1000). Omit to get a single page.",
);

/// Fetch one page, or walk pages up to `max_items`, and wrap the result.
pub async fn list_records(
    ctx: &ToolContext<'_>,
    endpoint: ListEndpoint,
    args: &ValidatedArgs,
) -> Result<Value, ToolError> {
    let credential = ctx.credential()?;
    let mut params = ListParams::from_value(args.body_without(&["max_items"]))?;
    params.limit.get_or_insert(MAX_PAGE_SIZE as u32);

    let (items, next_cursor) = match args.i64("max_items") {
        Some(max) => {
            let collected = ctx
                .client()
                .paginate(endpoint, params, &credential)
                .max_items(max.max(1) as usize)
                .collect()
                .await?;
            (collected.items, collected.next_cursor)
        }
        None => {
            let page = ctx.client().list_page(endpoint, &params, &credential).await?;
            (page.items, page.next_cursor)
        }
    };

    Ok(envelope(args.tool(), items, next_cursor))
}

/// `{items, count, next_cursor}` plus a hint when more pages remain.
pub fn envelope(tool: ToolName, items: Vec<Value>, next_cursor: Option<String>) -> Value {
    let count = items.len();
    let mut result = json!({
        "items": items,
        "count": count,
        "next_cursor": next_cursor,
    });

    if let Some(cursor) = &next_cursor {
        result["_pagination_hint"] = json!(format!(
            "MORE RESULTS AVAILABLE. Call {} with starting_after='{}' to get the next page.",
            tool, cursor
        ));
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{call, mock_registry};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn accounts(prefix: &str, count: usize) -> Vec<Value> {
        (0..count)
            .map(|i| json!({"email": format!("{}{}@example.com", prefix, i)}))
            .collect()
    }

    #[test]
    fn test_envelope_without_cursor_has_no_hint() {
        let result = envelope(ToolName::ListCampaigns, vec![json!({"id": "c1"})], None);

        assert_eq!(result["count"], 1);
        assert_eq!(result["next_cursor"], Value::Null);
        assert!(result.get("_pagination_hint").is_none());
    }

    #[tokio::test]
    async fn test_limit_five_then_resume() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/accounts"))
            .and(query_param("starting_after", "cursor-5"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"items": [], "next_starting_after": null})),
            )
            .with_priority(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/accounts"))
            .and(query_param("limit", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": accounts("a", 5),
                "next_starting_after": "cursor-5"
            })))
            .mount(&server)
            .await;

        let registry = mock_registry(&server);

        let (is_error, first) = call(&registry, "list_accounts", json!({"limit": 5})).await;
        assert!(!is_error, "{}", first);
        assert_eq!(first["count"], 5);
        assert_eq!(first["next_cursor"], "cursor-5");
        assert!(first["_pagination_hint"]
            .as_str()
            .unwrap()
            .contains("starting_after='cursor-5'"));

        let (is_error, second) = call(
            &registry,
            "list_accounts",
            json!({"limit": 5, "starting_after": "cursor-5"}),
        )
        .await;
        assert!(!is_error);
        assert_eq!(second["count"], 0);
        assert_eq!(second["next_cursor"], Value::Null);
    }

    #[tokio::test]
    async fn test_default_page_size_is_one_hundred() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/campaigns"))
            .and(query_param("limit", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
            .expect(1)
            .mount(&server)
            .await;

        let registry = mock_registry(&server);
        let (is_error, result) = call(&registry, "list_campaigns", json!({})).await;

        assert!(!is_error, "{}", result);
        assert_eq!(result["count"], 0);
    }

    #[tokio::test]
    async fn test_max_items_walks_pages() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/background-jobs"))
            .and(query_param("starting_after", "p2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": accounts("b", 2),
                "next_starting_after": "p3"
            })))
            .with_priority(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/background-jobs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": accounts("a", 3),
                "next_starting_after": "p2"
            })))
            .mount(&server)
            .await;

        let registry = mock_registry(&server);
        let (is_error, result) = call(
            &registry,
            "list_background_jobs",
            json!({"limit": 3, "max_items": 5}),
        )
        .await;

        assert!(!is_error, "{}", result);
        assert_eq!(result["count"], 5);
        assert_eq!(result["next_cursor"], "p3");
    }
}
