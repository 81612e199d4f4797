//! Cursor pagination over Instantly list endpoints.

use crate::client::InstantlyClient;
use crate::config::TimeoutProfile;
use crate::credentials::Credential;
use crate::error::InstantlyResult;
use crate::transport::{ApiRequest, HttpMethod};
use futures_util::stream::{self, Stream};
use instantly_core::{Page, MAX_PAGE_SIZE};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::VecDeque;
use tracing::warn;

/// Parameters shared by every list endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starting_after: Option<String>,
    /// Endpoint-specific filters, sent alongside `limit` and `starting_after`.
    #[serde(flatten)]
    pub filters: Map<String, Value>,
}

impl ListParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn starting_after(mut self, cursor: impl Into<String>) -> Self {
        self.starting_after = Some(cursor.into());
        self
    }

    pub fn filter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    /// Split a JSON argument object into list parameters.
    pub fn from_value(value: Value) -> InstantlyResult<Self> {
        Ok(serde_json::from_value(value)?)
    }
}

/// A cursor-paginated list endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListEndpoint {
    pub method: HttpMethod,
    pub segments: &'static [&'static str],
    pub timeout: TimeoutProfile,
}

impl ListEndpoint {
    pub const ACCOUNTS: Self = Self::get(&["accounts"]);
    pub const CAMPAIGNS: Self = Self::get(&["campaigns"]);
    /// Lead listing takes its filters as a POST body.
    pub const LEADS: Self = Self {
        method: HttpMethod::Post,
        segments: &["leads", "list"],
        timeout: TimeoutProfile::Extended,
    };
    pub const LEAD_LISTS: Self = Self::get(&["lead-lists"]);
    pub const EMAILS: Self = Self::get(&["emails"]);
    pub const BACKGROUND_JOBS: Self = Self::get(&["background-jobs"]);

    const fn get(segments: &'static [&'static str]) -> Self {
        Self {
            method: HttpMethod::Get,
            segments,
            timeout: TimeoutProfile::Default,
        }
    }

    /// Build the request for one page.
    pub fn request(&self, params: &ListParams) -> InstantlyResult<ApiRequest> {
        let params = serde_json::to_value(params)?;
        let request = ApiRequest::new(self.method, self.segments.iter().copied()).timeout(self.timeout);

        Ok(match self.method {
            HttpMethod::Get | HttpMethod::Delete => request.query(&params),
            HttpMethod::Post | HttpMethod::Patch => request.json(params),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PageState {
    Start,
    Next(String),
    Exhausted,
}

/// Everything a paginator produced, plus the cursor to resume from.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Collected {
    pub items: Vec<Value>,
    pub next_cursor: Option<String>,
}

/// Lazy sequence of records from a list endpoint.
///
/// Pages are fetched one at a time, only when needed. Once upstream stops
/// returning a cursor the paginator is exhausted for good; build a new one to
/// start over.
#[derive(Debug)]
pub struct Paginator {
    client: InstantlyClient,
    credential: Credential,
    endpoint: ListEndpoint,
    params: ListParams,
    state: PageState,
    max_items: Option<usize>,
    fetched: usize,
    buffer: VecDeque<Value>,
}

impl Paginator {
    pub(crate) fn new(
        client: InstantlyClient,
        credential: Credential,
        endpoint: ListEndpoint,
        mut params: ListParams,
    ) -> Self {
        let state = match params.starting_after.take() {
            Some(cursor) if !cursor.is_empty() => PageState::Next(cursor),
            _ => PageState::Start,
        };

        Self {
            client,
            credential,
            endpoint,
            params,
            state,
            max_items: None,
            fetched: 0,
            buffer: VecDeque::new(),
        }
    }

    /// Stop after `max` records. The cap is sent upstream as the page size,
    /// so the last page is never cut short and the resume cursor stays valid.
    pub fn max_items(mut self, max: usize) -> Self {
        self.max_items = Some(max);
        self
    }

    /// Cursor for the page after everything fetched so far.
    pub fn next_cursor(&self) -> Option<&str> {
        match &self.state {
            PageState::Next(cursor) => Some(cursor),
            _ => None,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.buffer.is_empty() && (self.state == PageState::Exhausted || self.remaining() == Some(0))
    }

    fn remaining(&self) -> Option<usize> {
        self.max_items.map(|max| max.saturating_sub(self.fetched))
    }

    fn page_limit(&self) -> u32 {
        let page_size = self
            .params
            .limit
            .map(|limit| (limit as usize).clamp(1, MAX_PAGE_SIZE))
            .unwrap_or(MAX_PAGE_SIZE);
        let limit = match self.remaining() {
            Some(remaining) => remaining.min(page_size),
            None => page_size,
        };
        limit as u32
    }

    /// Fetch the next page. Returns `None` once the sequence has ended.
    pub async fn next_page(&mut self) -> InstantlyResult<Option<Vec<Value>>> {
        let cursor = match &self.state {
            PageState::Exhausted => return Ok(None),
            PageState::Start => None,
            PageState::Next(cursor) => Some(cursor.clone()),
        };
        if self.remaining() == Some(0) {
            return Ok(None);
        }

        let mut params = self.params.clone();
        params.starting_after = cursor.clone();
        params.limit = Some(self.page_limit());

        let Page {
            mut items,
            next_cursor,
        } = self
            .client
            .list_page(self.endpoint, &params, &self.credential)
            .await?;

        if let Some(remaining) = self.remaining() {
            items.truncate(remaining);
        }
        self.fetched += items.len();

        self.state = match next_cursor {
            None => PageState::Exhausted,
            Some(next) if cursor.as_deref() == Some(next.as_str()) => {
                warn!(
                    path = ?self.endpoint.segments,
                    cursor = %next,
                    "Upstream repeated the pagination cursor, stopping"
                );
                PageState::Exhausted
            }
            Some(next) => PageState::Next(next),
        };

        Ok(Some(items))
    }

    /// Next record, fetching another page when the current one is used up.
    pub async fn next_item(&mut self) -> InstantlyResult<Option<Value>> {
        while self.buffer.is_empty() {
            match self.next_page().await? {
                Some(items) => self.buffer.extend(items),
                None => return Ok(None),
            }
        }
        Ok(self.buffer.pop_front())
    }

    /// Drain the whole sequence.
    pub async fn collect(mut self) -> InstantlyResult<Collected> {
        let mut items: Vec<Value> = self.buffer.drain(..).collect();
        while let Some(page) = self.next_page().await? {
            items.extend(page);
        }
        Ok(Collected {
            items,
            next_cursor: self.next_cursor().map(str::to_string),
        })
    }

    pub fn into_stream(self) -> impl Stream<Item = InstantlyResult<Value>> {
        stream::try_unfold(self, |mut paginator| async move {
            Ok(paginator
                .next_item()
                .await?
                .map(|item| (item, paginator)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::TryStreamExt;
    use serde_json::json;
    use std::collections::HashSet;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> InstantlyClient {
        InstantlyClient::builder()
            .base_url(format!("{}/api/v2", server.uri()))
            .private_rate_limits()
            .build()
            .unwrap()
    }

    fn credential() -> Credential {
        Credential::new("sk-test-key").unwrap()
    }

    fn accounts(range: std::ops::Range<u32>) -> Vec<Value> {
        range
            .map(|i| json!({"email": format!("sender{}@example.com", i)}))
            .collect()
    }

    #[tokio::test]
    async fn test_follows_cursor_without_duplicates() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v2/accounts"))
            .and(query_param("starting_after", "cursor-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": accounts(3..5),
                "next_starting_after": null
            })))
            .with_priority(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v2/accounts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": accounts(0..3),
                "next_starting_after": "cursor-1"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let collected = client(&server)
            .paginate(ListEndpoint::ACCOUNTS, ListParams::new(), &credential())
            .collect()
            .await
            .unwrap();

        let emails: HashSet<_> = collected
            .items
            .iter()
            .map(|item| item["email"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(collected.items.len(), 5);
        assert_eq!(emails.len(), 5);
        assert!(collected.next_cursor.is_none());
    }

    #[tokio::test]
    async fn test_limit_five_then_resume() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v2/accounts"))
            .and(query_param("starting_after", "acct-5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [],
                "next_starting_after": null
            })))
            .with_priority(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v2/accounts"))
            .and(query_param("limit", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": accounts(0..5),
                "next_starting_after": "acct-5"
            })))
            .mount(&server)
            .await;

        let client = client(&server);
        let page = client
            .list_page(ListEndpoint::ACCOUNTS, &ListParams::new().limit(5), &credential())
            .await
            .unwrap();
        assert_eq!(page.len(), 5);
        assert_eq!(page.next_cursor.as_deref(), Some("acct-5"));

        let mut paginator = client.paginate(
            ListEndpoint::ACCOUNTS,
            ListParams::new().starting_after("acct-5"),
            &credential(),
        );
        assert!(paginator.next_item().await.unwrap().is_none());
        assert!(paginator.is_exhausted());
    }

    #[tokio::test]
    async fn test_max_items_is_pushed_into_page_size() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v2/campaigns"))
            .and(query_param("limit", "2"))
            .and(query_param("starting_after", "camp-3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{"id": "camp-4"}, {"id": "camp-5"}],
                "next_starting_after": "camp-5"
            })))
            .with_priority(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v2/campaigns"))
            .and(query_param("limit", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{"id": "camp-1"}, {"id": "camp-2"}, {"id": "camp-3"}],
                "next_starting_after": "camp-3"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let collected = client(&server)
            .paginate(ListEndpoint::CAMPAIGNS, ListParams::new().limit(3), &credential())
            .max_items(5)
            .collect()
            .await
            .unwrap();

        assert_eq!(collected.items.len(), 5);
        assert_eq!(collected.next_cursor.as_deref(), Some("camp-5"));
    }

    #[tokio::test]
    async fn test_repeated_cursor_ends_sequence() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v2/background-jobs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{"id": "job-1"}],
                "next_starting_after": "stuck"
            })))
            .expect(2)
            .mount(&server)
            .await;

        let collected = client(&server)
            .paginate(ListEndpoint::BACKGROUND_JOBS, ListParams::new(), &credential())
            .collect()
            .await
            .unwrap();

        assert_eq!(collected.items.len(), 2);
        assert!(collected.next_cursor.is_none());
    }

    #[tokio::test]
    async fn test_lead_listing_posts_filters() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v2/leads/list"))
            .and(body_partial_json(json!({"campaign": "camp-1", "limit": 100})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{"id": "lead-1"}, {"id": "lead-2"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let items: Vec<Value> = client(&server)
            .paginate(
                ListEndpoint::LEADS,
                ListParams::new().filter("campaign", "camp-1"),
                &credential(),
            )
            .into_stream()
            .try_collect()
            .await
            .unwrap();

        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_get_endpoint_sends_query() {
        let request = ListEndpoint::EMAILS
            .request(&ListParams::new().limit(10).filter("is_unread", true))
            .unwrap();

        assert_eq!(request.method, HttpMethod::Get);
        assert!(request.body.is_none());
        assert!(request.query.contains(&("limit".to_string(), "10".to_string())));
        assert!(request.query.contains(&("is_unread".to_string(), "true".to_string())));
    }

    #[test]
    fn test_list_params_from_value() {
        let params = ListParams::from_value(json!({
            "limit": 25,
            "starting_after": "abc",
            "search": "acme"
        }))
        .unwrap();

        assert_eq!(params.limit, Some(25));
        assert_eq!(params.starting_after.as_deref(), Some("abc"));
        assert_eq!(params.filters.get("search"), Some(&json!("acme")));
    }
}
