//! HTTP transport layer for the Instantly SDK.

use crate::config::{ClientConfig, TimeoutProfile};
use crate::credentials::Credential;
use crate::error::{InstantlyError, InstantlyResult};
use crate::rate_limit::RateLimitTracker;
use instantly_core::RateLimitSnapshot;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// HTTP methods the Instantly API is called with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }

    fn to_reqwest(self) -> reqwest::Method {
        match self {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// One outbound API call.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    /// Path below the base URL, one entry per segment. Each entry is
    /// percent-encoded as a single segment.
    pub segments: Vec<String>,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub timeout: TimeoutProfile,
}

impl ApiRequest {
    pub fn new<I, S>(method: HttpMethod, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            method,
            segments: segments.into_iter().map(Into::into).collect(),
            query: Vec::new(),
            body: None,
            timeout: TimeoutProfile::Default,
        }
    }

    pub fn get<I: IntoIterator<Item = S>, S: Into<String>>(segments: I) -> Self {
        Self::new(HttpMethod::Get, segments)
    }

    pub fn post<I: IntoIterator<Item = S>, S: Into<String>>(segments: I) -> Self {
        Self::new(HttpMethod::Post, segments)
    }

    pub fn patch<I: IntoIterator<Item = S>, S: Into<String>>(segments: I) -> Self {
        Self::new(HttpMethod::Patch, segments)
    }

    pub fn delete<I: IntoIterator<Item = S>, S: Into<String>>(segments: I) -> Self {
        Self::new(HttpMethod::Delete, segments)
    }

    /// Append every field of a JSON object as query parameters.
    pub fn query(mut self, params: &Value) -> Self {
        self.query.extend(query_pairs(params));
        self
    }

    pub fn query_pair(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn timeout(mut self, profile: TimeoutProfile) -> Self {
        self.timeout = profile;
        self
    }

    /// Path for logging, e.g. `/accounts/jane@example.com`.
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }

    /// The profile actually used: a non-empty `search` in the query or body
    /// always runs under [`TimeoutProfile::Search`].
    pub fn effective_timeout(&self) -> TimeoutProfile {
        let query_search = self
            .query
            .iter()
            .any(|(key, value)| key == "search" && !value.trim().is_empty());
        let body_search = self
            .body
            .as_ref()
            .and_then(|body| body.get("search"))
            .and_then(Value::as_str)
            .is_some_and(|s| !s.trim().is_empty());

        if query_search || body_search {
            TimeoutProfile::Search
        } else {
            self.timeout
        }
    }
}

/// Outcome of a successful call.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
    /// Tracker state after this response was observed.
    pub rate_limit: RateLimitSnapshot,
}

/// Flatten a JSON object into query pairs.
///
/// Nulls are skipped, arrays become repeated keys and nested objects are sent
/// as JSON text.
pub fn query_pairs(params: &Value) -> Vec<(String, String)> {
    let Some(map) = params.as_object() else {
        return Vec::new();
    };

    let mut pairs = Vec::new();
    for (key, value) in map {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                pairs.extend(
                    items
                        .iter()
                        .filter_map(scalar_query_value)
                        .map(|v| (key.clone(), v)),
                );
            }
            other => {
                if let Some(v) = scalar_query_value(other) {
                    pairs.push((key.clone(), v));
                }
            }
        }
    }
    pairs
}

fn scalar_query_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

/// HTTP transport for making API requests.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    config: Arc<ClientConfig>,
    rate_limits: RateLimitTracker,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given configuration.
    pub fn new(config: Arc<ClientConfig>, rate_limits: RateLimitTracker) -> InstantlyResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("instantly-mcp/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| InstantlyError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config,
            rate_limits,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn rate_limits(&self) -> &RateLimitTracker {
        &self.rate_limits
    }

    /// Build a URL for the given path segments.
    fn build_url(&self, segments: &[String]) -> InstantlyResult<url::Url> {
        let mut url = self.config.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                InstantlyError::Config(format!("Base URL cannot hold a path: {}", self.config.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Issue exactly one request. Nothing is retried.
    pub async fn call(
        &self,
        request: ApiRequest,
        credential: &Credential,
    ) -> InstantlyResult<ApiResponse> {
        let url = self.build_url(&request.segments)?;
        let timeout = self
            .config
            .timeouts
            .for_profile(request.effective_timeout());

        debug!(
            method = request.method.as_str(),
            path = %request.path(),
            timeout_secs = timeout.as_secs(),
            "Instantly API request"
        );

        let mut builder = self
            .client
            .request(request.method.to_reqwest(), url)
            .bearer_auth(credential.expose())
            .timeout(timeout);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| classify_error(e, timeout))?;

        let status = response.status();
        let rate_limit = self.rate_limits.observe(response.headers());
        let text = response
            .text()
            .await
            .map_err(|e| classify_error(e, timeout))?;

        if !status.is_success() {
            warn!(
                method = request.method.as_str(),
                path = %request.path(),
                status = status.as_u16(),
                "Instantly API returned an error"
            );
            return Err(InstantlyError::from_response(status.as_u16(), &text));
        }

        let body = if status == StatusCode::NO_CONTENT || text.trim().is_empty() {
            serde_json::json!({ "success": true })
        } else {
            serde_json::from_str(&text)?
        };

        Ok(ApiResponse {
            status: status.as_u16(),
            body,
            rate_limit,
        })
    }
}

fn classify_error(error: reqwest::Error, timeout: Duration) -> InstantlyError {
    if error.is_timeout() {
        InstantlyError::Timeout { after: timeout }
    } else {
        InstantlyError::Transport(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimeoutConfig;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_config(base_url: &str) -> Arc<ClientConfig> {
        Arc::new(ClientConfig {
            base_url: url::Url::parse(base_url).unwrap(),
            api_key: None,
            timeouts: TimeoutConfig::default(),
        })
    }

    fn create_transport(base_url: &str) -> HttpTransport {
        HttpTransport::new(create_config(base_url), RateLimitTracker::new()).unwrap()
    }

    fn api_base(server: &MockServer) -> String {
        format!("{}/api/v2", server.uri())
    }

    fn credential() -> Credential {
        Credential::new("sk-test-key").unwrap()
    }

    #[tokio::test]
    async fn test_get_request() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v2/campaigns/c-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "c-1", "name": "Launch"})))
            .mount(&server)
            .await;

        let transport = create_transport(&api_base(&server));

        let response = transport
            .call(ApiRequest::get(["campaigns", "c-1"]), &credential())
            .await
            .unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.body["name"], "Launch");
    }

    #[tokio::test]
    async fn test_post_request_sends_json_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v2/lead-lists"))
            .and(body_json(json!({"name": "Q3 prospects"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "list-1"})))
            .expect(1)
            .mount(&server)
            .await;

        let transport = create_transport(&api_base(&server));

        let response = transport
            .call(
                ApiRequest::post(["lead-lists"]).json(json!({"name": "Q3 prospects"})),
                &credential(),
            )
            .await
            .unwrap();
        assert_eq!(response.body["id"], "list-1");
    }

    #[tokio::test]
    async fn test_authorization_header() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v2/emails/unread/count"))
            .and(header("Authorization", "Bearer sk-test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"count": 4})))
            .mount(&server)
            .await;

        let transport = create_transport(&api_base(&server));

        let response = transport
            .call(ApiRequest::get(["emails", "unread", "count"]), &credential())
            .await
            .unwrap();
        assert_eq!(response.body["count"], 4);
    }

    #[tokio::test]
    async fn test_account_email_is_one_path_segment() {
        let server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path("/api/v2/accounts/jane@example.com"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"email": "jane@example.com"})))
            .mount(&server)
            .await;

        let transport = create_transport(&api_base(&server));

        let response = transport
            .call(
                ApiRequest::patch(["accounts", "jane@example.com"]).json(json!({"daily_limit": 20})),
                &credential(),
            )
            .await
            .unwrap();
        assert_eq!(response.body["email"], "jane@example.com");
    }

    #[tokio::test]
    async fn test_repeated_query_parameters() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v2/campaigns/analytics"))
            .and(query_param("id", "c-1"))
            .and(query_param("id", "c-2"))
            .and(query_param("exclude_total_leads_count", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let transport = create_transport(&api_base(&server));

        transport
            .call(
                ApiRequest::get(["campaigns", "analytics"])
                    .query(&json!({"id": ["c-1", "c-2"], "exclude_total_leads_count": true})),
                &credential(),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_error_on_400() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v2/leads"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "statusCode": 400,
                "error": "Bad Request",
                "message": "body must have required property 'email'"
            })))
            .mount(&server)
            .await;

        let transport = create_transport(&api_base(&server));

        let result = transport
            .call(ApiRequest::post(["leads"]).json(json!({})), &credential())
            .await;
        match result {
            Err(InstantlyError::Upstream {
                status,
                code,
                message,
            }) => {
                assert_eq!(status, 400);
                assert_eq!(code.as_deref(), Some("Bad Request"));
                assert!(message.contains("email"));
            }
            other => panic!("Expected Upstream error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_error_on_404_plain_text() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v2/leads/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not found"))
            .mount(&server)
            .await;

        let transport = create_transport(&api_base(&server));

        let error = transport
            .call(ApiRequest::get(["leads", "missing"]), &credential())
            .await
            .unwrap_err();
        assert_eq!(error.status(), Some(404));
        assert!(error.to_string().contains("HTTP 404: Not found"));
    }

    #[tokio::test]
    async fn test_no_content_is_success() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/api/v2/leads/lead-1"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let transport = create_transport(&api_base(&server));

        let response = transport
            .call(ApiRequest::delete(["leads", "lead-1"]), &credential())
            .await
            .unwrap();
        assert_eq!(response.status, 204);
        assert_eq!(response.body, json!({"success": true}));
    }

    #[tokio::test]
    async fn test_timeout_is_reported() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v2/accounts"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"items": []}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let config = Arc::new(ClientConfig {
            base_url: url::Url::parse(&api_base(&server)).unwrap(),
            api_key: None,
            timeouts: TimeoutConfig::uniform(Duration::from_millis(50)),
        });
        let transport = HttpTransport::new(config, RateLimitTracker::new()).unwrap();

        let error = transport
            .call(ApiRequest::get(["accounts"]), &credential())
            .await
            .unwrap_err();
        assert!(matches!(error, InstantlyError::Timeout { after } if after == Duration::from_millis(50)));
    }

    #[tokio::test]
    async fn test_connection_failure_is_transport_error() {
        // Nothing listens on port 1.
        let transport = create_transport("http://127.0.0.1:1/api/v2");

        let error = transport
            .call(ApiRequest::get(["accounts"]), &credential())
            .await
            .unwrap_err();
        assert_eq!(error.code(), "transport_error");
    }

    #[tokio::test]
    async fn test_rate_limit_headers_are_tracked() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v2/campaigns"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"items": []}))
                    .insert_header("x-ratelimit-remaining", "57")
                    .insert_header("x-ratelimit-limit", "60")
                    .insert_header("x-ratelimit-reset", "1700000000"),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v2/campaigns/c-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "c-1"})))
            .mount(&server)
            .await;

        let transport = create_transport(&api_base(&server));

        let first = transport
            .call(ApiRequest::get(["campaigns"]), &credential())
            .await
            .unwrap();
        assert_eq!(first.rate_limit.remaining, Some(57));
        assert_eq!(first.rate_limit.limit, Some(60));

        let before = transport.rate_limits().snapshot();
        let second = transport
            .call(ApiRequest::get(["campaigns", "c-1"]), &credential())
            .await
            .unwrap();
        assert_eq!(second.rate_limit, before);
        assert_eq!(transport.rate_limits().snapshot(), before);
    }

    #[tokio::test]
    async fn test_rate_limit_tracked_on_error_responses() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v2/accounts"))
            .respond_with(
                ResponseTemplate::new(429)
                    .set_body_json(json!({"error": "Too Many Requests"}))
                    .insert_header("x-ratelimit-remaining", "0"),
            )
            .mount(&server)
            .await;

        let transport = create_transport(&api_base(&server));

        let error = transport
            .call(ApiRequest::get(["accounts"]), &credential())
            .await
            .unwrap_err();
        assert_eq!(error.status(), Some(429));
        assert_eq!(transport.rate_limits().snapshot().remaining, Some(0));
    }

    #[tokio::test]
    async fn test_build_url() {
        let transport = create_transport("http://localhost:8080/api/v2");

        let url = transport
            .build_url(&["accounts".to_string(), "warmup".to_string()])
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/v2/accounts/warmup");
    }

    #[tokio::test]
    async fn test_build_url_with_trailing_slash() {
        let transport = create_transport("http://localhost:8080/api/v2/");

        let url = transport.build_url(&["leads".to_string()]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/v2/leads");
    }

    #[test]
    fn test_search_upgrades_timeout_profile() {
        let plain = ApiRequest::get(["accounts"]).query(&json!({"limit": 10}));
        let query_search = ApiRequest::get(["accounts"]).query(&json!({"search": "acme.com"}));
        let body_search = ApiRequest::post(["leads", "list"])
            .json(json!({"search": "jane"}))
            .timeout(TimeoutProfile::Extended);
        let blank_search = ApiRequest::post(["leads", "list"])
            .json(json!({"search": "  "}))
            .timeout(TimeoutProfile::Extended);

        assert_eq!(plain.effective_timeout(), TimeoutProfile::Default);
        assert_eq!(query_search.effective_timeout(), TimeoutProfile::Search);
        assert_eq!(body_search.effective_timeout(), TimeoutProfile::Search);
        assert_eq!(blank_search.effective_timeout(), TimeoutProfile::Extended);
    }

    #[test]
    fn test_query_pairs_flattening() {
        let pairs = query_pairs(&json!({
            "emails": ["a@x.com", "b@x.com"],
            "limit": 5,
            "skip": null,
            "is_unread": false
        }));

        assert!(pairs.contains(&("emails".to_string(), "a@x.com".to_string())));
        assert!(pairs.contains(&("emails".to_string(), "b@x.com".to_string())));
        assert!(pairs.contains(&("limit".to_string(), "5".to_string())));
        assert!(pairs.contains(&("is_unread".to_string(), "false".to_string())));
        assert!(!pairs.iter().any(|(k, _)| k == "skip"));
    }
}
