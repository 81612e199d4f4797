//! Main client for the Instantly SDK.

use crate::api::*;
use crate::config::{ClientConfig, TimeoutConfig, DEFAULT_BASE_URL};
use crate::credentials::{Credential, CredentialSources};
use crate::error::{InstantlyError, InstantlyResult};
use crate::pagination::{ListEndpoint, ListParams, Paginator};
use crate::rate_limit::RateLimitTracker;
use crate::transport::{ApiRequest, ApiResponse, HttpTransport};
use instantly_core::{Page, RateLimitSnapshot};
use serde_json::Value;
use std::sync::Arc;
use url::Url;

/// Main client for interacting with the Instantly API.
///
/// The client holds no credential of its own for multi-tenant use: every
/// call takes the [`Credential`] it should run under.
#[derive(Debug, Clone)]
pub struct InstantlyClient {
    config: Arc<ClientConfig>,
    pub(crate) http: HttpTransport,
}

impl InstantlyClient {
    /// Create a new client builder.
    pub fn builder() -> InstantlyClientBuilder {
        InstantlyClientBuilder::new()
    }

    /// Create a client from configuration.
    fn from_config(config: ClientConfig, rate_limits: RateLimitTracker) -> InstantlyResult<Self> {
        let config = Arc::new(config);
        let http = HttpTransport::new(config.clone(), rate_limits)?;

        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Resolve the credential for one call, falling back to the key this
    /// client was built with.
    pub fn credential(&self, sources: CredentialSources) -> InstantlyResult<Credential> {
        let sources = if sources.environment.is_none() {
            sources.with_environment(self.config.api_key.clone())
        } else {
            sources
        };
        sources.resolve()
    }

    /// Issue one raw request.
    pub async fn call(&self, request: ApiRequest, credential: &Credential) -> InstantlyResult<ApiResponse> {
        self.http.call(request, credential).await
    }

    /// Issue one raw request and return only the body.
    pub async fn send(&self, request: ApiRequest, credential: &Credential) -> InstantlyResult<Value> {
        Ok(self.http.call(request, credential).await?.body)
    }

    /// Fetch a single page from a list endpoint.
    pub async fn list_page(
        &self,
        endpoint: ListEndpoint,
        params: &ListParams,
        credential: &Credential,
    ) -> InstantlyResult<Page> {
        let body = self.send(endpoint.request(params)?, credential).await?;
        Ok(Page::from_response(body))
    }

    /// Lazily walk a list endpoint across pages.
    pub fn paginate(&self, endpoint: ListEndpoint, params: ListParams, credential: &Credential) -> Paginator {
        Paginator::new(self.clone(), credential.clone(), endpoint, params)
    }

    /// Last observed rate-limit state.
    pub fn rate_limit(&self) -> RateLimitSnapshot {
        self.http.rate_limits().snapshot()
    }

    /// Get the accounts API.
    pub fn accounts<'a>(&'a self, credential: &'a Credential) -> AccountsApi<'a> {
        AccountsApi::new(self, credential)
    }

    /// Get the campaigns API.
    pub fn campaigns<'a>(&'a self, credential: &'a Credential) -> CampaignsApi<'a> {
        CampaignsApi::new(self, credential)
    }

    /// Get the leads API.
    pub fn leads<'a>(&'a self, credential: &'a Credential) -> LeadsApi<'a> {
        LeadsApi::new(self, credential)
    }

    /// Get the lead lists API.
    pub fn lead_lists<'a>(&'a self, credential: &'a Credential) -> LeadListsApi<'a> {
        LeadListsApi::new(self, credential)
    }

    /// Get the emails API.
    pub fn emails<'a>(&'a self, credential: &'a Credential) -> EmailsApi<'a> {
        EmailsApi::new(self, credential)
    }

    /// Get the analytics API.
    pub fn analytics<'a>(&'a self, credential: &'a Credential) -> AnalyticsApi<'a> {
        AnalyticsApi::new(self, credential)
    }

    /// Get the background jobs API.
    pub fn background_jobs<'a>(&'a self, credential: &'a Credential) -> BackgroundJobsApi<'a> {
        BackgroundJobsApi::new(self, credential)
    }
}

/// Builder for creating an InstantlyClient.
pub struct InstantlyClientBuilder {
    base_url: Option<String>,
    api_key: Option<String>,
    timeouts: TimeoutConfig,
    rate_limits: Option<RateLimitTracker>,
}

impl InstantlyClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            base_url: None,
            api_key: None,
            timeouts: TimeoutConfig::default(),
            rate_limits: None,
        }
    }

    /// Set the API root. Defaults to the production v2 API.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the fallback API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the per-profile request timeouts.
    pub fn timeouts(mut self, timeouts: TimeoutConfig) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Record rate limits into `tracker` instead of the process-wide one.
    pub fn rate_limits(mut self, tracker: RateLimitTracker) -> Self {
        self.rate_limits = Some(tracker);
        self
    }

    /// Record rate limits into a tracker owned by this client alone.
    pub fn private_rate_limits(self) -> Self {
        self.rate_limits(RateLimitTracker::new())
    }

    /// Build the client.
    pub fn build(self) -> InstantlyResult<InstantlyClient> {
        let base_url_str = self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        let base_url = Url::parse(base_url_str)?;
        if base_url.cannot_be_a_base() {
            return Err(InstantlyError::Config(format!(
                "base_url must be an absolute http(s) URL: {}",
                base_url_str
            )));
        }

        let config = ClientConfig {
            base_url,
            api_key: self.api_key.filter(|key| !key.trim().is_empty()),
            timeouts: self.timeouts,
        };
        let rate_limits = self
            .rate_limits
            .unwrap_or_else(|| RateLimitTracker::global().clone());

        InstantlyClient::from_config(config, rate_limits)
    }
}

impl Default for InstantlyClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults_to_production_api() {
        let client = InstantlyClient::builder().build().unwrap();

        assert_eq!(client.config().base_url.as_str(), DEFAULT_BASE_URL);
        assert!(client.config().api_key.is_none());
    }

    #[test]
    fn test_builder_with_options() {
        let client = InstantlyClient::builder()
            .base_url("http://localhost:9999/api/v2")
            .api_key("sk-test")
            .timeouts(TimeoutConfig::uniform(std::time::Duration::from_secs(5)))
            .build()
            .unwrap();

        assert_eq!(client.config().api_key.as_deref(), Some("sk-test"));
        assert_eq!(client.config().timeouts.search, std::time::Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_base_url() {
        let result = InstantlyClient::builder().base_url("not a url").build();
        assert!(matches!(result, Err(InstantlyError::InvalidUrl(_))));

        let result = InstantlyClient::builder().base_url("mailto:ops@example.com").build();
        assert!(matches!(result, Err(InstantlyError::Config(_))));
    }

    #[test]
    fn test_credential_falls_back_to_client_key() {
        let client = InstantlyClient::builder().api_key("sk-fallback").build().unwrap();

        let credential = client.credential(CredentialSources::new()).unwrap();
        assert_eq!(credential.expose(), "sk-fallback");

        let credential = client
            .credential(CredentialSources::new().with_header(Some("sk-header".to_string())))
            .unwrap();
        assert_eq!(credential.expose(), "sk-header");
    }

    #[test]
    fn test_credential_missing() {
        let client = InstantlyClient::builder().build().unwrap();

        let result = client.credential(CredentialSources::new());
        assert!(matches!(result, Err(InstantlyError::MissingCredential)));
    }

    #[test]
    fn test_private_rate_limits_are_isolated() {
        let a = InstantlyClient::builder().private_rate_limits().build().unwrap();
        let b = InstantlyClient::builder().private_rate_limits().build().unwrap();

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "x-ratelimit-remaining",
            reqwest::header::HeaderValue::from_static("1"),
        );
        a.http.rate_limits().observe(&headers);

        assert_eq!(a.rate_limit().remaining, Some(1));
        assert!(b.rate_limit().remaining.is_none());
    }
}
