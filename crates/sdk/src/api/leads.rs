//! Leads API endpoints.

use crate::client::InstantlyClient;
use crate::config::TimeoutProfile;
use crate::credentials::Credential;
use crate::error::InstantlyResult;
use crate::pagination::{ListEndpoint, ListParams, Paginator};
use crate::transport::ApiRequest;
use instantly_core::Page;
use serde_json::Value;

/// Most leads a single bulk-add call accepts.
pub const MAX_BULK_LEADS: usize = 1000;

/// Leads API for managing campaign and list contacts.
pub struct LeadsApi<'a> {
    client: &'a InstantlyClient,
    credential: &'a Credential,
}

impl<'a> LeadsApi<'a> {
    pub(crate) fn new(client: &'a InstantlyClient, credential: &'a Credential) -> Self {
        Self { client, credential }
    }

    /// List one page of leads. Filters travel in the POST body.
    pub async fn list(&self, params: &ListParams) -> InstantlyResult<Page> {
        self.client
            .list_page(ListEndpoint::LEADS, params, self.credential)
            .await
    }

    pub fn paginate(&self, params: ListParams) -> Paginator {
        self.client
            .paginate(ListEndpoint::LEADS, params, self.credential)
    }

    /// Get a specific lead.
    pub async fn get(&self, lead_id: &str) -> InstantlyResult<Value> {
        self.client
            .send(ApiRequest::get(["leads", lead_id]), self.credential)
            .await
    }

    /// Create a single lead.
    pub async fn create(&self, lead: Value) -> InstantlyResult<Value> {
        self.client
            .send(ApiRequest::post(["leads"]).json(lead), self.credential)
            .await
    }

    /// Partially update a lead. A `custom_variables` object replaces the
    /// stored one entirely.
    pub async fn update(&self, lead_id: &str, changes: Value) -> InstantlyResult<Value> {
        self.client
            .send(
                ApiRequest::patch(["leads", lead_id]).json(changes),
                self.credential,
            )
            .await
    }

    /// Permanently delete a lead.
    pub async fn delete(&self, lead_id: &str) -> InstantlyResult<Value> {
        self.client
            .send(ApiRequest::delete(["leads", lead_id]), self.credential)
            .await
    }

    /// Add up to [`MAX_BULK_LEADS`] leads to a campaign or list.
    pub async fn bulk_add(&self, payload: Value) -> InstantlyResult<Value> {
        self.client
            .send(
                ApiRequest::post(["leads", "add"])
                    .json(payload)
                    .timeout(TimeoutProfile::Extended),
                self.credential,
            )
            .await
    }

    /// Move or copy leads between campaigns and lists. Large moves run as a
    /// background job.
    pub async fn move_leads(&self, payload: Value) -> InstantlyResult<Value> {
        self.client
            .send(
                ApiRequest::post(["leads", "move"])
                    .json(payload)
                    .timeout(TimeoutProfile::Extended),
                self.credential,
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::client::InstantlyClient;
    use crate::config::TimeoutConfig;
    use crate::credentials::Credential;
    use crate::error::InstantlyError;
    use crate::pagination::ListParams;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SLOW: Duration = Duration::from_millis(800);

    fn client(server: &MockServer) -> InstantlyClient {
        InstantlyClient::builder()
            .base_url(format!("{}/api/v2", server.uri()))
            .timeouts(TimeoutConfig {
                default: Duration::from_millis(200),
                extended: Duration::from_secs(5),
                search: Duration::from_millis(200),
            })
            .private_rate_limits()
            .build()
            .unwrap()
    }

    async fn mount_slow(server: &MockServer, verb: &str, route: &str) {
        Mock::given(method(verb))
            .and(path(route))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"items": [], "id": "l1"}))
                    .set_delay(SLOW),
            )
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_bulk_operations_outlast_default_timeout() {
        let server = MockServer::start().await;
        mount_slow(&server, "POST", "/api/v2/leads/add").await;
        mount_slow(&server, "POST", "/api/v2/leads/move").await;
        mount_slow(&server, "POST", "/api/v2/leads/list").await;
        mount_slow(&server, "GET", "/api/v2/leads/l1").await;

        let client = client(&server);
        let credential = Credential::new("sk-test").unwrap();
        let leads = client.leads(&credential);

        leads
            .bulk_add(json!({"campaign_id": "c1", "leads": [{"email": "a@example.com"}]}))
            .await
            .unwrap();
        leads
            .move_leads(json!({"ids": ["l1"], "to_campaign_id": "c2"}))
            .await
            .unwrap();
        leads.list(&ListParams::new()).await.unwrap();

        let error = leads.get("l1").await.unwrap_err();
        assert!(matches!(
            error,
            InstantlyError::Timeout { after } if after == Duration::from_millis(200)
        ));
    }
}
