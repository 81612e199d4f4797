//! Lead lists API endpoints.

use crate::client::InstantlyClient;
use crate::credentials::Credential;
use crate::error::InstantlyResult;
use crate::pagination::{ListEndpoint, ListParams, Paginator};
use crate::transport::ApiRequest;
use instantly_core::Page;
use serde_json::Value;

/// Lead lists API.
pub struct LeadListsApi<'a> {
    client: &'a InstantlyClient,
    credential: &'a Credential,
}

impl<'a> LeadListsApi<'a> {
    pub(crate) fn new(client: &'a InstantlyClient, credential: &'a Credential) -> Self {
        Self { client, credential }
    }

    pub async fn list(&self, params: &ListParams) -> InstantlyResult<Page> {
        self.client
            .list_page(ListEndpoint::LEAD_LISTS, params, self.credential)
            .await
    }

    pub fn paginate(&self, params: ListParams) -> Paginator {
        self.client
            .paginate(ListEndpoint::LEAD_LISTS, params, self.credential)
    }

    pub async fn create(&self, list: Value) -> InstantlyResult<Value> {
        self.client
            .send(ApiRequest::post(["lead-lists"]).json(list), self.credential)
            .await
    }

    pub async fn update(&self, list_id: &str, changes: Value) -> InstantlyResult<Value> {
        self.client
            .send(
                ApiRequest::patch(["lead-lists", list_id]).json(changes),
                self.credential,
            )
            .await
    }

    /// Permanently delete a list.
    pub async fn delete(&self, list_id: &str) -> InstantlyResult<Value> {
        self.client
            .send(ApiRequest::delete(["lead-lists", list_id]), self.credential)
            .await
    }

    /// Email verification breakdown for the leads in a list.
    pub async fn verification_stats(&self, list_id: &str) -> InstantlyResult<Value> {
        self.client
            .send(
                ApiRequest::get(["lead-lists", list_id, "verification-stats"]),
                self.credential,
            )
            .await
    }
}
