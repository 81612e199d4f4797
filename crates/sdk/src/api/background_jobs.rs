//! Background jobs API endpoints.

use crate::client::InstantlyClient;
use crate::credentials::Credential;
use crate::error::InstantlyResult;
use crate::pagination::{ListEndpoint, ListParams, Paginator};
use crate::transport::ApiRequest;
use instantly_core::Page;
use serde_json::Value;

/// Background jobs track bulk imports, lead moves and enrichment runs.
pub struct BackgroundJobsApi<'a> {
    client: &'a InstantlyClient,
    credential: &'a Credential,
}

impl<'a> BackgroundJobsApi<'a> {
    pub(crate) fn new(client: &'a InstantlyClient, credential: &'a Credential) -> Self {
        Self { client, credential }
    }

    pub async fn list(&self, params: &ListParams) -> InstantlyResult<Page> {
        self.client
            .list_page(ListEndpoint::BACKGROUND_JOBS, params, self.credential)
            .await
    }

    pub fn paginate(&self, params: ListParams) -> Paginator {
        self.client
            .paginate(ListEndpoint::BACKGROUND_JOBS, params, self.credential)
    }

    pub async fn get(&self, job_id: &str) -> InstantlyResult<Value> {
        self.client
            .send(ApiRequest::get(["background-jobs", job_id]), self.credential)
            .await
    }
}
