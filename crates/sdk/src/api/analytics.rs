//! Analytics API endpoints.

use crate::client::InstantlyClient;
use crate::credentials::Credential;
use crate::error::InstantlyResult;
use crate::transport::ApiRequest;
use serde_json::Value;

/// Analytics API for campaign and warmup metrics.
pub struct AnalyticsApi<'a> {
    client: &'a InstantlyClient,
    credential: &'a Credential,
}

impl<'a> AnalyticsApi<'a> {
    pub(crate) fn new(client: &'a InstantlyClient, credential: &'a Credential) -> Self {
        Self { client, credential }
    }

    /// Campaign totals. `query` may carry `id` as an array, sent as
    /// repeated `id` parameters.
    pub async fn campaign(&self, query: &Value) -> InstantlyResult<Value> {
        self.client
            .send(
                ApiRequest::get(["campaigns", "analytics"]).query(query),
                self.credential,
            )
            .await
    }

    /// Day-by-day campaign metrics.
    pub async fn daily(&self, query: &Value) -> InstantlyResult<Value> {
        self.client
            .send(
                ApiRequest::get(["campaigns", "analytics", "daily"]).query(query),
                self.credential,
            )
            .await
    }

    /// Warmup metrics; `query` carries `emails` as an array.
    pub async fn warmup(&self, query: &Value) -> InstantlyResult<Value> {
        self.client
            .send(
                ApiRequest::get(["accounts", "warmup-analytics"]).query(query),
                self.credential,
            )
            .await
    }
}
