//! Accounts API endpoints.

use crate::client::InstantlyClient;
use crate::credentials::Credential;
use crate::error::InstantlyResult;
use crate::pagination::{ListEndpoint, ListParams, Paginator};
use crate::transport::ApiRequest;
use instantly_core::Page;
use serde_json::{json, Value};

/// Accounts API for managing sender mailboxes.
///
/// Accounts are addressed by their email address.
pub struct AccountsApi<'a> {
    client: &'a InstantlyClient,
    credential: &'a Credential,
}

impl<'a> AccountsApi<'a> {
    pub(crate) fn new(client: &'a InstantlyClient, credential: &'a Credential) -> Self {
        Self { client, credential }
    }

    /// List one page of accounts.
    pub async fn list(&self, params: &ListParams) -> InstantlyResult<Page> {
        self.client
            .list_page(ListEndpoint::ACCOUNTS, params, self.credential)
            .await
    }

    /// Walk every account matching `params`.
    pub fn paginate(&self, params: ListParams) -> Paginator {
        self.client
            .paginate(ListEndpoint::ACCOUNTS, params, self.credential)
    }

    /// Get a specific account.
    pub async fn get(&self, email: &str) -> InstantlyResult<Value> {
        self.client
            .send(ApiRequest::get(["accounts", email]), self.credential)
            .await
    }

    /// Connect a new account with IMAP/SMTP credentials.
    pub async fn create(&self, account: Value) -> InstantlyResult<Value> {
        self.client
            .send(ApiRequest::post(["accounts"]).json(account), self.credential)
            .await
    }

    /// Partially update an account.
    pub async fn update(&self, email: &str, changes: Value) -> InstantlyResult<Value> {
        self.client
            .send(
                ApiRequest::patch(["accounts", email]).json(changes),
                self.credential,
            )
            .await
    }

    /// Stop all sending from an account.
    pub async fn pause(&self, email: &str) -> InstantlyResult<Value> {
        self.client
            .send(ApiRequest::post(["accounts", email, "pause"]), self.credential)
            .await
    }

    /// Re-enable sending from an account.
    pub async fn resume(&self, email: &str) -> InstantlyResult<Value> {
        self.client
            .send(ApiRequest::post(["accounts", email, "resume"]), self.credential)
            .await
    }

    /// Enable or disable warmup for a set of accounts.
    pub async fn set_warmup(&self, emails: &[String], enabled: bool) -> InstantlyResult<Value> {
        let action = if enabled { "enable" } else { "disable" };
        self.client
            .send(
                ApiRequest::post(["accounts", "warmup", action]).json(json!({ "emails": emails })),
                self.credential,
            )
            .await
    }

    /// Test IMAP/SMTP connectivity.
    pub async fn test_vitals(&self, emails: &[String]) -> InstantlyResult<Value> {
        self.client
            .send(
                ApiRequest::post(["accounts", "test", "vitals"]).json(json!({ "emails": emails })),
                self.credential,
            )
            .await
    }

    /// Permanently delete an account.
    pub async fn delete(&self, email: &str) -> InstantlyResult<Value> {
        self.client
            .send(ApiRequest::delete(["accounts", email]), self.credential)
            .await
    }
}
