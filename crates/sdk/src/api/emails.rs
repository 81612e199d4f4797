//! Emails (Unibox) and email verification endpoints.

use crate::client::InstantlyClient;
use crate::credentials::Credential;
use crate::error::InstantlyResult;
use crate::pagination::{ListEndpoint, ListParams, Paginator};
use crate::transport::ApiRequest;
use instantly_core::Page;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Emails API.
pub struct EmailsApi<'a> {
    client: &'a InstantlyClient,
    credential: &'a Credential,
}

impl<'a> EmailsApi<'a> {
    pub(crate) fn new(client: &'a InstantlyClient, credential: &'a Credential) -> Self {
        Self { client, credential }
    }

    pub async fn list(&self, params: &ListParams) -> InstantlyResult<Page> {
        self.client
            .list_page(ListEndpoint::EMAILS, params, self.credential)
            .await
    }

    pub fn paginate(&self, params: ListParams) -> Paginator {
        self.client
            .paginate(ListEndpoint::EMAILS, params, self.credential)
    }

    pub async fn get(&self, email_id: &str) -> InstantlyResult<Value> {
        self.client
            .send(ApiRequest::get(["emails", email_id]), self.credential)
            .await
    }

    /// Send a reply. This delivers real mail.
    pub async fn reply(&self, request: &ReplyRequest) -> InstantlyResult<Value> {
        self.client
            .send(
                ApiRequest::post(["emails", "reply"]).json(serde_json::to_value(request)?),
                self.credential,
            )
            .await
    }

    pub async fn unread_count(&self) -> InstantlyResult<Value> {
        self.client
            .send(ApiRequest::get(["emails", "unread", "count"]), self.credential)
            .await
    }

    pub async fn mark_thread_read(&self, thread_id: &str) -> InstantlyResult<Value> {
        self.client
            .send(
                ApiRequest::post(["emails", "threads", thread_id, "mark-as-read"]),
                self.credential,
            )
            .await
    }

    /// Start a deliverability check. Slow checks come back with
    /// `verification_status: "pending"`.
    pub async fn start_verification(&self, email: &str) -> InstantlyResult<Value> {
        self.client
            .send(
                ApiRequest::post(["email-verification"]).json(json!({ "email": email })),
                self.credential,
            )
            .await
    }

    pub async fn verification_status(&self, email: &str) -> InstantlyResult<Value> {
        self.client
            .send(ApiRequest::get(["email-verification", email]), self.credential)
            .await
    }
}

/// Body of a reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplyRequest {
    pub reply_to_uuid: String,
    /// Sending account; must be active.
    pub eaccount: String,
    pub subject: String,
    pub body: ReplyBody,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplyBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}
