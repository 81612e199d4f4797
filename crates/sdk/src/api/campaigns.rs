//! Campaigns API endpoints.

use crate::client::InstantlyClient;
use crate::credentials::Credential;
use crate::error::InstantlyResult;
use crate::pagination::{ListEndpoint, ListParams, Paginator};
use crate::transport::ApiRequest;
use instantly_core::Page;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Timezone used when a draft names none.
pub const DEFAULT_TIMEZONE: &str = "America/New_York";

/// Campaigns API for managing email campaigns.
pub struct CampaignsApi<'a> {
    client: &'a InstantlyClient,
    credential: &'a Credential,
}

impl<'a> CampaignsApi<'a> {
    pub(crate) fn new(client: &'a InstantlyClient, credential: &'a Credential) -> Self {
        Self { client, credential }
    }

    /// List one page of campaigns.
    pub async fn list(&self, params: &ListParams) -> InstantlyResult<Page> {
        self.client
            .list_page(ListEndpoint::CAMPAIGNS, params, self.credential)
            .await
    }

    pub fn paginate(&self, params: ListParams) -> Paginator {
        self.client
            .paginate(ListEndpoint::CAMPAIGNS, params, self.credential)
    }

    /// Create a campaign from a raw payload.
    pub async fn create(&self, payload: Value) -> InstantlyResult<Value> {
        self.client
            .send(ApiRequest::post(["campaigns"]).json(payload), self.credential)
            .await
    }

    /// Get a specific campaign.
    pub async fn get(&self, campaign_id: &str) -> InstantlyResult<Value> {
        self.client
            .send(ApiRequest::get(["campaigns", campaign_id]), self.credential)
            .await
    }

    /// Partially update a campaign.
    pub async fn update(&self, campaign_id: &str, changes: Value) -> InstantlyResult<Value> {
        self.client
            .send(
                ApiRequest::patch(["campaigns", campaign_id]).json(changes),
                self.credential,
            )
            .await
    }

    /// Start sending.
    pub async fn activate(&self, campaign_id: &str) -> InstantlyResult<Value> {
        self.client
            .send(
                ApiRequest::post(["campaigns", campaign_id, "activate"]),
                self.credential,
            )
            .await
    }

    /// Stop sending. Leads stay in the campaign.
    pub async fn pause(&self, campaign_id: &str) -> InstantlyResult<Value> {
        self.client
            .send(
                ApiRequest::post(["campaigns", campaign_id, "pause"]),
                self.credential,
            )
            .await
    }
}

/// Everything needed to build a campaign creation payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignDraft {
    pub name: String,
    pub subject: String,
    /// Plain-text body. Converted to HTML in the payload.
    pub body: String,
    pub email_list: Vec<String>,
    pub track_opens: bool,
    pub track_clicks: bool,
    pub timezone: String,
    pub timing_from: String,
    pub timing_to: String,
    pub daily_limit: u32,
    /// Minutes between emails.
    pub email_gap: u32,
    pub stop_on_reply: bool,
    pub stop_on_auto_reply: bool,
    pub sequence_steps: u32,
    pub step_delay_days: u32,
    /// Per-step overrides; missing entries fall back to generated follow-ups.
    pub sequence_subjects: Vec<String>,
    pub sequence_bodies: Vec<String>,
}

impl Default for CampaignDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            subject: String::new(),
            body: String::new(),
            email_list: Vec::new(),
            track_opens: false,
            track_clicks: false,
            timezone: DEFAULT_TIMEZONE.to_string(),
            timing_from: "09:00".to_string(),
            timing_to: "17:00".to_string(),
            daily_limit: 30,
            email_gap: 10,
            stop_on_reply: true,
            stop_on_auto_reply: true,
            sequence_steps: 1,
            step_delay_days: 3,
            sequence_subjects: Vec::new(),
            sequence_bodies: Vec::new(),
        }
    }
}

impl CampaignDraft {
    pub fn new(name: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            subject: subject.into(),
            body: body.into(),
            ..Self::default()
        }
    }

    /// Build the v2 campaign payload.
    ///
    /// Every step is `type: "email"` with its subject and body wrapped in a
    /// single variant. Delays are in days. The schedule is named and keys its
    /// days `"0"` (Sunday) through `"6"`.
    pub fn to_payload(&self) -> Value {
        let step_count = self.sequence_steps.max(1) as usize;
        let steps: Vec<Value> = (0..step_count)
            .map(|i| {
                let subject = match self.sequence_subjects.get(i) {
                    Some(subject) => subject.clone(),
                    None if i == 0 => self.subject.clone(),
                    None => format!("Follow-up: {}", self.subject),
                };
                let body = match self.sequence_bodies.get(i) {
                    Some(body) => body.clone(),
                    None if i == 0 => self.body.clone(),
                    None => format!("This is follow-up #{}.\n\n{}", i, self.body),
                };
                let delay = if step_count > 1 || i > 0 {
                    self.step_delay_days
                } else {
                    0
                };

                json!({
                    "type": "email",
                    "delay": delay,
                    "variants": [{
                        "subject": single_line(&subject),
                        "body": convert_line_breaks_to_html(&body),
                    }],
                })
            })
            .collect();

        let mut payload = json!({
            "name": self.name,
            "sequences": [{ "steps": steps }],
            "open_tracking": self.track_opens,
            "link_tracking": self.track_clicks,
            "campaign_schedule": {
                "schedules": [{
                    "name": "Default Schedule",
                    "timezone": self.timezone,
                    "timing": { "from": self.timing_from, "to": self.timing_to },
                    "days": {
                        "0": false,
                        "1": true,
                        "2": true,
                        "3": true,
                        "4": true,
                        "5": true,
                        "6": false,
                    },
                }],
            },
            "daily_limit": self.daily_limit,
            "email_gap": self.email_gap,
            "stop_on_reply": self.stop_on_reply,
            "stop_on_auto_reply": self.stop_on_auto_reply,
        });
        if !self.email_list.is_empty() {
            payload["email_list"] = json!(self.email_list);
        }
        payload
    }
}

/// Turn plain text into the HTML Instantly renders.
///
/// Blank-line separated blocks become `<p>` paragraphs and single line
/// breaks become `<br />`. Any line-ending style is accepted.
pub fn convert_line_breaks_to_html(text: &str) -> String {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");

    normalized
        .split("\n\n")
        .map(str::trim)
        .filter(|paragraph| !paragraph.is_empty())
        .map(|paragraph| format!("<p>{}</p>", paragraph.replace('\n', "<br />")))
        .collect()
}

fn single_line(text: &str) -> String {
    text.split(['\r', '\n'])
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_line_breaks_to_html() {
        assert_eq!(
            convert_line_breaks_to_html("Hi {{firstName}},\n\nQuick question.\nStill there?"),
            "<p>Hi {{firstName}},</p><p>Quick question.<br />Still there?</p>"
        );
        assert_eq!(convert_line_breaks_to_html("a\r\n\r\nb\rc"), "<p>a</p><p>b<br />c</p>");
        assert_eq!(convert_line_breaks_to_html("\n\n  \n\n"), "");
    }

    #[test]
    fn test_single_step_payload() {
        let mut draft = CampaignDraft::new("Launch", "Hello\nthere", "Body text");
        draft.email_list = vec!["sender@example.com".to_string()];

        let payload = draft.to_payload();
        let steps = payload["sequences"][0]["steps"].as_array().unwrap();

        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0]["type"], "email");
        assert_eq!(steps[0]["delay"], 0);
        assert_eq!(steps[0]["variants"][0]["subject"], "Hello there");
        assert_eq!(steps[0]["variants"][0]["body"], "<p>Body text</p>");
        assert_eq!(payload["email_list"][0], "sender@example.com");
        assert_eq!(payload["daily_limit"], 30);
        assert_eq!(payload["email_gap"], 10);
        assert_eq!(payload["open_tracking"], false);
    }

    #[test]
    fn test_schedule_defaults() {
        let payload = CampaignDraft::new("Launch", "Hi", "Body").to_payload();
        let schedule = &payload["campaign_schedule"]["schedules"][0];

        assert_eq!(schedule["name"], "Default Schedule");
        assert_eq!(schedule["timezone"], DEFAULT_TIMEZONE);
        assert_eq!(schedule["timing"]["from"], "09:00");
        assert_eq!(schedule["timing"]["to"], "17:00");
        assert_eq!(schedule["days"]["0"], false);
        assert_eq!(schedule["days"]["1"], true);
        assert_eq!(schedule["days"]["5"], true);
        assert_eq!(schedule["days"]["6"], false);
        assert!(payload.get("email_list").is_none());
    }

    #[test]
    fn test_multi_step_sequence() {
        let mut draft = CampaignDraft::new("Launch", "Intro", "First touch");
        draft.sequence_steps = 3;
        draft.step_delay_days = 4;
        draft.sequence_subjects = vec!["Custom intro".to_string()];

        let payload = draft.to_payload();
        let steps = payload["sequences"][0]["steps"].as_array().unwrap();

        assert_eq!(steps.len(), 3);
        assert!(steps.iter().all(|step| step["delay"] == 4));
        assert_eq!(steps[0]["variants"][0]["subject"], "Custom intro");
        assert_eq!(steps[1]["variants"][0]["subject"], "Follow-up: Intro");
        assert_eq!(
            steps[2]["variants"][0]["body"],
            "<p>This is follow-up #2.</p><p>First touch</p>"
        );
    }
}
