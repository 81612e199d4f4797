// Campaign tools

use crate::error::ToolError;
use crate::tools::catalog::ToolName;
use crate::tools::listing::{list_records, LIMIT, MAX_ITEMS, STARTING_AFTER};
use crate::tools::registry::{ToolContext, ToolHandler};
use crate::tools::schema::{ExtraFields, FieldSpec, ObjectSpec, ToolHints, ToolSpec, ValidatedArgs};
use chrono::NaiveTime;
use instantly_sdk::api::CampaignDraft;
use instantly_sdk::{ListEndpoint, ListParams};
use serde_json::{json, Value};
use tracing::debug;

/// Accounts inspected when looking for eligible senders.
const DISCOVERY_LIMIT: usize = 100;
/// Ineligible accounts explained in a `no_eligible_accounts` answer.
const REPORTED_ISSUES: usize = 10;

const CAMPAIGN_ID: FieldSpec = FieldSpec::string("campaign_id", "Campaign UUID").required();

pub static CREATE_CAMPAIGN: ToolSpec = ToolSpec {
    name: "create_campaign",
    description: "Create an email campaign in two steps. \
        Step 1: call with name, subject and body to discover eligible sender accounts. \
        Step 2: call again with email_list set to the senders to use. \
        Personalization: {{firstName}}, {{lastName}}, {{companyName}} and any custom lead variable. \
        Use sequence_steps for multi-step follow-up sequences.",
    args: ObjectSpec {
        fields: &[
            FieldSpec::string("name", "Campaign name").required(),
            FieldSpec::string("subject", "Subject (<50 chars recommended). Personalization: {{firstName}}, {{companyName}}")
                .max_len(100)
                .required(),
            FieldSpec::string("body", "Plain-text body; line breaks become HTML. Personalization: {{firstName}}, {{lastName}}, {{companyName}}")
                .required(),
            FieldSpec::string_list("email_list", "Sender emails from the step 1 eligible list. Omit to discover them."),
            FieldSpec::boolean("track_opens", "Track opens (default: false)"),
            FieldSpec::boolean("track_clicks", "Track link clicks (default: false)"),
            FieldSpec::string("timezone", "Schedule timezone (default: America/New_York). E.g. America/Chicago, Europe/London"),
            FieldSpec::string("timing_from", "Sending window start, 24h HH:MM (default: 09:00)"),
            FieldSpec::string("timing_to", "Sending window end, 24h HH:MM (default: 17:00)"),
            FieldSpec::integer("daily_limit", Some(1), Some(50), "Emails per day per account (default: 30, max 50)"),
            FieldSpec::integer("email_gap", Some(1), Some(1440), "Minutes between emails (default: 10)"),
            FieldSpec::boolean("stop_on_reply", "Stop the sequence when a lead replies (default: true)"),
            FieldSpec::boolean("stop_on_auto_reply", "Stop on auto-replies (default: true)"),
            FieldSpec::integer("sequence_steps", Some(1), Some(10), "Steps in the sequence (1-10, default: 1)"),
            FieldSpec::integer("step_delay_days", Some(1), Some(30), "Days between steps (1-30, default: 3)"),
            FieldSpec::string_list("sequence_subjects", "Custom subject per step"),
            FieldSpec::string_list("sequence_bodies", "Custom body per step"),
        ],
        rules: &[],
        extra: ExtraFields::Forbid,
    },
    hints: ToolHints::WRITE,
};

pub static LIST_CAMPAIGNS: ToolSpec = ToolSpec {
    name: "list_campaigns",
    description: "List campaigns with cursor pagination (100 per page by default). \
        search matches campaign NAME only; to filter by status use get_daily_campaign_analytics.",
    args: ObjectSpec {
        fields: &[
            LIMIT,
            STARTING_AFTER,
            MAX_ITEMS,
            FieldSpec::string("search", "Search by campaign name"),
            FieldSpec::string("tag_ids", "Comma-separated tag IDs"),
        ],
        rules: &[],
        extra: ExtraFields::Forbid,
    },
    hints: ToolHints::READ_ONLY,
};

pub static GET_CAMPAIGN: ToolSpec = ToolSpec {
    name: "get_campaign",
    description: "Get campaign details: sequences, schedule, sender accounts, tracking and status.",
    args: ObjectSpec {
        fields: &[CAMPAIGN_ID],
        rules: &[],
        extra: ExtraFields::Forbid,
    },
    hints: ToolHints::READ_ONLY,
};

pub static UPDATE_CAMPAIGN: ToolSpec = ToolSpec {
    name: "update_campaign",
    description: "Update campaign settings. Only the fields you send are changed.",
    args: ObjectSpec {
        fields: &[
            FieldSpec::string("campaign_id", "Campaign to update").required(),
            FieldSpec::string("name", "Campaign name"),
            FieldSpec::number("pl_value", "Pipeline value"),
            FieldSpec::boolean("is_evergreen", "Keep the campaign running as leads are added"),
            FieldSpec::object("campaign_schedule", None, "Schedule configuration with a 'schedules' array"),
            FieldSpec::object_list("sequences", None, None, None, "Email sequences with their steps"),
            FieldSpec::integer("email_gap", Some(1), Some(1440), "Minutes between emails"),
            FieldSpec::integer("random_wait_max", Some(0), None, "Maximum random extra wait in minutes"),
            FieldSpec::boolean("text_only", "Send plain text only"),
            FieldSpec::string_list("email_list", "Sender accounts"),
            FieldSpec::integer("daily_limit", Some(1), Some(50), "Emails per day per account"),
            FieldSpec::boolean("stop_on_reply", "Stop the sequence on reply"),
            FieldSpec::string_list("email_tag_list", "Sender account tag IDs"),
            FieldSpec::boolean("link_tracking", "Track link clicks"),
            FieldSpec::boolean("open_tracking", "Track opens"),
            FieldSpec::boolean("stop_on_auto_reply", "Stop on auto-replies"),
            FieldSpec::integer("daily_max_leads", Some(0), None, "Max new leads contacted per day"),
            FieldSpec::boolean("prioritize_new_leads", "Contact new leads before follow-ups"),
            FieldSpec::object("auto_variant_select", None, "Automatic A/B variant selection settings"),
            FieldSpec::boolean("match_lead_esp", "Match sender provider to the lead's provider"),
            FieldSpec::boolean("stop_for_company", "Stop for every lead of a company once one replies"),
            FieldSpec::boolean("insert_unsubscribe_header", "Insert a List-Unsubscribe header"),
            FieldSpec::boolean("allow_risky_contacts", "Allow risky contacts"),
            FieldSpec::boolean("disable_bounce_protect", "Disable bounce protection"),
            FieldSpec::string_list("cc_list", "CC addresses"),
            FieldSpec::string_list("bcc_list", "BCC addresses"),
        ],
        rules: &[],
        extra: ExtraFields::Forbid,
    },
    hints: ToolHints::IDEMPOTENT_WRITE,
};

pub static ACTIVATE_CAMPAIGN: ToolSpec = ToolSpec {
    name: "activate_campaign",
    description: "Start sending. The campaign needs sender accounts, at least one lead, \
        sequences and a schedule; check with get_campaign first.",
    args: ObjectSpec {
        fields: &[CAMPAIGN_ID],
        rules: &[],
        extra: ExtraFields::Forbid,
    },
    hints: ToolHints::IDEMPOTENT_WRITE,
};

pub static PAUSE_CAMPAIGN: ToolSpec = ToolSpec {
    name: "pause_campaign",
    description: "Stop sending immediately. Leads stay in the campaign; resume with activate_campaign.",
    args: ObjectSpec {
        fields: &[CAMPAIGN_ID],
        rules: &[],
        extra: ExtraFields::Forbid,
    },
    hints: ToolHints::IDEMPOTENT_WRITE,
};

/// Campaign management.
pub struct CampaignTools;

#[async_trait::async_trait]
impl ToolHandler for CampaignTools {
    fn tools(&self) -> &'static [ToolName] {
        &[
            ToolName::CreateCampaign,
            ToolName::ListCampaigns,
            ToolName::GetCampaign,
            ToolName::UpdateCampaign,
            ToolName::ActivateCampaign,
            ToolName::PauseCampaign,
        ]
    }

    async fn execute(
        &self,
        tool: ToolName,
        args: &ValidatedArgs,
        ctx: &ToolContext<'_>,
    ) -> Result<Value, ToolError> {
        match tool {
            ToolName::ListCampaigns => list_records(ctx, ListEndpoint::CAMPAIGNS, args).await,
            ToolName::CreateCampaign => create_campaign(args, ctx).await,
            _ => {
                let credential = ctx.credential()?;
                let campaigns = ctx.client().campaigns(&credential);
                let campaign_id = args.required_str("campaign_id")?;

                let result = match tool {
                    ToolName::GetCampaign => campaigns.get(campaign_id).await?,
                    ToolName::UpdateCampaign => {
                        campaigns
                            .update(campaign_id, args.body_without(&["campaign_id"]))
                            .await?
                    }
                    ToolName::ActivateCampaign => campaigns.activate(campaign_id).await?,
                    ToolName::PauseCampaign => campaigns.pause(campaign_id).await?,
                    other => return Err(ToolError::UnknownTool(other.to_string())),
                };
                Ok(result)
            }
        }
    }
}

async fn create_campaign(args: &ValidatedArgs, ctx: &ToolContext<'_>) -> Result<Value, ToolError> {
    let credential = ctx.credential()?;
    let email_list = args.strings("email_list").unwrap_or_default();

    if email_list.is_empty() {
        let accounts = ctx
            .client()
            .accounts(&credential)
            .paginate(ListParams::new())
            .max_items(DISCOVERY_LIMIT)
            .collect()
            .await?;
        debug!(accounts = accounts.items.len(), "Discovering campaign senders");
        return Ok(sender_discovery(&accounts.items));
    }

    let payload = campaign_draft(args, email_list)?.to_payload();
    let mut result = ctx
        .client()
        .campaigns(&credential)
        .create(payload.clone())
        .await?;

    if let Value::Object(map) = &mut result {
        map.insert("_success".to_string(), json!(true));
        map.insert("_payload_used".to_string(), payload);
        map.insert(
            "_message".to_string(),
            json!("Campaign created successfully with API v2 compliant payload"),
        );
    }

    Ok(result)
}

fn campaign_draft(args: &ValidatedArgs, email_list: Vec<String>) -> Result<CampaignDraft, ToolError> {
    let mut draft = CampaignDraft::new(
        args.required_str("name")?,
        args.required_str("subject")?,
        args.required_str("body")?,
    );
    draft.email_list = email_list;

    if let Some(track) = args.bool("track_opens") {
        draft.track_opens = track;
    }
    if let Some(track) = args.bool("track_clicks") {
        draft.track_clicks = track;
    }
    if let Some(timezone) = args.str("timezone") {
        draft.timezone = timezone.to_string();
    }
    if let Some(from) = args.str("timing_from") {
        draft.timing_from = clock_time("timing_from", from)?;
    }
    if let Some(to) = args.str("timing_to") {
        draft.timing_to = clock_time("timing_to", to)?;
    }
    if let Some(limit) = u32_arg(args, "daily_limit") {
        draft.daily_limit = limit;
    }
    if let Some(gap) = u32_arg(args, "email_gap") {
        draft.email_gap = gap;
    }
    if let Some(stop) = args.bool("stop_on_reply") {
        draft.stop_on_reply = stop;
    }
    if let Some(stop) = args.bool("stop_on_auto_reply") {
        draft.stop_on_auto_reply = stop;
    }
    if let Some(steps) = u32_arg(args, "sequence_steps") {
        draft.sequence_steps = steps;
    }
    if let Some(delay) = u32_arg(args, "step_delay_days") {
        draft.step_delay_days = delay;
    }
    draft.sequence_subjects = args.strings("sequence_subjects").unwrap_or_default();
    draft.sequence_bodies = args.strings("sequence_bodies").unwrap_or_default();

    Ok(draft)
}

fn u32_arg(args: &ValidatedArgs, name: &str) -> Option<u32> {
    args.i64(name).and_then(|value| u32::try_from(value).ok())
}

/// Normalise a 24h `H:MM` or `HH:MM` time to `HH:MM`.
fn clock_time(field: &str, value: &str) -> Result<String, ToolError> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map(|time| time.format("%H:%M").to_string())
        .map_err(|_| ToolError::validation(field, format!("'{}' is not a 24h HH:MM time", value)))
}

/// Step 1 answer: which accounts can send, or why none can.
fn sender_discovery(accounts: &[Value]) -> Value {
    if accounts.is_empty() {
        return json!({
            "success": false,
            "stage": "no_accounts",
            "message": "No accounts found in your workspace.",
            "instructions": [
                "1. Go to your Instantly.ai dashboard",
                "2. Navigate to the Accounts section",
                "3. Add and verify email accounts",
                "4. Complete warmup for each account",
                "5. Then retry campaign creation"
            ]
        });
    }

    let eligible: Vec<Value> = accounts
        .iter()
        .filter(|account| is_eligible(account))
        .map(|account| {
            json!({
                "email": account["email"],
                "warmup_score": account.get("warmup_score").cloned().unwrap_or(json!(0)),
                "status": "ready"
            })
        })
        .collect();

    if eligible.is_empty() {
        let account_issues: Vec<Value> = accounts
            .iter()
            .take(REPORTED_ISSUES)
            .map(|account| json!({ "email": account["email"], "issues": account_issues(account) }))
            .collect();

        return json!({
            "success": false,
            "stage": "no_eligible_accounts",
            "message": "No eligible sender accounts found for campaign creation.",
            "total_accounts": accounts.len(),
            "account_issues": account_issues,
            "requirements": [
                "Account must be active (status = 1)",
                "Setup must be complete (no pending setup)",
                "Warmup must be complete (warmup_status = 1)"
            ]
        });
    }

    let first = eligible[0]["email"].as_str().unwrap_or("email@domain.com");
    let example: Vec<Value> = eligible
        .iter()
        .take(3)
        .map(|account| account["email"].clone())
        .collect();

    json!({
        "success": false,
        "stage": "account_selection_required",
        "message": "Eligible sender accounts found",
        "total_eligible_accounts": eligible.len(),
        "total_accounts": accounts.len(),
        "instructions": format!(
            "Found {} eligible sender accounts. Call create_campaign again with email_list set to the senders you want to use. Example: email_list=[\"{}\"]",
            eligible.len(),
            first
        ),
        "eligible_accounts": eligible,
        "required_action": {
            "step": "select_sender_accounts",
            "parameter": "email_list",
            "example": example
        }
    })
}

fn is_eligible(account: &Value) -> bool {
    account_issues(account).is_empty()
}

fn account_issues(account: &Value) -> Vec<&'static str> {
    let mut issues = Vec::new();
    if account["status"].as_i64() != Some(1) {
        issues.push("Account not active");
    }
    if truthy(&account["setup_pending"]) {
        issues.push("Setup pending");
    }
    if account["warmup_status"].as_i64() != Some(1) {
        issues.push("Warmup not complete");
    }
    issues
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
