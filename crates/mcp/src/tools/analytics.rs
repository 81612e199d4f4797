// Analytics tools

use crate::error::ToolError;
use crate::tools::catalog::ToolName;
use crate::tools::registry::{ToolContext, ToolHandler};
use crate::tools::schema::{
    ExtraFields, FieldGroup, FieldSpec, ObjectSpec, ToolHints, ToolSpec, ValidatedArgs,
};
use serde_json::{Map, Value};

const START_DATE: FieldSpec = FieldSpec::date("start_date", "YYYY-MM-DD");
const END_DATE: FieldSpec = FieldSpec::date("end_date", "YYYY-MM-DD");

pub static GET_CAMPAIGN_ANALYTICS: ToolSpec = ToolSpec {
    name: "get_campaign_analytics",
    description: "Campaign metrics: sent, opens, clicks, replies, bounces, unsubscribes. \
        Omit campaign_id and campaign_ids for all campaigns. \
        Set exclude_total_leads_count=true for a faster response.",
    args: ObjectSpec {
        fields: &[
            FieldSpec::string("campaign_id", "Single campaign UUID"),
            FieldSpec::string_list("campaign_ids", "Multiple campaign UUIDs"),
            START_DATE,
            END_DATE,
            FieldSpec::boolean("exclude_total_leads_count", "Skip the total leads count"),
        ],
        rules: &[],
        extra: ExtraFields::Ignore,
    },
    hints: ToolHints::READ_ONLY,
};

pub static GET_DAILY_CAMPAIGN_ANALYTICS: ToolSpec = ToolSpec {
    name: "get_daily_campaign_analytics",
    description: "Day-by-day campaign performance: sent, opens, clicks, replies and bounces per day.",
    args: ObjectSpec {
        fields: &[
            FieldSpec::string("campaign_id", "Campaign UUID (omit for all)"),
            START_DATE,
            END_DATE,
            FieldSpec::int_one_of(
                "campaign_status",
                &[0, 1, 2, 3, 4, -99, -1, -2],
                "0=Draft, 1=Active, 2=Paused, 3=Completed, 4=Scheduled, -99=All, -1=Error, -2=Deleted",
            ),
        ],
        rules: &[],
        extra: ExtraFields::Ignore,
    },
    hints: ToolHints::READ_ONLY,
};

pub static GET_WARMUP_ANALYTICS: ToolSpec = ToolSpec {
    name: "get_warmup_analytics",
    description: "Warmup metrics for sending accounts: warmup emails sent and received, \
        inbox placement, spam rate and daily progress.",
    args: ObjectSpec {
        fields: &[
            FieldSpec::string_list("emails", "Account emails").list_bounds(Some(1), None),
            FieldSpec::string("email", "Single account email"),
            START_DATE,
            END_DATE,
        ],
        rules: &[FieldGroup::ExactlyOneOf(&["emails", "email"])],
        extra: ExtraFields::Ignore,
    },
    hints: ToolHints::READ_ONLY,
};

/// Read-only reporting over campaigns and warmup.
pub struct AnalyticsTools;

#[async_trait::async_trait]
impl ToolHandler for AnalyticsTools {
    fn tools(&self) -> &'static [ToolName] {
        &[
            ToolName::GetCampaignAnalytics,
            ToolName::GetDailyCampaignAnalytics,
            ToolName::GetWarmupAnalytics,
        ]
    }

    async fn execute(
        &self,
        tool: ToolName,
        args: &ValidatedArgs,
        ctx: &ToolContext<'_>,
    ) -> Result<Value, ToolError> {
        check_date_range(args)?;

        let credential = ctx.credential()?;
        let analytics = ctx.client().analytics(&credential);

        let result = match tool {
            ToolName::GetCampaignAnalytics => analytics.campaign(&campaign_query(args)).await?,
            ToolName::GetDailyCampaignAnalytics => {
                analytics.daily(&args.body_without(&[])).await?
            }
            ToolName::GetWarmupAnalytics => analytics.warmup(&warmup_query(args)).await?,
            other => return Err(ToolError::UnknownTool(other.to_string())),
        };

        Ok(result)
    }
}

fn check_date_range(args: &ValidatedArgs) -> Result<(), ToolError> {
    // Dates are validated as YYYY-MM-DD, so string order is date order.
    match (args.str("start_date"), args.str("end_date")) {
        (Some(start), Some(end)) if end < start => Err(ToolError::validation(
            "end_date",
            format!("{} is before start_date {}", end, start),
        )),
        _ => Ok(()),
    }
}

/// Single and multiple campaign ids are merged into a repeated `id` parameter.
fn campaign_query(args: &ValidatedArgs) -> Value {
    let mut ids: Vec<String> = args.str("campaign_id").map(str::to_string).into_iter().collect();
    ids.extend(args.strings("campaign_ids").unwrap_or_default());

    let mut query = date_query(args);
    if !ids.is_empty() {
        query.insert("id".to_string(), ids.into());
    }
    if let Some(exclude) = args.bool("exclude_total_leads_count") {
        query.insert("exclude_total_leads_count".to_string(), exclude.into());
    }
    Value::Object(query)
}

fn warmup_query(args: &ValidatedArgs) -> Value {
    let emails = args
        .strings("emails")
        .or_else(|| args.str("email").map(|email| vec![email.to_string()]))
        .unwrap_or_default();

    let mut query = date_query(args);
    query.insert("emails".to_string(), emails.into());
    Value::Object(query)
}

fn date_query(args: &ValidatedArgs) -> Map<String, Value> {
    ["start_date", "end_date"]
        .into_iter()
        .filter_map(|key| args.get(key).map(|value| (key.to_string(), value.clone())))
        .collect()
}
