// Lead tools

use crate::error::ToolError;
use crate::tools::accounts::merge_into;
use crate::tools::catalog::ToolName;
use crate::tools::listing::{list_records, LIMIT, MAX_ITEMS, STARTING_AFTER};
use crate::tools::registry::{ToolContext, ToolHandler};
use crate::tools::schema::{
    ExtraFields, FieldGroup, FieldSpec, ObjectSpec, ToolHints, ToolSpec, ValidatedArgs,
};
use instantly_sdk::ListEndpoint;
use serde_json::{json, Value};

/// Contact-status filters accepted by lead search and move.
pub const LEAD_FILTERS: &[&str] = &[
    "FILTER_VAL_CONTACTED",
    "FILTER_VAL_NOT_CONTACTED",
    "FILTER_VAL_COMPLETED",
    "FILTER_VAL_UNSUBSCRIBED",
    "FILTER_VAL_ACTIVE",
    "FILTER_VAL_BOUNCED",
    "FILTER_LEAD_INTERESTED",
    "FILTER_LEAD_NOT_INTERESTED",
    "FILTER_LEAD_MEETING_BOOKED",
    "FILTER_LEAD_MEETING_COMPLETED",
    "FILTER_LEAD_CLOSED",
    "FILTER_LEAD_OUT_OF_OFFICE",
    "FILTER_LEAD_WRONG_PERSON",
    "FILTER_LEAD_LOST",
    "FILTER_LEAD_NO_SHOW",
    "FILTER_LEAD_CUSTOM_LABEL_POSITIVE",
    "FILTER_LEAD_CUSTOM_LABEL_NEGATIVE",
];

const LEAD_ID: FieldSpec = FieldSpec::string("lead_id", "Lead UUID").required();
const INTEREST_STATUS: FieldSpec = FieldSpec::integer(
    "lt_interest_status",
    Some(-3),
    Some(4),
    "Interest status (-3 to 4)",
);

static LEAD_DATA: ObjectSpec = ObjectSpec {
    fields: &[
        FieldSpec::string("email", "Lead email").required(),
        FieldSpec::string("first_name", "First name"),
        FieldSpec::string("last_name", "Last name"),
        FieldSpec::string("company_name", "Company name"),
        FieldSpec::string("phone", "Phone number"),
        FieldSpec::string("website", "Website"),
        FieldSpec::string("personalization", "Personalization line"),
        INTEREST_STATUS,
        FieldSpec::string("pl_value_lead", "Pipeline value"),
        FieldSpec::string("assigned_to", "User UUID"),
        FieldSpec::object("custom_variables", None, "Values keyed by campaign field name"),
    ],
    rules: &[],
    extra: ExtraFields::Ignore,
};

pub static LIST_LEADS: ToolSpec = ToolSpec {
    name: "list_leads",
    description: "List leads with cursor pagination (100 per page by default). \
        If next_cursor is set there are more results: call again with starting_after=<next_cursor>. \
        Use distinct_contacts=true to deduplicate by email.",
    args: ObjectSpec {
        fields: &[
            LIMIT,
            STARTING_AFTER,
            MAX_ITEMS,
            FieldSpec::string("campaign", "Campaign UUID"),
            FieldSpec::string("list_id", "List UUID"),
            FieldSpec::string_list("list_ids", "Several list UUIDs"),
            FieldSpec::string("status", "Lead status"),
            FieldSpec::date("created_after", "Only leads created after this day (YYYY-MM-DD)"),
            FieldSpec::date("created_before", "Only leads created before this day (YYYY-MM-DD)"),
            FieldSpec::string("search", "Name or email"),
            FieldSpec::one_of("filter", LEAD_FILTERS, "Contact status filter"),
            FieldSpec::boolean("distinct_contacts", "Deduplicate by email"),
        ],
        rules: &[],
        extra: ExtraFields::Ignore,
    },
    hints: ToolHints::READ_ONLY,
};

pub static GET_LEAD: ToolSpec = ToolSpec {
    name: "get_lead",
    description: "Get lead details: contact data, custom variables, campaign and list membership, \
        sequence status and interest status.",
    args: ObjectSpec {
        fields: &[LEAD_ID],
        rules: &[],
        extra: ExtraFields::Ignore,
    },
    hints: ToolHints::READ_ONLY,
};

pub static CREATE_LEAD: ToolSpec = ToolSpec {
    name: "create_lead",
    description: "Create one lead. Use skip_if_in_campaign=true to avoid duplicates. \
        custom_variables keys must match the campaign's field names. \
        For 10+ leads use add_leads_to_campaign_or_list_bulk.",
    args: ObjectSpec {
        fields: &[
            FieldSpec::string("email", "Lead email address").required(),
            FieldSpec::string("campaign", "Campaign UUID"),
            FieldSpec::string("first_name", "First name"),
            FieldSpec::string("last_name", "Last name"),
            FieldSpec::string("company_name", "Company name"),
            FieldSpec::string("phone", "Phone number"),
            FieldSpec::string("website", "Website"),
            FieldSpec::string("personalization", "Personalization line"),
            INTEREST_STATUS,
            FieldSpec::string("pl_value_lead", "Pipeline value"),
            FieldSpec::string("list_id", "List UUID"),
            FieldSpec::string("assigned_to", "User UUID"),
            FieldSpec::boolean("skip_if_in_workspace", "Skip if the email exists anywhere in the workspace"),
            FieldSpec::boolean("skip_if_in_campaign", "Skip if already in a campaign (recommended)"),
            FieldSpec::boolean("skip_if_in_list", "Skip if already in a list"),
            FieldSpec::string("blocklist_id", "Blocklist UUID"),
            FieldSpec::boolean("verify_leads_on_import", "Verify the email on import"),
            FieldSpec::object("custom_variables", None, "Values keyed by campaign field name"),
        ],
        rules: &[],
        extra: ExtraFields::Ignore,
    },
    hints: ToolHints::WRITE,
};

pub static UPDATE_LEAD: ToolSpec = ToolSpec {
    name: "update_lead",
    description: "Update a lead. Only the fields you send are changed, except custom_variables, \
        which replaces the whole object: include existing values you want to keep.",
    args: ObjectSpec {
        fields: &[
            LEAD_ID,
            FieldSpec::string("personalization", "Personalization line"),
            FieldSpec::string("website", "Website"),
            FieldSpec::string("last_name", "Last name"),
            FieldSpec::string("first_name", "First name"),
            FieldSpec::string("company_name", "Company name"),
            FieldSpec::string("phone", "Phone number"),
            INTEREST_STATUS,
            FieldSpec::string("pl_value_lead", "Pipeline value"),
            FieldSpec::string("assigned_to", "User UUID"),
            FieldSpec::object("custom_variables", None, "Values keyed by campaign field name")
                .replaces_whole_value(),
        ],
        rules: &[],
        extra: ExtraFields::Ignore,
    },
    hints: ToolHints::IDEMPOTENT_WRITE,
};

pub static DELETE_LEAD: ToolSpec = ToolSpec {
    name: "delete_lead",
    description: "PERMANENTLY delete a lead with its history from every campaign and list. Cannot be undone. \
        Ask the user first, then call with confirm: true.",
    args: ObjectSpec {
        fields: &[FieldSpec::string("lead_id", "Lead UUID to delete permanently").required()],
        rules: &[],
        extra: ExtraFields::Ignore,
    },
    hints: ToolHints::DESTRUCTIVE,
};

pub static ADD_LEADS_BULK: ToolSpec = ToolSpec {
    name: "add_leads_to_campaign_or_list_bulk",
    description: "Add 1-1000 leads at once, 10-100x faster than create_lead. \
        Each lead needs at least an email. Use skip_if_in_campaign=true to avoid duplicates.",
    args: ObjectSpec {
        fields: &[
            FieldSpec::object_list("leads", Some(&LEAD_DATA), Some(1), Some(1000), "1-1000 leads").required(),
            FieldSpec::string("campaign_id", "Target campaign (or list_id)"),
            FieldSpec::string("list_id", "Target list (or campaign_id)"),
            FieldSpec::string("blocklist_id", "Blocklist UUID"),
            FieldSpec::string("assigned_to", "User UUID"),
            FieldSpec::boolean("verify_leads_on_import", "Verify emails on import"),
            FieldSpec::boolean("skip_if_in_workspace", "Skip emails already in the workspace"),
            FieldSpec::boolean("skip_if_in_campaign", "Skip emails already in a campaign (recommended)"),
            FieldSpec::boolean("skip_if_in_list", "Skip emails already in a list"),
        ],
        rules: &[FieldGroup::ExactlyOneOf(&["campaign_id", "list_id"])],
        extra: ExtraFields::Ignore,
    },
    hints: ToolHints::WRITE,
};

pub static MOVE_LEADS: ToolSpec = ToolSpec {
    name: "move_leads_to_campaign_or_list",
    description: "Move or copy leads between campaigns and lists. Large moves run as a background job. \
        Select the source with ids, or with search/filter plus campaign or list_id. \
        Set copy_leads=true to copy instead of move.",
    args: ObjectSpec {
        fields: &[
            FieldSpec::string("to_campaign_id", "Destination campaign (or to_list_id)"),
            FieldSpec::string("to_list_id", "Destination list (or to_campaign_id)"),
            FieldSpec::string_list("ids", "Lead IDs"),
            FieldSpec::string("search", "Search term"),
            FieldSpec::one_of("filter", LEAD_FILTERS, "Contact status filter"),
            FieldSpec::string("campaign", "Source campaign"),
            FieldSpec::string("list_id", "Source list"),
            FieldSpec::boolean("in_campaign", "Only leads that are in a campaign"),
            FieldSpec::boolean("in_list", "Only leads that are in a list"),
            FieldSpec::object_list("queries", None, None, None, "Advanced lead queries"),
            FieldSpec::string_list("excluded_ids", "Lead IDs to leave out"),
            FieldSpec::string_list("contacts", "Lead emails"),
            FieldSpec::boolean("check_duplicates_in_campaigns", "Skip leads already in the destination campaigns"),
            FieldSpec::boolean("skip_leads_in_verification", "Skip leads still being verified"),
            FieldSpec::integer("limit", Some(1), None, "Maximum leads to move"),
            FieldSpec::string("assigned_to", "User UUID"),
            FieldSpec::integer("esp_code", None, None, "0=Queue, 1=Google, 2=Microsoft, ..."),
            FieldSpec::integer("esg_code", None, None, "0=Queue, 1=Barracuda, ..."),
            FieldSpec::boolean("copy_leads", "Copy instead of move"),
            FieldSpec::boolean("check_duplicates", "Skip duplicates at the destination"),
        ],
        rules: &[
            FieldGroup::ExactlyOneOf(&["to_campaign_id", "to_list_id"]),
            FieldGroup::AtLeastOneOf(&["ids", "search", "filter", "campaign", "list_id", "queries", "contacts"]),
        ],
        extra: ExtraFields::Ignore,
    },
    hints: ToolHints::WRITE,
};

/// Individual leads plus bulk add and move.
pub struct LeadTools;

#[async_trait::async_trait]
impl ToolHandler for LeadTools {
    fn tools(&self) -> &'static [ToolName] {
        &[
            ToolName::ListLeads,
            ToolName::GetLead,
            ToolName::CreateLead,
            ToolName::UpdateLead,
            ToolName::DeleteLead,
            ToolName::AddLeadsBulk,
            ToolName::MoveLeads,
        ]
    }

    async fn execute(
        &self,
        tool: ToolName,
        args: &ValidatedArgs,
        ctx: &ToolContext<'_>,
    ) -> Result<Value, ToolError> {
        if tool == ToolName::ListLeads {
            return list_records(ctx, ListEndpoint::LEADS, args).await;
        }

        let credential = ctx.credential()?;
        let leads = ctx.client().leads(&credential);

        let result = match tool {
            ToolName::GetLead => leads.get(args.required_str("lead_id")?).await?,
            ToolName::CreateLead => leads.create(args.body_without(&[])).await?,
            ToolName::UpdateLead => {
                leads
                    .update(args.required_str("lead_id")?, args.body_without(&["lead_id"]))
                    .await?
            }
            ToolName::DeleteLead => {
                let lead_id = args.required_str("lead_id")?;
                let response = leads.delete(lead_id).await?;
                let mut result = json!({ "success": true, "deleted": lead_id });
                merge_into(&mut result, response);
                result
            }
            ToolName::AddLeadsBulk => leads.bulk_add(args.body_without(&[])).await?,
            ToolName::MoveLeads => leads.move_leads(args.body_without(&[])).await?,
            other => return Err(ToolError::UnknownTool(other.to_string())),
        };

        Ok(result)
    }
}
