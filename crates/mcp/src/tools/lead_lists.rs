// Lead list tools

use crate::error::ToolError;
use crate::tools::accounts::merge_into;
use crate::tools::catalog::ToolName;
use crate::tools::listing::{list_records, LIMIT, MAX_ITEMS, STARTING_AFTER};
use crate::tools::registry::{ToolContext, ToolHandler};
use crate::tools::schema::{ExtraFields, FieldSpec, ObjectSpec, ToolHints, ToolSpec, ValidatedArgs};
use instantly_sdk::ListEndpoint;
use serde_json::{json, Value};

const LIST_ID: FieldSpec = FieldSpec::string("list_id", "List UUID").required();

pub static LIST_LEAD_LISTS: ToolSpec = ToolSpec {
    name: "list_lead_lists",
    description: "List lead lists with cursor pagination (100 per page by default).",
    args: ObjectSpec {
        fields: &[
            LIMIT,
            STARTING_AFTER,
            MAX_ITEMS,
            FieldSpec::boolean("has_enrichment_task", "Only lists with (or without) auto-enrichment"),
            FieldSpec::string("search", "Search by name"),
        ],
        rules: &[],
        extra: ExtraFields::Ignore,
    },
    hints: ToolHints::READ_ONLY,
};

pub static CREATE_LEAD_LIST: ToolSpec = ToolSpec {
    name: "create_lead_list",
    description: "Create a lead list. Set has_enrichment_task=true to auto-enrich added leads.",
    args: ObjectSpec {
        fields: &[
            FieldSpec::string("name", "List name").required(),
            FieldSpec::boolean("has_enrichment_task", "Auto-enrich leads added to this list"),
            FieldSpec::string("owned_by", "Owner user UUID"),
        ],
        rules: &[],
        extra: ExtraFields::Ignore,
    },
    hints: ToolHints::WRITE,
};

pub static UPDATE_LEAD_LIST: ToolSpec = ToolSpec {
    name: "update_lead_list",
    description: "Rename a lead list or change its enrichment and owner.",
    args: ObjectSpec {
        fields: &[
            LIST_ID,
            FieldSpec::string("name", "List name"),
            FieldSpec::boolean("has_enrichment_task", "Auto-enrich leads added to this list"),
            FieldSpec::string("owned_by", "Owner user UUID"),
        ],
        rules: &[],
        extra: ExtraFields::Ignore,
    },
    hints: ToolHints::IDEMPOTENT_WRITE,
};

pub static DELETE_LEAD_LIST: ToolSpec = ToolSpec {
    name: "delete_lead_list",
    description: "PERMANENTLY delete a lead list. Cannot be undone. \
        Ask the user first, then call with confirm: true.",
    args: ObjectSpec {
        fields: &[FieldSpec::string("list_id", "Lead list UUID to delete permanently").required()],
        rules: &[],
        extra: ExtraFields::Ignore,
    },
    hints: ToolHints::DESTRUCTIVE,
};

pub static GET_VERIFICATION_STATS: ToolSpec = ToolSpec {
    name: "get_verification_stats_for_lead_list",
    description: "Email verification breakdown for a lead list: valid, invalid, risky, catch-all and pending counts.",
    args: ObjectSpec {
        fields: &[LIST_ID],
        rules: &[],
        extra: ExtraFields::Ignore,
    },
    hints: ToolHints::READ_ONLY,
};

/// Lead list management. Loaded with the leads category.
pub struct LeadListTools;

#[async_trait::async_trait]
impl ToolHandler for LeadListTools {
    fn tools(&self) -> &'static [ToolName] {
        &[
            ToolName::ListLeadLists,
            ToolName::CreateLeadList,
            ToolName::UpdateLeadList,
            ToolName::DeleteLeadList,
            ToolName::GetLeadListVerificationStats,
        ]
    }

    async fn execute(
        &self,
        tool: ToolName,
        args: &ValidatedArgs,
        ctx: &ToolContext<'_>,
    ) -> Result<Value, ToolError> {
        if tool == ToolName::ListLeadLists {
            return list_records(ctx, ListEndpoint::LEAD_LISTS, args).await;
        }

        let credential = ctx.credential()?;
        let lists = ctx.client().lead_lists(&credential);

        let result = match tool {
            ToolName::CreateLeadList => lists.create(args.body_without(&[])).await?,
            ToolName::UpdateLeadList => {
                lists
                    .update(args.required_str("list_id")?, args.body_without(&["list_id"]))
                    .await?
            }
            ToolName::DeleteLeadList => {
                let list_id = args.required_str("list_id")?;
                let response = lists.delete(list_id).await?;
                let mut result = json!({ "success": true, "deleted": list_id });
                merge_into(&mut result, response);
                result
            }
            ToolName::GetLeadListVerificationStats => {
                lists.verification_stats(args.required_str("list_id")?).await?
            }
            other => return Err(ToolError::UnknownTool(other.to_string())),
        };

        Ok(result)
    }
}
