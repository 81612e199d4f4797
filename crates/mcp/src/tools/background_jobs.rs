// Background job tools

use crate::error::ToolError;
use crate::tools::catalog::ToolName;
use crate::tools::listing::{list_records, LIMIT, MAX_ITEMS, STARTING_AFTER};
use crate::tools::registry::{ToolContext, ToolHandler};
use crate::tools::schema::{ExtraFields, FieldSpec, ObjectSpec, ToolHints, ToolSpec, ValidatedArgs};
use instantly_sdk::ListEndpoint;
use serde_json::Value;

pub static LIST_BACKGROUND_JOBS: ToolSpec = ToolSpec {
    name: "list_background_jobs",
    description: "List background jobs (bulk imports, lead moves, enrichment runs) with cursor pagination. \
        Statuses: pending, running, completed, failed.",
    args: ObjectSpec {
        fields: &[LIMIT, STARTING_AFTER, MAX_ITEMS],
        rules: &[],
        extra: ExtraFields::Ignore,
    },
    hints: ToolHints::READ_ONLY,
};

pub static GET_BACKGROUND_JOB: ToolSpec = ToolSpec {
    name: "get_background_job",
    description: "Get one background job: type, status, progress, errors and timestamps.",
    args: ObjectSpec {
        fields: &[FieldSpec::string("job_id", "Background job UUID").required()],
        rules: &[],
        extra: ExtraFields::Ignore,
    },
    hints: ToolHints::READ_ONLY,
};

/// Status of asynchronous upstream operations.
pub struct BackgroundJobTools;

#[async_trait::async_trait]
impl ToolHandler for BackgroundJobTools {
    fn tools(&self) -> &'static [ToolName] {
        &[ToolName::ListBackgroundJobs, ToolName::GetBackgroundJob]
    }

    async fn execute(
        &self,
        tool: ToolName,
        args: &ValidatedArgs,
        ctx: &ToolContext<'_>,
    ) -> Result<Value, ToolError> {
        match tool {
            ToolName::ListBackgroundJobs => {
                list_records(ctx, ListEndpoint::BACKGROUND_JOBS, args).await
            }
            ToolName::GetBackgroundJob => {
                let credential = ctx.credential()?;
                Ok(ctx
                    .client()
                    .background_jobs(&credential)
                    .get(args.required_str("job_id")?)
                    .await?)
            }
            other => Err(ToolError::UnknownTool(other.to_string())),
        }
    }
}
