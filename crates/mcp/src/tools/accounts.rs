// Account tools

use crate::error::ToolError;
use crate::tools::catalog::ToolName;
use crate::tools::listing::{list_records, LIMIT, MAX_ITEMS, STARTING_AFTER};
use crate::tools::registry::{ToolContext, ToolHandler};
use crate::tools::schema::{ExtraFields, FieldSpec, ObjectSpec, ToolHints, ToolSpec, ValidatedArgs};
use instantly_sdk::ListEndpoint;
use serde_json::{json, Value};

const PROVIDER_CODES: &[i64] = &[1, 2, 3, 4];
const ACCOUNT_STATUSES: &[i64] = &[1, 2, -1, -2, -3];
const STATE_ACTIONS: &[&str] = &["pause", "resume", "enable_warmup", "disable_warmup", "test_vitals"];

static WARMUP_ADVANCED: ObjectSpec = ObjectSpec {
    fields: &[
        FieldSpec::boolean("warm_ctd", "Warm CTD enabled"),
        FieldSpec::integer("open_rate", Some(0), Some(100), "Target open rate %"),
        FieldSpec::integer("important_rate", Some(0), Some(100), "Important rate %"),
        FieldSpec::boolean("read_emulation", "Read emulation enabled"),
        FieldSpec::integer("spam_save_rate", Some(0), Some(100), "Spam save rate %"),
        FieldSpec::boolean("weekday_only", "Only warm up on weekdays"),
    ],
    rules: &[],
    extra: ExtraFields::Forbid,
};

static WARMUP: ObjectSpec = ObjectSpec {
    fields: &[
        FieldSpec::integer("limit", Some(1), None, "Daily warmup email limit"),
        FieldSpec::object("advanced", Some(&WARMUP_ADVANCED), "Advanced warmup settings"),
        FieldSpec::string("warmup_custom_ftag", "Custom from tag"),
        FieldSpec::string("increment", "Daily increment value"),
        FieldSpec::integer("reply_rate", Some(0), Some(100), "Reply rate %"),
    ],
    rules: &[],
    extra: ExtraFields::Forbid,
};

pub static LIST_ACCOUNTS: ToolSpec = ToolSpec {
    name: "list_accounts",
    description: "List email accounts with cursor pagination (100 per page by default). \
        If next_cursor is set there are more results: call again with starting_after=<next_cursor>. \
        Status codes: 1=Active, 2=Paused, -1/-2/-3=Errors. \
        Provider codes: 1=IMAP, 2=Google, 3=Microsoft, 4=AWS.",
    args: ObjectSpec {
        fields: &[
            LIMIT,
            STARTING_AFTER,
            MAX_ITEMS,
            FieldSpec::string("search", "Search by email or domain"),
            FieldSpec::int_one_of("status", ACCOUNT_STATUSES, "1=Active, 2=Paused, -1/-2/-3=Errors"),
            FieldSpec::int_one_of("provider_code", PROVIDER_CODES, "1=IMAP, 2=Google, 3=Microsoft, 4=AWS"),
            FieldSpec::string("tag_ids", "Comma-separated tag IDs"),
        ],
        rules: &[],
        extra: ExtraFields::Forbid,
    },
    hints: ToolHints::READ_ONLY,
};

pub static GET_ACCOUNT: ToolSpec = ToolSpec {
    name: "get_account",
    description: "Get account details, warmup status and campaign eligibility by email.",
    args: ObjectSpec {
        fields: &[FieldSpec::string("email", "Account email address").required()],
        rules: &[],
        extra: ExtraFields::Forbid,
    },
    hints: ToolHints::READ_ONLY,
};

pub static CREATE_ACCOUNT: ToolSpec = ToolSpec {
    name: "create_account",
    description: "Create an email account with IMAP/SMTP credentials. \
        Provider codes: 1=IMAP, 2=Google Workspace, 3=Microsoft 365, 4=AWS SES.",
    args: ObjectSpec {
        fields: &[
            FieldSpec::string("email", "Email address").required(),
            FieldSpec::string("first_name", "First name").required(),
            FieldSpec::string("last_name", "Last name").required(),
            FieldSpec::int_one_of("provider_code", PROVIDER_CODES, "1=IMAP, 2=Google, 3=Microsoft, 4=AWS")
                .required(),
            FieldSpec::string("imap_username", "IMAP username").required(),
            FieldSpec::string("imap_password", "IMAP password").required(),
            FieldSpec::string("imap_host", "IMAP host (e.g. imap.gmail.com)").required(),
            FieldSpec::integer("imap_port", Some(1), Some(65535), "IMAP port (e.g. 993)").required(),
            FieldSpec::string("smtp_username", "SMTP username").required(),
            FieldSpec::string("smtp_password", "SMTP password").required(),
            FieldSpec::string("smtp_host", "SMTP host (e.g. smtp.gmail.com)").required(),
            FieldSpec::integer("smtp_port", Some(1), Some(65535), "SMTP port (e.g. 587)").required(),
        ],
        rules: &[],
        extra: ExtraFields::Forbid,
    },
    hints: ToolHints::WRITE,
};

pub static UPDATE_ACCOUNT: ToolSpec = ToolSpec {
    name: "update_account",
    description: "Update account settings. Only the fields you send are changed.",
    args: ObjectSpec {
        fields: &[
            FieldSpec::string("email", "Account to update").required(),
            FieldSpec::string("first_name", "Display first name"),
            FieldSpec::string("last_name", "Display last name"),
            FieldSpec::object("warmup", Some(&WARMUP), "Warmup configuration"),
            FieldSpec::integer("daily_limit", Some(1), Some(100), "Max emails per day (1-100)"),
            FieldSpec::integer("sending_gap", Some(0), Some(1440), "Minutes between emails (0-1440)"),
            FieldSpec::boolean("enable_slow_ramp", "Ramp sending volume up gradually"),
            FieldSpec::string("tracking_domain_name", "Custom tracking domain"),
            FieldSpec::string("tracking_domain_status", "Tracking domain status"),
            FieldSpec::boolean("skip_cname_check", "Skip the CNAME check for the tracking domain"),
            FieldSpec::boolean("remove_tracking_domain", "Remove the custom tracking domain"),
            FieldSpec::integer("inbox_placement_test_limit", Some(0), None, "Inbox placement test limit"),
        ],
        rules: &[],
        extra: ExtraFields::Forbid,
    },
    hints: ToolHints::IDEMPOTENT_WRITE,
};

pub static MANAGE_ACCOUNT_STATE: ToolSpec = ToolSpec {
    name: "manage_account_state",
    description: "Pause or resume an account, enable or disable warmup, or test IMAP/SMTP vitals. \
        Use test_vitals to diagnose connection issues.",
    args: ObjectSpec {
        fields: &[
            FieldSpec::string("email", "Account email").required(),
            FieldSpec::one_of("action", STATE_ACTIONS, "Action to perform").required(),
        ],
        rules: &[],
        extra: ExtraFields::Forbid,
    },
    hints: ToolHints::IDEMPOTENT_WRITE,
};

pub static DELETE_ACCOUNT: ToolSpec = ToolSpec {
    name: "delete_account",
    description: "PERMANENTLY delete an email account. Removes it from all campaigns and cannot be undone. \
        Ask the user first, then call with confirm: true.",
    args: ObjectSpec {
        fields: &[FieldSpec::string("email", "Account to delete permanently").required()],
        rules: &[],
        extra: ExtraFields::Forbid,
    },
    hints: ToolHints::DESTRUCTIVE,
};

/// Email account management.
pub struct AccountTools;

#[async_trait::async_trait]
impl ToolHandler for AccountTools {
    fn tools(&self) -> &'static [ToolName] {
        &[
            ToolName::ListAccounts,
            ToolName::GetAccount,
            ToolName::CreateAccount,
            ToolName::UpdateAccount,
            ToolName::ManageAccountState,
            ToolName::DeleteAccount,
        ]
    }

    async fn execute(
        &self,
        tool: ToolName,
        args: &ValidatedArgs,
        ctx: &ToolContext<'_>,
    ) -> Result<Value, ToolError> {
        if tool == ToolName::ListAccounts {
            return list_records(ctx, ListEndpoint::ACCOUNTS, args).await;
        }

        let credential = ctx.credential()?;
        let accounts = ctx.client().accounts(&credential);
        let email = args.required_str("email")?;

        let result = match tool {
            ToolName::GetAccount => accounts.get(email).await?,
            ToolName::CreateAccount => accounts.create(args.body_without(&[])).await?,
            ToolName::UpdateAccount => accounts.update(email, args.body_without(&["email"])).await?,
            ToolName::ManageAccountState => {
                let emails = [email.to_string()];
                match args.required_str("action")? {
                    "pause" => accounts.pause(email).await?,
                    "resume" => accounts.resume(email).await?,
                    "enable_warmup" => accounts.set_warmup(&emails, true).await?,
                    "disable_warmup" => accounts.set_warmup(&emails, false).await?,
                    _ => accounts.test_vitals(&emails).await?,
                }
            }
            ToolName::DeleteAccount => {
                let response = accounts.delete(email).await?;
                let mut result = json!({ "success": true, "deleted": email });
                merge_into(&mut result, response);
                result
            }
            other => return Err(ToolError::UnknownTool(other.to_string())),
        };

        Ok(result)
    }
}

/// Copy the keys of an upstream object into `target`.
pub(crate) fn merge_into(target: &mut Value, extra: Value) {
    if let (Value::Object(target), Value::Object(extra)) = (target, extra) {
        for (key, value) in extra {
            target.insert(key, value);
        }
    }
}
