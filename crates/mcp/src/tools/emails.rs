// Email tools

use crate::error::ToolError;
use crate::tools::accounts::merge_into;
use crate::tools::catalog::ToolName;
use crate::tools::listing::{list_records, LIMIT, MAX_ITEMS, STARTING_AFTER};
use crate::tools::registry::{ToolContext, ToolHandler};
use crate::tools::schema::{
    ExtraFields, FieldGroup, FieldSpec, ObjectSpec, ToolHints, ToolSpec, ValidatedArgs,
};
use instantly_sdk::api::{ReplyBody, ReplyRequest};
use instantly_sdk::ListEndpoint;
use serde_json::{json, Value};
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::debug;

const DEFAULT_MAX_WAIT_SECS: i64 = 45;
const DEFAULT_POLL_INTERVAL_SECS: i64 = 2;

static REPLY_BODY: ObjectSpec = ObjectSpec {
    fields: &[
        FieldSpec::string("html", "HTML content"),
        FieldSpec::string("text", "Plain text content"),
    ],
    rules: &[FieldGroup::AtLeastOneOf(&["html", "text"])],
    extra: ExtraFields::Ignore,
};

pub static LIST_EMAILS: ToolSpec = ToolSpec {
    name: "list_emails",
    description: "List emails with cursor pagination (100 per page by default). \
        Use search='thread:<UUID>' for every email in a thread. \
        Modes: emode_focused (primary inbox), emode_others, emode_all.",
    args: ObjectSpec {
        fields: &[
            LIMIT,
            STARTING_AFTER,
            MAX_ITEMS,
            FieldSpec::string("search", "Search text; 'thread:<UUID>' for a thread"),
            FieldSpec::string("campaign_id", "Campaign UUID"),
            FieldSpec::integer("i_status", None, None, "Interest status"),
            FieldSpec::string("eaccount", "Sender accounts, comma-separated"),
            FieldSpec::boolean("is_unread", "Only unread emails"),
            FieldSpec::boolean("has_reminder", "Only emails with a reminder"),
            FieldSpec::one_of("mode", &["emode_focused", "emode_others", "emode_all"], "Inbox mode"),
            FieldSpec::boolean("preview_only", "Return previews instead of full bodies"),
            FieldSpec::one_of("sort_order", &["asc", "desc"], "Sort by timestamp"),
            FieldSpec::boolean("scheduled_only", "Only scheduled emails"),
            FieldSpec::string("assigned_to", "User UUID"),
            FieldSpec::string("lead", "Lead email"),
            FieldSpec::string("company_domain", "Company domain"),
            FieldSpec::boolean("marked_as_done", "Only emails marked as done"),
            FieldSpec::one_of("email_type", &["received", "sent", "manual"], "Email type"),
        ],
        rules: &[],
        extra: ExtraFields::Ignore,
    },
    hints: ToolHints::READ_ONLY,
};

pub static GET_EMAIL: ToolSpec = ToolSpec {
    name: "get_email",
    description: "Get one email with its content, thread, sender and recipients, tracking data, lead and campaign.",
    args: ObjectSpec {
        fields: &[FieldSpec::string("email_id", "Email UUID").required()],
        rules: &[],
        extra: ExtraFields::Ignore,
    },
    hints: ToolHints::READ_ONLY,
};

pub static REPLY_TO_EMAIL: ToolSpec = ToolSpec {
    name: "reply_to_email",
    description: "SENDS A REAL EMAIL immediately as a reply in an existing thread. Cannot be undone. \
        Ask the user to approve the exact content first, then call with confirm: true.",
    args: ObjectSpec {
        fields: &[
            FieldSpec::string("reply_to_uuid", "UUID of the email being answered").required(),
            FieldSpec::string("eaccount", "Sender account; must be active").required(),
            FieldSpec::string("subject", "Subject line").required(),
            FieldSpec::object("body", Some(&REPLY_BODY), "Email body").required(),
        ],
        rules: &[],
        extra: ExtraFields::Ignore,
    },
    hints: ToolHints::SENDS_MAIL,
};

pub static COUNT_UNREAD_EMAILS: ToolSpec = ToolSpec {
    name: "count_unread_emails",
    description: "Count unread emails across all accounts.",
    args: ObjectSpec::NONE,
    hints: ToolHints::READ_ONLY,
};

pub static MARK_THREAD_AS_READ: ToolSpec = ToolSpec {
    name: "mark_thread_as_read",
    description: "Mark every email in a thread as read.",
    args: ObjectSpec {
        fields: &[FieldSpec::string("thread_id", "Thread UUID").required()],
        rules: &[],
        extra: ExtraFields::Ignore,
    },
    hints: ToolHints::IDEMPOTENT_WRITE,
};

pub static VERIFY_EMAIL: ToolSpec = ToolSpec {
    name: "verify_email",
    description: "Verify email deliverability (5-45 seconds). While the result is pending the tool polls \
        until it is verified or invalid, up to max_wait_seconds, unless skip_polling=true. \
        Consumes verification credits.",
    args: ObjectSpec {
        fields: &[
            FieldSpec::string("email", "Email address to verify").required(),
            FieldSpec::integer("max_wait_seconds", Some(0), Some(120), "Maximum time to wait (0-120, default: 45)"),
            FieldSpec::integer("poll_interval_seconds", Some(1), Some(10), "Seconds between polls (1-10, default: 2)"),
            FieldSpec::boolean("skip_polling", "Return immediately even if still pending"),
        ],
        rules: &[],
        extra: ExtraFields::Ignore,
    },
    hints: ToolHints::READ_ONLY,
};

/// Unibox email tools and email verification.
pub struct EmailTools;

#[async_trait::async_trait]
impl ToolHandler for EmailTools {
    fn tools(&self) -> &'static [ToolName] {
        &[
            ToolName::ListEmails,
            ToolName::GetEmail,
            ToolName::ReplyToEmail,
            ToolName::CountUnreadEmails,
            ToolName::MarkThreadAsRead,
            ToolName::VerifyEmail,
        ]
    }

    async fn execute(
        &self,
        tool: ToolName,
        args: &ValidatedArgs,
        ctx: &ToolContext<'_>,
    ) -> Result<Value, ToolError> {
        if tool == ToolName::ListEmails {
            return list_records(ctx, ListEndpoint::EMAILS, args).await;
        }

        let credential = ctx.credential()?;
        let emails = ctx.client().emails(&credential);

        let result = match tool {
            ToolName::GetEmail => emails.get(args.required_str("email_id")?).await?,
            ToolName::ReplyToEmail => emails.reply(&reply_request(args)?).await?,
            ToolName::CountUnreadEmails => emails.unread_count().await?,
            ToolName::MarkThreadAsRead => {
                let thread_id = args.required_str("thread_id")?;
                let response = emails.mark_thread_read(thread_id).await?;
                let mut result = json!({
                    "success": true,
                    "thread_id": thread_id,
                    "message": "Thread marked as read",
                });
                merge_into(&mut result, response);
                result
            }
            ToolName::VerifyEmail => {
                let email = args.required_str("email")?;
                let initial = emails.start_verification(email).await?;
                let polling = PollSettings::from_args(args);
                if !polling.should_poll(&initial) {
                    return Ok(initial);
                }

                let mut polls = 0u32;
                let started = Instant::now();
                while started.elapsed() < polling.max_wait {
                    sleep(polling.interval).await;
                    polls += 1;

                    match emails.verification_status(email).await {
                        Ok(mut polled) => {
                            let status = verification_status(&polled).map(str::to_string);
                            if let Some(status) = status.filter(|s| is_final(s)) {
                                annotate(
                                    &mut polled,
                                    json!({
                                        "polls_made": polls,
                                        "total_time_seconds": seconds(started),
                                        "final_status": status,
                                    }),
                                );
                                return Ok(polled);
                            }
                        }
                        Err(error) => debug!(%error, email, "Verification poll failed"),
                    }
                }

                let mut result = initial;
                annotate(
                    &mut result,
                    json!({
                        "polls_made": polls,
                        "total_time_seconds": seconds(started),
                        "timeout_reached": true,
                        "note": format!(
                            "Verification still pending after {}s. Call verify_email again later for the final result.",
                            polling.max_wait.as_secs()
                        ),
                    }),
                );
                result
            }
            other => return Err(ToolError::UnknownTool(other.to_string())),
        };

        Ok(result)
    }
}

fn reply_request(args: &ValidatedArgs) -> Result<ReplyRequest, ToolError> {
    let body = args.get("body");
    let part = |name: &str| {
        body.and_then(|b| b.get(name))
            .and_then(Value::as_str)
            .map(str::to_string)
    };

    Ok(ReplyRequest {
        reply_to_uuid: args.required_str("reply_to_uuid")?.to_string(),
        eaccount: args.required_str("eaccount")?.to_string(),
        subject: args.required_str("subject")?.to_string(),
        body: ReplyBody {
            html: part("html"),
            text: part("text"),
        },
    })
}

struct PollSettings {
    max_wait: Duration,
    interval: Duration,
    skip: bool,
}

impl PollSettings {
    fn from_args(args: &ValidatedArgs) -> Self {
        let secs = |name: &str, default: i64| {
            Duration::from_secs(args.i64(name).unwrap_or(default).max(0) as u64)
        };

        Self {
            max_wait: secs("max_wait_seconds", DEFAULT_MAX_WAIT_SECS),
            interval: secs("poll_interval_seconds", DEFAULT_POLL_INTERVAL_SECS),
            skip: args.bool("skip_polling").unwrap_or(false),
        }
    }

    fn should_poll(&self, initial: &Value) -> bool {
        verification_status(initial) == Some("pending") && !self.skip && !self.max_wait.is_zero()
    }
}

fn verification_status(result: &Value) -> Option<&str> {
    result.get("verification_status").and_then(Value::as_str)
}

fn is_final(status: &str) -> bool {
    matches!(status, "verified" | "invalid")
}

fn seconds(started: Instant) -> f64 {
    (started.elapsed().as_secs_f64() * 100.0).round() / 100.0
}

fn annotate(result: &mut Value, info: Value) {
    if let Value::Object(map) = result {
        map.insert("_polling_info".to_string(), info);
    }
}
