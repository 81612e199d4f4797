use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

pub const REMAINING_HEADER: &str = "x-ratelimit-remaining";
pub const LIMIT_HEADER: &str = "x-ratelimit-limit";
pub const RESET_HEADER: &str = "x-ratelimit-reset";

/// Last-observed upstream quota state.
///
/// Every field is `None` until a response carrying the matching header has
/// been seen. Fields are only ever overwritten by newer observations, never
/// cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitSnapshot {
    pub remaining: Option<u64>,
    pub limit: Option<u64>,
    pub reset_at: Option<DateTime<Utc>>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl RateLimitSnapshot {
    /// Fold one response's headers into the snapshot.
    ///
    /// `header` looks up a header value by lowercase name. Returns `true` if
    /// any field changed. Malformed values are skipped, and a limit of zero is
    /// treated as malformed.
    pub fn apply_headers<'a, F>(&mut self, header: F) -> bool
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        let remaining = header(REMAINING_HEADER).and_then(|v| v.trim().parse::<u64>().ok());
        let limit = header(LIMIT_HEADER)
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|l| *l > 0);
        let reset_at = header(RESET_HEADER)
            .and_then(|v| v.trim().parse::<i64>().ok())
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single());

        if remaining.is_none() && limit.is_none() && reset_at.is_none() {
            return false;
        }

        if remaining.is_some() {
            self.remaining = remaining;
        }
        if limit.is_some() {
            self.limit = limit;
        }
        if reset_at.is_some() {
            self.reset_at = reset_at;
        }
        self.last_updated = Some(Utc::now());
        true
    }

    pub fn is_known(&self) -> bool {
        self.last_updated.is_some()
    }
}
