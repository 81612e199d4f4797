//! Process-wide rate-limit bookkeeping.

use instantly_core::RateLimitSnapshot;
use reqwest::header::HeaderMap;
use std::sync::{Arc, OnceLock, RwLock};

/// Holds the most recent [`RateLimitSnapshot`].
///
/// Writes are last-write-wins. The snapshot is advisory and never gates
/// requests.
#[derive(Debug, Clone, Default)]
pub struct RateLimitTracker {
    inner: Arc<RwLock<RateLimitSnapshot>>,
}

static GLOBAL: OnceLock<RateLimitTracker> = OnceLock::new();

impl RateLimitTracker {
    /// A tracker private to its owner.
    pub fn new() -> Self {
        Self::default()
    }

    /// The tracker shared by every client built without an explicit one.
    pub fn global() -> &'static RateLimitTracker {
        GLOBAL.get_or_init(RateLimitTracker::new)
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> RateLimitSnapshot {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Fold a response's headers in and return the resulting snapshot.
    ///
    /// A response without rate-limit headers leaves the snapshot as it was.
    pub fn observe(&self, headers: &HeaderMap) -> RateLimitSnapshot {
        let mut snapshot = self
            .inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        snapshot.apply_headers(|name| headers.get(name).and_then(|v| v.to_str().ok()));
        snapshot.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn test_observe_updates_snapshot() {
        let tracker = RateLimitTracker::new();

        let snapshot = tracker.observe(&headers(&[
            ("x-ratelimit-remaining", "99"),
            ("x-ratelimit-limit", "100"),
        ]));

        assert_eq!(snapshot.remaining, Some(99));
        assert_eq!(tracker.snapshot().limit, Some(100));
    }

    #[test]
    fn test_observe_without_headers_keeps_previous_values() {
        let tracker = RateLimitTracker::new();
        tracker.observe(&headers(&[
            ("x-ratelimit-remaining", "12"),
            ("x-ratelimit-limit", "100"),
            ("x-ratelimit-reset", "1700000000"),
        ]));
        let before = tracker.snapshot();

        let after = tracker.observe(&HeaderMap::new());

        assert_eq!(after, before);
        assert_eq!(after.remaining, Some(12));
    }

    #[test]
    fn test_clones_share_state() {
        let tracker = RateLimitTracker::new();
        let clone = tracker.clone();

        clone.observe(&headers(&[("x-ratelimit-remaining", "3")]));

        assert_eq!(tracker.snapshot().remaining, Some(3));
    }

    #[test]
    fn test_global_is_a_singleton() {
        assert!(std::ptr::eq(RateLimitTracker::global(), RateLimitTracker::global()));
    }
}
