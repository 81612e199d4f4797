//! Configuration types for the Instantly SDK.

use std::time::Duration;
use url::Url;

/// Production API root.
pub const DEFAULT_BASE_URL: &str = "https://api.instantly.ai/api/v2";

/// Configuration for the Instantly client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the Instantly API, including the `/api/v2` prefix.
    pub base_url: Url,
    /// Fallback API key used when a call supplies none of its own.
    pub api_key: Option<String>,
    /// Per-profile request timeouts.
    pub timeouts: TimeoutConfig,
}

impl ClientConfig {
    /// Create a new configuration with the given base URL.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            api_key: None,
            timeouts: TimeoutConfig::default(),
        }
    }
}

/// Which timeout a request runs under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeoutProfile {
    /// Single-resource reads and writes.
    #[default]
    Default,
    /// Large lists and bulk writes.
    Extended,
    /// Requests carrying a free-text search.
    Search,
}

/// Timeout for each [`TimeoutProfile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeoutConfig {
    pub default: Duration,
    pub extended: Duration,
    pub search: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            default: Duration::from_secs(60),
            extended: Duration::from_secs(90),
            search: Duration::from_secs(120),
        }
    }
}

impl TimeoutConfig {
    /// Use the same timeout for every profile.
    pub fn uniform(timeout: Duration) -> Self {
        Self {
            default: timeout,
            extended: timeout,
            search: timeout,
        }
    }

    pub fn for_profile(&self, profile: TimeoutProfile) -> Duration {
        match profile {
            TimeoutProfile::Default => self.default,
            TimeoutProfile::Extended => self.extended,
            TimeoutProfile::Search => self.search,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_defaults() {
        let config = TimeoutConfig::default();

        assert_eq!(config.for_profile(TimeoutProfile::Default), Duration::from_secs(60));
        assert_eq!(config.for_profile(TimeoutProfile::Extended), Duration::from_secs(90));
        assert_eq!(config.for_profile(TimeoutProfile::Search), Duration::from_secs(120));
    }

    #[test]
    fn test_uniform_timeouts() {
        let config = TimeoutConfig::uniform(Duration::from_millis(250));

        assert_eq!(config.default, Duration::from_millis(250));
        assert_eq!(config.extended, Duration::from_millis(250));
        assert_eq!(config.search, Duration::from_millis(250));
    }

    #[test]
    fn test_client_config_new() {
        let url = Url::parse(DEFAULT_BASE_URL).unwrap();
        let config = ClientConfig::new(url.clone());

        assert_eq!(config.base_url, url);
        assert!(config.api_key.is_none());
        assert_eq!(config.timeouts, TimeoutConfig::default());
    }

    #[test]
    fn test_default_profile() {
        assert_eq!(TimeoutProfile::default(), TimeoutProfile::Default);
    }
}
