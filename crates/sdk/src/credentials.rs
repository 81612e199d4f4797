//! API key resolution.

use crate::error::{InstantlyError, InstantlyResult};
use std::fmt;

/// Environment variable holding the single-tenant API key.
pub const API_KEY_ENV: &str = "INSTANTLY_API_KEY";

/// An API key scoped to one outbound call.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a key. Blank keys are rejected.
    pub fn new(key: impl AsRef<str>) -> Option<Self> {
        let key = key.as_ref().trim();
        if key.is_empty() {
            None
        } else {
            Some(Self(key.to_string()))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Where a resolved credential came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    Call,
    Header,
    Environment,
}

/// Candidate API keys for one call, in priority order.
#[derive(Clone, Default)]
pub struct CredentialSources {
    /// Key passed explicitly with the call.
    pub call: Option<String>,
    /// Key supplied by the transport (URL path or request header).
    pub header: Option<String>,
    /// Process-wide key (environment, CLI flag or config file).
    pub environment: Option<String>,
}

impl CredentialSources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sources with only the process environment filled in.
    pub fn from_env() -> Self {
        Self {
            environment: std::env::var(API_KEY_ENV).ok(),
            ..Self::default()
        }
    }

    pub fn with_call(mut self, key: Option<String>) -> Self {
        self.call = key;
        self
    }

    pub fn with_header(mut self, key: Option<String>) -> Self {
        self.header = key;
        self
    }

    pub fn with_environment(mut self, key: Option<String>) -> Self {
        self.environment = key;
        self
    }

    /// Pick the highest-priority non-blank key.
    pub fn resolve(&self) -> InstantlyResult<Credential> {
        self.resolve_with_source()
            .map(|(credential, _)| credential)
            .ok_or(InstantlyError::MissingCredential)
    }

    pub fn source(&self) -> Option<CredentialSource> {
        self.resolve_with_source().map(|(_, source)| source)
    }

    fn resolve_with_source(&self) -> Option<(Credential, CredentialSource)> {
        [
            (&self.call, CredentialSource::Call),
            (&self.header, CredentialSource::Header),
            (&self.environment, CredentialSource::Environment),
        ]
        .into_iter()
        .find_map(|(key, source)| {
            key.as_deref()
                .and_then(Credential::new)
                .map(|credential| (credential, source))
        })
    }
}

impl fmt::Debug for CredentialSources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialSources")
            .field("call", &self.call.is_some())
            .field("header", &self.header.is_some())
            .field("environment", &self.environment.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_three() -> CredentialSources {
        CredentialSources::new()
            .with_call(Some("call-key".to_string()))
            .with_header(Some("header-key".to_string()))
            .with_environment(Some("env-key".to_string()))
    }

    #[test]
    fn test_call_key_wins() {
        let sources = all_three();

        assert_eq!(sources.resolve().unwrap().expose(), "call-key");
        assert_eq!(sources.source(), Some(CredentialSource::Call));
    }

    #[test]
    fn test_header_beats_environment() {
        let sources = all_three().with_call(None);

        assert_eq!(sources.resolve().unwrap().expose(), "header-key");
        assert_eq!(sources.source(), Some(CredentialSource::Header));
    }

    #[test]
    fn test_environment_fallback() {
        let sources = all_three().with_call(None).with_header(None);

        assert_eq!(sources.resolve().unwrap().expose(), "env-key");
    }

    #[test]
    fn test_blank_keys_are_skipped() {
        let sources = all_three()
            .with_call(Some("   ".to_string()))
            .with_header(Some(String::new()));

        assert_eq!(sources.resolve().unwrap().expose(), "env-key");
    }

    #[test]
    fn test_missing_everywhere() {
        let result = CredentialSources::new().resolve();

        assert!(matches!(result, Err(InstantlyError::MissingCredential)));
    }

    #[test]
    fn test_debug_is_redacted() {
        let credential = Credential::new("sk-secret").unwrap();

        assert!(!format!("{:?}", credential).contains("sk-secret"));
        assert!(!format!("{:?}", all_three()).contains("call-key"));
    }
}
