use anyhow::{Context, Result};
use instantly_core::CategorySelection;
use instantly_mcp::{McpServer, ToolRegistry};
use instantly_sdk::{InstantlyClient, TimeoutConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub upstream: UpstreamConfig,

    #[serde(default)]
    pub tools: ToolsConfig,

    #[serde(default)]
    pub http: HttpConfig,
}

/// Instantly API connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Override for the API root, mainly for testing against a mock.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Process-wide key. Prefer `INSTANTLY_API_KEY` over storing it here.
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub default_timeout_secs: u64,

    #[serde(default = "default_extended_timeout_secs")]
    pub extended_timeout_secs: u64,

    #[serde(default = "default_search_timeout_secs")]
    pub search_timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_extended_timeout_secs() -> u64 {
    90
}

fn default_search_timeout_secs() -> u64 {
    120
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            default_timeout_secs: default_timeout_secs(),
            extended_timeout_secs: default_extended_timeout_secs(),
            search_timeout_secs: default_search_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Categories to load. Empty loads everything.
    #[serde(default)]
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// Load the config file if it exists, otherwise use defaults.
    pub fn load(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            tracing::info!("Configuration file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(config_path).with_context(|| {
            format!("Failed to read configuration file {}", config_path.display())
        })?;
        toml::from_str(&content).with_context(|| {
            format!("Failed to parse configuration file {}", config_path.display())
        })
    }

    pub fn timeouts(&self) -> TimeoutConfig {
        TimeoutConfig {
            default: Duration::from_secs(self.upstream.default_timeout_secs),
            extended: Duration::from_secs(self.upstream.extended_timeout_secs),
            search: Duration::from_secs(self.upstream.search_timeout_secs),
        }
    }

    pub fn categories(&self) -> CategorySelection {
        CategorySelection::from_names(&self.tools.categories)
    }

    pub fn api_key(&self) -> Option<&str> {
        self.upstream
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.http.host, self.http.port)
    }

    pub fn build_client(&self) -> Result<InstantlyClient> {
        let mut builder = InstantlyClient::builder().timeouts(self.timeouts());
        if let Some(base_url) = &self.upstream.base_url {
            builder = builder.base_url(base_url);
        }
        if let Some(api_key) = self.api_key() {
            builder = builder.api_key(api_key);
        }

        builder.build().context("Failed to build Instantly client")
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub mcp: McpServer,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let client = config.build_client()?;
        let registry = ToolRegistry::standard(client, config.categories());

        Ok(Self {
            mcp: McpServer::new(registry),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use instantly_core::Category;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig::load(&dir.path().join("absent.toml")).unwrap();

        assert_eq!(config.bind_addr(), "0.0.0.0:8000");
        assert_eq!(config.timeouts(), TimeoutConfig::default());
        assert!(!config.categories().filtered);
        assert!(config.api_key().is_none());
    }

    #[test]
    fn test_load_sections() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[upstream]
base_url = "http://localhost:9999/api/v2"
api_key = "  "
extended_timeout_secs = 30

[tools]
categories = ["leads", "analytics", "billing"]

[http]
port = 9000
"#
        )
        .unwrap();

        let config = ServerConfig::load(file.path()).unwrap();

        assert_eq!(config.http.host, "0.0.0.0");
        assert_eq!(config.http.port, 9000);
        assert_eq!(config.timeouts().extended, Duration::from_secs(30));
        assert_eq!(config.timeouts().default, Duration::from_secs(60));
        assert!(config.api_key().is_none());

        let categories = config.categories();
        assert_eq!(categories.enabled, vec![Category::Leads, Category::Analytics]);
        assert_eq!(categories.ignored, vec!["billing".to_string()]);
    }

    #[test]
    fn test_invalid_toml_is_reported() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[http]\nport = \"eighty\"").unwrap();

        let err = ServerConfig::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse configuration file"));
    }

    #[test]
    fn test_app_state_respects_categories() {
        let mut config = ServerConfig::default();
        config.upstream.base_url = Some("http://localhost:9999/api/v2".to_string());
        config.tools.categories = vec!["emails".to_string()];

        let state = AppState::new(&config).unwrap();

        assert_eq!(state.mcp.registry().tool_names().len(), 7);
    }
}
