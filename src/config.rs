//! Configuration management for lawdesk.
//!
//! Credentials and the warehouse id come from the environment (optionally via
//! a `.env` file). Polling and HTTP tuning come from an optional TOML file.
//! Both are loaded once at startup and never mutated afterwards.

use crate::error::{LawdeskError, Result};
use crate::query::PollPolicy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Environment variable holding the workspace base URL.
pub const ENV_WORKSPACE_URL: &str = "DATABRICKS_WORKSPACE_URL";
/// Environment variable holding the OAuth client id.
pub const ENV_CLIENT_ID: &str = "DATABRICKS_CLIENT_ID";
/// Environment variable holding the OAuth client secret.
pub const ENV_CLIENT_SECRET: &str = "DATABRICKS_CLIENT_SECRET";
/// Environment variable holding the default warehouse id.
pub const ENV_WAREHOUSE_ID: &str = "DATABRICKS_WAREHOUSE_ID";

/// OAuth client credentials for a workspace.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Workspace base URL, without a trailing slash.
    pub workspace_url: String,
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    /// Creates credentials, normalizing the workspace URL.
    pub fn new(
        workspace_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            workspace_url: workspace_url.into().trim_end_matches('/').to_string(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("workspace_url", &self.workspace_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Process-wide warehouse configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarehouseConfig {
    pub credentials: Credentials,
    /// SQL warehouse that executes submitted statements.
    pub warehouse_id: String,
}

impl WarehouseConfig {
    /// Creates a config after validating every field.
    pub fn new(credentials: Credentials, warehouse_id: impl Into<String>) -> Result<Self> {
        let config = Self {
            credentials,
            warehouse_id: warehouse_id.into(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Loads the config from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads the config using the given variable lookup.
    ///
    /// Empty values are treated as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| LawdeskError::config(format!("{key} is not set")))
        };

        let credentials = Credentials::new(
            require(ENV_WORKSPACE_URL)?,
            require(ENV_CLIENT_ID)?,
            require(ENV_CLIENT_SECRET)?,
        );
        Self::new(credentials, require(ENV_WAREHOUSE_ID)?)
    }

    /// Returns a copy targeting a different warehouse.
    pub fn with_warehouse_id(mut self, warehouse_id: impl Into<String>) -> Result<Self> {
        self.warehouse_id = warehouse_id.into();
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.credentials.workspace_url).map_err(|e| {
            LawdeskError::config(format!(
                "Invalid workspace URL '{}': {e}",
                self.credentials.workspace_url
            ))
        })?;

        if url.scheme() != "https" && url.scheme() != "http" {
            return Err(LawdeskError::config(format!(
                "Invalid scheme '{}'. Expected 'https' or 'http'",
                url.scheme()
            )));
        }
        if self.credentials.client_id.is_empty() {
            return Err(LawdeskError::config("Client id is required"));
        }
        if self.credentials.client_secret.is_empty() {
            return Err(LawdeskError::config("Client secret is required"));
        }
        if self.warehouse_id.trim().is_empty() {
            return Err(LawdeskError::config("Warehouse id is required"));
        }
        Ok(())
    }

    /// Returns a display-safe string (no secret) for logs.
    pub fn display_string(&self) -> String {
        format!(
            "warehouse {} @ {}",
            self.warehouse_id, self.credentials.workspace_url
        )
    }
}

/// Tuning settings loaded from the TOML config file.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Statement polling settings.
    #[serde(default)]
    pub polling: PollingConfig,

    /// HTTP client settings.
    #[serde(default)]
    pub http: HttpConfig,
}

/// Statement polling settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PollingConfig {
    /// Seconds to sleep between status polls.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Maximum number of status polls before giving up.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Overall seconds to wait for a terminal state.
    #[serde(default = "default_polling_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_interval_secs() -> u64 {
    2
}

fn default_max_attempts() -> u32 {
    150
}

fn default_polling_timeout_secs() -> u64 {
    300
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            max_attempts: default_max_attempts(),
            timeout_secs: default_polling_timeout_secs(),
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HttpConfig {
    /// Per-request timeout in seconds.
    #[serde(default = "default_http_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_http_timeout_secs() -> u64 {
    crate::warehouse::DEFAULT_TIMEOUT_SECS
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_http_timeout_secs(),
        }
    }
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lawdesk")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file.
    ///
    /// A missing file yields the defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| LawdeskError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            LawdeskError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }

    /// Returns the polling policy described by this config.
    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            interval: Duration::from_secs(self.polling.interval_secs),
            max_attempts: self.polling.max_attempts,
            timeout: Duration::from_secs(self.polling.timeout_secs),
        }
    }

    /// Returns the per-request HTTP timeout.
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_secs)
    }
}
