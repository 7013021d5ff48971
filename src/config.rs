//! Top-level application configuration.
//!
//! Configuration is stored in `<LEADDESK_HOME>/config.yaml` and includes:
//! - The API base URL and request timeout
//! - The session token and display name from the last login
//! - The default page size
//! - The last-used status and assignee filters

use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{LeadError, Result};
use crate::pagination::PageSize;
use crate::paths::config_file;
use crate::query::{AssigneeFilter, StatusFilter};
use crate::utils::ensure_parent_dir;

pub const DEFAULT_API_URL: &str = "https://pathemari-api-srv.onrender.com";

/// Keys accepted by `config get` and `config set`.
pub const CONFIG_KEYS: &[&str] = &[
    "api_url",
    "remote_timeout",
    "page_size",
    "auth.token",
    "auth.name",
    "filters.status",
    "filters.assignee",
];

/// Keys whose values are masked when displayed.
pub const SENSITIVE_KEYS: &[&str] = &["auth.token"];

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the lead API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Request timeout in seconds (default: 60)
    #[serde(default = "default_remote_timeout")]
    pub remote_timeout: u64,

    /// Rows per page for `leads` (default: 10)
    #[serde(default)]
    pub page_size: PageSize,

    /// Session from the last login
    #[serde(default, skip_serializing_if = "AuthConfig::is_empty")]
    pub auth: AuthConfig,

    /// Filters restored on the next run
    #[serde(default)]
    pub filters: FilterPreferences,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_remote_timeout() -> u64 {
    60
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            remote_timeout: default_remote_timeout(),
            page_size: PageSize::default(),
            auth: AuthConfig::default(),
            filters: FilterPreferences::default(),
        }
    }
}

/// Stored session
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl AuthConfig {
    pub fn is_empty(&self) -> bool {
        self.token.is_none() && self.name.is_none()
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("name", &self.name)
            .finish()
    }
}

/// Last-used filter values, restored verbatim as the initial filter state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterPreferences {
    #[serde(default)]
    pub status: StatusFilter,
    #[serde(default)]
    pub assignee: AssigneeFilter,
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> PathBuf {
        config_file()
    }

    /// Load configuration from file, or return default if not found
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path).map_err(|e| {
            LeadError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read config at {}: {}", path.display(), e),
            ))
        })?;
        let config: Config = serde_yaml_ng::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        ensure_parent_dir(&path)?;

        let content = serde_yaml_ng::to_string(self)?;
        fs::write(&path, content).map_err(|e| {
            LeadError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to write config at {}: {}", path.display(), e),
            ))
        })?;

        // Owner read/write only: the file holds the session token
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&path, permissions).map_err(|e| {
                LeadError::Io(std::io::Error::new(
                    e.kind(),
                    format!(
                        "Failed to set permissions on config at {}: {}",
                        path.display(),
                        e
                    ),
                ))
            })?;
        }

        tracing::debug!("Saved config to {}", path.display());
        Ok(())
    }

    /// Get the remote request timeout duration
    pub fn remote_timeout(&self) -> Duration {
        Duration::from_secs(self.remote_timeout)
    }

    /// Store the session returned by a successful login
    pub fn set_auth(&mut self, token: String, name: String) {
        self.auth = AuthConfig {
            token: Some(token),
            name: (!name.is_empty()).then_some(name),
        };
    }

    /// Forget the stored session
    pub fn clear_auth(&mut self) {
        self.auth = AuthConfig::default();
    }

    /// Read one value by dotted key.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let value = match key {
            "api_url" => Some(self.api_url.clone()),
            "remote_timeout" => Some(self.remote_timeout.to_string()),
            "page_size" => Some(self.page_size.to_string()),
            "auth.token" => self.auth.token.clone(),
            "auth.name" => self.auth.name.clone(),
            "filters.status" => Some(self.filters.status.to_string()),
            "filters.assignee" => Some(self.filters.assignee.to_string()),
            _ => return Err(unknown_key(key)),
        };
        Ok(value)
    }

    /// Set one value by dotted key, validating it first.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "api_url" => {
                url::Url::parse(value.trim())?;
                self.api_url = value.trim().to_string();
            }
            "remote_timeout" => {
                let seconds: u64 = value.trim().parse().map_err(|_| {
                    LeadError::Config(format!(
                        "invalid value '{value}' for remote_timeout. Expected a number of seconds"
                    ))
                })?;
                if seconds == 0 {
                    return Err(LeadError::Config(
                        "remote_timeout must be at least 1 second".to_string(),
                    ));
                }
                self.remote_timeout = seconds;
            }
            "page_size" => self.page_size = value.parse()?,
            "auth.token" => self.auth.token = Some(value.to_string()).filter(|v| !v.is_empty()),
            "auth.name" => self.auth.name = Some(value.to_string()).filter(|v| !v.is_empty()),
            "filters.status" => self.filters.status = StatusFilter::parse(value),
            "filters.assignee" => self.filters.assignee = AssigneeFilter::parse(value),
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }
}

fn unknown_key(key: &str) -> LeadError {
    // Suggest dot notation for keys typed with underscores, e.g. auth_token
    if let Some(pos) = key.find('_') {
        let dotted = format!("{}.{}", &key[..pos], &key[pos + 1..]);
        if CONFIG_KEYS.contains(&dotted.as_str()) {
            return LeadError::Config(format!(
                "invalid config key '{key}'. Use dot notation: '{dotted}'"
            ));
        }
    }
    LeadError::Config(format!(
        "unknown config key '{key}'. Valid keys: {}",
        CONFIG_KEYS.join(", ")
    ))
}
