//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Client Config
//!
//! Located at (in order of precedence):
//! 1. `$NEXUS_REPO_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/nexus-repo/config.toml`
//! 3. `~/.nexus-repo/config.toml` (canonical write location)
//!
//! # Validation
//!
//! Values are validated after parsing: the base URL must be an absolute
//! `http`/`https` URL and the timeout must be positive.

use reqwest::Url;
use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::core::query::QueryStyle;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Keys accepted by [`ClientConfig::get`] and [`ClientConfig::set`].
pub const CONFIG_KEYS: &[&str] = &["base_url", "token", "timeout_secs", "query_style"];

/// Client configuration.
///
/// # Example
///
/// ```toml
/// base_url = "https://store.example.com/v0"
/// token = "..."
/// timeout_secs = 30
/// query_style = "placeholders"
/// ```
#[derive(Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    /// Base URL of the store, including any deployment prefix such as `/v0`
    pub base_url: Option<String>,

    /// Bearer token sent with every request
    pub token: Option<String>,

    /// Per-request timeout in seconds
    pub timeout_secs: Option<u64>,

    /// Rendering of listing queries
    pub query_style: Option<QueryStyle>,
}

// Custom Debug to avoid exposing the token
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("has_token", &self.token.is_some())
            .field("timeout_secs", &self.timeout_secs)
            .field("query_style", &self.query_style)
            .finish()
    }
}

impl ClientConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(base_url) = &self.base_url {
            validate_base_url(base_url)?;
        }

        if self.timeout_secs == Some(0) {
            return Err(ConfigError::InvalidValue(
                "timeout_secs must be greater than zero".into(),
            ));
        }

        Ok(())
    }

    /// Get a value by key, formatted for display.
    ///
    /// The token is never returned in clear; a set token reads as `(set)`.
    pub fn get(&self, key: &str) -> Result<Option<String>, ConfigError> {
        match key {
            "base_url" => Ok(self.base_url.clone()),
            "token" => Ok(self.token.as_ref().map(|_| "(set)".to_string())),
            "timeout_secs" => Ok(self.timeout_secs.map(|t| t.to_string())),
            "query_style" => Ok(self.query_style.map(|s| s.to_string())),
            _ => Err(unknown_key(key)),
        }
    }

    /// Set a value by key, validating it.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "base_url" => {
                validate_base_url(value)?;
                self.base_url = Some(value.to_string());
            }
            "token" => {
                self.token = Some(value.to_string());
            }
            "timeout_secs" => {
                let secs: u64 = value.parse().map_err(|_| {
                    ConfigError::InvalidValue(format!(
                        "timeout_secs must be an integer, got '{}'",
                        value
                    ))
                })?;
                if secs == 0 {
                    return Err(ConfigError::InvalidValue(
                        "timeout_secs must be greater than zero".into(),
                    ));
                }
                self.timeout_secs = Some(secs);
            }
            "query_style" => {
                let style = QueryStyle::parse(value).ok_or_else(|| {
                    ConfigError::InvalidValue(format!(
                        "invalid query_style '{}', must be one of: placeholders, compact",
                        value
                    ))
                })?;
                self.query_style = Some(style);
            }
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }
}

fn unknown_key(key: &str) -> ConfigError {
    ConfigError::InvalidValue(format!(
        "unknown configuration key '{}', must be one of: {}",
        key,
        CONFIG_KEYS.join(", ")
    ))
}

fn validate_base_url(base_url: &str) -> Result<(), ConfigError> {
    let url = Url::parse(base_url).map_err(|e| {
        ConfigError::InvalidValue(format!("invalid base_url '{}': {}", base_url, e))
    })?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::InvalidValue(format!(
            "invalid base_url '{}': unsupported scheme '{}'",
            base_url, other
        ))),
    }
}
