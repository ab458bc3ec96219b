//! core::config
//!
//! Configuration schema and loading.
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Config file
//! 3. CLI flags (`--base-url`, `--token`), applied with [`Config::with_overrides`]
//!
//! # Config Locations
//!
//! Searched in order:
//! 1. `$NEXUS_REPO_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/nexus-repo/config.toml`
//! 3. `~/.nexus-repo/config.toml` (canonical write location)
//!
//! # Example
//!
//! ```no_run
//! use nexus_repo::core::config::Config;
//!
//! let config = Config::load().unwrap();
//! if let Some(base_url) = config.base_url() {
//!     println!("Store: {}", base_url);
//! }
//! println!("Timeout: {:?}", config.timeout());
//! ```

pub mod schema;

pub use schema::{ClientConfig, CONFIG_KEYS, DEFAULT_TIMEOUT_SECS};

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use crate::core::query::QueryStyle;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "NEXUS_REPO_CONFIG";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("failed to write config file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("home directory not found")]
    NoHomeDir,
}

/// Loaded configuration.
///
/// Accessor methods apply defaults for unset values.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Values from the config file and overrides
    pub client: ClientConfig,
    /// Path to the config file (if one was loaded)
    path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the default locations.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be parsed or
    /// holds invalid values. A missing config file is not an error.
    pub fn load() -> Result<Config, ConfigError> {
        match Self::find_config_file() {
            Some(path) => Self::load_from(&path),
            None => Ok(Config::default()),
        }
    }

    /// Load configuration from an explicit file.
    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let client = Self::read_config(path)?;
        client.validate()?;
        Ok(Config {
            client,
            path: Some(path.to_path_buf()),
        })
    }

    /// Locate the config file to read, if any exists.
    fn find_config_file() -> Option<PathBuf> {
        // 1. Check $NEXUS_REPO_CONFIG
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        // 2. Check $XDG_CONFIG_HOME/nexus-repo/config.toml
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("nexus-repo/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        // 3. Check ~/.nexus-repo/config.toml
        dirs::home_dir()
            .map(|home| home.join(".nexus-repo/config.toml"))
            .filter(|path| path.exists())
    }

    /// Read and parse a config file.
    fn read_config(path: &Path) -> Result<ClientConfig, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Apply command-line overrides on top of the file values.
    pub fn with_overrides(
        mut self,
        base_url: Option<String>,
        token: Option<String>,
    ) -> Result<Config, ConfigError> {
        if base_url.is_some() {
            self.client.base_url = base_url;
        }
        if token.is_some() {
            self.client.token = token;
        }
        self.client.validate()?;
        Ok(self)
    }

    /// Path of the file this configuration was loaded from.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Path that `config set` writes to: the loaded file, or the canonical
    /// location when none was loaded.
    pub fn write_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.path {
            Some(path) => Ok(path.clone()),
            None => Self::default_config_path(),
        }
    }

    /// Get the canonical config path.
    ///
    /// Returns `$NEXUS_REPO_CONFIG` if set, else `~/.nexus-repo/config.toml`.
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Ok(PathBuf::from(path));
        }
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(home.join(".nexus-repo/config.toml"))
    }

    /// Write a config file atomically.
    ///
    /// Creates parent directories if needed, writes to a temp file in the
    /// same directory, then renames it over the target.
    pub fn write(path: &Path, config: &ClientConfig) -> Result<(), ConfigError> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        let contents =
            toml::to_string_pretty(config).map_err(|e| ConfigError::InvalidValue(e.to_string()))?;

        let temp_path = path.with_extension("toml.tmp");
        let mut file = fs::File::create(&temp_path).map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;

        file.write_all(contents.as_bytes())
            .map_err(|e| ConfigError::WriteError {
                path: temp_path.clone(),
                source: e,
            })?;

        file.sync_all().map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;

        fs::rename(&temp_path, path).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(())
    }

    // =========================================================================
    // Accessor methods with defaults
    // =========================================================================

    /// Get the store base URL.
    ///
    /// Returns `None` if not configured.
    pub fn base_url(&self) -> Option<&str> {
        self.client.base_url.as_deref()
    }

    /// Get the bearer token.
    pub fn token(&self) -> Option<&str> {
        self.client.token.as_deref()
    }

    /// Get the per-request timeout.
    ///
    /// Defaults to 30 seconds if not configured.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.client.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    /// Get the listing query style.
    ///
    /// Defaults to placeholders if not configured.
    pub fn query_style(&self) -> QueryStyle {
        self.client.query_style.unwrap_or_default()
    }
}
