//! Client configuration management
//!
//! Handles loading and saving client configuration.

use crate::session::{DEFAULT_TIMEOUT, DEFAULT_URL};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    /// Discovery URL of the server
    pub url: String,

    /// User name for basic authentication
    pub user: String,

    /// Password for basic authentication; read from file or environment, never written
    #[serde(skip_serializing)]
    pub password: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            user: String::new(),
            password: None,
            timeout: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from the default file, or defaults if it does not exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`, or defaults if it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No client config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).context("Failed to read client config file")?;
        toml::from_str(&content).context("Failed to parse client config file")
    }

    /// Save configuration to the default file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to `path`; the password is not written
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize client config")?;

        std::fs::write(path, content).context("Failed to write client config file")?;

        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir =
            dirs::config_dir().ok_or_else(|| anyhow::anyhow!("Cannot determine config directory"))?;

        Ok(config_dir.join("mcm").join("client.toml"))
    }

    /// Request timeout as a duration
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Update configuration with environment variables
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("MCM_URL") {
            self.url = url;
        }

        if let Ok(user) = std::env::var("MCM_USER") {
            self.user = user;
        }

        if let Ok(password) = std::env::var("MCM_PASSWORD") {
            self.password = Some(password);
        }

        if let Ok(timeout) = std::env::var("MCM_TIMEOUT") {
            if let Ok(timeout) = timeout.parse() {
                self.timeout = timeout;
            }
        }
    }

    /// Create a new builder for constructing configuration
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }
}

/// Builder for client configuration with validation and priority chain support
///
/// Priority chain (lowest to highest):
/// 1. Defaults
/// 2. Config file
/// 3. Environment variables
/// 4. Explicit setters
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    url: Option<String>,
    user: Option<String>,
    password: Option<String>,
    timeout: Option<u64>,
}

impl ConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set discovery URL (with validation)
    pub fn with_url(mut self, url: impl Into<String>) -> Result<Self> {
        let url = url.into();
        Self::validate_url(&url)?;
        self.url = Some(url);
        Ok(self)
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Set timeout in seconds (with validation)
    pub fn with_timeout(mut self, timeout: u64) -> Result<Self> {
        Self::validate_timeout(timeout)?;
        self.timeout = Some(timeout);
        Ok(self)
    }

    /// Load configuration from the default file
    pub fn with_config_file(self, load_file: bool) -> Result<Self> {
        if !load_file {
            return Ok(self);
        }

        match ClientConfig::config_path() {
            Ok(path) => self.with_config_path(&path),
            Err(_) => Ok(self),
        }
    }

    /// Load configuration from a specific file
    pub fn with_config_path(self, path: &Path) -> Result<Self> {
        let config = ClientConfig::load_from(path)?;
        let builder = self;

        // Only use file values if they weren't already set (preserving priority)
        Ok(Self {
            url: builder.url.or(Some(config.url)),
            user: builder.user.or(Some(config.user)),
            password: builder.password.or(config.password),
            timeout: builder.timeout.or(Some(config.timeout)),
        })
    }

    /// Apply environment variable overrides
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("MCM_URL") {
            // Validate before applying
            if Self::validate_url(&url).is_ok() {
                self.url = Some(url);
            }
        }

        if let Ok(user) = std::env::var("MCM_USER") {
            self.user = Some(user);
        }

        if let Ok(password) = std::env::var("MCM_PASSWORD") {
            self.password = Some(password);
        }

        if let Ok(timeout) = std::env::var("MCM_TIMEOUT") {
            if let Ok(timeout) = timeout.parse() {
                // Validate before applying
                if Self::validate_timeout(timeout).is_ok() {
                    self.timeout = Some(timeout);
                }
            }
        }

        self
    }

    /// Build the final configuration with validation
    pub fn build(self) -> Result<ClientConfig> {
        let defaults = ClientConfig::default();

        let url = self.url.unwrap_or(defaults.url);
        let user = self.user.unwrap_or(defaults.user);
        let timeout = self.timeout.unwrap_or(defaults.timeout);

        // Validate final values
        Self::validate_url(&url)?;
        Self::validate_timeout(timeout)?;
        if user.trim().is_empty() {
            return Err(anyhow::anyhow!("User name cannot be empty"));
        }

        Ok(ClientConfig {
            url,
            user,
            password: self.password.or(defaults.password),
            timeout,
        })
    }

    /// Validate URL format
    fn validate_url(url: &str) -> Result<()> {
        if url.is_empty() {
            return Err(anyhow::anyhow!("Server URL cannot be empty"));
        }

        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(anyhow::anyhow!(
                "Server URL must start with http:// or https://"
            ));
        }

        Ok(())
    }

    /// Validate timeout value
    fn validate_timeout(timeout: u64) -> Result<()> {
        if timeout == 0 {
            return Err(anyhow::anyhow!("Timeout must be greater than 0"));
        }

        if timeout > 300 {
            return Err(anyhow::anyhow!(
                "Timeout must be less than or equal to 300 seconds"
            ));
        }

        Ok(())
    }
}
