//! Application configuration module
//!
//! Provides the connection settings used by the relationship client:
//! which server to talk to, which repository the records live in, and the
//! session token. Settings can be built in code, read from a TOML file, and
//! overridden from the environment.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default server URL (local PDS development port)
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:2583";

/// Environment variable overriding the server URL
pub const SERVER_URL_ENV: &str = "XFSOCIAL_SERVER_URL";

/// Environment variable overriding the access token
pub const ACCESS_TOKEN_ENV: &str = "XFSOCIAL_ACCESS_TOKEN";

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server URL
    pub server_url: Option<String>,
    /// DID of the repository that owns the relationship records
    pub repo_did: Option<String>,
    /// Session access token
    pub access_token: Option<String>,
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: AppConfig =
            toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Parse(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&text)
    }

    /// Default location of the configuration file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("xfsocial").join("config.toml"))
    }

    /// Load the file at [`AppConfig::default_path`] if present, then apply
    /// environment overrides
    pub fn discover() -> Result<Self, ConfigError> {
        let config = match Self::default_path() {
            Some(path) if path.exists() => {
                tracing::info!("Loading configuration from {}", path.display());
                Self::load(path)?
            }
            _ => Self::default(),
        };
        config.with_env_overrides()
    }

    /// Apply `XFSOCIAL_*` environment overrides
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from `lookup`, keyed by the `XFSOCIAL_*` variable names
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(url) = lookup(SERVER_URL_ENV) {
            self.server_url = Some(url);
        }
        if let Some(token) = lookup(ACCESS_TOKEN_ENV) {
            self.access_token = Some(token);
        }
        self.validate()?;
        Ok(self)
    }

    /// Server URL, falling back to the development default
    pub fn server_url(&self) -> &str {
        self.server_url.as_deref().unwrap_or(DEFAULT_SERVER_URL)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(url) = &self.server_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidUrl(url.clone()));
            }
        }
        if let Some(did) = &self.repo_did {
            if !did.starts_with("did:") {
                return Err(ConfigError::Parse(format!("repo_did is not a DID: {}", did)));
            }
        }
        Ok(())
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    server_url: Option<String>,
    repo_did: Option<String>,
    access_token: Option<String>,
}

impl AppConfigBuilder {
    /// Set the server URL
    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = Some(url.into());
        self
    }

    /// Set the repository DID
    pub fn repo_did(mut self, did: impl Into<String>) -> Self {
        self.repo_did = Some(did.into());
        self
    }

    /// Set the session access token
    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let config = AppConfig {
            server_url: self.server_url,
            repo_did: self.repo_did,
            access_token: self.access_token,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("invalid configuration: {0}")]
    Parse(String),
}
