//! Configuration management for Stargaze.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use stargaze_github::{ClientConfig, GraphQLClient, RestClient, SecretString};

use crate::error::{Error, Result};

/// Stargaze configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// GitHub endpoints and transport settings.
    #[serde(default)]
    pub github: GitHubConfig,

    /// Quota protection.
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Awesome list source.
    #[serde(default)]
    pub awesome: AwesomeConfig,
}

impl Config {
    /// Load config from a TOML file. A missing file yields the defaults.
    ///
    /// # Errors
    /// Returns error if the file can't be read, parsed, or holds values out
    /// of range.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to a TOML file, creating parent directories.
    ///
    /// # Errors
    /// Returns error if serialization or write fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Check values that serde cannot constrain.
    ///
    /// # Errors
    /// Returns [`Error::InvalidConfig`] describing the first bad value.
    pub fn validate(&self) -> Result<()> {
        let threshold = self.rate_limit.threshold;
        if !(0.0..1.0).contains(&threshold) {
            return Err(Error::InvalidConfig(format!(
                "rate_limit.threshold must be in [0, 1), got {threshold}"
            )));
        }
        if self.github.timeout_secs == 0 {
            return Err(Error::InvalidConfig(
                "github.timeout_secs must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

/// GitHub endpoints and transport settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    /// GraphQL endpoint used for bulk queries.
    #[serde(default = "default_graphql_url")]
    pub graphql_url: String,

    /// REST base URL used for single-item lookups.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Timeout for every remote call, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl GitHubConfig {
    /// Request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Client config for the bulk protocol.
    #[must_use]
    pub fn graphql_client(&self, token: Option<&SecretString>) -> ClientConfig {
        ClientConfig::new(&self.graphql_url)
            .with_token(token)
            .with_timeout(self.timeout())
    }

    /// Client config for the single-item protocol.
    #[must_use]
    pub fn rest_client(&self, token: Option<&SecretString>) -> ClientConfig {
        ClientConfig::new(&self.api_url)
            .with_token(token)
            .with_timeout(self.timeout())
    }
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            graphql_url: default_graphql_url(),
            api_url: default_api_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_graphql_url() -> String {
    GraphQLClient::DEFAULT_ENDPOINT.into()
}

fn default_api_url() -> String {
    RestClient::DEFAULT_API_URL.into()
}

const fn default_timeout_secs() -> u64 {
    ClientConfig::DEFAULT_TIMEOUT.as_secs()
}

/// Quota protection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Batches are refused once `remaining / limit` drops to this fraction.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
        }
    }
}

const fn default_threshold() -> f64 {
    crate::rate_limit::DEFAULT_THRESHOLD
}

/// Awesome list source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwesomeConfig {
    /// URL of the plain-text list.
    #[serde(default = "default_list_url")]
    pub list_url: String,
}

impl Default for AwesomeConfig {
    fn default() -> Self {
        Self {
            list_url: default_list_url(),
        }
    }
}

fn default_list_url() -> String {
    crate::awesome::AWESOME_LIST_URL.into()
}
