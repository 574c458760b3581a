//! Process configuration.

use std::fmt;
use std::time::Duration;

use tavily::ClientConfig;

use crate::error::ConfigError;

/// Settings needed to build the provider client.
#[derive(Clone, Default)]
pub struct Config {
    /// Provider credential. Required.
    pub api_key: Option<String>,
    /// Endpoint override.
    pub base_url: Option<String>,
    /// Per-request deadline override.
    pub timeout: Option<Duration>,
}

impl Config {
    /// Build the provider client configuration.
    ///
    /// A missing or blank credential is a [`ConfigError::MissingApiKey`].
    pub fn client_config(&self) -> Result<ClientConfig, ConfigError> {
        let api_key = self
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let mut config = ClientConfig::new(api_key)?;
        if let Some(base_url) = &self.base_url {
            config = config.with_base_url(base_url.as_str());
        }
        if let Some(timeout) = self.timeout {
            config = config.with_timeout(timeout);
        }
        Ok(config)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}
