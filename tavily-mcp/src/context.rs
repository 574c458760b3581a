//! Application context: one provider client and one tool set per process.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tavily::{Client, Provider};

use crate::config::Config;
use crate::error::{ConfigError, RegistryError, ToolError};
use crate::registry::ToolRegistry;
use crate::response::ToolResponse;
use crate::tools;

/// Everything a tool invocation needs, built once at startup.
pub struct AppContext {
    /// Immutable tool set.
    registry: ToolRegistry,
}

impl AppContext {
    /// Register the full tool surface over `provider`.
    pub fn new(provider: &Arc<dyn Provider>) -> Result<Self, RegistryError> {
        let mut registry = ToolRegistry::new();
        tools::register_all(&mut registry, provider)?;
        Ok(Self { registry })
    }

    /// Build the Tavily client from `config`, then the tool set.
    ///
    /// Configuration is checked first, so a missing credential fails before
    /// any tool is registered.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let provider: Arc<dyn Provider> = Arc::new(Client::new(config.client_config()?)?);
        Ok(Self::new(&provider)?)
    }

    /// The tool registry.
    pub const fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Dispatch a tool call through the registry.
    pub async fn dispatch(&self, name: &str, input: Value) -> Result<ToolResponse, ToolError> {
        self.registry.dispatch(name, input).await
    }
}

impl fmt::Debug for AppContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppContext")
            .field("registry", &self.registry)
            .finish()
    }
}
