//! Tool registry: name → (description, input schema, handler).
//!
//! The registry is built once at startup and is read-only afterwards, so it
//! can be shared across concurrent invocations without locking.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::error::{RegistryError, ToolError};
use crate::response::ToolResponse;
use crate::schema::ObjectSchema;

/// Executes a tool on arguments that already passed schema validation.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Run the tool.
    async fn call(&self, input: Value) -> Result<ToolResponse, ToolError>;
}

/// Public description of a registered tool.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDefinition {
    /// Unique tool name.
    name: String,
    /// Human-readable description used by clients to pick a tool.
    description: String,
    /// Schema the arguments must satisfy.
    input_schema: ObjectSchema,
}

impl ToolDefinition {
    /// Tool name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tool description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Input schema.
    pub const fn input_schema(&self) -> &ObjectSchema {
        &self.input_schema
    }
}

/// A definition paired with its handler.
struct RegisteredTool {
    /// Advertised definition.
    definition: ToolDefinition,
    /// Implementation.
    handler: Arc<dyn ToolHandler>,
}

/// Registered tools in registration order, indexed by name.
#[derive(Default)]
pub struct ToolRegistry {
    /// Tools in registration order.
    tools: Vec<RegisteredTool>,
    /// Name → position in `tools`.
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. Fails if `name` is taken.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: ObjectSchema,
        handler: Arc<dyn ToolHandler>,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        if self.index.contains_key(&name) {
            return Err(RegistryError::Duplicate(name));
        }

        debug!(tool = %name, "registering tool");
        self.index.insert(name.clone(), self.tools.len());
        self.tools.push(RegisteredTool {
            definition: ToolDefinition {
                name,
                description: description.into(),
                input_schema,
            },
            handler,
        });
        Ok(())
    }

    /// Validate `input` against the named tool's schema and run it.
    pub async fn dispatch(&self, name: &str, input: Value) -> Result<ToolResponse, ToolError> {
        let tool = self
            .index
            .get(name)
            .and_then(|&i| self.tools.get(i))
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;

        tool.definition.input_schema.validate(&input)?;

        debug!(tool = name, "dispatching tool call");
        tool.handler.call(input).await
    }

    /// Definitions in registration order.
    pub fn definitions(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.tools.iter().map(|t| &t.definition)
    }
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.tools.iter().map(|t| &t.definition.name))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;

    use super::*;
    use crate::response::ContentItem;
    use crate::schema::{FieldErrorKind, Schema};

    #[derive(Default)]
    struct Echo {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ToolHandler for Echo {
        async fn call(&self, input: Value) -> Result<ToolResponse, ToolError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(ToolResponse::new(vec![ContentItem::text(input.to_string())]))
        }
    }

    fn echo_schema() -> ObjectSchema {
        ObjectSchema::new().required("message", "Message", Schema::non_empty_string())
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut registry = ToolRegistry::new();
        registry
            .register("echo", "first", echo_schema(), Arc::new(Echo::default()))
            .unwrap();

        let err = registry
            .register("echo", "second", echo_schema(), Arc::new(Echo::default()))
            .unwrap_err();

        assert_eq!(err, RegistryError::Duplicate("echo".into()));
        let descriptions: Vec<&str> = registry
            .definitions()
            .map(ToolDefinition::description)
            .collect();
        assert_eq!(descriptions, vec!["first"]);
    }

    #[test]
    fn definitions_keep_registration_order() {
        let mut registry = ToolRegistry::new();
        for name in ["b", "a", "c"] {
            registry
                .register(name, name, echo_schema(), Arc::new(Echo::default()))
                .unwrap();
        }

        let names: Vec<&str> = registry.definitions().map(ToolDefinition::name).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[tokio::test]
    async fn unknown_tool_is_not_found() {
        let registry = ToolRegistry::new();
        let err = registry.dispatch("missing", json!({})).await.unwrap_err();
        assert!(matches!(err, ToolError::NotFound(ref n) if n == "missing"));
    }

    #[tokio::test]
    async fn invalid_input_never_reaches_the_handler() {
        let echo = Arc::new(Echo::default());
        let handler: Arc<dyn ToolHandler> = Arc::<Echo>::clone(&echo);
        let mut registry = ToolRegistry::new();
        registry
            .register("echo", "echo", echo_schema(), handler)
            .unwrap();

        let err = registry.dispatch("echo", json!({})).await.unwrap_err();

        let ToolError::Validation(validation) = err else {
            panic!("expected validation error, got {err:?}");
        };
        assert_eq!(validation.errors()[0].kind, FieldErrorKind::Missing);
        assert_eq!(echo.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn valid_input_is_passed_through() {
        let echo = Arc::new(Echo::default());
        let handler: Arc<dyn ToolHandler> = Arc::<Echo>::clone(&echo);
        let mut registry = ToolRegistry::new();
        registry
            .register("echo", "echo", echo_schema(), handler)
            .unwrap();

        let response = registry
            .dispatch("echo", json!({"message": "hi"}))
            .await
            .unwrap();

        assert_eq!(response.content[0].as_text(), r#"{"message":"hi"}"#);
        assert_eq!(echo.calls.load(Ordering::SeqCst), 1);
    }
}
