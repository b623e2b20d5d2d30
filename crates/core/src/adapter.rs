//! Generation adapter trait: the boundary to the model API.
//!
//! An adapter takes an assembled [`InvocationContext`] and returns the
//! generated text. The resolver core never calls a model itself; it only
//! produces contexts for whichever adapter is plugged in.
//!
//! Implementations: mock, OpenAI-compatible endpoints.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AdapterError;
use crate::model::InvocationContext;

/// A tool definition passed through to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// The tool name
    pub name: String,

    /// Description of what the tool does
    pub description: String,

    /// JSON Schema describing the tool's parameters
    pub parameters: serde_json::Value,
}

/// The core adapter trait.
///
/// The agent calls `invoke()` without knowing which backend is behind it.
#[async_trait]
pub trait GenerationAdapter: Send + Sync {
    /// A human-readable name for this adapter (e.g., "mock", "openai").
    fn name(&self) -> &str;

    /// Send the assembled context and get the generated response text.
    async fn invoke(&self, context: &InvocationContext) -> std::result::Result<String, AdapterError>;

    /// Check that the service is reachable.
    async fn health_check(&self) -> std::result::Result<bool, AdapterError> {
        Ok(true)
    }
}
