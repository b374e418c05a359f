//! Log action node
//!
//! Pure pass-through: logs whatever flows through it, optionally with a
//! configured label, and returns the input unchanged so it can be dropped
//! anywhere in a chain. Never fails under normal conditions.

use async_trait::async_trait;
use flow_engine::{
    node_types, ExecutionContext, NodeBehavior, NodeCategory, NodeDefinition, NodeMetadata, Result,
};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Default, Deserialize)]
struct LogConfig {
    /// Optional label shown before the logged payload
    #[serde(default)]
    message: Option<String>,
}

/// Log action node: pass-through with a logging side effect
pub struct LogNode {
    node_id: String,
    config: LogConfig,
}

impl LogNode {
    /// Registry metadata for this node type
    pub fn metadata() -> NodeMetadata {
        NodeMetadata::new(
            node_types::ACTION_LOG,
            NodeCategory::Action,
            "Log",
            "Logs the incoming data and passes it through unchanged",
        )
    }

    /// Build an instance from a schema definition
    pub fn from_definition(definition: &NodeDefinition) -> Self {
        // Unknown fields are ignored rather than rejected
        let config = serde_json::from_value(definition.data.clone()).unwrap_or_default();
        Self {
            node_id: definition.id.clone(),
            config,
        }
    }
}

#[async_trait]
impl NodeBehavior for LogNode {
    async fn execute(&self, input: &Value, _context: &ExecutionContext) -> Result<Value> {
        let label = self.config.message.as_deref().unwrap_or("Log node output:");
        log::info!("[{}] {} {}", self.node_id, label, input);
        Ok(input.clone())
    }
}
