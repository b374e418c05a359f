//! Manual trigger node
//!
//! The conventional start node: when no explicit start node id is given,
//! the engine locates the first node of this type in the schema. It
//! ignores its input and emits a `triggeredAt` timestamp merged with any
//! configured data, so a trigger can seed static payload fields into the
//! run. Never fails.

use async_trait::async_trait;
use chrono::Utc;
use flow_engine::{
    node_types, ExecutionContext, NodeBehavior, NodeCategory, NodeDefinition, NodeMetadata, Result,
};
use serde_json::{json, Value};

/// Manual trigger node
///
/// # Output
/// `{ "triggeredAt": <RFC 3339 timestamp>, ...configured data fields }`
pub struct ManualTriggerNode {
    node_id: String,
    data: Value,
}

impl ManualTriggerNode {
    /// Registry metadata for this node type
    pub fn metadata() -> NodeMetadata {
        NodeMetadata::new(
            node_types::TRIGGER_MANUAL,
            NodeCategory::Trigger,
            "Manual Trigger",
            "Starts the workflow when triggered by the user",
        )
    }

    /// Build an instance from a schema definition
    pub fn from_definition(definition: &NodeDefinition) -> Self {
        Self {
            node_id: definition.id.clone(),
            data: definition.data.clone(),
        }
    }
}

#[async_trait]
impl NodeBehavior for ManualTriggerNode {
    async fn execute(&self, _input: &Value, context: &ExecutionContext) -> Result<Value> {
        log::info!(
            "[{}] Manual trigger fired (execution {})",
            self.node_id,
            context.execution_id
        );

        let mut output = serde_json::Map::new();
        output.insert("triggeredAt".to_string(), json!(Utc::now().to_rfc3339()));
        // Configured fields win over the timestamp on key collision
        if let Some(configured) = self.data.as_object() {
            for (key, value) in configured {
                output.insert(key.clone(), value.clone());
            }
        }
        Ok(Value::Object(output))
    }
}
