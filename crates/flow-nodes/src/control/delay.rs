//! Delay node
//!
//! Holds the branch for a configured duration, then passes its input
//! through unchanged. Sibling branches are not delayed only because the
//! walk is single-queue; a parallel scheduler would let them proceed.

use std::time::Duration;

use async_trait::async_trait;
use flow_engine::{
    node_types, ExecutionContext, NodeBehavior, NodeCategory, NodeDefinition, NodeMetadata, Result,
};
use serde::Deserialize;
use serde_json::Value;

const DEFAULT_DURATION_MS: u64 = 1000;

fn default_duration_ms() -> u64 {
    DEFAULT_DURATION_MS
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DelayConfig {
    /// How long to hold the branch, in milliseconds
    #[serde(default = "default_duration_ms")]
    duration_ms: u64,
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self {
            duration_ms: DEFAULT_DURATION_MS,
        }
    }
}

/// Delay node: pass-through after a configured pause
pub struct DelayNode {
    node_id: String,
    config: DelayConfig,
}

impl DelayNode {
    /// Registry metadata for this node type
    pub fn metadata() -> NodeMetadata {
        NodeMetadata::new(
            node_types::LOGIC_DELAY,
            NodeCategory::Logic,
            "Delay",
            "Waits for a configured duration before passing data through",
        )
    }

    /// Build an instance from a schema definition
    pub fn from_definition(definition: &NodeDefinition) -> Self {
        let config = serde_json::from_value(definition.data.clone()).unwrap_or_default();
        Self {
            node_id: definition.id.clone(),
            config,
        }
    }
}

#[async_trait]
impl NodeBehavior for DelayNode {
    async fn execute(&self, input: &Value, _context: &ExecutionContext) -> Result<Value> {
        log::debug!("[{}] Delaying {} ms", self.node_id, self.config.duration_ms);
        tokio::time::sleep(Duration::from_millis(self.config.duration_ms)).await;
        Ok(input.clone())
    }
}
