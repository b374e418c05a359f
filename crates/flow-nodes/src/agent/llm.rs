//! LLM agent node
//!
//! Produces an assistant message of the shape
//! `{ "role", "content", "usage": { "total_tokens" } }` from the upstream
//! input and a configured system prompt. The current backend is a stub
//! with artificial latency; the response shape is the contract any real
//! model integration must keep, so the engine and downstream nodes stay
//! agnostic to which backend produced the data.

use std::time::Duration;

use async_trait::async_trait;
use flow_engine::{
    node_types, ExecutionContext, NodeBehavior, NodeCategory, NodeDefinition, NodeMetadata, Result,
};
use serde::Deserialize;
use serde_json::{json, Value};

const DEFAULT_LATENCY_MS: u64 = 1500;

fn default_latency_ms() -> u64 {
    DEFAULT_LATENCY_MS
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AgentConfig {
    /// System instruction prefixed to the model call
    #[serde(default)]
    system_prompt: Option<String>,
    /// Simulated backend latency
    #[serde(default = "default_latency_ms")]
    latency_ms: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            system_prompt: None,
            latency_ms: DEFAULT_LATENCY_MS,
        }
    }
}

/// LLM agent node (stubbed backend)
pub struct LlmAgentNode {
    node_id: String,
    config: AgentConfig,
}

impl LlmAgentNode {
    /// Registry metadata for this node type
    pub fn metadata() -> NodeMetadata {
        NodeMetadata::new(
            node_types::AGENT_LLM,
            NodeCategory::Agent,
            "AI Agent",
            "Runs the input through a language model and returns the assistant message",
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

    fn compose_content(&self, input: &Value) -> String {
        match self.config.system_prompt.as_deref() {
            Some(prompt) => format!("[{}] Mock analysis of input: {}", prompt, input),
            None => format!("Mock analysis of input: {}", input),
        }
    }
}

#[async_trait]
impl NodeBehavior for LlmAgentNode {
    async fn execute(&self, input: &Value, _context: &ExecutionContext) -> Result<Value> {
        log::info!(
            "[{}] AI agent thinking (system prompt: {:?})",
            self.node_id,
            self.config.system_prompt
        );

        // Simulated backend latency
        tokio::time::sleep(Duration::from_millis(self.config.latency_ms)).await;

        let content = self.compose_content(input);
        let total_tokens = (content.len() / 4).max(1);
        Ok(json!({
            "role": "assistant",
            "content": content,
            "usage": { "total_tokens": total_tokens }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_node(data: Value) -> LlmAgentNode {
        let def = NodeDefinition::new("agent1", node_types::AGENT_LLM).with_data(data);
        LlmAgentNode::from_definition(&def)
    }

    #[tokio::test]
    async fn test_response_shape() {
        let node = fast_node(json!({"latencyMs": 0}));
        let ctx = ExecutionContext::new();

        let out = node.execute(&json!({"reading": 7}), &ctx).await.unwrap();
        assert_eq!(out["role"], json!("assistant"));
        assert!(out["content"].as_str().unwrap().contains("\"reading\":7"));
        assert!(out["usage"]["total_tokens"].as_u64().unwrap() >= 1);
    }

    #[tokio::test]
    async fn test_system_prompt_reflected() {
        let node = fast_node(json!({"systemPrompt": "Be terse", "latencyMs": 0}));
        let ctx = ExecutionContext::new();

        let out = node.execute(&Value::Null, &ctx).await.unwrap();
        assert!(out["content"].as_str().unwrap().starts_with("[Be terse]"));
    }

    #[test]
    fn test_latency_defaults() {
        let node = fast_node(Value::Null);
        assert_eq!(node.config.latency_ms, DEFAULT_LATENCY_MS);
    }
}
