//! Node type registry
//!
//! The registry decouples "what node types exist" from "how the engine
//! builds them": it maps a type key to a factory producing an executable
//! [`NodeBehavior`], plus metadata for palette/validation use.
//!
//! The registry is an explicit object, constructed and populated during
//! application bootstrap and handed to the engine by `Arc`. All node types
//! must be registered before any schema referencing them is executed;
//! that ordering is a setup contract, not something the engine enforces.
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use flow_engine::NodeRegistry;
//!
//! let mut registry = NodeRegistry::new();
//! registry.register_fn(MyNode::metadata(), |def| {
//!     Arc::new(MyNode::from_definition(def))
//! });
//! assert!(registry.has_node_type("my-node"));
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::context::ExecutionContext;
use crate::error::{FlowError, Result};
use crate::node::NodeBehavior;
use crate::types::NodeDefinition;

/// Category of a node type, used for palette grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeCategory {
    /// Graph entry points
    Trigger,
    /// Side-effecting actions (log, HTTP, ...)
    Action,
    /// Control/utility nodes (delay, ...)
    Logic,
    /// LLM-backed nodes
    Agent,
}

/// Metadata describing a registered node type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeMetadata {
    /// Unique type key (e.g. "action_http")
    pub node_type: String,
    /// Category for grouping
    pub category: NodeCategory,
    /// Human-readable label
    pub label: String,
    /// Description of what the node does
    pub description: String,
}

impl NodeMetadata {
    /// Create node type metadata
    pub fn new(
        node_type: impl Into<String>,
        category: NodeCategory,
        label: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            node_type: node_type.into(),
            category,
            label: label.into(),
            description: description.into(),
        }
    }
}

/// Factory producing a behavior from a node definition
pub trait NodeFactory: Send + Sync {
    /// Build the behavior for one node instance
    fn create(&self, definition: &NodeDefinition) -> Arc<dyn NodeBehavior>;
}

/// A registration entry combining metadata with its factory
struct RegistryEntry {
    metadata: NodeMetadata,
    factory: Arc<dyn NodeFactory>,
}

/// Registry of node types
///
/// Registries can be composed by merging:
/// ```ignore
/// let mut registry = NodeRegistry::new();
/// // Register built-in nodes...
/// registry.merge(plugin_registry); // Add external nodes
/// ```
#[derive(Default)]
pub struct NodeRegistry {
    entries: HashMap<String, RegistryEntry>,
}

impl NodeRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Register a node type; the last registration for a key wins
    pub fn register(&mut self, metadata: NodeMetadata, factory: Arc<dyn NodeFactory>) {
        self.entries.insert(
            metadata.node_type.clone(),
            RegistryEntry { metadata, factory },
        );
    }

    /// Register a node type using a closure factory
    pub fn register_fn<F>(&mut self, metadata: NodeMetadata, factory: F)
    where
        F: Fn(&NodeDefinition) -> Arc<dyn NodeBehavior> + Send + Sync + 'static,
    {
        self.register(metadata, Arc::new(FnFactory(factory)));
    }

    /// Build a behavior for a node definition
    ///
    /// An unknown type is not an immediate error: a fallback behavior is
    /// returned whose `execute` deterministically fails with
    /// [`FlowError::UnregisteredNodeType`], so the engine records the node
    /// as failed instead of silently succeeding with no behavior.
    pub fn create(&self, definition: &NodeDefinition) -> Arc<dyn NodeBehavior> {
        match self.entries.get(&definition.node_type) {
            Some(entry) => entry.factory.create(definition),
            None => {
                log::warn!(
                    "Node type '{}' not found in registry (node '{}')",
                    definition.node_type,
                    definition.id
                );
                Arc::new(UnregisteredBehavior {
                    node_id: definition.id.clone(),
                    node_type: definition.node_type.clone(),
                })
            }
        }
    }

    /// Get metadata for a node type
    pub fn metadata(&self, node_type: &str) -> Option<&NodeMetadata> {
        self.entries.get(node_type).map(|e| &e.metadata)
    }

    /// All registered metadata
    pub fn all_metadata(&self) -> Vec<&NodeMetadata> {
        self.entries.values().map(|e| &e.metadata).collect()
    }

    /// Check if a node type is registered
    pub fn has_node_type(&self, node_type: &str) -> bool {
        self.entries.contains_key(node_type)
    }

    /// List all registered node type keys
    pub fn node_types(&self) -> Vec<&str> {
        self.entries.keys().map(|s| s.as_str()).collect()
    }

    /// Merge another registry into this one
    ///
    /// Entries from `other` override entries in `self` for shared keys.
    pub fn merge(&mut self, other: NodeRegistry) {
        self.entries.extend(other.entries);
    }
}

struct FnFactory<F>(F);

impl<F> NodeFactory for FnFactory<F>
where
    F: Fn(&NodeDefinition) -> Arc<dyn NodeBehavior> + Send + Sync,
{
    fn create(&self, definition: &NodeDefinition) -> Arc<dyn NodeBehavior> {
        (self.0)(definition)
    }
}

/// Fallback behavior for unknown node types: always fails
struct UnregisteredBehavior {
    node_id: String,
    node_type: String,
}

#[async_trait]
impl NodeBehavior for UnregisteredBehavior {
    async fn execute(
        &self,
        _input: &serde_json::Value,
        _context: &ExecutionContext,
    ) -> Result<serde_json::Value> {
        Err(FlowError::UnregisteredNodeType {
            node_id: self.node_id.clone(),
            node_type: self.node_type.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Behavior that returns its input unchanged
    struct EchoBehavior;

    #[async_trait]
    impl NodeBehavior for EchoBehavior {
        async fn execute(
            &self,
            input: &serde_json::Value,
            _context: &ExecutionContext,
        ) -> Result<serde_json::Value> {
            Ok(input.clone())
        }
    }

    fn echo_metadata(node_type: &str) -> NodeMetadata {
        NodeMetadata::new(node_type, NodeCategory::Action, "Echo", "Returns its input")
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = NodeRegistry::new();
        registry.register_fn(echo_metadata("echo"), |_def| {
            Arc::new(EchoBehavior)
        });

        assert!(registry.has_node_type("echo"));
        assert!(!registry.has_node_type("unknown"));
        assert_eq!(registry.metadata("echo").unwrap().label, "Echo");
        assert_eq!(registry.node_types(), vec!["echo"]);
    }

    #[test]
    fn test_last_registration_wins() {
        let mut registry = NodeRegistry::new();
        let mut first = echo_metadata("echo");
        first.label = "First".to_string();
        registry.register_fn(first, |_def| Arc::new(EchoBehavior));

        let mut second = echo_metadata("echo");
        second.label = "Second".to_string();
        registry.register_fn(second, |_def| Arc::new(EchoBehavior));

        assert_eq!(registry.metadata("echo").unwrap().label, "Second");
        assert_eq!(registry.all_metadata().len(), 1);
    }

    #[test]
    fn test_merge_registries() {
        let mut registry = NodeRegistry::new();
        registry.register_fn(echo_metadata("a"), |_def| {
            Arc::new(EchoBehavior)
        });

        let mut other = NodeRegistry::new();
        other.register_fn(echo_metadata("b"), |_def| {
            Arc::new(EchoBehavior)
        });

        registry.merge(other);
        assert!(registry.has_node_type("a"));
        assert!(registry.has_node_type("b"));
    }

    #[tokio::test]
    async fn test_unknown_type_fails_deterministically() {
        let registry = NodeRegistry::new();
        let def = NodeDefinition::new("n1", "does_not_exist");

        let behavior = registry.create(&def);
        let ctx = crate::context::ExecutionContext::new();
        let err = behavior
            .execute(&serde_json::Value::Null, &ctx)
            .await
            .unwrap_err();

        match err {
            FlowError::UnregisteredNodeType { node_id, node_type } => {
                assert_eq!(node_id, "n1");
                assert_eq!(node_type, "does_not_exist");
            }
            other => panic!("Expected UnregisteredNodeType, got {other:?}"),
        }
    }
}
