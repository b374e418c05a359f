//! Node abstraction
//!
//! Every node kind implements [`NodeBehavior`]: given the upstream input
//! and the shared run context, produce the output to propagate, or fail.
//! Input is taken by shared reference — a node must never mutate the data
//! it receives, since the same output may be fanned out to several
//! successors. Nodes return a fresh value instead.

use std::sync::Arc;

use async_trait::async_trait;

use crate::context::{ExecutionContext, NodeRunState};
use crate::error::Result;
use crate::types::{NodeDefinition, NodeId, NodeStatus};

/// Execution contract implemented by every node kind
#[async_trait]
pub trait NodeBehavior: Send + Sync {
    /// Execute this node with the given input, returning the data to
    /// propagate to successors. Rejecting marks the node failed and prunes
    /// the branch beyond it.
    async fn execute(
        &self,
        input: &serde_json::Value,
        context: &ExecutionContext,
    ) -> Result<serde_json::Value>;
}

/// A runtime node instance, constructed fresh per execution
///
/// Carries the schema-level identity and configuration together with the
/// mutable per-run bookkeeping (status, result, error). Instances are
/// local to one run; nothing leaks between triggers.
pub struct WorkflowNode {
    /// Node id from the schema
    pub id: NodeId,
    /// Node type key
    pub node_type: String,
    /// Type-specific configuration
    pub data: serde_json::Value,
    /// Current status within this run
    pub status: NodeStatus,
    /// Last output, once completed
    pub result: Option<serde_json::Value>,
    /// Failure message, once failed
    pub error: Option<String>,
    behavior: Arc<dyn NodeBehavior>,
}

impl WorkflowNode {
    /// Build an instance from a schema definition and its behavior
    pub fn new(definition: &NodeDefinition, behavior: Arc<dyn NodeBehavior>) -> Self {
        Self {
            id: definition.id.clone(),
            node_type: definition.node_type.clone(),
            data: definition.data.clone(),
            status: NodeStatus::Pending,
            result: None,
            error: None,
            behavior,
        }
    }

    /// Invoke the underlying behavior
    pub async fn execute(
        &self,
        input: &serde_json::Value,
        context: &ExecutionContext,
    ) -> Result<serde_json::Value> {
        self.behavior.execute(input, context).await
    }

    /// Snapshot the per-run outcome for the execution context
    pub fn run_state(&self) -> NodeRunState {
        NodeRunState {
            id: self.id.clone(),
            node_type: self.node_type.clone(),
            status: self.status,
            result: self.result.clone(),
            error: self.error.clone(),
        }
    }
}

impl std::fmt::Debug for WorkflowNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowNode")
            .field("id", &self.id)
            .field("node_type", &self.node_type)
            .field("status", &self.status)
            .field("result", &self.result)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    #[async_trait]
    impl NodeBehavior for Echo {
        async fn execute(
            &self,
            input: &serde_json::Value,
            _context: &ExecutionContext,
        ) -> Result<serde_json::Value> {
            Ok(input.clone())
        }
    }

    #[tokio::test]
    async fn test_instance_starts_pending() {
        let def = NodeDefinition::new("n1", "echo");
        let node = WorkflowNode::new(&def, Arc::new(Echo));
        assert_eq!(node.status, NodeStatus::Pending);
        assert!(node.result.is_none());
        assert!(node.error.is_none());

        let ctx = ExecutionContext::new();
        let out = node.execute(&serde_json::json!({"k": 1}), &ctx).await.unwrap();
        assert_eq!(out, serde_json::json!({"k": 1}));
    }

    #[test]
    fn test_run_state_snapshot() {
        let def = NodeDefinition::new("n1", "echo");
        let mut node = WorkflowNode::new(&def, Arc::new(Echo));
        node.status = NodeStatus::Failed;
        node.error = Some("boom".to_string());

        let state = node.run_state();
        assert_eq!(state.id, "n1");
        assert_eq!(state.status, NodeStatus::Failed);
        assert_eq!(state.error.as_deref(), Some("boom"));
    }
}
