//! Per-run execution context
//!
//! One [`ExecutionContext`] is created per trigger invocation and returned
//! to the caller once the graph walk drains. During execution it only
//! identifies and timestamps the run; when the run finishes the engine
//! fills in the per-node outcomes for post-run inspection.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{NodeId, NodeStatus};

/// Outcome of a single node within one run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRunState {
    /// Node id from the schema
    pub id: NodeId,
    /// Node type key
    #[serde(rename = "type")]
    pub node_type: String,
    /// Final status after the walk
    pub status: NodeStatus,
    /// Last output, if the node completed
    pub result: Option<serde_json::Value>,
    /// Failure message, if the node failed
    pub error: Option<String>,
}

/// The per-run handle returned by `trigger_workflow`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionContext {
    /// Unique, time-derived id for this run
    pub execution_id: String,
    /// Wall-clock start of the run
    pub started_at: DateTime<Utc>,
    /// Final state of every node instantiated for this run, keyed by id
    #[serde(default)]
    pub node_states: HashMap<NodeId, NodeRunState>,
    /// Ids of nodes that failed, in the order their failures were recorded
    #[serde(default)]
    pub failed_node_ids: Vec<NodeId>,
    /// True if the walk stopped early because the step budget was exhausted
    #[serde(default)]
    pub truncated: bool,
}

impl ExecutionContext {
    /// Create a fresh context with a time-derived execution id
    pub fn new() -> Self {
        let started_at = Utc::now();
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        Self {
            execution_id: format!("exec-{}-{}", started_at.timestamp_millis(), &suffix[..8]),
            started_at,
            node_states: HashMap::new(),
            failed_node_ids: Vec::new(),
            truncated: false,
        }
    }

    /// State of one node, if it was part of this run
    pub fn node_state(&self, node_id: &str) -> Option<&NodeRunState> {
        self.node_states.get(node_id)
    }

    /// Status of one node, if it was part of this run
    pub fn node_status(&self, node_id: &str) -> Option<NodeStatus> {
        self.node_states.get(node_id).map(|s| s.status)
    }

    /// True if no node failed and the walk was not truncated
    pub fn succeeded(&self) -> bool {
        self.failed_node_ids.is_empty() && !self.truncated
    }
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execution_ids_are_unique() {
        let a = ExecutionContext::new();
        let b = ExecutionContext::new();
        assert_ne!(a.execution_id, b.execution_id);
        assert!(a.execution_id.starts_with("exec-"));
    }

    #[test]
    fn test_fresh_context_is_successful() {
        let ctx = ExecutionContext::new();
        assert!(ctx.succeeded());
        assert!(ctx.node_state("anything").is_none());
    }
}
