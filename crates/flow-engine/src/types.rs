//! Core types for workflow schemas
//!
//! These types define the serialized shape of a workflow: nodes with
//! type-specific configuration, and directed connections between them.
//! Layout coordinates are carried for the editor but ignored by execution.

use serde::{Deserialize, Serialize};

/// Unique identifier for a node within a schema
pub type NodeId = String;

/// Well-known node type keys
///
/// These are the wire values stored in [`NodeDefinition::node_type`] and
/// used as registry keys. Additional types may be registered at bootstrap;
/// this module only names the built-in set.
pub mod node_types {
    /// Manual trigger, the conventional graph entry point
    pub const TRIGGER_MANUAL: &str = "trigger_manual";
    /// Pass-through logging action
    pub const ACTION_LOG: &str = "action_log";
    /// HTTP request action
    pub const ACTION_HTTP: &str = "action_http";
    /// Pass-through delay
    pub const LOGIC_DELAY: &str = "logic_delay";
    /// LLM agent call
    pub const AGENT_LLM: &str = "agent_llm";
}

/// Execution status of a node within one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeStatus {
    /// Not yet reached by the graph walk
    Pending,
    /// Currently executing
    Running,
    /// Executed successfully
    Completed,
    /// Execution rejected; the branch beyond this node was pruned
    Failed,
}

/// A node in a workflow schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDefinition {
    /// Unique identifier within the schema
    pub id: NodeId,
    /// Node type (registry key)
    #[serde(rename = "type")]
    pub node_type: String,
    /// Type-specific configuration (URL for HTTP nodes, prompt for agents, ...)
    #[serde(default)]
    pub data: serde_json::Value,
    /// Editor layout coordinate, irrelevant to execution
    #[serde(default)]
    pub x: f64,
    /// Editor layout coordinate, irrelevant to execution
    #[serde(default)]
    pub y: f64,
}

impl NodeDefinition {
    /// Create a node definition with null configuration at the origin
    pub fn new(id: impl Into<String>, node_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            node_type: node_type.into(),
            data: serde_json::Value::Null,
            x: 0.0,
            y: 0.0,
        }
    }

    /// Set the configuration payload
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = data;
        self
    }

    /// Set the editor layout position
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }
}

/// A directed connection: the target receives the source's output as input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    /// Source node ID
    pub source: NodeId,
    /// Target node ID
    pub target: NodeId,
}

impl Connection {
    /// Create a connection from `source` to `target`
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// A complete workflow definition
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkflowSchema {
    /// Unique identifier for this workflow
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Nodes in the workflow
    #[serde(default)]
    pub nodes: Vec<NodeDefinition>,
    /// Connections between nodes
    #[serde(default)]
    pub connections: Vec<Connection>,
}

impl WorkflowSchema {
    /// Create a new empty schema
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            nodes: Vec::new(),
            connections: Vec::new(),
        }
    }

    /// Add a node
    pub fn with_node(mut self, node: NodeDefinition) -> Self {
        self.nodes.push(node);
        self
    }

    /// Add a connection
    pub fn with_connection(mut self, connection: Connection) -> Self {
        self.connections.push(connection);
        self
    }

    /// Find a node by ID
    pub fn find_node(&self, id: &str) -> Option<&NodeDefinition> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// First node of the given type, in schema order
    pub fn first_node_of_type(&self, node_type: &str) -> Option<&NodeDefinition> {
        self.nodes.iter().find(|n| n.node_type == node_type)
    }

    /// Connections going out of a node
    pub fn outgoing_connections<'a>(
        &'a self,
        node_id: &'a str,
    ) -> impl Iterator<Item = &'a Connection> + 'a {
        self.connections.iter().filter(move |c| c.source == node_id)
    }
}
