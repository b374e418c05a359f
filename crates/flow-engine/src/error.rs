//! Error types for the workflow engine

use thiserror::Error;

/// Result type alias using FlowError
pub type Result<T> = std::result::Result<T, FlowError>;

/// Errors that can occur in the workflow engine
#[derive(Debug, Error)]
pub enum FlowError {
    /// No workflow loaded under the requested id
    #[error("Workflow '{0}' not found")]
    WorkflowNotFound(String),

    /// No explicit start node and no manual trigger in the schema
    #[error("No trigger node found to start workflow '{0}'")]
    NoTriggerNode(String),

    /// A node references a type with no registered factory
    #[error("Unregistered node type '{node_type}' for node '{node_id}'")]
    UnregisteredNodeType { node_id: String, node_type: String },

    /// Missing or malformed node configuration
    #[error("Invalid configuration for node '{node_id}': {message}")]
    InvalidConfig { node_id: String, message: String },

    /// Node execution failed
    #[error("Node execution failed: {0}")]
    ExecutionFailed(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FlowError {
    /// Create an execution failed error with a message
    pub fn failed(msg: impl Into<String>) -> Self {
        Self::ExecutionFailed(msg.into())
    }

    /// Create an invalid configuration error for a node
    pub fn invalid_config(node_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            node_id: node_id.into(),
            message: message.into(),
        }
    }
}
