//! Built-in node kinds for the Driftflow workflow engine
//!
//! Each node kind implements [`flow_engine::NodeBehavior`] and ships with
//! its registry metadata. Nothing here registers itself at import time;
//! call [`register_builtin_nodes`] (or [`builtin_registry`]) during
//! application bootstrap, before any schema referencing these types is
//! executed.

pub mod action;
pub mod agent;
pub mod control;
pub mod trigger;

use std::sync::Arc;

use flow_engine::NodeRegistry;

pub use action::{HttpActionNode, LogNode};
pub use agent::LlmAgentNode;
pub use control::DelayNode;
pub use trigger::ManualTriggerNode;

/// Register every built-in node kind into the given registry
pub fn register_builtin_nodes(registry: &mut NodeRegistry) {
    registry.register_fn(ManualTriggerNode::metadata(), |def| {
        Arc::new(ManualTriggerNode::from_definition(def))
    });
    registry.register_fn(LogNode::metadata(), |def| {
        Arc::new(LogNode::from_definition(def))
    });
    registry.register_fn(HttpActionNode::metadata(), |def| {
        Arc::new(HttpActionNode::from_definition(def))
    });
    registry.register_fn(DelayNode::metadata(), |def| {
        Arc::new(DelayNode::from_definition(def))
    });
    registry.register_fn(LlmAgentNode::metadata(), |def| {
        Arc::new(LlmAgentNode::from_definition(def))
    });
}

/// A registry populated with all built-in node kinds
pub fn builtin_registry() -> NodeRegistry {
    let mut registry = NodeRegistry::new();
    register_builtin_nodes(&mut registry);
    registry
}
