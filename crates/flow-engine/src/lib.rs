//! Flow Engine - node-graph workflow execution for Driftflow
//!
//! This crate provides a small workflow runtime: a registry-based node
//! type system and a breadth-first graph walker that propagates outputs
//! between heterogeneous node kinds. It supports:
//!
//! - Async node execution with per-branch failure isolation
//! - Fan-out with copy-per-edge delivery (no cross-branch mutation)
//! - Per-node status/result/error inspection after a run
//! - Lifecycle event streaming via [`EventSink`]
//! - Optional pre-flight schema validation
//!
//! # Architecture
//!
//! Node kinds implement [`NodeBehavior`] and are registered in a
//! [`NodeRegistry`] at bootstrap. The [`WorkflowEngine`] holds loaded
//! [`WorkflowSchema`] definitions by id; `trigger_workflow` instantiates
//! fresh nodes per run, walks the graph from the start node, and returns
//! an [`ExecutionContext`] summarizing the run.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use flow_engine::{NodeRegistry, WorkflowEngine, WorkflowSchema};
//!
//! let registry = Arc::new(flow_nodes::builtin_registry());
//! let mut engine = WorkflowEngine::new(registry);
//! engine.load_workflow(schema);
//! let context = engine.trigger_workflow("wf1", None, serde_json::json!({})).await?;
//! ```

pub mod context;
pub mod engine;
pub mod error;
pub mod events;
pub mod node;
pub mod registry;
pub mod types;
pub mod validation;

// Re-export key types
pub use context::{ExecutionContext, NodeRunState};
pub use engine::{ActiveExecution, WorkflowEngine, DEFAULT_MAX_STEPS};
pub use error::{FlowError, Result};
pub use events::{EventSink, FlowEvent, NullEventSink, VecEventSink};
pub use node::{NodeBehavior, WorkflowNode};
pub use registry::{NodeCategory, NodeFactory, NodeMetadata, NodeRegistry};
pub use types::{node_types, Connection, NodeDefinition, NodeId, NodeStatus, WorkflowSchema};
pub use validation::{validate_schema, ValidationError};
