//! Workflow execution engine
//!
//! Owns loaded workflow definitions and drives runs: builds fresh node
//! instances from a schema via the registry, derives an adjacency list
//! from the connections, then walks the graph breadth-first from the
//! start node, propagating each node's output to its successors.
//!
//! Scheduling is single-queue and cooperative: each node's `execute` is
//! awaited to completion before its successors are enqueued, so execution
//! order is breadth-first by graph distance from the start node. A node
//! failure prunes only the branch beyond it; already-queued branches
//! continue, and the run itself still resolves. Cyclic schemas are bounded
//! by a step budget rather than a visited set, preserving
//! fire-once-per-incoming-edge semantics for fan-in.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use crate::context::ExecutionContext;
use crate::error::{FlowError, Result};
use crate::events::{EventSink, FlowEvent, NullEventSink};
use crate::node::WorkflowNode;
use crate::registry::NodeRegistry;
use crate::types::{node_types, NodeId, NodeStatus, WorkflowSchema};

/// Default maximum number of node executions per run
pub const DEFAULT_MAX_STEPS: u32 = 1000;

/// An in-flight run, visible while its queue is draining
#[derive(Debug, Clone)]
pub struct ActiveExecution {
    /// Execution id of the run
    pub execution_id: String,
    /// Workflow the run belongs to
    pub workflow_id: String,
    /// When the run started
    pub started_at: DateTime<Utc>,
}

/// A unit of work in the breadth-first queue
struct QueuedTask {
    node_id: NodeId,
    input: serde_json::Value,
}

/// The workflow engine
///
/// `load_workflow` is the only writer of the definition map and takes
/// `&mut self`; triggering only reads it, so concurrent runs of loaded
/// workflows are safe. Each run gets its own node instances — nothing is
/// shared between triggers of the same workflow id.
pub struct WorkflowEngine {
    workflows: HashMap<String, WorkflowSchema>,
    registry: Arc<NodeRegistry>,
    event_sink: Arc<dyn EventSink>,
    max_steps: u32,
    active_executions: Mutex<HashMap<String, ActiveExecution>>,
}

impl WorkflowEngine {
    /// Create an engine using the given registry
    pub fn new(registry: Arc<NodeRegistry>) -> Self {
        Self {
            workflows: HashMap::new(),
            registry,
            event_sink: Arc::new(NullEventSink),
            max_steps: DEFAULT_MAX_STEPS,
            active_executions: Mutex::new(HashMap::new()),
        }
    }

    /// Stream lifecycle events to the given sink
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.event_sink = sink;
        self
    }

    /// Override the per-run step budget
    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Register a workflow definition, overwriting any prior one with the same id
    pub fn load_workflow(&mut self, schema: WorkflowSchema) {
        log::info!("Loaded workflow: {} ({})", schema.name, schema.id);
        self.workflows.insert(schema.id.clone(), schema);
    }

    /// Look up a loaded workflow definition
    pub fn workflow(&self, workflow_id: &str) -> Option<&WorkflowSchema> {
        self.workflows.get(workflow_id)
    }

    /// Ids and metadata of runs currently in flight
    pub fn active_executions(&self) -> Vec<ActiveExecution> {
        self.active_executions
            .lock()
            .unwrap()
            .values()
            .cloned()
            .collect()
    }

    /// Start a run of a loaded workflow
    ///
    /// Uses `start_node_id` if given, otherwise the first manual trigger
    /// in the schema. Definition errors ([`FlowError::WorkflowNotFound`],
    /// [`FlowError::NoTriggerNode`]) reject before any node is
    /// instantiated. Node-level failures do not reject the returned
    /// future; inspect the context's node states and `failed_node_ids`.
    pub async fn trigger_workflow(
        &self,
        workflow_id: &str,
        start_node_id: Option<&str>,
        payload: serde_json::Value,
    ) -> Result<ExecutionContext> {
        let schema = self
            .workflows
            .get(workflow_id)
            .ok_or_else(|| FlowError::WorkflowNotFound(workflow_id.to_string()))?;

        let start_node_id = match start_node_id {
            Some(id) => id.to_string(),
            None => schema
                .first_node_of_type(node_types::TRIGGER_MANUAL)
                .map(|n| n.id.clone())
                .ok_or_else(|| FlowError::NoTriggerNode(workflow_id.to_string()))?,
        };

        self.execute_workflow(schema, &start_node_id, payload).await
    }

    /// The breadth-first graph walk
    async fn execute_workflow(
        &self,
        schema: &WorkflowSchema,
        start_node_id: &str,
        payload: serde_json::Value,
    ) -> Result<ExecutionContext> {
        let mut context = ExecutionContext::new();
        log::info!(
            "Starting execution {} for workflow {}",
            context.execution_id,
            schema.id
        );

        self.register_active(&context, &schema.id);
        self.emit(FlowEvent::WorkflowStarted {
            workflow_id: schema.id.clone(),
            execution_id: context.execution_id.clone(),
        });

        // Fresh instances per run, keyed by id. Duplicate ids in a schema
        // collapse to the last definition, matching map insertion.
        let mut instances: HashMap<NodeId, WorkflowNode> = schema
            .nodes
            .iter()
            .map(|def| {
                (
                    def.id.clone(),
                    WorkflowNode::new(def, self.registry.create(def)),
                )
            })
            .collect();

        // Adjacency list: source id -> target ids, one entry per edge
        let mut outgoing: HashMap<&str, Vec<&str>> = HashMap::new();
        for conn in &schema.connections {
            outgoing
                .entry(conn.source.as_str())
                .or_default()
                .push(conn.target.as_str());
        }

        let mut queue: VecDeque<QueuedTask> = VecDeque::new();
        queue.push_back(QueuedTask {
            node_id: start_node_id.to_string(),
            input: payload,
        });

        let mut steps: u32 = 0;
        while let Some(task) = queue.pop_front() {
            if steps >= self.max_steps {
                log::warn!(
                    "Execution {} exceeded step budget ({}); stopping walk",
                    context.execution_id,
                    self.max_steps
                );
                context.truncated = true;
                break;
            }
            steps += 1;

            let Some(node) = instances.get_mut(&task.node_id) else {
                // Dangling connection reference: skip the task, keep the run alive
                log::error!(
                    "Node '{}' referenced during execution but not defined in schema '{}'",
                    task.node_id,
                    schema.id
                );
                continue;
            };

            node.status = NodeStatus::Running;
            self.emit(FlowEvent::NodeStarted {
                node_id: node.id.clone(),
                execution_id: context.execution_id.clone(),
            });

            match node.execute(&task.input, &context).await {
                Ok(output) => {
                    node.status = NodeStatus::Completed;
                    node.result = Some(output.clone());
                    self.emit(FlowEvent::NodeCompleted {
                        node_id: node.id.clone(),
                        execution_id: context.execution_id.clone(),
                        output: Some(output.clone()),
                    });

                    // Fan-out delivers a clone per edge so one branch can
                    // never observe another branch's mutations.
                    if let Some(targets) = outgoing.get(task.node_id.as_str()) {
                        for target in targets {
                            queue.push_back(QueuedTask {
                                node_id: (*target).to_string(),
                                input: output.clone(),
                            });
                        }
                    }
                }
                Err(err) => {
                    log::error!(
                        "Error executing node '{}' in execution {}: {}",
                        task.node_id,
                        context.execution_id,
                        err
                    );
                    node.status = NodeStatus::Failed;
                    node.error = Some(err.to_string());
                    context.failed_node_ids.push(node.id.clone());
                    self.emit(FlowEvent::NodeFailed {
                        node_id: node.id.clone(),
                        execution_id: context.execution_id.clone(),
                        error: err.to_string(),
                    });
                    // Successors are not enqueued: this branch is pruned,
                    // already-queued branches continue.
                }
            }
        }

        context.node_states = instances
            .values()
            .map(|node| (node.id.clone(), node.run_state()))
            .collect();

        self.emit(FlowEvent::WorkflowCompleted {
            workflow_id: schema.id.clone(),
            execution_id: context.execution_id.clone(),
            failed_nodes: context.failed_node_ids.len(),
        });
        self.deregister_active(&context.execution_id);
        log::info!("Execution {} finished", context.execution_id);

        Ok(context)
    }

    fn register_active(&self, context: &ExecutionContext, workflow_id: &str) {
        self.active_executions.lock().unwrap().insert(
            context.execution_id.clone(),
            ActiveExecution {
                execution_id: context.execution_id.clone(),
                workflow_id: workflow_id.to_string(),
                started_at: context.started_at,
            },
        );
    }

    fn deregister_active(&self, execution_id: &str) {
        self.active_executions.lock().unwrap().remove(execution_id);
    }

    fn emit(&self, event: FlowEvent) {
        // A failing sink must never affect the run
        let _ = self.event_sink.send(event);
    }
}
