//! Pre-flight schema validation
//!
//! The engine itself recovers from graph-integrity problems at runtime
//! (dangling references are logged and skipped, cycles are bounded by the
//! step budget). Callers that prefer failing fast can run this validator
//! before loading or triggering a schema.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::registry::NodeRegistry;
use crate::types::{node_types, WorkflowSchema};

/// Validation error with location context
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Cycle detected in the graph
    CycleDetected,
    /// A node has an unknown type (not in the registry)
    UnknownNodeType { node_id: String, node_type: String },
    /// A connection references a non-existent node
    UnknownNode { node_id: String },
    /// Two nodes share the same id
    DuplicateNodeId { node_id: String },
    /// No manual trigger to start the workflow from
    MissingTriggerNode,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CycleDetected => write!(f, "Cycle detected in graph"),
            Self::UnknownNodeType { node_id, node_type } => {
                write!(f, "Unknown node type '{}' for node '{}'", node_type, node_id)
            }
            Self::UnknownNode { node_id } => {
                write!(f, "Connection references unknown node '{}'", node_id)
            }
            Self::DuplicateNodeId { node_id } => {
                write!(f, "Duplicate node id '{}'", node_id)
            }
            Self::MissingTriggerNode => write!(f, "Workflow has no manual trigger node"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate a workflow schema
///
/// Returns all validation errors found (not just the first). Pass a
/// registry to enable node type validation.
pub fn validate_schema(
    schema: &WorkflowSchema,
    registry: Option<&NodeRegistry>,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    validate_node_ids(schema, &mut errors);
    validate_connection_references(schema, &mut errors);
    validate_trigger_present(schema, &mut errors);
    detect_cycles(schema, &mut errors);

    if let Some(reg) = registry {
        validate_node_types(schema, reg, &mut errors);
    }

    errors
}

fn validate_node_ids(schema: &WorkflowSchema, errors: &mut Vec<ValidationError>) {
    let mut seen = HashSet::new();
    for node in &schema.nodes {
        if !seen.insert(node.id.as_str()) {
            errors.push(ValidationError::DuplicateNodeId {
                node_id: node.id.clone(),
            });
        }
    }
}

fn validate_connection_references(schema: &WorkflowSchema, errors: &mut Vec<ValidationError>) {
    let node_ids: HashSet<&str> = schema.nodes.iter().map(|n| n.id.as_str()).collect();
    let mut reported = HashSet::new();

    for conn in &schema.connections {
        for endpoint in [conn.source.as_str(), conn.target.as_str()] {
            if !node_ids.contains(endpoint) && reported.insert(endpoint) {
                errors.push(ValidationError::UnknownNode {
                    node_id: endpoint.to_string(),
                });
            }
        }
    }
}

fn validate_trigger_present(schema: &WorkflowSchema, errors: &mut Vec<ValidationError>) {
    if schema.first_node_of_type(node_types::TRIGGER_MANUAL).is_none() {
        errors.push(ValidationError::MissingTriggerNode);
    }
}

fn validate_node_types(
    schema: &WorkflowSchema,
    registry: &NodeRegistry,
    errors: &mut Vec<ValidationError>,
) {
    for node in &schema.nodes {
        if !registry.has_node_type(&node.node_type) {
            errors.push(ValidationError::UnknownNodeType {
                node_id: node.id.clone(),
                node_type: node.node_type.clone(),
            });
        }
    }
}

/// Kahn's algorithm: if topological ordering cannot consume every node
/// with at least one edge, the remainder contains a cycle.
fn detect_cycles(schema: &WorkflowSchema, errors: &mut Vec<ValidationError>) {
    let node_ids: HashSet<&str> = schema.nodes.iter().map(|n| n.id.as_str()).collect();

    let mut in_degree: HashMap<&str, usize> = node_ids.iter().map(|id| (*id, 0)).collect();
    let mut outgoing: HashMap<&str, Vec<&str>> = HashMap::new();
    for conn in &schema.connections {
        let (source, target) = (conn.source.as_str(), conn.target.as_str());
        // Dangling endpoints are reported separately
        if !node_ids.contains(source) || !node_ids.contains(target) {
            continue;
        }
        outgoing.entry(source).or_default().push(target);
        if let Some(d) = in_degree.get_mut(target) {
            *d += 1;
        }
    }

    let mut queue: VecDeque<&str> = in_degree
        .iter()
        .filter(|(_, d)| **d == 0)
        .map(|(id, _)| *id)
        .collect();

    let mut visited = 0usize;
    while let Some(id) = queue.pop_front() {
        visited += 1;
        for &target in outgoing.get(id).into_iter().flatten() {
            if let Some(d) = in_degree.get_mut(target) {
                *d -= 1;
                if *d == 0 {
                    queue.push_back(target);
                }
            }
        }
    }

    if visited < node_ids.len() {
        errors.push(ValidationError::CycleDetected);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Connection, NodeDefinition};

    fn trigger_schema() -> WorkflowSchema {
        WorkflowSchema::new("wf", "Valid")
            .with_node(NodeDefinition::new("t", node_types::TRIGGER_MANUAL))
            .with_node(NodeDefinition::new("a", node_types::ACTION_LOG))
            .with_connection(Connection::new("t", "a"))
    }

    #[test]
    fn test_valid_schema_has_no_errors() {
        assert!(validate_schema(&trigger_schema(), None).is_empty());
    }

    #[test]
    fn test_dangling_connection_reported() {
        let schema = trigger_schema().with_connection(Connection::new("a", "ghost"));
        let errors = validate_schema(&schema, None);
        assert!(errors.contains(&ValidationError::UnknownNode {
            node_id: "ghost".to_string()
        }));
    }

    #[test]
    fn test_missing_trigger_reported() {
        let schema = WorkflowSchema::new("wf", "No trigger")
            .with_node(NodeDefinition::new("a", node_types::ACTION_LOG));
        let errors = validate_schema(&schema, None);
        assert!(errors.contains(&ValidationError::MissingTriggerNode));
    }

    #[test]
    fn test_cycle_reported() {
        let schema = trigger_schema()
            .with_node(NodeDefinition::new("b", node_types::ACTION_LOG))
            .with_connection(Connection::new("a", "b"))
            .with_connection(Connection::new("b", "a"));
        let errors = validate_schema(&schema, None);
        assert!(errors.contains(&ValidationError::CycleDetected));
    }

    #[test]
    fn test_self_loop_reported() {
        let schema = trigger_schema().with_connection(Connection::new("a", "a"));
        let errors = validate_schema(&schema, None);
        assert!(errors.contains(&ValidationError::CycleDetected));
    }

    #[test]
    fn test_duplicate_node_id_reported() {
        let schema = trigger_schema().with_node(NodeDefinition::new("a", node_types::ACTION_LOG));
        let errors = validate_schema(&schema, None);
        assert!(errors.contains(&ValidationError::DuplicateNodeId {
            node_id: "a".to_string()
        }));
    }

    #[test]
    fn test_unknown_type_requires_registry() {
        let schema = trigger_schema();
        // Without a registry, node types are not checked
        assert!(validate_schema(&schema, None).is_empty());

        let registry = NodeRegistry::new();
        let errors = validate_schema(&schema, Some(&registry));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::UnknownNodeType { node_id, .. } if node_id == "t")));
    }
}
