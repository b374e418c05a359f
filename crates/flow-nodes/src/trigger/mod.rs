//! Trigger nodes: graph entry points

mod manual;

pub use manual::ManualTriggerNode;
