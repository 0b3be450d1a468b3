//! Flow module - Classify statement lines and build the control-flow graph

use crate::parser::Line;
use crate::Result;

pub mod builder;
pub mod classifier;
pub mod graph;
pub mod state;
pub mod transition;

// Re-export key types
pub use classifier::Classifier;
pub use graph::{FlowGraph, GraphStats};
pub use state::{ControlState, StateId, StateKind, Visibility};
pub use transition::Event;

/// Classify a segmented line sequence and build its flow graph
pub fn build_flow_graph(lines: &[Line], unit_name: &str) -> Result<FlowGraph> {
    let states = Classifier::new().classify(lines);
    builder::GraphBuilder::build(states, unit_name)
}
