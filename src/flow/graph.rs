//! Flow graph storage and queries

use crate::flow::state::{ControlState, StateId};
use crate::flow::transition::Event;
use petgraph::stable_graph::{NodeIndex, StableGraph};
use petgraph::Direction;
use std::collections::HashMap;

/// A directed graph of control states connected by labelled transitions.
///
/// Nodes are the classified control states of one translation unit (plus
/// the synthetic initial/final states); edges carry the transition events.
/// Node and edge insertion order is the deterministic traversal order the
/// model synthesizer relies on.
pub struct FlowGraph {
    /// The underlying graph structure
    pub graph: StableGraph<ControlState, Event>,

    /// Lookup from sparse model ids to graph nodes.
    ///
    /// Only id-bearing states are indexed: they are the states that appear
    /// in the synthesized model, and the counterexample decoder resolves
    /// trace entries back through this map.
    pub id_index: HashMap<StateId, NodeIndex>,

    /// Name of the analyzed translation unit
    pub unit_name: String,

    /// Number of exported callables walked (the complexity formula's
    /// component count)
    pub components: usize,
}

impl FlowGraph {
    /// Assemble a graph from the builder's ordered states and transitions
    pub fn from_parts(
        unit_name: &str,
        states: Vec<ControlState>,
        transitions: Vec<(usize, usize, Event)>,
        components: usize,
    ) -> Self {
        let mut graph = StableGraph::new();
        let mut id_index = HashMap::new();
        let mut nodes = Vec::with_capacity(states.len());

        for state in states {
            let id = state.id;
            let node = graph.add_node(state);
            if let Some(id) = id {
                id_index.insert(id, node);
            }
            nodes.push(node);
        }

        for (from, to, event) in transitions {
            graph.add_edge(nodes[from], nodes[to], event);
        }

        Self {
            graph,
            id_index,
            unit_name: unit_name.to_string(),
            components,
        }
    }

    /// States in classification order
    pub fn states(&self) -> impl Iterator<Item = &ControlState> {
        self.graph.node_indices().filter_map(|n| self.graph.node_weight(n))
    }

    /// Transitions in commit order
    pub fn transitions(&self) -> impl Iterator<Item = (&ControlState, &ControlState, &Event)> {
        self.graph.edge_indices().filter_map(|e| {
            let (from, to) = self.graph.edge_endpoints(e)?;
            Some((
                self.graph.node_weight(from)?,
                self.graph.node_weight(to)?,
                self.graph.edge_weight(e)?,
            ))
        })
    }

    /// Resolve a sparse model id back to its state
    pub fn state_by_id(&self, id: StateId) -> Option<&ControlState> {
        self.id_index.get(&id).and_then(|&n| self.graph.node_weight(n))
    }

    /// Callable entry states (functions, constructors, operators)
    pub fn callables(&self) -> Vec<&ControlState> {
        self.states().filter(|s| s.is_callable()).collect()
    }

    /// States with no incoming transitions (excluding isolated connective tissue)
    pub fn initial_states(&self) -> Vec<&ControlState> {
        self.graph
            .node_indices()
            .filter(|&n| {
                self.graph.edges_directed(n, Direction::Incoming).count() == 0
                    && self.graph.edges_directed(n, Direction::Outgoing).count() > 0
            })
            .filter_map(|n| self.graph.node_weight(n))
            .collect()
    }

    /// States with no outgoing transitions
    pub fn terminal_states(&self) -> Vec<&ControlState> {
        self.graph
            .node_indices()
            .filter(|&n| {
                self.graph.edges_directed(n, Direction::Outgoing).count() == 0
                    && self.graph.edges_directed(n, Direction::Incoming).count() > 0
            })
            .filter_map(|n| self.graph.node_weight(n))
            .collect()
    }

    /// Whether any loop back-edge survived into the graph
    pub fn has_cycles(&self) -> bool {
        petgraph::algo::is_cyclic_directed(&self.graph)
    }

    /// Export to DOT format for Graphviz
    pub fn to_dot(&self) -> String {
        let mut dot = "digraph FlowGraph {\n".to_string();
        dot.push_str("  rankdir=LR;\n");
        dot.push_str("  node [shape=box, style=filled, fillcolor=lightgray];\n\n");

        for node in self.graph.node_indices() {
            if let Some(state) = self.graph.node_weight(node) {
                let fill = if state.id.is_some() {
                    "lightblue"
                } else {
                    "lightgray"
                };
                dot.push_str(&format!(
                    "  \"{}\" [label=\"{}\", fillcolor=\"{}\"];\n",
                    dot_name(state, node),
                    state.label,
                    fill
                ));
            }
        }

        dot.push('\n');

        for edge in self.graph.edge_indices() {
            if let Some((from, to)) = self.graph.edge_endpoints(edge) {
                if let (Some(from_state), Some(to_state), Some(event)) = (
                    self.graph.node_weight(from),
                    self.graph.node_weight(to),
                    self.graph.edge_weight(edge),
                ) {
                    dot.push_str(&format!(
                        "  \"{}\" -> \"{}\" [label=\"{}\"];\n",
                        dot_name(from_state, from),
                        dot_name(to_state, to),
                        event
                    ));
                }
            }
        }

        dot.push_str("}\n");
        dot
    }

    /// Get graph statistics
    pub fn stats(&self) -> GraphStats {
        GraphStats {
            total_states: self.graph.node_count(),
            identified_states: self.states().filter(|s| s.id.is_some()).count(),
            total_transitions: self.graph.edge_count(),
            entry_points: self.components,
        }
    }
}

/// Unique DOT node name: the model name for identified states, a synthetic
/// node-indexed name for connective tissue
fn dot_name(state: &ControlState, node: NodeIndex) -> String {
    state
        .model_name()
        .unwrap_or_else(|| format!("{}_s{}", state.label, node.index()))
}

#[derive(Debug, Clone)]
pub struct GraphStats {
    pub total_states: usize,
    pub identified_states: usize,
    pub total_transitions: usize,
    pub entry_points: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::state::StateKind as K;

    fn state(kind: K, label: &str, id: Option<StateId>) -> ControlState {
        let mut s = ControlState::pseudo(kind, label);
        s.id = id;
        s
    }

    fn sample() -> FlowGraph {
        let states = vec![
            state(K::Initial, "initial", None),
            state(K::Decision, "if", Some(1)),
            state(K::Statement, "a", Some(2)),
            state(K::Final, "final", None),
        ];
        let transitions = vec![
            (0, 1, Event::Lambda),
            (1, 2, Event::True),
            (1, 3, Event::False),
            (2, 3, Event::Lambda),
        ];
        FlowGraph::from_parts("sample", states, transitions, 1)
    }

    #[test]
    fn test_orders_preserved() {
        let graph = sample();
        let labels: Vec<_> = graph.states().map(|s| s.label.clone()).collect();
        assert_eq!(labels, vec!["initial", "if", "a", "final"]);

        let events: Vec<_> = graph
            .transitions()
            .map(|(_, _, e)| e.to_string())
            .collect();
        assert_eq!(events, vec!["lambda", "TRUE", "FALSE", "lambda"]);
    }

    #[test]
    fn test_id_index() {
        let graph = sample();
        assert_eq!(graph.state_by_id(1).unwrap().label, "if");
        assert_eq!(graph.state_by_id(2).unwrap().label, "a");
        assert!(graph.state_by_id(99).is_none());
    }

    #[test]
    fn test_initial_and_terminal() {
        let graph = sample();
        let initial = graph.initial_states();
        assert_eq!(initial.len(), 1);
        assert_eq!(initial[0].kind, K::Initial);

        let terminal = graph.terminal_states();
        assert_eq!(terminal.len(), 1);
        assert_eq!(terminal[0].kind, K::Final);
    }

    #[test]
    fn test_to_dot_output() {
        let graph = sample();
        let dot = graph.to_dot();
        assert!(dot.contains("digraph FlowGraph"));
        assert!(dot.contains("if_1"));
        assert!(dot.contains("TRUE"));
    }

    #[test]
    fn test_stats() {
        let graph = sample();
        let stats = graph.stats();
        assert_eq!(stats.total_states, 4);
        assert_eq!(stats.identified_states, 2);
        assert_eq!(stats.total_transitions, 4);
        assert_eq!(stats.entry_points, 1);
    }

    #[test]
    fn test_acyclic_sample() {
        assert!(!sample().has_cycles());
    }

    #[test]
    fn test_callables() {
        let states = vec![
            state(K::Function, "f", None),
            state(K::Constructor, "C", None),
            state(K::Statement, "a", Some(1)),
        ];
        let graph = FlowGraph::from_parts("unit", states, vec![(0, 2, Event::Lambda)], 1);
        let callables: Vec<_> = graph.callables().iter().map(|s| s.label.clone()).collect();
        assert_eq!(callables, vec!["f", "C"]);
    }
}
