//! Trace module - Decoded counterexamples as executable test paths

use crate::flow::StateId;
use serde::{Deserialize, Serialize};

pub mod decoder;

pub use decoder::{decode, DecodeOutcome};

/// One step of a counterexample trace
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Step {
    /// Sparse id of the state active in this step, if the step named one
    pub state_id: Option<StateId>,

    /// Model name of that state (`label_id`)
    pub state: Option<String>,

    /// Observable event bound in this step, if any
    pub event: Option<String>,

    /// Value of the boolean decision axis
    pub decision: bool,
}

/// A decoded counterexample: an ordered step list that doubles as a
/// concrete test path through the analyzed code
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TestPath {
    pub steps: Vec<Step>,
}

impl TestPath {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Distinct state ids visited by this path, in visit order
    pub fn visited_states(&self) -> Vec<StateId> {
        let mut visited = Vec::new();
        for step in &self.steps {
            if let Some(id) = step.state_id {
                if !visited.contains(&id) {
                    visited.push(id);
                }
            }
        }
        visited
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visited_states_dedup() {
        let path = TestPath {
            steps: vec![
                Step {
                    state_id: Some(1),
                    ..Step::default()
                },
                Step {
                    state_id: Some(2),
                    ..Step::default()
                },
                Step {
                    state_id: Some(1),
                    ..Step::default()
                },
                Step {
                    state_id: None,
                    ..Step::default()
                },
            ],
        };
        assert_eq!(path.visited_states(), vec![1, 2]);
        assert_eq!(path.len(), 4);
    }
}
