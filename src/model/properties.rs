//! Coverage property families
//!
//! All three families are deliberately unsatisfiable on any graph with
//! reachable states: the model checker's counterexample for each clause is
//! an execution path exercising the event, branch, or edge the clause
//! denies. This inversion is the whole point of the tool, not an accident.

use crate::flow::{ControlState, Event};
use crate::report::Statistics;

type TransitionRef<'a> = (&'a ControlState, &'a ControlState, &'a Event);

/// Family one: assert every observable event is globally excluded; the
/// counterexample is a path that produces the event
pub fn reachability(events: &[String], stats: &mut Statistics) -> String {
    let mut out = String::new();
    for event in events {
        out.push_str(&format!("CTLSPEC\n    AG (events != {})\n", event));
        stats.add_reachability_property();
    }
    out
}

/// Family two: assert a taken branch can never lead to its recorded
/// destination; the counterexample demonstrates that branch being taken
pub fn divergence(transitions: &[TransitionRef], stats: &mut Statistics) -> String {
    let mut out = String::new();
    for (from, to, event) in transitions {
        if !from.is_branching() || !event.is_boolean() {
            continue;
        }
        if let (Some(from_name), Some(to_name)) = (from.model_name(), to.model_name()) {
            out.push_str(&format!(
                "CTLSPEC\n    AG (state = {} & decision = {} -> EX state != {})\n",
                from_name, event, to_name
            ));
            stats.add_divergence_property();
        }
    }
    out
}

/// Family three: per identified edge, assert the destination is never
/// reached from the origin and always reachable without it; the paired
/// counterexamples exercise the edge from both directions
pub fn adjacency(transitions: &[TransitionRef], stats: &mut Statistics) -> String {
    let mut out = String::new();
    for (from, to, _) in transitions {
        if let (Some(from_name), Some(to_name)) = (from.model_name(), to.model_name()) {
            out.push_str(&format!(
                "CTLSPEC\n    AG (state = {} -> EX state != {})\n",
                from_name, to_name
            ));
            out.push_str(&format!(
                "CTLSPEC\n    AG (state != {} -> EX state = {})\n",
                from_name, to_name
            ));
            stats.add_adjacency_property();
            stats.add_adjacency_property();
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::{ControlState, StateKind};

    fn state(kind: StateKind, label: &str, id: u32) -> ControlState {
        ControlState::pseudo(kind, label).with_id(id)
    }

    #[test]
    fn test_reachability_clauses() {
        let mut stats = Statistics::new("unit");
        let events = vec!["go".to_string(), "stop".to_string()];
        let text = reachability(&events, &mut stats);
        assert!(text.contains("AG (events != go)"));
        assert!(text.contains("AG (events != stop)"));
        assert_eq!(stats.reachability_properties, 2);
    }

    #[test]
    fn test_divergence_only_for_branching_origins() {
        let mut stats = Statistics::new("unit");
        let decision = state(StateKind::Decision, "if", 1);
        let statement = state(StateKind::Statement, "a", 2);
        let transitions = vec![
            (&decision, &statement, &Event::True),
            (&statement, &decision, &Event::Lambda),
        ];
        let text = divergence(&transitions, &mut stats);
        assert!(text.contains("state = if_1 & decision = TRUE -> EX state != a_2"));
        assert_eq!(stats.divergence_properties, 1);
    }

    #[test]
    fn test_adjacency_pairs() {
        let mut stats = Statistics::new("unit");
        let a = state(StateKind::Statement, "a", 1);
        let b = state(StateKind::Statement, "b", 2);
        let transitions = vec![(&a, &b, &Event::Lambda)];
        let text = adjacency(&transitions, &mut stats);
        assert!(text.contains("AG (state = a_1 -> EX state != b_2)"));
        assert!(text.contains("AG (state != a_1 -> EX state = b_2)"));
        assert_eq!(stats.adjacency_properties, 2);
    }
}
