//! Counterexample decoder
//!
//! Scans the model checker's textual output for counterexample traces and
//! turns each one into an ordered step list. A trace span starts at a
//! `Trace Type: Counterexample` marker and ends at the next
//! `-- specification` line; inside the span, `-> State:` lines open a new
//! step and `state =` / `events =` / `decision =` lines fill it in.
//! Traces shorter than three steps carry no path information and are
//! counted as invalid.

use crate::error::{Error, Result};
use crate::flow::FlowGraph;
use crate::trace::{Step, TestPath};
use regex::Regex;

/// Minimum number of steps for a usable path
const MIN_STEPS: usize = 3;

/// Decoded paths plus the count of discarded traces
#[derive(Debug, Default)]
pub struct DecodeOutcome {
    pub paths: Vec<TestPath>,
    pub invalid: usize,
}

/// Decode every counterexample in the checker output
pub fn decode(output: &str, graph: &FlowGraph) -> Result<DecodeOutcome> {
    let field = Fields::new()?;
    let mut outcome = DecodeOutcome::default();
    let mut current: Option<TestPath> = None;

    for line in output.lines() {
        if line.trim() == "Trace Type: Counterexample" {
            // an unterminated span is discarded, matching the marker scan
            current = Some(TestPath::default());
            continue;
        }

        if line.trim_start().starts_with("-- specification") {
            if let Some(path) = current.take() {
                if path.len() >= MIN_STEPS {
                    outcome.paths.push(path);
                } else {
                    outcome.invalid += 1;
                }
            }
            continue;
        }

        let Some(path) = current.as_mut() else {
            continue;
        };

        if line.trim_start().starts_with("->") {
            path.steps.push(Step::default());
            continue;
        }

        let Some(step) = path.steps.last_mut() else {
            continue;
        };

        if let Some(capture) = field.state.captures(line) {
            let value = &capture[1];
            step.state = Some(value.to_string());
            step.state_id = field
                .id_suffix
                .captures(value)
                .and_then(|c| c[1].parse().ok());
            // resolve through the graph so renamed or stale tokens surface
            if let Some(id) = step.state_id {
                match graph.state_by_id(id) {
                    Some(state) => step.state = state.model_name(),
                    None => {
                        tracing::warn!("trace references unknown state id {}", id);
                        step.state_id = None;
                    }
                }
            }
        } else if let Some(capture) = field.events.captures(line) {
            let value = capture[1].to_string();
            step.event = (value != "null").then_some(value);
        } else if field.decision.is_match(line) {
            step.decision = line.contains("TRUE");
        }
    }

    tracing::debug!(
        "Decoded {} valid and {} invalid counterexamples",
        outcome.paths.len(),
        outcome.invalid
    );
    Ok(outcome)
}

/// Compiled patterns for the step field lines
struct Fields {
    state: Regex,
    events: Regex,
    decision: Regex,
    id_suffix: Regex,
}

impl Fields {
    fn new() -> Result<Self> {
        let build = |pattern: &str| {
            Regex::new(pattern).map_err(|e| Error::Trace(format!("bad field pattern: {}", e)))
        };
        Ok(Self {
            state: build(r"^\s+state\s*=\s*(\S+)\s*$")?,
            events: build(r"^\s+events\s*=\s*(\S+)\s*$")?,
            decision: build(r"^\s+decision\s*=")?,
            id_suffix: build(r"_(\d+)$")?,
        })
    }
}
