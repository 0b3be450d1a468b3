//! Report module - Coverage statistics and the persistent record
//!
//! One [`Statistics`] value accumulates counts across the whole pipeline:
//! model synthesis fills the domain/relation/property counters, trace
//! decoding fills the counterexample counters. The value renders as a
//! human-readable summary and as one semicolon-separated record appended
//! to the statistics file for cross-run comparison.

use crate::error::Result;
use crate::trace::TestPath;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Aggregate counts for one analyzed unit
#[derive(Debug, Clone, Default, Serialize)]
pub struct Statistics {
    pub unit_name: String,

    // Model shape
    pub states: usize,
    pub events: usize,
    pub decisions: usize,
    pub state_transitions: usize,
    pub event_transitions: usize,
    pub components: usize,

    // Generated properties
    pub properties: usize,
    pub reachability_properties: usize,
    pub divergence_properties: usize,
    pub adjacency_properties: usize,

    // Decoded counterexamples
    pub total_counterexamples: usize,
    pub valid_counterexamples: usize,
    pub invalid_counterexamples: usize,
    pub longest_path: usize,
    pub shortest_path: usize,
}

impl Statistics {
    pub fn new(unit_name: impl Into<String>) -> Self {
        Self {
            unit_name: unit_name.into(),
            ..Self::default()
        }
    }

    pub fn add_state(&mut self) {
        self.states += 1;
    }

    pub fn add_event(&mut self) {
        self.events += 1;
    }

    pub fn add_decision(&mut self) {
        self.decisions += 1;
    }

    pub fn add_state_transition(&mut self) {
        self.state_transitions += 1;
    }

    pub fn add_event_transition(&mut self) {
        self.event_transitions += 1;
    }

    pub fn add_reachability_property(&mut self) {
        self.reachability_properties += 1;
        self.properties += 1;
    }

    pub fn add_divergence_property(&mut self) {
        self.divergence_properties += 1;
        self.properties += 1;
    }

    pub fn add_adjacency_property(&mut self) {
        self.adjacency_properties += 1;
        self.properties += 1;
    }

    pub fn total_transitions(&self) -> usize {
        self.state_transitions + self.event_transitions
    }

    /// Cyclomatic-complexity-style score over the synthesized machine
    pub fn complexity(&self) -> i64 {
        self.state_transitions as i64 - self.states as i64 + 2 * self.components as i64
    }

    /// Fold the decoded paths into the counterexample counters
    pub fn record_paths(&mut self, paths: &[TestPath], invalid: usize) {
        self.valid_counterexamples = paths.len();
        self.invalid_counterexamples = invalid;
        self.total_counterexamples = paths.len() + invalid;
        self.longest_path = paths.iter().map(TestPath::len).max().unwrap_or(0);
        self.shortest_path = paths.iter().map(TestPath::len).min().unwrap_or(0);
    }

    /// Human-readable summary block
    pub fn summary(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Analyzed unit: {}\n", self.unit_name));
        out.push_str(&format!("Number of states: {}\n", self.states));
        out.push_str(&format!("Number of events: {}\n", self.events));
        out.push_str(&format!("Number of decisions: {}\n", self.decisions));
        out.push_str(&format!(
            "Number of state transitions: {}\n",
            self.state_transitions
        ));
        out.push_str(&format!(
            "Number of event transitions: {}\n",
            self.event_transitions
        ));
        out.push_str(&format!(
            "Number of total transitions: {}\n",
            self.total_transitions()
        ));
        out.push_str(&format!("Number of components: {}\n", self.components));
        out.push_str("..................................\n");
        out.push_str(&format!("Cyclomatic complexity: {}\n", self.complexity()));
        out.push_str("..................................\n");
        out.push_str(&format!(
            "Number of reachability properties: {}\n",
            self.reachability_properties
        ));
        out.push_str(&format!(
            "Number of divergence properties: {}\n",
            self.divergence_properties
        ));
        out.push_str(&format!(
            "Number of adjacency properties: {}\n",
            self.adjacency_properties
        ));
        out.push_str(&format!(
            "Total number of properties: {}\n",
            self.properties
        ));
        out.push_str("..................................\n");
        out.push_str(&format!(
            "Number of counterexamples: {}\n",
            self.total_counterexamples
        ));
        out.push_str(&format!(
            "Number of valid counterexamples: {}\n",
            self.valid_counterexamples
        ));
        out.push_str(&format!(
            "Number of invalid counterexamples: {}\n",
            self.invalid_counterexamples
        ));
        out.push_str(&format!(
            "Longest test path: {} steps\n",
            self.longest_path
        ));
        out.push_str(&format!(
            "Shortest test path: {} steps\n",
            self.shortest_path
        ));
        out
    }

    /// One machine-readable record line
    pub fn record(&self) -> String {
        let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S");
        format!(
            "{}; {}; {}; {}; {}; {}; {}; {}; {}; {}; {}; {}; {}; {}; {}; {}; {}\n",
            timestamp,
            self.unit_name,
            self.states,
            self.events,
            self.decisions,
            self.state_transitions,
            self.event_transitions,
            self.components,
            self.complexity(),
            self.properties,
            self.reachability_properties,
            self.divergence_properties,
            self.adjacency_properties,
            self.total_counterexamples,
            self.valid_counterexamples,
            self.invalid_counterexamples,
            self.longest_path,
        )
    }

    /// Append the record to the statistics file
    pub fn append_record(&self, path: &Path) -> Result<()> {
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        file.write_all(self.record().as_bytes())?;
        tracing::debug!("Appended statistics record to {:?}", path);
        Ok(())
    }
}
