//! Output formatting module
//!
//! This module handles formatting decoded test paths and statistics for
//! the different output formats.

use crate::report::Statistics;
use crate::trace::TestPath;
use crate::Result;
use serde_json::json;

/// Output test paths and statistics as JSON
pub fn output_json(
    w: &mut impl std::io::Write,
    paths: &[TestPath],
    stats: &Statistics,
) -> Result<()> {
    let output = json!({
        "summary": {
            "unit": stats.unit_name,
            "states": stats.states,
            "events": stats.events,
            "decisions": stats.decisions,
            "transitions": stats.total_transitions(),
            "properties": stats.properties,
            "complexity": stats.complexity(),
            "valid_paths": stats.valid_counterexamples,
            "invalid_counterexamples": stats.invalid_counterexamples,
        },
        "paths": paths.iter().map(|path| {
            json!({
                "steps": path.steps.iter().map(|step| {
                    json!({
                        "state": step.state,
                        "event": step.event,
                        "decision": step.decision,
                    })
                }).collect::<Vec<_>>(),
                "visited_states": path.visited_states(),
            })
        }).collect::<Vec<_>>(),
    });

    serde_json::to_writer_pretty(&mut *w, &output)?;
    writeln!(w)?; // Add trailing newline
    Ok(())
}

/// Output test paths and statistics as a text report
pub fn output_table(
    w: &mut impl std::io::Write,
    paths: &[TestPath],
    stats: &Statistics,
) -> Result<()> {
    writeln!(w, "Basis Path Generator - Analysis Results")?;
    writeln!(w, "{}", "=".repeat(60))?;
    writeln!(w)?;
    write!(w, "{}", stats.summary())?;
    writeln!(w)?;

    if paths.is_empty() {
        writeln!(w, "No valid test paths were produced.")?;
        return Ok(());
    }

    writeln!(w, "Test paths:")?;
    for (index, path) in paths.iter().enumerate() {
        writeln!(w, "{:-<60}", "")?;
        writeln!(w, "Path {} ({} steps)", index + 1, path.len())?;
        for (line, step) in path.steps.iter().enumerate() {
            let state = step.state.as_deref().unwrap_or("-");
            let decision = if step.decision { "TRUE" } else { "FALSE" };
            match &step.event {
                Some(event) => writeln!(
                    w,
                    "  {:>3}. state = {:<28} event = {:<12} decision = {}",
                    line + 1,
                    state,
                    event,
                    decision
                )?,
                None => writeln!(
                    w,
                    "  {:>3}. state = {:<28} {:<21} decision = {}",
                    line + 1,
                    state,
                    "",
                    decision
                )?,
            }
        }
    }
    writeln!(w)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::Step;

    fn sample_path() -> TestPath {
        TestPath {
            steps: vec![
                Step {
                    state_id: Some(1),
                    state: Some("if_1".to_string()),
                    event: None,
                    decision: true,
                },
                Step {
                    state_id: Some(2),
                    state: Some("a_2".to_string()),
                    event: Some("go".to_string()),
                    decision: false,
                },
                Step {
                    state_id: Some(3),
                    state: Some("b_3".to_string()),
                    event: None,
                    decision: false,
                },
            ],
        }
    }

    fn sample_stats() -> Statistics {
        let mut stats = Statistics::new("unit");
        stats.record_paths(&[sample_path()], 1);
        stats
    }

    #[test]
    fn test_output_json() {
        let mut output = Vec::new();
        output_json(&mut output, &[sample_path()], &sample_stats()).unwrap();
        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("\"valid_paths\": 1"));
        assert!(text.contains("\"state\": \"if_1\""));
    }

    #[test]
    fn test_output_table() {
        let mut output = Vec::new();
        output_table(&mut output, &[sample_path()], &sample_stats()).unwrap();
        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Path 1 (3 steps)"));
        assert!(text.contains("if_1"));
        assert!(text.contains("event = go"));
    }

    #[test]
    fn test_output_table_no_paths() {
        let mut output = Vec::new();
        output_table(&mut output, &[], &Statistics::new("unit")).unwrap();
        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("No valid test paths"));
    }
}
