//! Mock checker for testing and offline development
//!
//! Returns a canned output string instead of spawning a process. The
//! default instance returns no counterexamples, which downstream reports
//! as zero covered paths rather than an error.

use crate::checker::ModelChecker;
use crate::Result;
use std::path::Path;

/// Model checker stand-in with fixed output
#[derive(Default)]
pub struct MockChecker {
    output: String,
}

impl MockChecker {
    pub fn new(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
        }
    }
}

impl ModelChecker for MockChecker {
    fn check(&self, model: &Path) -> Result<String> {
        tracing::info!("Mock checker invoked for {:?}", model);
        Ok(self.output.clone())
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_returns_canned_output() {
        let checker = MockChecker::new("Trace Type: Counterexample");
        let output = checker.check(Path::new("any.smv")).unwrap();
        assert_eq!(output, "Trace Type: Counterexample");
    }

    #[test]
    fn test_default_is_empty() {
        let checker = MockChecker::default();
        assert!(checker.check(Path::new("any.smv")).unwrap().is_empty());
    }
}
