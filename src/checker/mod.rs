//! Checker module - Abstraction over the external model checker
//!
//! This module provides a trait-based abstraction for running the model
//! checker against an emitted module file. Implementations:
//! - `NusmvChecker`: spawns the external NuSMV binary
//! - `MockChecker`: returns canned output for tests and offline runs

use crate::cli::CheckerKind;
use crate::{Config, Result};
use std::path::Path;

pub mod mock;
pub mod nusmv;

pub use mock::MockChecker;
pub use nusmv::NusmvChecker;

/// Model checker backend
///
/// The invocation is a blocking call: the checker runs to completion and
/// its whole standard output is returned for decoding.
pub trait ModelChecker {
    /// Run the checker against a model file and capture its output
    fn check(&self, model: &Path) -> Result<String>;

    /// Backend name for logging and reports
    fn name(&self) -> &str;
}

/// Create a checker instance based on type and configuration
pub fn create_checker(kind: CheckerKind, config: &Config) -> Result<Box<dyn ModelChecker>> {
    match kind {
        CheckerKind::Nusmv => {
            let checker = NusmvChecker::new(config.checker_binary()?)
                .with_args(config.checker.args.clone());
            Ok(Box::new(checker))
        }
        CheckerKind::Mock => Ok(Box::new(MockChecker::default())),
    }
}
