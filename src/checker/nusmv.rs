//! External NuSMV process wrapper

use crate::checker::ModelChecker;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Runs the NuSMV binary against an emitted model file
pub struct NusmvChecker {
    binary: PathBuf,
    args: Vec<String>,
}

impl NusmvChecker {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            args: Vec::new(),
        }
    }

    /// Extra arguments placed before the model file
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }
}

impl ModelChecker for NusmvChecker {
    fn check(&self, model: &Path) -> Result<String> {
        tracing::info!("Running {:?} on {:?}", self.binary, model);

        let output = Command::new(&self.binary)
            .args(&self.args)
            .arg(model)
            .output()
            .map_err(|e| Error::Checker(format!("failed to spawn {:?}: {}", self.binary, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Checker(format!(
                "{:?} exited with {}: {}",
                self.binary,
                output.status,
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        tracing::debug!("Checker produced {} bytes of output", stdout.len());
        Ok(stdout)
    }

    fn name(&self) -> &str {
        "nusmv"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_binary_is_checker_error() {
        let checker = NusmvChecker::new("/nonexistent/NuSMV-binary");
        let err = checker.check(Path::new("model.smv")).unwrap_err();
        assert!(matches!(err, Error::Checker(_)));
    }

    #[test]
    fn test_name() {
        assert_eq!(NusmvChecker::new("NuSMV").name(), "nusmv");
    }
}
