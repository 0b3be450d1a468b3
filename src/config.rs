//! Configuration management
//!
//! This module handles loading and managing configuration from:
//! - Command-line arguments
//! - Environment variables
//! - Configuration files (TOML)
//! - Defaults

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub default: DefaultConfig,

    #[serde(default)]
    pub checker: CheckerConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Default settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultConfig {
    #[serde(default = "default_checker")]
    pub checker: String,
}

/// Model checker configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckerConfig {
    /// Path to the NuSMV binary
    pub binary: Option<PathBuf>,

    /// Extra arguments passed before the model file
    #[serde(default)]
    pub args: Vec<String>,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory for emitted model and path files
    pub directory: Option<PathBuf>,

    /// Statistics record file
    pub stats_file: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path
    pub file: Option<PathBuf>,
}

// Default value functions

fn default_checker() -> String {
    "nusmv".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// Default implementations

impl Default for DefaultConfig {
    fn default() -> Self {
        Self {
            checker: default_checker(),
        }
    }
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            binary: None,
            args: Vec::new(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: None,
            stats_file: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let contents = std::fs::read_to_string(&path)
            .map_err(|e| Error::Config(format!("Failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config file {:?}: {}", path, e)))?;

        Ok(config)
    }

    /// Load configuration from default locations
    ///
    /// Searches in order:
    /// 1. ./config.toml
    /// 2. ~/.basispath/config.toml
    /// 3. /etc/basispath/config.toml
    pub fn load() -> Result<Self> {
        let paths = vec![
            PathBuf::from("config.toml"),
            dirs::home_dir()
                .map(|h| h.join(".basispath").join("config.toml"))
                .unwrap_or_else(|| PathBuf::from("/dev/null")),
            PathBuf::from("/etc/basispath/config.toml"),
        ];

        for path in paths {
            if path.exists() {
                tracing::info!("Loading config from {:?}", path);
                return Self::from_file(path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Config::default())
    }

    /// Get the model checker binary from config or environment
    pub fn checker_binary(&self) -> Result<PathBuf> {
        if let Some(binary) = &self.checker.binary {
            return Ok(binary.clone());
        }

        if let Ok(path) = std::env::var("NUSMV_PATH") {
            return Ok(PathBuf::from(path));
        }

        Ok(PathBuf::from("NuSMV"))
    }

    /// Get the output directory with fallback to the working directory
    pub fn output_directory(&self) -> PathBuf {
        self.output
            .directory
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Get the statistics file with fallback to the default name
    pub fn stats_file(&self) -> PathBuf {
        self.output
            .stats_file
            .clone()
            .unwrap_or_else(|| PathBuf::from("statistics.txt"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.default.checker, "nusmv");
        assert_eq!(config.logging.level, "info");
        assert!(config.checker.args.is_empty());
    }

    #[test]
    fn test_parse_toml_config() {
        let toml = r#"
[default]
checker = "mock"

[checker]
binary = "/opt/nusmv/bin/NuSMV"
args = ["-coi"]

[logging]
level = "debug"
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.default.checker, "mock");
        assert_eq!(
            config.checker.binary,
            Some(PathBuf::from("/opt/nusmv/bin/NuSMV"))
        );
        assert_eq!(config.checker.args, vec!["-coi".to_string()]);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_stats_file_fallback() {
        let config = Config::default();
        assert_eq!(config.stats_file(), PathBuf::from("statistics.txt"));
    }
}
