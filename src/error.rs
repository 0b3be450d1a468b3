//! This module defines all error types used throughout the application.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the application
#[derive(Error, Debug)]
pub enum Error {
    /// IO errors (file not found, permission denied, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Tokenizer errors
    #[error("Lexer error: {0}")]
    Lexer(String),

    /// Line segmentation errors
    #[error("Segmentation error: {0}")]
    Segmentation(String),

    /// Flow graph construction errors
    #[error("Flow graph error: {0}")]
    FlowGraph(String),

    /// Model synthesis errors
    #[error("Model synthesis error: {0}")]
    Synthesis(String),

    /// Model checker invocation errors
    #[error("Checker error: {0}")]
    Checker(String),

    /// Counterexample decoding errors
    #[error("Trace decoding error: {0}")]
    Trace(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Missing configuration
    #[error("Missing configuration: {0}")]
    MissingConfig(String),

    /// Input file is not a recognized source unit
    #[error("Invalid source file: {0:?}")]
    InvalidSourceFile(PathBuf),

    /// Generic error with custom message
    #[error("{0}")]
    Custom(String),

    /// Wrapped anyhow errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a custom error with a message
    pub fn custom(msg: impl Into<String>) -> Self {
        Self::Custom(msg.into())
    }

    /// Create a checker error
    pub fn checker(msg: impl Into<String>) -> Self {
        Self::Checker(msg.into())
    }

    /// Create a flow graph error
    pub fn flow_graph(msg: impl Into<String>) -> Self {
        Self::FlowGraph(msg.into())
    }

    /// Create a trace decoding error
    pub fn trace(msg: impl Into<String>) -> Self {
        Self::Trace(msg.into())
    }
}

// Implement From traits for common external error types

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Custom(format!("JSON error: {}", err))
    }
}

// Helper macros for creating errors

/// Create a custom error with formatting
#[macro_export]
macro_rules! custom_error {
    ($($arg:tt)*) => {
        $crate::error::Error::Custom(format!($($arg)*))
    };
}

/// Bail with a custom error message
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::custom_error!($($arg)*))
    };
}

/// Ensure a condition is true or return error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($($arg)*);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = Error::custom("test error");
        assert_eq!(err.to_string(), "test error");

        let err = Error::checker("binary not found");
        assert_eq!(err.to_string(), "Checker error: binary not found");
    }

    #[test]
    fn test_io_conversion() {
        let err: Error = io::Error::new(io::ErrorKind::NotFound, "missing").into();
        assert!(err.to_string().contains("IO error"));
    }
}
