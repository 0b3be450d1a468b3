//! Basis Path Generator
//!
//! A CLI tool for generating executable test paths from C++ source code
//! via model checking.
//!
//! This library provides functionality for:
//! - Tokenizing a C++ translation unit and segmenting it into statement lines
//! - Classifying lines into control states and building a flow graph
//! - Synthesizing a NuSMV model with deliberately falsifiable properties
//! - Running the external model checker and decoding its counterexamples
//! - Reporting the decoded traces as concrete test paths with coverage stats

pub mod checker;
pub mod cli;
pub mod config;
pub mod error;
pub mod flow;
pub mod model;
pub mod parser;
pub mod report;
pub mod trace;

pub use config::Config;
pub use error::{Error, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Initialize logging with the given log level
pub fn init_logging(level: &str) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
