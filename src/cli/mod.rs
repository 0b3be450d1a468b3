//! CLI module
//!
//! This module defines the command-line interface using clap and implements
//! the command execution logic.

use crate::{Config, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub mod commands;
pub mod output;

/// Basis Path Generator CLI
#[derive(Parser, Debug)]
#[command(name = "basispath")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full pipeline: extract, synthesize, check, decode, report
    Analyze {
        /// C++ source file to analyze
        file: PathBuf,

        /// Model checker backend
        #[arg(short = 'k', long, value_enum, default_value = "nusmv")]
        checker: CheckerKind,

        /// Model checker binary (overrides config)
        #[arg(long, env = "NUSMV_PATH")]
        checker_binary: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        output: OutputFormat,

        /// Directory for the emitted model file
        #[arg(long)]
        emit_dir: Option<PathBuf>,

        /// Statistics record file (overrides config)
        #[arg(long)]
        stats_file: Option<PathBuf>,

        /// Skip appending the statistics record
        #[arg(long)]
        no_stats: bool,
    },

    /// Stop after synthesis and print the model text
    Model {
        /// C++ source file to analyze
        file: PathBuf,

        /// Directory for the emitted model file
        #[arg(long)]
        emit_dir: Option<PathBuf>,
    },

    /// Emit the extracted flow graph in Graphviz DOT format
    Graph {
        /// C++ source file to analyze
        file: PathBuf,
    },
}

/// Model checker backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CheckerKind {
    /// Canned output, no external process
    Mock,
    /// External NuSMV binary
    Nusmv,
}

/// Output format types
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Plain text report
    Table,
}

/// Execute the CLI command
pub fn execute(args: Cli, config: Config) -> Result<()> {
    match args.command {
        Commands::Analyze { .. } => commands::analyze::execute(args, config),
        Commands::Model { .. } => commands::model::execute(args, config),
        Commands::Graph { .. } => commands::graph::execute(args),
    }
}
