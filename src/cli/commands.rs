//! CLI command implementations
//!
//! This module contains the implementation for each CLI command.

use crate::error::Error;
use crate::flow::{self, FlowGraph};
use crate::parser;
use crate::{Config, Result, cli::Cli};
use std::path::{Path, PathBuf};

/// Read a source file, segment it, and build its flow graph
fn extract_graph(file: &Path) -> Result<FlowGraph> {
    crate::ensure!(file.exists(), "source file {:?} not found", file);
    let unit_name = unit_name(file)?;
    tracing::info!("Analyzing unit '{}' from {:?}", unit_name, file);

    let source = std::fs::read_to_string(file)?;
    let lines = parser::parse_unit(&source)?;
    let graph = flow::build_flow_graph(&lines, &unit_name)?;

    let stats = graph.stats();
    tracing::info!(
        "Extracted {} states ({} identified), {} transitions",
        stats.total_states,
        stats.identified_states,
        stats.total_transitions
    );
    Ok(graph)
}

/// Unit name: the file stem of the analyzed source
fn unit_name(file: &Path) -> Result<String> {
    file.file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
        .ok_or_else(|| Error::InvalidSourceFile(file.to_path_buf()))
}

/// Write the synthesized model next to the analyzed unit
fn write_model(model: &str, unit: &str, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.smv", unit));
    std::fs::write(&path, model)?;
    tracing::info!("Model written to {:?}", path);
    Ok(path)
}

/// Analyze command implementation
pub mod analyze {
    use super::*;
    use crate::checker::create_checker;
    use crate::cli::{Commands, OutputFormat};
    use crate::report::Statistics;
    use crate::{model, trace};

    /// Execute the analyze command
    pub fn execute(args: Cli, config: Config) -> Result<()> {
        let (file, checker_kind, checker_binary, output_format, emit_dir, stats_file, no_stats) =
            match args.command {
                Commands::Analyze {
                    file,
                    checker,
                    checker_binary,
                    output,
                    emit_dir,
                    stats_file,
                    no_stats,
                    ..
                } => (
                    file,
                    checker,
                    checker_binary,
                    output,
                    emit_dir,
                    stats_file,
                    no_stats,
                ),
                _ => unreachable!("analyze::execute called with wrong command"),
            };

        let mut config = config;
        if checker_binary.is_some() {
            config.checker.binary = checker_binary;
        }

        let graph = extract_graph(&file)?;
        let unit = graph.unit_name.clone();

        let mut stats = Statistics::new(&unit);
        stats.components = graph.components;
        let model_text = model::synthesize(&graph, &mut stats)?;

        let emit_dir = emit_dir.unwrap_or_else(|| config.output_directory());
        let model_path = write_model(&model_text, &unit, &emit_dir)?;

        let checker = create_checker(checker_kind, &config)?;
        tracing::info!("Checking model with the {} backend", checker.name());
        let checker_output = checker.check(&model_path)?;

        let outcome = trace::decode(&checker_output, &graph)?;
        stats.record_paths(&outcome.paths, outcome.invalid);
        tracing::info!(
            "{} valid test paths, {} invalid counterexamples",
            stats.valid_counterexamples,
            stats.invalid_counterexamples
        );

        match output_format {
            OutputFormat::Json => {
                crate::cli::output::output_json(&mut std::io::stdout(), &outcome.paths, &stats)?;
            }
            OutputFormat::Table => {
                crate::cli::output::output_table(&mut std::io::stdout(), &outcome.paths, &stats)?;
            }
        }

        if !no_stats {
            let record_path = stats_file.unwrap_or_else(|| config.stats_file());
            stats.append_record(&record_path)?;
        }

        Ok(())
    }
}

/// Model command implementation
pub mod model {
    use super::*;
    use crate::cli::Commands;
    use crate::model as synthesizer;
    use crate::report::Statistics;

    /// Execute the model command
    pub fn execute(args: Cli, config: Config) -> Result<()> {
        let (file, emit_dir) = match args.command {
            Commands::Model { file, emit_dir } => (file, emit_dir),
            _ => unreachable!("model::execute called with wrong command"),
        };

        let graph = extract_graph(&file)?;
        let unit = graph.unit_name.clone();

        let mut stats = Statistics::new(&unit);
        stats.components = graph.components;
        let model_text = synthesizer::synthesize(&graph, &mut stats)?;

        let emit_dir = emit_dir.unwrap_or_else(|| config.output_directory());
        write_model(&model_text, &unit, &emit_dir)?;

        println!("{}", model_text);
        Ok(())
    }
}

/// Graph command implementation
pub mod graph {
    use super::*;
    use crate::cli::Commands;

    /// Execute the graph command
    pub fn execute(args: Cli) -> Result<()> {
        let file = match args.command {
            Commands::Graph { file } => file,
            _ => unreachable!("graph::execute called with wrong command"),
        };

        let graph = extract_graph(&file)?;
        println!("{}", graph.to_dot());
        Ok(())
    }
}
