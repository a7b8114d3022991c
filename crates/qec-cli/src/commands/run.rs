//! Run command implementation.

use anyhow::{Context, Result};
use console::style;

use qec_surface::ExperimentConfig;

use super::common::{read_input, render, write_output};

/// Execute the run command: build the circuit an experiment file describes.
pub fn execute(input: &str, format: &str, output: Option<&str>) -> Result<()> {
    let source = read_input(input)?;
    let config = ExperimentConfig::from_yaml(&source)
        .with_context(|| format!("Invalid experiment file: {input}"))?;

    eprintln!(
        "{} Running experiment {} ({} step(s), {} logical qubit(s))",
        style("→").cyan().bold(),
        style(&config.name).green(),
        config.program.len(),
        config.logical.len()
    );

    let circuit = config.build()?;
    eprintln!("{} Experiment built", style("✓").green().bold());

    let content = render(&circuit, format)?;
    write_output(&content, output)
}
