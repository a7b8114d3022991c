//! Cycle command implementation.

use anyhow::Result;
use console::style;

use qec_surface::{Lattice, cycle_for};

use super::common::{lattice_spec, render, write_output};

/// Execute the cycle command.
pub fn execute(
    lattice: &str,
    width: usize,
    height: usize,
    distance: usize,
    rounds: usize,
    format: &str,
    output: Option<&str>,
) -> Result<()> {
    let spec = lattice_spec(lattice, width, height, distance)?;
    let lattice = Lattice::from_spec(&spec)?;
    let cycle = cycle_for(&lattice)?;

    eprintln!(
        "{} Building {} round(s) of {} on {} nodes",
        style("→").cyan().bold(),
        style(rounds).yellow(),
        style(cycle.name()).green(),
        lattice.num_nodes()
    );

    let circuit = cycle.circuit(&lattice, rounds)?;
    let content = render(&circuit, format)?;
    write_output(&content, output)
}
