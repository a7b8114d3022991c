//! Shared helpers for CLI commands.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use console::style;

use qec_ir::Circuit;
use qec_qasm3::emit;
use qec_surface::LatticeSpec;

/// Build a lattice description from the `--lattice` flag family.
pub fn lattice_spec(kind: &str, width: usize, height: usize, distance: usize) -> Result<LatticeSpec> {
    match kind.to_lowercase().as_str() {
        "square" | "surface" => Ok(LatticeSpec::Square { width, height }),
        "heavy-hex" | "heavy_hex" | "heavyhex" => Ok(LatticeSpec::HeavyHex { distance }),
        other => anyhow::bail!("Unknown lattice: '{other}'. Available: square, heavy-hex"),
    }
}

/// Render a circuit in the requested output format.
pub fn render(circuit: &Circuit, format: &str) -> Result<String> {
    match format.to_lowercase().as_str() {
        "summary" => Ok(summary(circuit)),
        "qasm" | "qasm3" => emit(circuit).map_err(|e| anyhow::anyhow!("Emit error: {e}")),
        "json" => serde_json::to_string_pretty(circuit).context("Failed to serialize circuit"),
        other => anyhow::bail!("Unknown format: '{other}'. Available: summary, qasm, json"),
    }
}

/// Human-readable overview of a circuit.
pub fn summary(circuit: &Circuit) -> String {
    let flat = circuit.decompose();
    let mut lines = vec![
        format!("Circuit:    {}", circuit.name()),
        format!("Qubits:     {}", circuit.num_qubits()),
        format!("Clbits:     {}", circuit.num_clbits()),
        format!("Registers:  {}", circuit.cregs().len()),
        format!("Gadgets:    {}", circuit.instructions().iter().filter(|i| i.is_composite()).count()),
        format!("Operations: {}", flat.num_ops()),
        format!("Depth:      {}", flat.depth()),
    ];

    let mut counts: Vec<_> = circuit.count_ops().into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    if !counts.is_empty() {
        lines.push(String::new());
        lines.push("Top-level instructions:".to_string());
        for (name, count) in counts {
            lines.push(format!("  {name:<12} {count}"));
        }
    }
    lines.join("\n")
}

/// Write rendered output to a file, or stdout when no path is given.
pub fn write_output(content: &str, output: Option<&str>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, content).with_context(|| format!("Failed to write file: {path}"))?;
            println!("  Output: {}", style(path).green());
        }
        None => println!("{content}"),
    }
    Ok(())
}

/// Read a text file, with a friendly message when it is missing.
pub fn read_input(path: &str) -> Result<String> {
    if !Path::new(path).exists() {
        anyhow::bail!("File not found: {path}");
    }
    fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))
}
