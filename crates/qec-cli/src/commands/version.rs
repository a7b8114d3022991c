//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - surface-code syndrome circuits",
        style("qec").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  qec-ir       Circuit intermediate representation");
    println!("  qec-surface  Lattices, syndrome cycles and logical qubits");
    println!("  qec-qasm3    OpenQASM 3 emitter");
    println!("  qec-cli      Command-line interface");
    println!();
    println!("License:    {}", style("Apache-2.0").dim());
}
