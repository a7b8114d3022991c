//! Lattice command implementation.

use anyhow::Result;
use console::style;

use qec_surface::{Lattice, NodeRole};

use super::common::lattice_spec;

/// Execute the lattice command: print role counts and a grid map.
pub fn execute(lattice: &str, width: usize, height: usize, distance: usize) -> Result<()> {
    let spec = lattice_spec(lattice, width, height, distance)?;
    let lattice = Lattice::from_spec(&spec)?;

    println!(
        "{} {} lattice, {}x{} grid, {} nodes",
        style("Lattice:").cyan().bold(),
        lattice.kind().name(),
        lattice.width(),
        lattice.height(),
        lattice.num_nodes()
    );
    println!();

    for role in [
        NodeRole::Data,
        NodeRole::Z,
        NodeRole::X,
        NodeRole::Flag,
        NodeRole::Ancilla,
        NodeRole::Base,
    ] {
        let count = lattice.nodes_with_role(role).count();
        if count > 0 {
            println!("  {:<8} {count}", role.to_string());
        }
    }
    println!();

    print!("{}", render_map(&lattice));
    Ok(())
}

/// One character per node, one row per grid row.
pub fn render_map(lattice: &Lattice) -> String {
    let mut map = String::with_capacity(lattice.num_nodes() * 2 + lattice.height());
    for (i, node) in lattice.nodes().iter().enumerate() {
        let glyph = match node.role {
            NodeRole::Data => 'o',
            NodeRole::Z => 'Z',
            NodeRole::X => 'X',
            NodeRole::Flag => 'f',
            NodeRole::Ancilla => 'A',
            NodeRole::Base => '.',
        };
        map.push(glyph);
        if (i + 1) % lattice.width() == 0 {
            map.push('\n');
        } else {
            map.push(' ');
        }
    }
    map
}
