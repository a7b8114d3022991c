//! Heavy-hex code with flag-mediated stabilizers.
//!
//! Z checks are weight-2 parities measured on the flag qubits. X checks are
//! measured by ancillas: weight-2 on the top and bottom boundary (ancilla
//! between two data qubits) and weight-4 in the bulk, where the ancilla
//! reaches its four data qubits through the two flags beside it:
//!
//! ```text
//!   D0          D2
//!   |           |
//!   F0 -- A -- F1
//!   |           |
//!   D1          D3
//! ```

use qec_ir::{Circuit, CircuitOps, ClbitId, ConstrainedCircuit, QubitId};
use tracing::debug;

use super::surface::require_role;
use super::{Gadget, SyndromeCycle, end_round, round_clbit};
use crate::error::{QecError, QecResult};
use crate::lattice::{Lattice, LatticeKind};
use crate::node::NodeRole;

/// Neighbour pattern of a heavy-hex ancilla.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AncillaShape {
    /// Two data neighbours (boundary check).
    Weight2,
    /// Two flag neighbours (bulk check).
    Weight4,
}

/// Syndrome rounds for the heavy-hex code.
#[derive(Debug, Clone)]
pub struct HeavyHexCode {
    num_nodes: usize,
}

impl HeavyHexCode {
    /// Create a builder for a heavy-hex lattice.
    pub fn new(lattice: &Lattice) -> QecResult<Self> {
        if !matches!(lattice.kind(), LatticeKind::HeavyHex { .. }) {
            return Err(QecError::WrongLatticeKind {
                builder: "HeavyHexCode",
                expected: "heavy-hex",
            });
        }
        Ok(Self {
            num_nodes: lattice.num_nodes(),
        })
    }

    /// Classify an ancilla by the roles of its two neighbours.
    pub fn ancilla_shape(&self, lattice: &Lattice, index: usize) -> QecResult<AncillaShape> {
        require_role(lattice, "ancilla_shape", index, NodeRole::Ancilla)?;
        let roles = lattice
            .neighbors(index)?
            .iter()
            .map(|&n| lattice.role(n))
            .collect::<QecResult<Vec<_>>>()?;

        match roles.as_slice() {
            [NodeRole::Data, NodeRole::Data] => Ok(AncillaShape::Weight2),
            [NodeRole::Flag, NodeRole::Flag] => Ok(AncillaShape::Weight4),
            _ => Err(QecError::UnrecognizedAncillaShape { index, roles }),
        }
    }

    /// Weight-2 Z check on a flag: `reset, cx(d1 → f), cx(d0 → f), measure`.
    ///
    /// `d0`, `d1` are the flag's active data neighbours in adjacency order;
    /// the second one couples first.
    pub fn measure_z(&self, lattice: &Lattice, index: usize) -> QecResult<Gadget> {
        self.check_lattice(lattice)?;
        require_role(lattice, "measure_z", index, NodeRole::Flag)?;

        let data = flag_data(lattice, index, None)?;
        let flag = QubitId::from(index);
        let mut gadget = ConstrainedCircuit::new("measure_z", [flag, data[0], data[1]], 1)?;
        gadget
            .reset(flag)?
            .cx(data[1], flag)?
            .cx(data[0], flag)?
            .measure(flag, ClbitId(0))?;

        Ok(Gadget {
            instruction: gadget.to_instruction(),
            qubits: gadget.qubits().to_vec(),
        })
    }

    /// Weight-2 boundary X check: `reset, cx(a → n1), cx(a → n0), measure`.
    ///
    /// The ancilla is measured in the Z basis with no Hadamard conjugation.
    /// Both data neighbours must be active.
    pub fn measure_x_2(&self, lattice: &Lattice, index: usize) -> QecResult<Gadget> {
        self.check_lattice(lattice)?;
        if self.ancilla_shape(lattice, index)? != AncillaShape::Weight2 {
            return Err(self.shape_error(lattice, index));
        }

        let ancilla = QubitId::from(index);
        let n = active_pair(lattice, index, NodeRole::Data)?;
        let mut gadget = ConstrainedCircuit::new("measure_x_2", [ancilla, n[0], n[1]], 1)?;
        gadget
            .reset(ancilla)?
            .cx(ancilla, n[1])?
            .cx(ancilla, n[0])?
            .measure(ancilla, ClbitId(0))?;

        Ok(Gadget {
            instruction: gadget.to_instruction(),
            qubits: gadget.qubits().to_vec(),
        })
    }

    /// Weight-4 bulk X check through the two flags.
    ///
    /// Local clbits: `0` ← flag 0, `1` ← flag 1, `2` ← ancilla (X basis).
    /// Flag-to-data CNOTs run `f1→d2, f0→d1, f1→d3, f0→d0`, with `d0, d1`
    /// the data above and below `f0` and `d2, d3` those of `f1`. Both flags
    /// must be active.
    pub fn measure_x_4(&self, lattice: &Lattice, index: usize) -> QecResult<Gadget> {
        self.check_lattice(lattice)?;
        if self.ancilla_shape(lattice, index)? != AncillaShape::Weight4 {
            return Err(self.shape_error(lattice, index));
        }

        let ancilla = QubitId::from(index);
        let flags = active_pair(lattice, index, NodeRole::Flag)?;
        let (f0, f1) = (flags[0], flags[1]);
        let left = flag_data(lattice, f0.index(), Some(index))?;
        let right = flag_data(lattice, f1.index(), Some(index))?;
        let d = [left[0], left[1], right[0], right[1]];

        let mut gadget =
            ConstrainedCircuit::new("measure_x_4", [ancilla, f0, f1, d[0], d[1], d[2], d[3]], 3)?;
        gadget.reset(ancilla)?.h(ancilla)?;
        gadget.reset(f0)?.reset(f1)?;
        gadget.cx(ancilla, f1)?.cx(ancilla, f0)?;
        gadget
            .cx(f1, d[2])?
            .cx(f0, d[1])?
            .cx(f1, d[3])?
            .cx(f0, d[0])?;
        gadget.cx(ancilla, f1)?.cx(ancilla, f0)?;
        gadget.measure_many([f0, f1], [ClbitId(0), ClbitId(1)])?;
        gadget.h(ancilla)?.measure(ancilla, ClbitId(2))?;

        Ok(Gadget {
            instruction: gadget.to_instruction(),
            qubits: gadget.qubits().to_vec(),
        })
    }

    fn shape_error(&self, lattice: &Lattice, index: usize) -> QecError {
        let roles = lattice
            .neighbors(index)
            .map(|ns| ns.iter().filter_map(|&n| lattice.role(n).ok()).collect())
            .unwrap_or_default();
        QecError::UnrecognizedAncillaShape { index, roles }
    }
}

impl SyndromeCycle for HeavyHexCode {
    fn name(&self) -> &'static str {
        "heavy_hex_code"
    }

    fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    fn append_round(&self, lattice: &Lattice, circuit: &mut Circuit, round: usize) -> QecResult<()> {
        self.check_lattice(lattice)?;
        let n = self.num_nodes;

        let mut gadgets = 0usize;
        for node in lattice.nodes().iter().filter(|n| n.active) {
            let i = node.index;
            match node.role {
                NodeRole::Flag => {
                    self.measure_z(lattice, i)?
                        .append_to(circuit, [round_clbit(i, round, n)])?;
                }
                NodeRole::Ancilla => match self.ancilla_shape(lattice, i)? {
                    AncillaShape::Weight2 => {
                        self.measure_x_2(lattice, i)?
                            .append_to(circuit, [round_clbit(i, round, n)])?;
                    }
                    AncillaShape::Weight4 => {
                        let gadget = self.measure_x_4(lattice, i)?;
                        // Flag outcomes reuse the flags' own slots for this round.
                        let bits = [gadget.qubits[1].index(), gadget.qubits[2].index(), i]
                            .map(|node| round_clbit(node, round, n));
                        gadget.append_to(circuit, bits)?;
                    }
                },
                NodeRole::Data | NodeRole::Base | NodeRole::Z | NodeRole::X => continue,
            }
            gadgets += 1;
        }
        debug!(round, gadgets, "heavy-hex round");

        end_round(circuit)
    }
}

/// The two active data neighbours of a flag, in adjacency order.
fn flag_data(lattice: &Lattice, flag: usize, skip: Option<usize>) -> QecResult<[QubitId; 2]> {
    let mut data = Vec::with_capacity(2);
    for edge in lattice.edges(flag)? {
        if !edge.active || Some(edge.node) == skip {
            continue;
        }
        match lattice.role(edge.node)? {
            NodeRole::Data => data.push(QubitId::from(edge.node)),
            NodeRole::Ancilla => {}
            NodeRole::Base | NodeRole::Z | NodeRole::X | NodeRole::Flag => {
                return Err(QecError::FlagShape {
                    index: flag,
                    found: data.len(),
                });
            }
        }
    }
    <[QubitId; 2]>::try_from(data.as_slice()).map_err(|_| QecError::FlagShape {
        index: flag,
        found: data.len(),
    })
}

/// The ancilla's two active neighbours, both of `role`, in adjacency order.
fn active_pair(lattice: &Lattice, index: usize, role: NodeRole) -> QecResult<[QubitId; 2]> {
    let active = lattice.active_neighbors(index)?;
    let roles = active
        .iter()
        .map(|&n| lattice.role(n))
        .collect::<QecResult<Vec<_>>>()?;
    match (active.as_slice(), roles.as_slice()) {
        (&[a, b], &[ra, rb]) if ra == role && rb == role => Ok([QubitId::from(a), QubitId::from(b)]),
        _ => Err(QecError::UnrecognizedAncillaShape { index, roles }),
    }
}
