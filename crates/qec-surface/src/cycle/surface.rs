//! Square-lattice surface code.

use qec_ir::{Circuit, CircuitOps, ClbitId, ConstrainedCircuit, QubitId};
use tracing::debug;

use super::{Gadget, SyndromeCycle, end_round, round_clbit};
use crate::error::{QecError, QecResult};
use crate::lattice::{Lattice, LatticeKind};
use crate::node::NodeRole;

/// Syndrome rounds for the checkerboard surface code.
///
/// Every active Z node measures the Z-parity of its active neighbours and
/// every active X node the X-parity; other nodes contribute nothing.
#[derive(Debug, Clone)]
pub struct SurfaceCodeCycle {
    num_nodes: usize,
}

impl SurfaceCodeCycle {
    /// Create a builder for a square lattice.
    pub fn new(lattice: &Lattice) -> QecResult<Self> {
        if lattice.kind() != LatticeKind::Square {
            return Err(QecError::WrongLatticeKind {
                builder: "SurfaceCodeCycle",
                expected: "square",
            });
        }
        Ok(Self {
            num_nodes: lattice.num_nodes(),
        })
    }

    /// Z-parity check on a Z node.
    ///
    /// `id, reset, cx(neighbour → syndrome)…, measure, id`, over the syndrome
    /// qubit and its currently active neighbours in adjacency order.
    pub fn measure_z(&self, lattice: &Lattice, index: usize) -> QecResult<Gadget> {
        self.check_lattice(lattice)?;
        require_role(lattice, "measure_z", index, NodeRole::Z)?;

        let syndrome = QubitId::from(index);
        let neighbours = active_qubits(lattice, index)?;
        let mut gadget = ConstrainedCircuit::new(
            "measure_z",
            std::iter::once(syndrome).chain(neighbours.iter().copied()),
            1,
        )?;

        gadget.id(syndrome)?.reset(syndrome)?;
        for &n in &neighbours {
            gadget.cx(n, syndrome)?;
        }
        gadget.measure(syndrome, ClbitId(0))?.id(syndrome)?;

        Ok(Gadget {
            instruction: gadget.to_instruction(),
            qubits: gadget.qubits().to_vec(),
        })
    }

    /// X-parity check on an X node.
    ///
    /// `reset, h, cx(syndrome → neighbour)…, h, measure`.
    pub fn measure_x(&self, lattice: &Lattice, index: usize) -> QecResult<Gadget> {
        self.check_lattice(lattice)?;
        require_role(lattice, "measure_x", index, NodeRole::X)?;

        let syndrome = QubitId::from(index);
        let neighbours = active_qubits(lattice, index)?;
        let mut gadget = ConstrainedCircuit::new(
            "measure_x",
            std::iter::once(syndrome).chain(neighbours.iter().copied()),
            1,
        )?;

        gadget.reset(syndrome)?.h(syndrome)?;
        for &n in &neighbours {
            gadget.cx(syndrome, n)?;
        }
        gadget.h(syndrome)?.measure(syndrome, ClbitId(0))?;

        Ok(Gadget {
            instruction: gadget.to_instruction(),
            qubits: gadget.qubits().to_vec(),
        })
    }
}

impl SyndromeCycle for SurfaceCodeCycle {
    fn name(&self) -> &'static str {
        "surface_code"
    }

    fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    fn append_round(&self, lattice: &Lattice, circuit: &mut Circuit, round: usize) -> QecResult<()> {
        self.check_lattice(lattice)?;

        let mut gadgets = 0usize;
        for node in lattice.nodes().iter().filter(|n| n.active) {
            let gadget = match node.role {
                NodeRole::Z => self.measure_z(lattice, node.index)?,
                NodeRole::X => self.measure_x(lattice, node.index)?,
                NodeRole::Data | NodeRole::Base | NodeRole::Flag | NodeRole::Ancilla => continue,
            };
            gadget.append_to(circuit, [round_clbit(node.index, round, self.num_nodes)])?;
            gadgets += 1;
        }
        debug!(round, gadgets, "surface code round");

        end_round(circuit)
    }
}

pub(super) fn require_role(
    lattice: &Lattice,
    gadget: &'static str,
    index: usize,
    expected: NodeRole,
) -> QecResult<()> {
    let found = lattice.role(index)?;
    if found != expected {
        return Err(QecError::WrongRole {
            gadget,
            index,
            expected,
            found,
        });
    }
    Ok(())
}

fn active_qubits(lattice: &Lattice, index: usize) -> QecResult<Vec<QubitId>> {
    Ok(lattice
        .active_neighbors(index)?
        .into_iter()
        .map(QubitId::from)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_z_gadget_body() {
        let lattice = Lattice::square(3, 3).unwrap();
        let cycle = SurfaceCodeCycle::new(&lattice).unwrap();

        let gadget = cycle.measure_z(&lattice, 3).unwrap();
        assert_eq!(gadget.label(), "measure_z");
        assert_eq!(gadget.qubits, vec![QubitId(3), QubitId(4), QubitId(6), QubitId(0)]);

        let names: Vec<_> = gadget.instruction.body.iter().map(|i| i.name()).collect();
        assert_eq!(names, vec!["id", "reset", "cx", "cx", "cx", "measure", "id"]);
        // Neighbour controls, syndrome target, in local ids.
        assert_eq!(gadget.instruction.body[2].qubits, vec![QubitId(1), QubitId(0)]);
    }

    #[test]
    fn test_measure_x_gadget_body() {
        let lattice = Lattice::square(3, 3).unwrap();
        let cycle = SurfaceCodeCycle::new(&lattice).unwrap();

        let gadget = cycle.measure_x(&lattice, 1).unwrap();
        let names: Vec<_> = gadget.instruction.body.iter().map(|i| i.name()).collect();
        assert_eq!(names, vec!["reset", "h", "cx", "cx", "cx", "h", "measure"]);
        assert_eq!(gadget.instruction.body[2].qubits, vec![QubitId(0), QubitId(1)]);
    }

    #[test]
    fn test_inactive_neighbour_skipped() {
        let mut lattice = Lattice::square(3, 3).unwrap();
        let cycle = SurfaceCodeCycle::new(&lattice).unwrap();
        lattice.switch_node(4, false).unwrap();

        let gadget = cycle.measure_z(&lattice, 3).unwrap();
        assert_eq!(gadget.qubits, vec![QubitId(3), QubitId(6), QubitId(0)]);
        assert_eq!(gadget.instruction.count("cx"), 2);
    }

    #[test]
    fn test_wrong_role() {
        let lattice = Lattice::square(3, 3).unwrap();
        let cycle = SurfaceCodeCycle::new(&lattice).unwrap();
        assert!(matches!(
            cycle.measure_z(&lattice, 1),
            Err(QecError::WrongRole {
                expected: NodeRole::Z,
                found: NodeRole::X,
                ..
            })
        ));
        assert!(cycle.measure_x(&lattice, 4).is_err());
    }

    #[test]
    fn test_rejects_heavy_hex_lattice() {
        let lattice = Lattice::heavy_hex(3).unwrap();
        assert!(matches!(
            SurfaceCodeCycle::new(&lattice),
            Err(QecError::WrongLatticeKind { .. })
        ));
    }
}
