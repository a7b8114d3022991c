//! Syndrome-extraction cycle builders.
//!
//! A cycle builder turns a [`Lattice`] into rounds of stabilizer
//! measurements. Each stabilizer is a [`Gadget`]: a small circuit frozen into
//! a composite instruction over just the syndrome qubit and the qubits it
//! couples to, so one gadget can never touch another gadget's qubits.
//!
//! Round `j` owns the classical register `round{j}` of width `num_nodes`;
//! the outcome of node `i` in round `j` lands on global bit
//! `i + j * num_nodes`.

mod heavy_hex;
mod surface;

use std::sync::Arc;

use qec_ir::{Circuit, ClbitId, CompositeInstruction, QubitId};
use tracing::{debug, info, instrument};

use crate::error::{QecError, QecResult};
use crate::lattice::{Lattice, LatticeKind};

pub use heavy_hex::{AncillaShape, HeavyHexCode};
pub use surface::SurfaceCodeCycle;

/// A compiled stabilizer gadget and the global qubits it acts on.
#[derive(Debug, Clone)]
pub struct Gadget {
    /// The frozen sub-circuit.
    pub instruction: Arc<CompositeInstruction>,
    /// Global operands, in the composite's local order.
    pub qubits: Vec<QubitId>,
}

impl Gadget {
    /// Label of the underlying composite.
    pub fn label(&self) -> &str {
        &self.instruction.label
    }

    /// Append to `circuit`, writing outcomes to `clbits`.
    pub fn append_to(
        &self,
        circuit: &mut Circuit,
        clbits: impl IntoIterator<Item = ClbitId>,
    ) -> QecResult<()> {
        circuit.append(self.instruction.clone(), self.qubits.iter().copied(), clbits)?;
        Ok(())
    }
}

/// Global classical bit holding node `node`'s outcome in round `round`.
#[inline]
pub fn round_clbit(node: usize, round: usize, num_nodes: usize) -> ClbitId {
    ClbitId::from(node + round * num_nodes)
}

/// A builder that emits syndrome-extraction rounds for one lattice.
pub trait SyndromeCycle {
    /// Name used for generated circuits.
    fn name(&self) -> &'static str;

    /// Node count of the lattice this builder was created for.
    fn num_nodes(&self) -> usize;

    /// Append round `round` to `circuit`, ending with a barrier over all qubits.
    ///
    /// `circuit` must already hold the `round{round}` register at clbit
    /// offset `round * num_nodes`.
    fn append_round(&self, lattice: &Lattice, circuit: &mut Circuit, round: usize) -> QecResult<()>;

    /// Reject a lattice whose size differs from the one this builder was made for.
    fn check_lattice(&self, lattice: &Lattice) -> QecResult<()> {
        if lattice.num_nodes() != self.num_nodes() {
            return Err(QecError::LatticeMismatch {
                expected: self.num_nodes(),
                found: lattice.num_nodes(),
            });
        }
        Ok(())
    }

    /// Build `num_cycles` rounds over one `q` register of `num_nodes` qubits.
    ///
    /// Activity is read from `lattice` once per round, so nodes toggled
    /// before this call are honoured and nothing toggled during it is.
    #[instrument(skip(self, lattice), fields(builder = self.name()))]
    fn circuit(&self, lattice: &Lattice, num_cycles: usize) -> QecResult<Circuit> {
        if num_cycles == 0 {
            return Err(QecError::InvalidCycleCount(num_cycles));
        }
        self.check_lattice(lattice)?;

        let n = self.num_nodes();
        let width = u32::try_from(n).map_err(|_| {
            QecError::InvalidLatticeSize(format!("{n} nodes exceed the qubit id range"))
        })?;

        let mut circuit = Circuit::new(self.name());
        circuit.add_qreg("q", width);
        for round in 0..num_cycles {
            circuit.add_creg(format!("round{round}"), width);
            self.append_round(lattice, &mut circuit, round)?;
            debug!(round, ops = circuit.num_ops(), "appended syndrome round");
        }

        info!(
            qubits = circuit.num_qubits(),
            clbits = circuit.num_clbits(),
            ops = circuit.num_ops(),
            rounds = num_cycles,
            "built syndrome circuit"
        );
        Ok(circuit)
    }
}

/// The cycle builder matching a lattice's geometry.
pub fn cycle_for(lattice: &Lattice) -> QecResult<Box<dyn SyndromeCycle>> {
    Ok(match lattice.kind() {
        LatticeKind::Square => Box::new(SurfaceCodeCycle::new(lattice)?),
        LatticeKind::HeavyHex { .. } => Box::new(HeavyHexCode::new(lattice)?),
    })
}

/// Close a round with a barrier across every qubit.
pub(crate) fn end_round(circuit: &mut Circuit) -> QecResult<()> {
    circuit.barrier_all()?;
    Ok(())
}
