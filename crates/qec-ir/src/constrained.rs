//! Circuits restricted to a declared set of operands.

use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::circuit::CircuitOps;
use crate::error::{IrError, IrResult};
use crate::instruction::{CompositeInstruction, Instruction, InstructionKind};
use crate::qubit::{ClbitId, QubitId};

/// A sub-circuit that may only touch a fixed set of qubits and classical bits.
///
/// Gates are written against global qubit ids; anything outside the declared
/// set is rejected when the instruction is applied. Classical bits are local
/// (`0..num_clbits`). Freezing with [`ConstrainedCircuit::to_instruction`]
/// compacts the declared qubits to local indices in declaration order, so
/// the result is appended with the declared list as operands.
///
/// ```rust
/// use qec_ir::{CircuitOps, ClbitId, ConstrainedCircuit, QubitId};
///
/// let mut gadget = ConstrainedCircuit::new("measure_z", [QubitId(4), QubitId(1)], 1).unwrap();
/// gadget.reset(QubitId(4)).unwrap().cx(QubitId(1), QubitId(4)).unwrap();
/// gadget.measure(QubitId(4), ClbitId(0)).unwrap();
///
/// assert!(gadget.x(QubitId(2)).is_err());
/// assert_eq!(gadget.to_instruction().num_qubits, 2);
/// ```
#[derive(Debug, Clone)]
pub struct ConstrainedCircuit {
    name: String,
    qubits: Vec<QubitId>,
    local: FxHashMap<QubitId, QubitId>,
    num_clbits: u32,
    body: Vec<Instruction>,
}

impl ConstrainedCircuit {
    /// Declare a constrained circuit over `qubits` with `num_clbits` local bits.
    pub fn new(
        name: impl Into<String>,
        qubits: impl IntoIterator<Item = QubitId>,
        num_clbits: u32,
    ) -> IrResult<Self> {
        let name = name.into();
        let qubits: Vec<_> = qubits.into_iter().collect();
        let mut local = FxHashMap::default();
        for (i, &q) in qubits.iter().enumerate() {
            if local.insert(q, QubitId::from(i)).is_some() {
                return Err(IrError::DuplicateQubit {
                    qubit: q,
                    gate_name: Some(name),
                });
            }
        }
        Ok(Self {
            name,
            qubits,
            local,
            num_clbits,
            body: vec![],
        })
    }

    /// Circuit name, used as the composite label.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared qubits, in declaration order.
    pub fn qubits(&self) -> &[QubitId] {
        &self.qubits
    }

    /// Number of local classical bits.
    pub fn num_clbits(&self) -> u32 {
        self.num_clbits
    }

    /// Instructions recorded so far, in local ids.
    pub fn body(&self) -> &[Instruction] {
        &self.body
    }

    /// Freeze into a composite labelled with this circuit's name.
    pub fn to_instruction(&self) -> Arc<CompositeInstruction> {
        Arc::new(CompositeInstruction {
            label: self.name.clone(),
            num_qubits: QubitId::from(self.qubits.len()).0,
            num_clbits: self.num_clbits,
            body: self.body.clone(),
        })
    }
}

impl CircuitOps for ConstrainedCircuit {
    fn apply(&mut self, instruction: Instruction) -> IrResult<()> {
        if let InstructionKind::Gate(gate) = &instruction.kind {
            let got = instruction.qubits.len();
            if gate.num_qubits() as usize != got {
                return Err(IrError::QubitCountMismatch {
                    gate_name: gate.name().to_string(),
                    expected: gate.num_qubits(),
                    got: u32::try_from(got).unwrap_or(u32::MAX),
                });
            }
        }
        if instruction.is_measure() && instruction.qubits.len() != instruction.clbits.len() {
            return Err(IrError::MeasureArity {
                qubits: instruction.qubits.len(),
                clbits: instruction.clbits.len(),
            });
        }

        let mut seen = FxHashSet::default();
        let mut qubits = Vec::with_capacity(instruction.qubits.len());
        for &q in &instruction.qubits {
            let Some(&local) = self.local.get(&q) else {
                return Err(IrError::QubitOutsideConstraint {
                    qubit: q,
                    circuit: self.name.clone(),
                });
            };
            if !seen.insert(q) {
                return Err(IrError::DuplicateQubit {
                    qubit: q,
                    gate_name: Some(instruction.name().to_string()),
                });
            }
            qubits.push(local);
        }

        for &c in &instruction.clbits {
            if c.0 >= self.num_clbits {
                return Err(IrError::ClbitOutsideConstraint {
                    clbit: c,
                    num_clbits: self.num_clbits,
                    circuit: self.name.clone(),
                });
            }
        }

        self.body.push(Instruction {
            kind: instruction.kind,
            qubits,
            clbits: instruction.clbits,
        });
        Ok(())
    }
}
