//! Operations bound to their qubit and classical-bit operands.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::gate::{ClassicalCondition, Gate, StandardGate};
use crate::qubit::{ClbitId, QubitId};

/// What an [`Instruction`] does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InstructionKind {
    Gate(Gate),
    /// Z-basis measurement, qubit `i` into clbit `i`.
    Measure,
    /// Reset to |0⟩.
    Reset,
    /// Scheduling fence over its qubits.
    Barrier,
    /// A frozen sub-circuit applied as one unit.
    Composite(Arc<CompositeInstruction>),
}

/// A reusable sub-circuit.
///
/// The body addresses qubits `0..num_qubits` and classical bits
/// `0..num_clbits`; those local ids are relabelled to the operands given when
/// the composite is appended to a circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeInstruction {
    /// Label shown in place of the body (e.g. `measure_z`).
    pub label: String,
    /// Number of local qubits.
    pub num_qubits: u32,
    /// Number of local classical bits.
    pub num_clbits: u32,
    /// The body, in local ids.
    pub body: Vec<Instruction>,
}

impl CompositeInstruction {
    /// Count of body instructions with the given name (non-recursive).
    pub fn count(&self, name: &str) -> usize {
        self.body.iter().filter(|inst| inst.name() == name).count()
    }

    /// Body instructions rewritten onto the given global operands.
    ///
    /// The caller guarantees `qubits.len() == num_qubits` and
    /// `clbits.len() == num_clbits`.
    pub fn relabel(&self, qubits: &[QubitId], clbits: &[ClbitId]) -> Vec<Instruction> {
        self.body
            .iter()
            .map(|inst| Instruction {
                kind: inst.kind.clone(),
                qubits: inst.qubits.iter().map(|q| qubits[q.index()]).collect(),
                clbits: inst.clbits.iter().map(|c| clbits[c.index()]).collect(),
            })
            .collect()
    }
}

/// One operation with its operands, in circuit-global ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    pub kind: InstructionKind,
    pub qubits: Vec<QubitId>,
    /// Written by measurements; composites forward them to their body.
    pub clbits: Vec<ClbitId>,
}

impl Instruction {
    pub fn gate(gate: impl Into<Gate>, qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            kind: InstructionKind::Gate(gate.into()),
            qubits: qubits.into_iter().collect(),
            clbits: vec![],
        }
    }

    pub fn single_qubit_gate(gate: StandardGate, qubit: QubitId) -> Self {
        Self::gate(gate, [qubit])
    }

    pub fn two_qubit_gate(gate: StandardGate, q1: QubitId, q2: QubitId) -> Self {
        Self::gate(gate, [q1, q2])
    }

    /// A single-qubit gate that fires only when `condition` holds.
    pub fn conditional_gate(gate: StandardGate, qubit: QubitId, condition: ClassicalCondition) -> Self {
        Self::gate(Gate::standard(gate).with_condition(condition), [qubit])
    }

    pub fn measure(qubit: QubitId, clbit: ClbitId) -> Self {
        Self {
            kind: InstructionKind::Measure,
            qubits: vec![qubit],
            clbits: vec![clbit],
        }
    }

    /// Pairwise measurement of `qubits` into `clbits`; both lists must have
    /// the same length.
    pub fn measure_many(
        qubits: impl IntoIterator<Item = QubitId>,
        clbits: impl IntoIterator<Item = ClbitId>,
    ) -> crate::error::IrResult<Self> {
        let qubits: Vec<_> = qubits.into_iter().collect();
        let clbits: Vec<_> = clbits.into_iter().collect();
        if qubits.len() != clbits.len() {
            return Err(crate::error::IrError::MeasureArity {
                qubits: qubits.len(),
                clbits: clbits.len(),
            });
        }
        Ok(Self {
            kind: InstructionKind::Measure,
            qubits,
            clbits,
        })
    }

    pub fn reset(qubit: QubitId) -> Self {
        Self {
            kind: InstructionKind::Reset,
            qubits: vec![qubit],
            clbits: vec![],
        }
    }

    pub fn barrier(qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            kind: InstructionKind::Barrier,
            qubits: qubits.into_iter().collect(),
            clbits: vec![],
        }
    }

    /// Apply a frozen sub-circuit to global operands.
    pub fn composite(
        composite: Arc<CompositeInstruction>,
        qubits: impl IntoIterator<Item = QubitId>,
        clbits: impl IntoIterator<Item = ClbitId>,
    ) -> Self {
        Self {
            kind: InstructionKind::Composite(composite),
            qubits: qubits.into_iter().collect(),
            clbits: clbits.into_iter().collect(),
        }
    }

    pub fn is_measure(&self) -> bool {
        matches!(self.kind, InstructionKind::Measure)
    }

    pub fn is_reset(&self) -> bool {
        matches!(self.kind, InstructionKind::Reset)
    }

    pub fn is_barrier(&self) -> bool {
        matches!(self.kind, InstructionKind::Barrier)
    }

    pub fn is_composite(&self) -> bool {
        matches!(self.kind, InstructionKind::Composite(_))
    }

    /// The gate, if this applies one.
    pub fn as_gate(&self) -> Option<&Gate> {
        match &self.kind {
            InstructionKind::Gate(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_composite(&self) -> Option<&CompositeInstruction> {
        match &self.kind {
            InstructionKind::Composite(c) => Some(c),
            _ => None,
        }
    }

    /// Operation name; composites report their label.
    pub fn name(&self) -> &str {
        match &self.kind {
            InstructionKind::Gate(g) => g.name(),
            InstructionKind::Measure => "measure",
            InstructionKind::Reset => "reset",
            InstructionKind::Barrier => "barrier",
            InstructionKind::Composite(c) => &c.label,
        }
    }
}
