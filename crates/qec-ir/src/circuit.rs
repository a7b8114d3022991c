//! High-level circuit builder API.

use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::dag::CircuitDag;
use crate::error::{IrError, IrResult};
use crate::gate::StandardGate;
use crate::instruction::{CompositeInstruction, Instruction, InstructionKind};
use crate::qubit::{Clbit, ClbitId, Qubit, QubitId, Register};

/// Gate-level building operations shared by [`Circuit`] and
/// [`ConstrainedCircuit`](crate::ConstrainedCircuit).
///
/// Implementors provide [`CircuitOps::apply`], which validates and records a
/// single instruction; every helper funnels through it.
pub trait CircuitOps: Sized {
    /// Validate and append one instruction.
    fn apply(&mut self, instruction: Instruction) -> IrResult<()>;

    /// Apply identity (scheduling marker).
    fn id(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::I, qubit))?;
        Ok(self)
    }

    /// Apply Hadamard gate.
    fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::H, qubit))?;
        Ok(self)
    }

    /// Apply Pauli-X gate.
    fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::X, qubit))?;
        Ok(self)
    }

    /// Apply Pauli-Y gate.
    fn y(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Y, qubit))?;
        Ok(self)
    }

    /// Apply Pauli-Z gate.
    fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Z, qubit))?;
        Ok(self)
    }

    /// Apply S gate.
    fn s(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::S, qubit))?;
        Ok(self)
    }

    /// Apply CNOT (CX) gate.
    fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::two_qubit_gate(StandardGate::CX, control, target))?;
        Ok(self)
    }

    /// Apply CZ gate.
    fn cz(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::two_qubit_gate(StandardGate::CZ, control, target))?;
        Ok(self)
    }

    /// Reset a qubit to |0⟩.
    fn reset(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::reset(qubit))?;
        Ok(self)
    }

    /// Measure a qubit to a classical bit.
    fn measure(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<&mut Self> {
        self.apply(Instruction::measure(qubit, clbit))?;
        Ok(self)
    }

    /// Measure several qubits pairwise into several classical bits.
    fn measure_many(
        &mut self,
        qubits: impl IntoIterator<Item = QubitId>,
        clbits: impl IntoIterator<Item = ClbitId>,
    ) -> IrResult<&mut Self> {
        self.apply(Instruction::measure_many(qubits, clbits)?)?;
        Ok(self)
    }

    /// Apply a barrier to specified qubits.
    fn barrier(&mut self, qubits: impl IntoIterator<Item = QubitId>) -> IrResult<&mut Self> {
        self.apply(Instruction::barrier(qubits))?;
        Ok(self)
    }
}

/// A quantum circuit.
///
/// Instructions are stored in program order. Qubit and classical bit ids are
/// contiguous from zero and every bit belongs to at most one register.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    /// Name of the circuit.
    name: String,
    /// Qubits in the circuit.
    qubits: Vec<Qubit>,
    /// Classical bits in the circuit.
    clbits: Vec<Clbit>,
    /// Quantum registers, in allocation order.
    qregs: Vec<Register>,
    /// Classical registers, in allocation order.
    cregs: Vec<Register>,
    /// Program-ordered instructions.
    instructions: Vec<Instruction>,
}

impl Circuit {
    /// Create a new empty circuit.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            qubits: vec![],
            clbits: vec![],
            qregs: vec![],
            cregs: vec![],
            instructions: vec![],
        }
    }

    /// Create a circuit with a `q` register and a `c` register of the given sizes.
    pub fn with_size(name: impl Into<String>, num_qubits: u32, num_clbits: u32) -> Self {
        let mut circuit = Self::new(name);
        if num_qubits > 0 {
            circuit.add_qreg("q", num_qubits);
        }
        if num_clbits > 0 {
            circuit.add_creg("c", num_clbits);
        }
        circuit
    }

    /// Add a single qubit outside any register.
    pub fn add_qubit(&mut self) -> QubitId {
        let id = QubitId::from(self.qubits.len());
        self.qubits.push(Qubit::new(id));
        id
    }

    /// Add a quantum register with multiple qubits.
    pub fn add_qreg(&mut self, name: impl Into<String>, size: u32) -> Vec<QubitId> {
        let name = name.into();
        let start = QubitId::from(self.qubits.len()).0;
        let ids: Vec<_> = (0..size).map(|i| QubitId(start + i)).collect();
        for (i, &id) in (0u32..).zip(&ids) {
            self.qubits.push(Qubit::with_register(id, &name, i));
        }
        self.qregs.push(Register::new(name, start, size));
        ids
    }

    /// Add a single classical bit outside any register.
    pub fn add_clbit(&mut self) -> ClbitId {
        let id = ClbitId::from(self.clbits.len());
        self.clbits.push(Clbit::new(id));
        id
    }

    /// Add a classical register with multiple bits.
    pub fn add_creg(&mut self, name: impl Into<String>, size: u32) -> Vec<ClbitId> {
        let name = name.into();
        let start = ClbitId::from(self.clbits.len()).0;
        let ids: Vec<_> = (0..size).map(|i| ClbitId(start + i)).collect();
        for (i, &id) in (0u32..).zip(&ids) {
            self.clbits.push(Clbit::with_register(id, &name, i));
        }
        self.cregs.push(Register::new(name, start, size));
        ids
    }

    // =========================================================================
    // Composition
    // =========================================================================

    /// Apply a barrier to all qubits.
    pub fn barrier_all(&mut self) -> IrResult<&mut Self> {
        let qubits: Vec<_> = self.qubits.iter().map(|q| q.id).collect();
        self.apply(Instruction::barrier(qubits))?;
        Ok(self)
    }

    /// Append a composite instruction on the given global operands.
    pub fn append(
        &mut self,
        composite: Arc<CompositeInstruction>,
        qubits: impl IntoIterator<Item = QubitId>,
        clbits: impl IntoIterator<Item = ClbitId>,
    ) -> IrResult<&mut Self> {
        self.apply(Instruction::composite(composite, qubits, clbits))?;
        Ok(self)
    }

    /// Inline `other` with qubit `i` → qubit `i` and clbit `j` → clbit `j`.
    pub fn compose(&mut self, other: &Circuit) -> IrResult<&mut Self> {
        if other.num_qubits() > self.num_qubits() || other.num_clbits() > self.num_clbits() {
            return Err(self.compose_width_error(other));
        }
        let qubits: Vec<_> = (0..other.num_qubits()).map(QubitId::from).collect();
        let clbits: Vec<_> = (0..other.num_clbits()).map(ClbitId::from).collect();
        self.compose_mapped(other, &qubits, &clbits)
    }

    /// Inline `other`, mapping its qubit `i` to `qubits[i]` and clbit `j` to `clbits[j]`.
    pub fn compose_mapped(
        &mut self,
        other: &Circuit,
        qubits: &[QubitId],
        clbits: &[ClbitId],
    ) -> IrResult<&mut Self> {
        if qubits.len() != other.num_qubits() || clbits.len() != other.num_clbits() {
            return Err(IrError::ComposeWidth {
                qubits: qubits.len(),
                clbits: clbits.len(),
                other_qubits: other.num_qubits(),
                other_clbits: other.num_clbits(),
            });
        }
        for inst in &other.instructions {
            self.apply(Instruction {
                kind: inst.kind.clone(),
                qubits: inst.qubits.iter().map(|q| qubits[q.index()]).collect(),
                clbits: inst.clbits.iter().map(|c| clbits[c.index()]).collect(),
            })?;
        }
        Ok(self)
    }

    /// Append `other` after this circuit.
    ///
    /// Qubits are shared by index; every classical register of `other` is
    /// re-allocated as a fresh register here, so measurements recorded by
    /// earlier instructions are never overwritten.
    pub fn concat(&mut self, other: &Circuit) -> IrResult<&mut Self> {
        if other.num_qubits() > self.num_qubits() {
            return Err(self.compose_width_error(other));
        }

        let mut clbits = vec![ClbitId(0); other.num_clbits()];
        let mut mapped = vec![false; other.num_clbits()];
        for reg in &other.cregs {
            let name = self.fresh_creg_name(&reg.name);
            let ids = self.add_creg(name, reg.size);
            for (offset, id) in ids.into_iter().enumerate() {
                let src = reg.start as usize + offset;
                clbits[src] = id;
                mapped[src] = true;
            }
        }
        for (src, done) in mapped.into_iter().enumerate() {
            if !done {
                clbits[src] = self.add_clbit();
            }
        }

        let qubits: Vec<_> = (0..other.num_qubits()).map(QubitId::from).collect();
        self.compose_mapped(other, &qubits, &clbits)
    }

    /// Freeze the whole circuit into a reusable composite instruction.
    pub fn to_instruction(&self, label: impl Into<String>) -> Arc<CompositeInstruction> {
        Arc::new(CompositeInstruction {
            label: label.into(),
            num_qubits: QubitId::from(self.num_qubits()).0,
            num_clbits: ClbitId::from(self.num_clbits()).0,
            body: self.instructions.clone(),
        })
    }

    /// A copy of this circuit with every composite inlined, recursively.
    pub fn decompose(&self) -> Circuit {
        let mut flat = Circuit {
            name: self.name.clone(),
            qubits: self.qubits.clone(),
            clbits: self.clbits.clone(),
            qregs: self.qregs.clone(),
            cregs: self.cregs.clone(),
            instructions: Vec::with_capacity(self.instructions.len()),
        };
        for inst in &self.instructions {
            inline_into(&mut flat.instructions, inst);
        }
        flat
    }

    /// `base`, or `base_N` with the smallest `N` not already taken by a
    /// classical register. This is the name [`Circuit::concat`] gives a
    /// register called `base`.
    pub fn fresh_creg_name(&self, base: &str) -> String {
        if self.creg(base).is_none() {
            return base.to_string();
        }
        (1..)
            .map(|n| format!("{base}_{n}"))
            .find(|candidate| self.creg(candidate).is_none())
            .unwrap_or_else(|| base.to_string())
    }

    fn compose_width_error(&self, other: &Circuit) -> IrError {
        IrError::ComposeWidth {
            qubits: self.num_qubits(),
            clbits: self.num_clbits(),
            other_qubits: other.num_qubits(),
            other_clbits: other.num_clbits(),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.qubits.len()
    }

    /// Get the number of classical bits.
    pub fn num_clbits(&self) -> usize {
        self.clbits.len()
    }

    /// Number of top-level instructions.
    pub fn num_ops(&self) -> usize {
        self.instructions.len()
    }

    /// Get the qubits in the circuit.
    pub fn qubits(&self) -> &[Qubit] {
        &self.qubits
    }

    /// Get the classical bits in the circuit.
    pub fn clbits(&self) -> &[Clbit] {
        &self.clbits
    }

    /// Quantum registers in allocation order.
    pub fn qregs(&self) -> &[Register] {
        &self.qregs
    }

    /// Classical registers in allocation order.
    pub fn cregs(&self) -> &[Register] {
        &self.cregs
    }

    /// Look up a classical register by name.
    pub fn creg(&self, name: &str) -> Option<&Register> {
        self.cregs.iter().find(|r| r.name == name)
    }

    /// Top-level instructions in program order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Count top-level instructions by name (composites by label).
    pub fn count_ops(&self) -> FxHashMap<String, usize> {
        let mut counts = FxHashMap::default();
        for inst in &self.instructions {
            *counts.entry(inst.name().to_string()).or_insert(0) += 1;
        }
        counts
    }

    /// Get the circuit depth, counting each composite as one layer.
    pub fn depth(&self) -> usize {
        CircuitDag::from_circuit(self).depth()
    }

    /// Build the DAG view of this circuit.
    pub fn dag(&self) -> CircuitDag<'_> {
        CircuitDag::from_circuit(self)
    }
}

impl CircuitOps for Circuit {
    fn apply(&mut self, instruction: Instruction) -> IrResult<()> {
        let gate_name = match &instruction.kind {
            InstructionKind::Gate(gate) => Some(gate.name().to_string()),
            InstructionKind::Composite(c) => Some(c.label.clone()),
            _ => None,
        };

        match &instruction.kind {
            InstructionKind::Gate(gate) => {
                let expected = gate.num_qubits() as usize;
                let got = instruction.qubits.len();
                if expected != got {
                    return Err(IrError::QubitCountMismatch {
                        gate_name: gate.name().to_string(),
                        expected: gate.num_qubits(),
                        got: u32::try_from(got).unwrap_or(u32::MAX),
                    });
                }
            }
            InstructionKind::Composite(c) => {
                if instruction.qubits.len() != c.num_qubits as usize
                    || instruction.clbits.len() != c.num_clbits as usize
                {
                    return Err(IrError::CompositeArity {
                        label: c.label.clone(),
                        expected_qubits: c.num_qubits,
                        expected_clbits: c.num_clbits,
                        got_qubits: instruction.qubits.len(),
                        got_clbits: instruction.clbits.len(),
                    });
                }
            }
            InstructionKind::Measure => {
                if instruction.qubits.len() != instruction.clbits.len() {
                    return Err(IrError::MeasureArity {
                        qubits: instruction.qubits.len(),
                        clbits: instruction.clbits.len(),
                    });
                }
            }
            InstructionKind::Reset | InstructionKind::Barrier => {}
        }

        for &qubit in &instruction.qubits {
            if qubit.index() >= self.qubits.len() {
                return Err(IrError::QubitNotFound {
                    qubit,
                    gate_name: gate_name.clone(),
                });
            }
        }

        for &clbit in &instruction.clbits {
            if clbit.index() >= self.clbits.len() {
                return Err(IrError::ClbitNotFound {
                    clbit,
                    gate_name: gate_name.clone(),
                });
            }
        }

        let mut seen = FxHashSet::default();
        for &qubit in &instruction.qubits {
            if !seen.insert(qubit) {
                return Err(IrError::DuplicateQubit {
                    qubit,
                    gate_name: gate_name.clone(),
                });
            }
        }

        self.instructions.push(instruction);
        Ok(())
    }
}

fn inline_into(out: &mut Vec<Instruction>, inst: &Instruction) {
    match &inst.kind {
        InstructionKind::Composite(c) => {
            for inner in c.relabel(&inst.qubits, &inst.clbits) {
                inline_into(out, &inner);
            }
        }
        _ => out.push(inst.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bell_gadget() -> Arc<CompositeInstruction> {
        let mut body = Circuit::with_size("bell", 2, 1);
        body.h(QubitId(0))
            .unwrap()
            .cx(QubitId(0), QubitId(1))
            .unwrap()
            .measure(QubitId(1), ClbitId(0))
            .unwrap();
        body.to_instruction("bell")
    }

    #[test]
    fn test_new_circuit() {
        let circuit = Circuit::new("test");
        assert_eq!(circuit.name(), "test");
        assert_eq!(circuit.num_qubits(), 0);
        assert_eq!(circuit.num_clbits(), 0);
    }

    #[test]
    fn test_add_registers() {
        let mut circuit = Circuit::new("test");
        let qreg = circuit.add_qreg("q", 4);
        let r0 = circuit.add_creg("round0", 4);
        let r1 = circuit.add_creg("round1", 4);

        assert_eq!(qreg.len(), 4);
        assert_eq!(r0[0], ClbitId(0));
        assert_eq!(r1[0], ClbitId(4));
        assert_eq!(circuit.num_clbits(), 8);
        assert_eq!(circuit.creg("round1").map(|r| r.start), Some(4));
        assert_eq!(format!("{}", circuit.clbits()[5]), "round1[1]");
    }

    #[test]
    fn test_fluent_api() {
        let mut circuit = Circuit::with_size("test", 2, 2);
        circuit
            .h(QubitId(0))
            .unwrap()
            .cx(QubitId(0), QubitId(1))
            .unwrap()
            .measure(QubitId(0), ClbitId(0))
            .unwrap()
            .measure(QubitId(1), ClbitId(1))
            .unwrap();

        assert_eq!(circuit.num_ops(), 4);
        assert_eq!(circuit.depth(), 3);
    }

    #[test]
    fn test_out_of_range_qubit() {
        let mut circuit = Circuit::with_size("test", 2, 0);
        let err = circuit.cx(QubitId(0), QubitId(2)).unwrap_err();
        assert!(matches!(
            err,
            IrError::QubitNotFound {
                qubit: QubitId(2),
                ..
            }
        ));
        assert_eq!(circuit.num_ops(), 0);
    }

    #[test]
    fn test_duplicate_qubit() {
        let mut circuit = Circuit::with_size("test", 2, 0);
        assert!(matches!(
            circuit.cx(QubitId(1), QubitId(1)),
            Err(IrError::DuplicateQubit { .. })
        ));
    }

    #[test]
    fn test_append_composite_arity() {
        let mut circuit = Circuit::with_size("test", 4, 2);
        let gadget = bell_gadget();

        circuit
            .append(gadget.clone(), [QubitId(2), QubitId(3)], [ClbitId(1)])
            .unwrap();
        assert_eq!(circuit.count_ops().get("bell"), Some(&1));

        let err = circuit
            .append(gadget, [QubitId(2)], [ClbitId(1)])
            .unwrap_err();
        assert!(matches!(err, IrError::CompositeArity { got_qubits: 1, .. }));
    }

    #[test]
    fn test_decompose_inlines_relabelled_body() {
        let mut circuit = Circuit::with_size("test", 4, 2);
        circuit
            .append(bell_gadget(), [QubitId(3), QubitId(1)], [ClbitId(1)])
            .unwrap();

        let flat = circuit.decompose();
        let names: Vec<_> = flat.instructions().iter().map(Instruction::name).collect();
        assert_eq!(names, vec!["h", "cx", "measure"]);
        assert_eq!(flat.instructions()[1].qubits, vec![QubitId(3), QubitId(1)]);
        assert_eq!(flat.instructions()[2].clbits, vec![ClbitId(1)]);
    }

    #[test]
    fn test_compose_identity_mapping() {
        let mut small = Circuit::with_size("small", 2, 1);
        small.x(QubitId(1)).unwrap();

        let mut big = Circuit::with_size("big", 3, 1);
        big.compose(&small).unwrap();
        assert_eq!(big.instructions()[0].qubits, vec![QubitId(1)]);

        let mut tiny = Circuit::with_size("tiny", 1, 0);
        assert!(matches!(
            tiny.compose(&big),
            Err(IrError::ComposeWidth { .. })
        ));
    }

    #[test]
    fn test_concat_allocates_fresh_registers() {
        let mut round = Circuit::new("round");
        round.add_qreg("q", 2);
        round.add_creg("round0", 2);
        round.measure(QubitId(0), ClbitId(0)).unwrap();

        let mut total = Circuit::new("total");
        total.add_qreg("q", 2);
        total.concat(&round).unwrap();
        total.concat(&round).unwrap();

        assert_eq!(total.num_clbits(), 4);
        let names: Vec<_> = total.cregs().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["round0", "round0_1"]);
        assert_eq!(total.instructions()[0].clbits, vec![ClbitId(0)]);
        assert_eq!(total.instructions()[1].clbits, vec![ClbitId(2)]);
    }
}
