//! QASM3 emitter for serializing circuits.

use qec_ir::{Circuit, ClbitId, Instruction, InstructionKind, QubitId};
use tracing::debug;

use crate::error::{EmitError, EmitResult};

/// Emit a circuit as QASM3 source code.
///
/// Composite instructions are inlined first, so the output only contains
/// standard gates, resets, measurements and barriers.
pub fn emit(circuit: &Circuit) -> EmitResult<String> {
    let flat = circuit.decompose();
    let mut emitter = Emitter::new(&flat);
    let source = emitter.emit_circuit()?;
    debug!(
        circuit = circuit.name(),
        lines = source.lines().count(),
        "emitted qasm3"
    );
    Ok(source)
}

/// QASM3 emitter over one flattened circuit.
struct Emitter<'a> {
    circuit: &'a Circuit,
    output: String,
}

impl<'a> Emitter<'a> {
    fn new(circuit: &'a Circuit) -> Self {
        Self {
            circuit,
            output: String::new(),
        }
    }

    fn emit_circuit(&mut self) -> EmitResult<String> {
        // Version
        self.writeln("OPENQASM 3.0;");
        self.writeln("include \"stdgates.inc\";");
        self.writeln("");

        // Declarations, registers first, then loose bits
        let mut declared = false;
        for reg in self.circuit.qregs() {
            self.writeln(&format!("qubit[{}] {};", reg.size, reg.name));
            declared = true;
        }
        for qubit in self.circuit.qubits().iter().filter(|q| q.register.is_none()) {
            self.writeln(&format!("qubit {};", loose_qubit(qubit.id)));
            declared = true;
        }
        for reg in self.circuit.cregs() {
            self.writeln(&format!("bit[{}] {};", reg.size, reg.name));
            declared = true;
        }
        for clbit in self.circuit.clbits().iter().filter(|c| c.register.is_none()) {
            self.writeln(&format!("bit {};", loose_clbit(clbit.id)));
            declared = true;
        }
        if declared {
            self.writeln("");
        }

        // Instructions
        for instruction in self.circuit.instructions() {
            self.emit_instruction(instruction)?;
        }

        Ok(std::mem::take(&mut self.output))
    }

    fn emit_instruction(&mut self, instruction: &Instruction) -> EmitResult<()> {
        match &instruction.kind {
            InstructionKind::Gate(gate) => {
                let qubits = self.emit_qubits(&instruction.qubits)?;
                let statement = format!("{} {qubits};", gate.name());
                match &gate.condition {
                    Some(condition) => {
                        let reg = self
                            .circuit
                            .creg(&condition.register)
                            .ok_or_else(|| EmitError::UnknownRegister(condition.register.clone()))?;
                        if reg.size < 64 && condition.value >> reg.size != 0 {
                            return Err(EmitError::ConditionOverflow {
                                register: reg.name.clone(),
                                value: condition.value,
                                size: reg.size,
                            });
                        }
                        self.writeln(&format!(
                            "if ({} == {}) {statement}",
                            reg.name, condition.value
                        ));
                    }
                    None => self.writeln(&statement),
                }
            }

            InstructionKind::Measure => {
                // One assignment per pair; grouped measurements need not be contiguous.
                for (&q, &c) in instruction.qubits.iter().zip(&instruction.clbits) {
                    let qubit = self.emit_qubit(q)?;
                    let clbit = self.emit_clbit(c)?;
                    self.writeln(&format!("{clbit} = measure {qubit};"));
                }
            }

            InstructionKind::Reset => {
                for &q in &instruction.qubits {
                    let qubit = self.emit_qubit(q)?;
                    self.writeln(&format!("reset {qubit};"));
                }
            }

            InstructionKind::Barrier => {
                if instruction.qubits.len() == self.circuit.num_qubits() && self.covers_registers() {
                    let regs: Vec<_> = self.circuit.qregs().iter().map(|r| r.name.as_str()).collect();
                    self.writeln(&format!("barrier {};", regs.join(", ")));
                } else {
                    let qubits = self.emit_qubits(&instruction.qubits)?;
                    if qubits.is_empty() {
                        self.writeln("barrier;");
                    } else {
                        self.writeln(&format!("barrier {qubits};"));
                    }
                }
            }

            // `emit` decomposes first; this covers direct callers.
            InstructionKind::Composite(composite) => {
                let nested = composite.relabel(&instruction.qubits, &instruction.clbits);
                for inner in &nested {
                    self.emit_instruction(inner)?;
                }
            }
        }

        Ok(())
    }

    /// Whether every qubit sits in a named register.
    fn covers_registers(&self) -> bool {
        !self.circuit.qregs().is_empty()
            && self.circuit.qubits().iter().all(|q| q.register.is_some())
    }

    fn emit_qubits(&self, qubits: &[QubitId]) -> EmitResult<String> {
        Ok(qubits
            .iter()
            .map(|&q| self.emit_qubit(q))
            .collect::<EmitResult<Vec<_>>>()?
            .join(", "))
    }

    fn emit_qubit(&self, id: QubitId) -> EmitResult<String> {
        let qubit = self
            .circuit
            .qubits()
            .get(id.index())
            .ok_or(EmitError::QubitNotFound(id.0))?;
        Ok(match (&qubit.register, qubit.index) {
            (Some(reg), Some(idx)) => format!("{reg}[{idx}]"),
            _ => loose_qubit(id),
        })
    }

    fn emit_clbit(&self, id: ClbitId) -> EmitResult<String> {
        let clbit = self
            .circuit
            .clbits()
            .get(id.index())
            .ok_or(EmitError::ClbitNotFound(id.0))?;
        Ok(match (&clbit.register, clbit.index) {
            (Some(reg), Some(idx)) => format!("{reg}[{idx}]"),
            _ => loose_clbit(id),
        })
    }

    fn writeln(&mut self, line: &str) {
        self.output.push_str(line);
        self.output.push('\n');
    }
}

fn loose_qubit(id: QubitId) -> String {
    format!("_q{}", id.0)
}

fn loose_clbit(id: ClbitId) -> String {
    format!("_c{}", id.0)
}
