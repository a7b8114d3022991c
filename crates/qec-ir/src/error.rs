//! Error types for the IR crate.

use crate::qubit::{ClbitId, QubitId};
use thiserror::Error;

/// Errors that can occur while building circuits.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Qubit not found in circuit.
    #[error("Qubit {qubit:?} not found in circuit{}", format_gate_context(.gate_name))]
    QubitNotFound {
        /// The qubit that was not found.
        qubit: QubitId,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Classical bit not found in circuit.
    #[error("Classical bit {clbit:?} not found in circuit{}", format_gate_context(.gate_name))]
    ClbitNotFound {
        /// The classical bit that was not found.
        clbit: ClbitId,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Gate requires different number of qubits.
    #[error("Gate '{gate_name}' requires {expected} qubits, got {got}")]
    QubitCountMismatch {
        /// Name of the gate.
        gate_name: String,
        /// Expected number of qubits.
        expected: u32,
        /// Actual number of qubits provided.
        got: u32,
    },

    /// Measurement operand lists differ in length.
    #[error("measure: qubit count ({qubits}) does not match clbit count ({clbits})")]
    MeasureArity {
        /// Number of qubits given.
        qubits: usize,
        /// Number of classical bits given.
        clbits: usize,
    },

    /// A composite instruction was appended with the wrong operand count.
    #[error(
        "Instruction '{label}' expects {expected_qubits} qubits and {expected_clbits} clbits, got {got_qubits} and {got_clbits}"
    )]
    CompositeArity {
        /// Label of the composite instruction.
        label: String,
        /// Declared qubit width.
        expected_qubits: u32,
        /// Declared classical width.
        expected_clbits: u32,
        /// Qubits supplied.
        got_qubits: usize,
        /// Classical bits supplied.
        got_clbits: usize,
    },

    /// Duplicate qubit in operation.
    #[error("Duplicate qubit {qubit:?} in operation{}", format_gate_context(.gate_name))]
    DuplicateQubit {
        /// The duplicate qubit.
        qubit: QubitId,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// A constrained circuit was asked to touch a qubit outside its declared set.
    #[error("Qubit {qubit} is outside the declared set of constrained circuit '{circuit}'")]
    QubitOutsideConstraint {
        /// The offending qubit.
        qubit: QubitId,
        /// Name of the constrained circuit.
        circuit: String,
    },

    /// A constrained circuit was asked to write a classical bit it does not own.
    #[error("Classical bit {clbit} is outside the {num_clbits} bits of constrained circuit '{circuit}'")]
    ClbitOutsideConstraint {
        /// The offending classical bit.
        clbit: ClbitId,
        /// Declared classical width.
        num_clbits: u32,
        /// Name of the constrained circuit.
        circuit: String,
    },

    /// The circuit being composed is wider than the target.
    #[error(
        "Cannot compose a circuit with {other_qubits} qubits / {other_clbits} clbits onto one with {qubits} / {clbits}"
    )]
    ComposeWidth {
        /// Target qubit count.
        qubits: usize,
        /// Target classical bit count.
        clbits: usize,
        /// Source qubit count.
        other_qubits: usize,
        /// Source classical bit count.
        other_clbits: usize,
    },
}

/// Helper function to format optional gate context.
#[allow(clippy::ref_option)]
fn format_gate_context(gate_name: &Option<String>) -> String {
    match gate_name {
        Some(name) => format!(" (gate: {name})"),
        None => String::new(),
    }
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
