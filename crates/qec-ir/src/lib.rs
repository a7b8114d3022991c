//! Circuit intermediate representation for syndrome-extraction circuits.
//!
//! This crate is the circuit collaborator of the QEC workspace: register
//! allocation, Clifford gates, measurement and reset, composition of whole
//! circuits and freezing sub-circuits into reusable composite instructions.
//!
//! # Core Components
//!
//! - **Qubits and Classical Bits**: [`QubitId`], [`ClbitId`] and named [`Register`] blocks
//! - **Gates**: [`StandardGate`], optionally conditioned by a [`ClassicalCondition`]
//! - **Instructions**: [`Instruction`] and frozen [`CompositeInstruction`] sub-circuits
//! - **Circuit**: [`Circuit`] builder, gate helpers via [`CircuitOps`]
//! - **Constrained circuits**: [`ConstrainedCircuit`] rejects operands outside a declared set
//! - **DAG**: [`CircuitDag`] for depth and layer analysis
//!
//! # Example: a reusable parity check
//!
//! ```rust
//! use qec_ir::{Circuit, CircuitOps, ClbitId, ConstrainedCircuit, QubitId};
//!
//! let mut circuit = Circuit::new("round");
//! circuit.add_qreg("q", 3);
//! let bits = circuit.add_creg("round0", 3);
//!
//! let mut check = ConstrainedCircuit::new("measure_z", [QubitId(1), QubitId(0), QubitId(2)], 1).unwrap();
//! check.reset(QubitId(1)).unwrap();
//! check.cx(QubitId(0), QubitId(1)).unwrap().cx(QubitId(2), QubitId(1)).unwrap();
//! check.measure(QubitId(1), ClbitId(0)).unwrap();
//!
//! circuit.append(check.to_instruction(), check.qubits().to_vec(), [bits[1]]).unwrap();
//! circuit.barrier_all().unwrap();
//!
//! assert_eq!(circuit.decompose().num_ops(), 5);
//! ```

pub mod circuit;
pub mod constrained;
pub mod dag;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod qubit;

pub use circuit::{Circuit, CircuitOps};
pub use constrained::ConstrainedCircuit;
pub use dag::{CircuitDag, Wire};
pub use error::{IrError, IrResult};
pub use gate::{ClassicalCondition, Gate, StandardGate};
pub use instruction::{CompositeInstruction, Instruction, InstructionKind};
pub use qubit::{Clbit, ClbitId, Qubit, QubitId, Register};
