//! `OpenQASM` 3 emitter for qec circuits
//!
//! Turns the circuits produced by `qec-surface` into `OpenQASM` 3.0 source
//! that standard toolchains can load.
//!
//! # Supported Features
//!
//! | Feature | Output |
//! |---------|--------|
//! | Version declaration | `OPENQASM 3.0;` |
//! | Quantum registers | `qubit[9] q;` |
//! | Classical registers | `bit[9] round0;` |
//! | Clifford gates | `h q[0];`, `cx q[0], q[1];`, `id q[4];` |
//! | Measurements | `round0[3] = measure q[3];` |
//! | Reset | `reset q[3];` |
//! | Barriers | `barrier q;` |
//! | Classical conditions | `if (logical == 1) x q[12];` |
//! | Composite gadgets | inlined |
//!
//! # Example
//!
//! ```rust
//! use qec_ir::{Circuit, CircuitOps, QubitId, ClbitId};
//! use qec_qasm3::emit;
//!
//! let mut circuit = Circuit::with_size("bell", 2, 2);
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//! circuit.measure(QubitId(1), ClbitId(1)).unwrap();
//!
//! let qasm = emit(&circuit).unwrap();
//! assert!(qasm.contains("OPENQASM 3.0;"));
//! assert!(qasm.contains("h q[0];"));
//! assert!(qasm.contains("cx q[0], q[1];"));
//! assert!(qasm.contains("c[1] = measure q[1];"));
//! ```

mod emitter;
mod error;

pub use emitter::emit;
pub use error::{EmitError, EmitResult};
