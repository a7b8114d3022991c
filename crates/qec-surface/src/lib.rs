//! `qec-surface`: syndrome-extraction cycles for the surface and heavy-hex codes.
//!
//! Given a [`Lattice`], a cycle builder emits rounds of stabilizer
//! measurements as a `qec_ir::Circuit`:
//!
//! - [`SurfaceCodeCycle`] measures Z and X plaquettes of the square lattice
//! - [`HeavyHexCode`] measures flag-mediated checks of the heavy-hex lattice
//!
//! [`LogicalQubit`] carves defect-based logical qubits out of a square
//! lattice and produces their initialization, readout, logical operators
//! and defect movement (including braiding) as circuits.
//!
//! # Quick start
//!
//! ```rust
//! use qec_surface::{Lattice, SurfaceCodeCycle, SyndromeCycle};
//!
//! let lattice = Lattice::square(3, 3).unwrap();
//! let cycle = SurfaceCodeCycle::new(&lattice).unwrap();
//! let circuit = cycle.circuit(&lattice, 3).unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 9);
//! assert_eq!(circuit.cregs().len(), 3);
//! assert_eq!(circuit.count_ops()["barrier"], 3);
//! ```
//!
//! # Logical qubits
//!
//! ```rust
//! use qec_surface::{CutType, Lattice, LogicalQubit};
//!
//! let mut lattice = Lattice::square(5, 5).unwrap();
//! let mut qubit = LogicalQubit::new(&lattice, 7, 17, CutType::Z).unwrap();
//!
//! let init = qubit.initialize(&mut lattice).unwrap();
//! assert!(!lattice.is_active(7).unwrap() && !lattice.is_active(17).unwrap());
//! assert_eq!(init.creg("logical").map(|r| r.size), Some(1));
//!
//! let x = qubit.x(&lattice).unwrap(); // X on the data qubit between the defects
//! assert_eq!(x.count_ops()["x"], 1);
//! ```

pub mod config;
pub mod cycle;
pub mod error;
pub mod lattice;
pub mod logical;
pub mod node;

pub use config::{ExperimentConfig, LogicalSpec, Step};
pub use cycle::{AncillaShape, Gadget, HeavyHexCode, SurfaceCodeCycle, SyndromeCycle, cycle_for, round_clbit};
pub use error::{QecError, QecResult};
pub use lattice::{Lattice, LatticeBuilder, LatticeKind, LatticeSpec};
pub use logical::{CutType, LOGICAL_REGISTER, LogicalQubit, LogicalState};
pub use node::{Edge, Node, NodeRole};
