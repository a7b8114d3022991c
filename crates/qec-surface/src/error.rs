//! Error types for the surface crate.

use thiserror::Error;

use crate::node::NodeRole;

/// Structural precondition failures raised while building lattices and circuits.
///
/// Every variant is fatal for the circuit under construction; nothing is
/// partially emitted.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QecError {
    /// An edge or lookup referenced a node index outside the lattice.
    #[error("Node {index} is out of range for a lattice of {num_nodes} nodes")]
    NodeOutOfRange {
        /// The offending index.
        index: usize,
        /// Number of nodes in the lattice.
        num_nodes: usize,
    },

    /// Lattice dimensions that cannot host any stabilizer.
    #[error("Invalid lattice size: {0}")]
    InvalidLatticeSize(String),

    /// A gadget was requested on a node of the wrong role.
    #[error("{gadget} requires a {expected:?} node, but node {index} is {found:?}")]
    WrongRole {
        /// Name of the gadget or operation.
        gadget: &'static str,
        /// The node it was requested on.
        index: usize,
        /// Role required.
        expected: NodeRole,
        /// Role found.
        found: NodeRole,
    },

    /// A flag node without exactly two active data neighbours.
    #[error("Flag node {index} must have exactly 2 active data neighbours, found {found}")]
    FlagShape {
        /// The flag node.
        index: usize,
        /// Number of active data neighbours found.
        found: usize,
    },

    /// An ancilla whose neighbour roles match neither weight-2 nor weight-4 shape.
    #[error("Ancilla node {index} has unrecognized neighbour roles {roles:?}")]
    UnrecognizedAncillaShape {
        /// The ancilla node.
        index: usize,
        /// Roles of its neighbours, in adjacency order.
        roles: Vec<NodeRole>,
    },

    /// The cycle builder does not support this lattice kind.
    #[error("{builder} requires a {expected} lattice")]
    WrongLatticeKind {
        /// Builder name.
        builder: &'static str,
        /// Required lattice kind.
        expected: &'static str,
    },

    /// A builder or logical qubit was used with a lattice of a different size.
    #[error("Built for a lattice of {expected} nodes, got one with {found}")]
    LatticeMismatch {
        /// Node count recorded at construction.
        expected: usize,
        /// Node count of the lattice passed in.
        found: usize,
    },

    /// At least one syndrome round is required.
    #[error("num_cycles must be at least 1, got {0}")]
    InvalidCycleCount(usize),

    /// A logical-qubit operation was called in the wrong lifecycle state.
    #[error("Logical qubit on node {measurement} cannot {operation} while {state}")]
    InvalidState {
        /// Measurement node identifying the qubit.
        measurement: usize,
        /// Operation attempted.
        operation: &'static str,
        /// Current lifecycle state.
        state: String,
    },

    /// The measurement node of a logical qubit sits on the lattice boundary.
    #[error("Measurement node {index} needs 4 neighbours, found {found}")]
    BoundaryMeasurementNode {
        /// The measurement node.
        index: usize,
        /// Number of neighbours it has.
        found: usize,
    },

    /// Two logical qubits of the same cut type cannot be braided.
    #[error("braid_zx needs opposite cut types, both qubits are {0}-cut")]
    SameCutType(String),

    /// A braid step named the same logical qubit twice.
    #[error("Logical qubit {index} (measurement node {measurement}) cannot braid with itself")]
    SelfBraid {
        /// Index of the logical qubit in the experiment.
        index: usize,
        /// Its measurement node.
        measurement: usize,
    },

    /// A movement hop would pass through a node that must stay fixed.
    #[error("Route from {from} to {to} crosses node {blocked}")]
    RouteBlocked {
        /// Start of the hop.
        from: usize,
        /// End of the hop.
        to: usize,
        /// The node that blocks it.
        blocked: usize,
    },

    /// A program step referenced a logical qubit that was never declared.
    #[error("Logical qubit {index} is not declared ({count} defined)")]
    UnknownLogicalQubit {
        /// Requested index.
        index: usize,
        /// Number of declared logical qubits.
        count: usize,
    },

    /// Experiment file could not be parsed.
    #[error("Invalid experiment config: {0}")]
    Config(#[from] serde_yaml_ng::Error),

    /// Circuit builder returned an error.
    #[error("Circuit IR error: {0}")]
    Ir(#[from] qec_ir::IrError),
}

/// Result type for lattice and cycle operations.
pub type QecResult<T> = Result<T, QecError>;
