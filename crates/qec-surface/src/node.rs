//! Lattice node roles.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What a lattice position does during syndrome extraction.
///
/// Every dispatch over roles is an exhaustive `match`, so adding a role
/// surfaces every site that has to handle it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeRole {
    /// Inert grid position. Takes no part in any stabilizer.
    Base,
    /// Data qubit carrying encoded information.
    Data,
    /// Syndrome qubit measuring a Z-type plaquette.
    Z,
    /// Syndrome qubit measuring an X-type plaquette.
    X,
    /// Heavy-hex flag qubit between two data qubits.
    Flag,
    /// Heavy-hex X-syndrome qubit.
    Ancilla,
}

impl NodeRole {
    /// Whether this role measures a stabilizer on the square lattice.
    pub fn is_syndrome(self) -> bool {
        matches!(self, NodeRole::Z | NodeRole::X)
    }
}

impl fmt::Display for NodeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeRole::Base => "base",
            NodeRole::Data => "data",
            NodeRole::Z => "z",
            NodeRole::X => "x",
            NodeRole::Flag => "flag",
            NodeRole::Ancilla => "ancilla",
        };
        f.write_str(name)
    }
}

/// A lattice position.
///
/// Index and role are fixed once the lattice is built; only `active` moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Position in the lattice arena, equal to the qubit index.
    pub index: usize,
    /// Role of this node.
    pub role: NodeRole,
    /// Whether the node takes part in ordinary syndrome rounds.
    pub active: bool,
}

impl Node {
    /// An active node.
    pub fn new(index: usize, role: NodeRole) -> Self {
        Self {
            index,
            role,
            active: true,
        }
    }
}

/// A neighbour entry as seen from one node.
///
/// `active` is read from the node arena when the edge is produced, never
/// cached, so it always reflects the latest [`switch_node`] call.
///
/// [`switch_node`]: crate::Lattice::switch_node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    /// Target node index.
    pub node: usize,
    /// Current activity of the target.
    pub active: bool,
}
