//! Qubit lattices.
//!
//! A [`Lattice`] is an arena of [`Node`]s plus an ordered adjacency list of
//! indices. Neighbour activity is always read from the arena, so toggling a
//! node with [`Lattice::switch_node`] is immediately visible from every
//! neighbour.
//!
//! Two layouts are provided:
//!
//! - [`Lattice::square`]: a checkerboard of data and syndrome qubits,
//!   `index = x + width * y`.
//! - [`Lattice::heavy_hex`]: a distance-`d` heavy-hex code embedded on a
//!   `(2d-1) × (2d-1)` grid with flag qubits between vertically adjacent data
//!   qubits and X ancillas between flags (or data pairs on the boundary).

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{QecError, QecResult};
use crate::node::{Edge, Node, NodeRole};

/// Geometry a lattice was built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatticeKind {
    /// Checkerboard surface-code lattice.
    Square,
    /// Heavy-hex code of the given distance.
    HeavyHex {
        /// Code distance.
        distance: usize,
    },
}

impl LatticeKind {
    /// Human-readable kind name.
    pub fn name(&self) -> &'static str {
        match self {
            LatticeKind::Square => "square",
            LatticeKind::HeavyHex { .. } => "heavy-hex",
        }
    }
}

/// Serializable lattice description used by experiment files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LatticeSpec {
    /// `width × height` square lattice.
    Square {
        /// Columns.
        width: usize,
        /// Rows.
        height: usize,
    },
    /// Heavy-hex code lattice.
    HeavyHex {
        /// Code distance (at least 2).
        distance: usize,
    },
}

/// A qubit lattice with roles, adjacency and an activation mask.
#[derive(Debug, Clone)]
pub struct Lattice {
    kind: LatticeKind,
    width: usize,
    height: usize,
    nodes: Vec<Node>,
    graph: Vec<Vec<usize>>,
}

impl Lattice {
    /// Build a square surface-code lattice.
    ///
    /// Nodes with even `x + y` are data qubits; the rest are Z syndromes on
    /// odd rows and X syndromes on even rows. Each node lists its neighbours
    /// right, left, down, up, skipping those off the grid.
    pub fn square(width: usize, height: usize) -> QecResult<Self> {
        if width == 0 || height == 0 {
            return Err(QecError::InvalidLatticeSize(format!(
                "square lattice must be at least 1x1, got {width}x{height}"
            )));
        }

        let mut builder = LatticeBuilder::new(LatticeKind::Square, width, height);
        for y in 0..height {
            for x in 0..width {
                let role = if (x + y) % 2 == 0 {
                    NodeRole::Data
                } else if y % 2 == 1 {
                    NodeRole::Z
                } else {
                    NodeRole::X
                };
                builder.add_node(role);
            }
        }

        for y in 0..height {
            for x in 0..width {
                let i = x + width * y;
                if x + 1 < width {
                    builder.edge(i, i + 1)?;
                }
                if x > 0 {
                    builder.edge(i, i - 1)?;
                }
                if y + 1 < height {
                    builder.edge(i, i + width)?;
                }
                if y > 0 {
                    builder.edge(i, i - width)?;
                }
            }
        }

        let lattice = builder.build();
        debug!(width, height, num_nodes = lattice.num_nodes(), "built square lattice");
        Ok(lattice)
    }

    /// Build a distance-`distance` heavy-hex lattice.
    pub fn heavy_hex(distance: usize) -> QecResult<Self> {
        if distance < 2 {
            return Err(QecError::InvalidLatticeSize(format!(
                "heavy-hex distance must be at least 2, got {distance}"
            )));
        }

        let d = distance;
        let side = 2 * d - 1;
        let at = |x: usize, y: usize| x + side * y;

        let mut roles = vec![NodeRole::Base; side * side];
        // Data qubits on the even sub-grid, flags between vertical pairs.
        for r in 0..d {
            for c in 0..d {
                roles[at(2 * c, 2 * r)] = NodeRole::Data;
                if r + 1 < d {
                    roles[at(2 * c, 2 * r + 1)] = NodeRole::Flag;
                }
            }
        }
        let bulk: Vec<_> = (0..d - 1)
            .flat_map(|r| (0..d - 1).map(move |c| (c, r)))
            .filter(|(c, r)| (r + c) % 2 == 0)
            .map(|(c, r)| (2 * c + 1, 2 * r + 1))
            .collect();
        let top: Vec<_> = (0..d - 1).filter(|c| c % 2 == 1).map(|c| (2 * c + 1, 0)).collect();
        let bottom: Vec<_> = (0..d - 1)
            .filter(|c| (d - 2 + c) % 2 == 1)
            .map(|c| (2 * c + 1, side - 1))
            .collect();
        for &(x, y) in bulk.iter().chain(&top).chain(&bottom) {
            roles[at(x, y)] = NodeRole::Ancilla;
        }

        let mut builder = LatticeBuilder::new(LatticeKind::HeavyHex { distance }, side, side);
        for role in roles {
            builder.add_node(role);
        }

        // Flags first so each flag lists up, down, then its ancilla.
        for r in 0..d - 1 {
            for c in 0..d {
                let flag = at(2 * c, 2 * r + 1);
                builder.connect(at(2 * c, 2 * r), flag)?;
                builder.connect(flag, at(2 * c, 2 * r + 2))?;
            }
        }
        for &(x, y) in &bulk {
            let ancilla = at(x, y);
            builder.connect(ancilla, at(x - 1, y))?;
            builder.connect(ancilla, at(x + 1, y))?;
        }
        for &(x, y) in top.iter().chain(&bottom) {
            let ancilla = at(x, y);
            builder.connect(ancilla, at(x - 1, y))?;
            builder.connect(ancilla, at(x + 1, y))?;
        }

        let lattice = builder.build();
        debug!(
            distance,
            num_nodes = lattice.num_nodes(),
            weight4 = bulk.len(),
            weight2 = top.len() + bottom.len(),
            "built heavy-hex lattice"
        );
        Ok(lattice)
    }

    /// Build the lattice an experiment file describes.
    pub fn from_spec(spec: &LatticeSpec) -> QecResult<Self> {
        match *spec {
            LatticeSpec::Square { width, height } => Self::square(width, height),
            LatticeSpec::HeavyHex { distance } => Self::heavy_hex(distance),
        }
    }

    /// Geometry of this lattice.
    pub fn kind(&self) -> LatticeKind {
        self.kind
    }

    /// Grid columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of nodes, which is also the qubit count of generated circuits.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// All nodes in ascending index order.
    ///
    /// Cycle builders visit nodes in exactly this order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Look up one node.
    pub fn node(&self, index: usize) -> QecResult<&Node> {
        self.nodes.get(index).ok_or(QecError::NodeOutOfRange {
            index,
            num_nodes: self.nodes.len(),
        })
    }

    /// Role of a node.
    pub fn role(&self, index: usize) -> QecResult<NodeRole> {
        Ok(self.node(index)?.role)
    }

    /// Whether a node is active.
    pub fn is_active(&self, index: usize) -> QecResult<bool> {
        Ok(self.node(index)?.active)
    }

    /// Neighbour indices in adjacency order.
    pub fn neighbors(&self, index: usize) -> QecResult<&[usize]> {
        self.node(index)?;
        Ok(&self.graph[index])
    }

    /// Neighbour entries with their current activity.
    pub fn edges(&self, index: usize) -> QecResult<impl Iterator<Item = Edge> + '_> {
        Ok(self.neighbors(index)?.iter().map(|&node| Edge {
            node,
            active: self.nodes[node].active,
        }))
    }

    /// Active neighbour indices in adjacency order.
    pub fn active_neighbors(&self, index: usize) -> QecResult<Vec<usize>> {
        Ok(self.edges(index)?.filter(|e| e.active).map(|e| e.node).collect())
    }

    /// Indices of all nodes with the given role, ascending.
    pub fn nodes_with_role(&self, role: NodeRole) -> impl Iterator<Item = usize> + '_ {
        self.nodes.iter().filter(move |n| n.role == role).map(|n| n.index)
    }

    /// Number of active nodes.
    pub fn active_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.active).count()
    }

    /// Grid coordinates `(x, y)` of a node.
    pub fn coords(&self, index: usize) -> QecResult<(usize, usize)> {
        self.node(index)?;
        Ok((index % self.width, index / self.width))
    }

    /// Node at grid coordinates, if on the grid.
    pub fn index_of(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then_some(x + self.width * y)
    }

    /// Activate or deactivate a node.
    ///
    /// Neighbour activity is derived from the arena, so nothing else needs
    /// updating and repeated calls with the same value are no-ops.
    pub fn switch_node(&mut self, index: usize, active: bool) -> QecResult<()> {
        let num_nodes = self.nodes.len();
        let node = self
            .nodes
            .get_mut(index)
            .ok_or(QecError::NodeOutOfRange { index, num_nodes })?;
        node.active = active;
        Ok(())
    }

    /// L-shaped path of node indices between two nodes, both ends included.
    ///
    /// The path runs along the row of the lower-indexed endpoint and then
    /// along the column of the higher-indexed one, so
    /// `route(b, a)` is always `route(a, b)` reversed. Consecutive entries are
    /// grid neighbours; on the square lattice they alternate between
    /// syndrome and data qubits.
    pub fn route(&self, start: usize, end: usize) -> QecResult<Vec<usize>> {
        self.node(start)?;
        self.node(end)?;
        if start > end {
            let mut path = self.route(end, start)?;
            path.reverse();
            return Ok(path);
        }

        let (mut x, mut y) = (start % self.width, start / self.width);
        let (ex, ey) = (end % self.width, end / self.width);
        let mut path = vec![start];
        while x != ex {
            if x > ex {
                x -= 1;
            } else {
                x += 1;
            }
            path.push(x + self.width * y);
        }
        while y != ey {
            if y > ey {
                y -= 1;
            } else {
                y += 1;
            }
            path.push(x + self.width * y);
        }
        Ok(path)
    }
}

/// Incremental lattice construction with endpoint validation.
#[derive(Debug)]
pub struct LatticeBuilder {
    kind: LatticeKind,
    width: usize,
    height: usize,
    nodes: Vec<Node>,
    graph: Vec<Vec<usize>>,
}

impl LatticeBuilder {
    /// Start an empty lattice of the given geometry.
    pub fn new(kind: LatticeKind, width: usize, height: usize) -> Self {
        Self {
            kind,
            width,
            height,
            nodes: Vec::with_capacity(width * height),
            graph: Vec::with_capacity(width * height),
        }
    }

    /// Append a node and return its index.
    pub fn add_node(&mut self, role: NodeRole) -> usize {
        let index = self.nodes.len();
        self.nodes.push(Node::new(index, role));
        self.graph.push(vec![]);
        index
    }

    /// Add a directed adjacency entry `from → to`.
    pub fn edge(&mut self, from: usize, to: usize) -> QecResult<&mut Self> {
        let num_nodes = self.nodes.len();
        for index in [from, to] {
            if index >= num_nodes {
                return Err(QecError::NodeOutOfRange { index, num_nodes });
            }
        }
        self.graph[from].push(to);
        Ok(self)
    }

    /// Add adjacency in both directions.
    pub fn connect(&mut self, a: usize, b: usize) -> QecResult<&mut Self> {
        self.edge(a, b)?;
        self.edge(b, a)
    }

    /// Finish construction.
    pub fn build(self) -> Lattice {
        Lattice {
            kind: self.kind,
            width: self.width,
            height: self.height,
            nodes: self.nodes,
            graph: self.graph,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_roles() {
        let lattice = Lattice::square(3, 3).unwrap();
        assert_eq!(lattice.num_nodes(), 9);
        assert_eq!(lattice.nodes_with_role(NodeRole::Data).count(), 5);
        assert_eq!(lattice.nodes_with_role(NodeRole::Z).collect::<Vec<_>>(), vec![3, 5]);
        assert_eq!(lattice.nodes_with_role(NodeRole::X).collect::<Vec<_>>(), vec![1, 7]);
    }

    #[test]
    fn test_square_adjacency_order() {
        let lattice = Lattice::square(3, 3).unwrap();
        assert_eq!(lattice.neighbors(4).unwrap(), &[5, 3, 7, 1]);
        assert_eq!(lattice.neighbors(0).unwrap(), &[1, 3]);
        assert_eq!(lattice.neighbors(5).unwrap(), &[4, 8, 2]);
    }

    #[test]
    fn test_switch_node_visible_from_neighbours() {
        let mut lattice = Lattice::square(3, 3).unwrap();
        lattice.switch_node(4, false).unwrap();
        assert_eq!(lattice.active_neighbors(3).unwrap(), vec![6, 0]);
        let seen: Vec<_> = lattice.edges(5).unwrap().collect();
        assert!(seen.contains(&Edge { node: 4, active: false }));
        assert_eq!(lattice.active_count(), 8);

        lattice.switch_node(4, true).unwrap();
        assert_eq!(lattice.active_neighbors(3).unwrap(), vec![4, 6, 0]);
    }

    #[test]
    fn test_out_of_range() {
        let mut lattice = Lattice::square(2, 2).unwrap();
        assert!(matches!(
            lattice.switch_node(4, false),
            Err(QecError::NodeOutOfRange { index: 4, num_nodes: 4 })
        ));
        let mut builder = LatticeBuilder::new(LatticeKind::Square, 1, 1);
        builder.add_node(NodeRole::Data);
        assert!(builder.edge(0, 1).is_err());
    }

    #[test]
    fn test_zero_sized_square_rejected() {
        assert!(matches!(
            Lattice::square(0, 3),
            Err(QecError::InvalidLatticeSize(_))
        ));
    }

    #[test]
    fn test_route_horizontal_then_vertical() {
        let lattice = Lattice::square(3, 3).unwrap();
        assert_eq!(lattice.route(0, 8).unwrap(), vec![0, 1, 2, 5, 8]);
        assert_eq!(lattice.route(8, 0).unwrap(), vec![8, 5, 2, 1, 0]);
        assert_eq!(lattice.route(4, 4).unwrap(), vec![4]);
    }

    #[test]
    fn test_heavy_hex_distance_3() {
        let lattice = Lattice::heavy_hex(3).unwrap();
        assert_eq!(lattice.num_nodes(), 25);
        assert_eq!(lattice.nodes_with_role(NodeRole::Data).count(), 9);
        assert_eq!(lattice.nodes_with_role(NodeRole::Flag).count(), 6);
        assert_eq!(lattice.nodes_with_role(NodeRole::Ancilla).count(), 4);
        assert_eq!(lattice.nodes_with_role(NodeRole::Base).count(), 6);

        // Flag at (0, 1) joins data (0, 0) and (0, 2), then ancilla (1, 1).
        assert_eq!(lattice.neighbors(5).unwrap(), &[0, 10, 6]);
        // Weight-4 ancilla at (1, 1) joins flags (0, 1) and (2, 1).
        assert_eq!(lattice.neighbors(6).unwrap(), &[5, 7]);
        // Boundary ancilla at (3, 0) joins data (2, 0) and (4, 0).
        assert_eq!(lattice.role(3).unwrap(), NodeRole::Ancilla);
        assert_eq!(lattice.neighbors(3).unwrap(), &[2, 4]);
        // Boundary ancilla at (1, 4).
        assert_eq!(lattice.neighbors(21).unwrap(), &[20, 22]);
    }

    #[test]
    fn test_heavy_hex_rejects_small_distance() {
        assert!(Lattice::heavy_hex(1).is_err());
    }

    #[test]
    fn test_from_spec() {
        let lattice = Lattice::from_spec(&LatticeSpec::HeavyHex { distance: 2 }).unwrap();
        assert_eq!(lattice.kind(), LatticeKind::HeavyHex { distance: 2 });
        assert_eq!(lattice.num_nodes(), 9);
    }
}
