//! Dependency graph of a circuit's operations.
//!
//! Syndrome circuits are built flat in [`Circuit`](crate::Circuit); the DAG
//! is derived on demand to answer scheduling questions (depth, layers).

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};

use crate::circuit::Circuit;
use crate::instruction::Instruction;
use crate::qubit::{ClbitId, QubitId};

/// A qubit or classical wire, the label on every dependency edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Wire {
    Qubit(QubitId),
    Clbit(ClbitId),
}

/// Operations linked by the wires they share.
///
/// An edge `a -> b` labelled `w` means `b` is the next operation after `a`
/// on wire `w`. Barriers occupy the wires they span, so a barrier over all
/// qubits splits syndrome rounds into disjoint slices.
#[derive(Debug, Clone)]
pub struct CircuitDag<'c> {
    graph: DiGraph<&'c Instruction, Wire, u32>,
    /// 1-based layer of each node, indexed like the graph.
    layer: Vec<usize>,
}

impl<'c> CircuitDag<'c> {
    /// Build the graph. Composites stay single nodes over all their operands.
    pub fn from_circuit(circuit: &'c Circuit) -> Self {
        let mut graph = DiGraph::with_capacity(circuit.num_ops(), circuit.num_ops());
        let mut qubit_front: Vec<Option<NodeIndex>> = vec![None; circuit.num_qubits()];
        let mut clbit_front: Vec<Option<NodeIndex>> = vec![None; circuit.num_clbits()];
        let mut layer = Vec::with_capacity(circuit.num_ops());

        for inst in circuit.instructions() {
            let node = graph.add_node(inst);
            let mut depth = 0;

            for &q in &inst.qubits {
                if let Some(prev) = qubit_front.get_mut(q.index()).and_then(|f| f.replace(node)) {
                    graph.add_edge(prev, node, Wire::Qubit(q));
                    depth = depth.max(layer[prev.index()]);
                }
            }
            for &c in &inst.clbits {
                if let Some(prev) = clbit_front.get_mut(c.index()).and_then(|f| f.replace(node)) {
                    graph.add_edge(prev, node, Wire::Clbit(c));
                    depth = depth.max(layer[prev.index()]);
                }
            }
            layer.push(depth + 1);
        }

        Self { graph, layer }
    }

    #[inline]
    pub fn num_ops(&self) -> usize {
        self.graph.node_count()
    }

    /// Longest chain of dependent operations.
    pub fn depth(&self) -> usize {
        self.layer.iter().copied().max().unwrap_or(0)
    }

    /// Operations that must run directly before `node`.
    pub fn predecessors(&self, node: NodeIndex) -> impl Iterator<Item = &'c Instruction> + '_ {
        self.graph
            .neighbors_directed(node, Direction::Incoming)
            .map(|n| self.graph[n])
    }

    /// Operations grouped into layers of mutually independent instructions,
    /// each layer in program order.
    pub fn layers(&self) -> Vec<Vec<&'c Instruction>> {
        let mut layers = vec![Vec::new(); self.depth()];
        for node in self.graph.node_indices() {
            layers[self.layer[node.index()] - 1].push(self.graph[node]);
        }
        layers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::CircuitOps;

    #[test]
    fn test_empty_dag() {
        let circuit = Circuit::with_size("empty", 2, 0);
        let dag = CircuitDag::from_circuit(&circuit);
        assert_eq!(dag.num_ops(), 0);
        assert_eq!(dag.depth(), 0);
        assert!(dag.layers().is_empty());
    }

    #[test]
    fn test_parallel_gates_depth() {
        let mut circuit = Circuit::with_size("par", 2, 0);
        circuit.h(QubitId(0)).unwrap().h(QubitId(1)).unwrap();

        let dag = circuit.dag();
        assert_eq!(dag.num_ops(), 2);
        assert_eq!(dag.depth(), 1);
        assert_eq!(dag.layers()[0].len(), 2);
    }

    #[test]
    fn test_barrier_separates_layers() {
        let mut circuit = Circuit::with_size("rounds", 3, 0);
        circuit.x(QubitId(0)).unwrap();
        circuit.barrier_all().unwrap();
        circuit.x(QubitId(2)).unwrap();

        let dag = circuit.dag();
        let layers = dag.layers();
        assert_eq!(layers.len(), 3);
        assert!(layers[1][0].is_barrier());
        assert_eq!(layers[2][0].qubits, vec![QubitId(2)]);

        let before: Vec<_> = dag.predecessors(NodeIndex::new(2)).collect();
        assert_eq!(before.len(), 1);
        assert!(before[0].is_barrier());
    }

    #[test]
    fn test_classical_wire_orders_measurements() {
        let mut circuit = Circuit::with_size("meas", 2, 1);
        circuit
            .measure(QubitId(0), ClbitId(0))
            .unwrap()
            .measure(QubitId(1), ClbitId(0))
            .unwrap();
        assert_eq!(circuit.depth(), 2);
    }
}
