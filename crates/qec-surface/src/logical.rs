//! Defect-based logical qubits on the square lattice.
//!
//! A logical qubit is a pair of switched-off syndrome nodes: the
//! *measurement* node, whose plaquette is projected to prepare and read the
//! logical state, and the *ancilla* node, the second defect that fixes the
//! logical operators. A Z-cut qubit lives on two Z nodes, an X-cut qubit on
//! two X nodes.
//!
//! Operations take the lattice explicitly: `&mut Lattice` where they toggle
//! activity, `&Lattice` where they only read geometry.

use std::fmt;

use qec_ir::{Circuit, CircuitOps, ClassicalCondition, Instruction, QubitId, StandardGate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::cycle::SyndromeCycle;
use crate::error::{QecError, QecResult};
use crate::lattice::{Lattice, LatticeKind};
use crate::node::NodeRole;

/// Name of the one-bit register holding a logical measurement.
pub const LOGICAL_REGISTER: &str = "logical";

/// Boundary type of a logical qubit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CutType {
    /// Defects on Z plaquettes. Logical X is a line, logical Z a circle.
    Z,
    /// Defects on X plaquettes. Logical Z is a line, logical X a circle.
    X,
}

impl CutType {
    /// Role of the syndrome nodes this cut type lives on.
    pub fn syndrome_role(self) -> NodeRole {
        match self {
            CutType::Z => NodeRole::Z,
            CutType::X => NodeRole::X,
        }
    }
}

impl fmt::Display for CutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CutType::Z => f.write_str("Z"),
            CutType::X => f.write_str("X"),
        }
    }
}

/// Lifecycle of a logical qubit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalState {
    /// Constructed, nodes still take part in ordinary rounds.
    Uninitialized,
    /// Projected; both defect nodes are switched off.
    Live,
    /// Read out; both defect nodes are back in ordinary rounds.
    Measured,
}

impl fmt::Display for LogicalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogicalState::Uninitialized => "uninitialized",
            LogicalState::Live => "live",
            LogicalState::Measured => "measured",
        };
        f.write_str(name)
    }
}

/// A logical qubit carved out of a square lattice.
#[derive(Debug, Clone)]
pub struct LogicalQubit {
    measurement: usize,
    ancilla: usize,
    cut: CutType,
    state: LogicalState,
    width: usize,
    num_nodes: usize,
}

impl LogicalQubit {
    /// Define a logical qubit on two syndrome nodes.
    ///
    /// Both nodes must carry the syndrome role of `cut`, and the measurement
    /// node needs all four neighbours.
    pub fn new(lattice: &Lattice, measurement: usize, ancilla: usize, cut: CutType) -> QecResult<Self> {
        if lattice.kind() != LatticeKind::Square {
            return Err(QecError::WrongLatticeKind {
                builder: "LogicalQubit",
                expected: "square",
            });
        }

        let expected = cut.syndrome_role();
        for index in [measurement, ancilla] {
            let found = lattice.role(index)?;
            if found != expected {
                return Err(QecError::WrongRole {
                    gadget: "LogicalQubit",
                    index,
                    expected,
                    found,
                });
            }
        }

        let found = lattice.neighbors(measurement)?.len();
        if found != 4 {
            return Err(QecError::BoundaryMeasurementNode {
                index: measurement,
                found,
            });
        }

        Ok(Self {
            measurement,
            ancilla,
            cut,
            state: LogicalState::Uninitialized,
            width: lattice.width(),
            num_nodes: lattice.num_nodes(),
        })
    }

    /// Measurement node index.
    pub fn measurement(&self) -> usize {
        self.measurement
    }

    /// Ancilla node index.
    pub fn ancilla(&self) -> usize {
        self.ancilla
    }

    /// Cut type.
    pub fn cut(&self) -> CutType {
        self.cut
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LogicalState {
        self.state
    }

    /// Switch off both defect nodes and project the measurement plaquette.
    ///
    /// Allowed from `Uninitialized` or `Measured`; leaves the qubit `Live`.
    /// The outcome lands in the one-bit `logical` register. Apply
    /// [`LogicalQubit::correction`] afterwards to fix the outcome to 0.
    #[instrument(skip(self, lattice), fields(measurement = self.measurement, cut = %self.cut))]
    pub fn initialize(&mut self, lattice: &mut Lattice) -> QecResult<Circuit> {
        self.check_lattice(lattice)?;
        if self.state == LogicalState::Live {
            return Err(self.state_error("initialize"));
        }

        lattice.switch_node(self.measurement, false)?;
        lattice.switch_node(self.ancilla, false)?;
        let circuit = self.stabilizer_circuit(lattice, "initialize")?;
        self.state = LogicalState::Live;

        debug!(active = lattice.active_count(), "logical qubit live");
        Ok(circuit)
    }

    /// Read out the logical qubit and switch its nodes back on.
    #[instrument(skip(self, lattice), fields(measurement = self.measurement, cut = %self.cut))]
    pub fn measure(&mut self, lattice: &mut Lattice) -> QecResult<Circuit> {
        self.check_lattice(lattice)?;
        self.require_live("measure")?;

        let circuit = self.stabilizer_circuit(lattice, "measure")?;
        lattice.switch_node(self.measurement, true)?;
        lattice.switch_node(self.ancilla, true)?;
        self.state = LogicalState::Measured;

        debug!(active = lattice.active_count(), "logical qubit measured");
        Ok(circuit)
    }

    /// Classically controlled fix-up after [`LogicalQubit::initialize`].
    ///
    /// If `register` reads 1, applies X (Z-cut) or Z (X-cut) to every data
    /// qubit on the route from the measurement to the ancilla node.
    /// `register` names the one-bit register that received the initialize
    /// outcome in the circuit this fix-up is appended to; the returned
    /// circuit declares no classical bits of its own.
    pub fn correction(&self, lattice: &Lattice, register: &str) -> QecResult<Circuit> {
        self.check_lattice(lattice)?;
        let pauli = match self.cut {
            CutType::Z => StandardGate::X,
            CutType::X => StandardGate::Z,
        };

        let mut circuit = self.empty_circuit("correction");
        for q in self.route_data(lattice)? {
            circuit.apply(Instruction::conditional_gate(
                pauli,
                q,
                ClassicalCondition::new(register, 1),
            ))?;
        }
        circuit.barrier_all()?;
        Ok(circuit)
    }

    /// Logical X: a line for Z-cut qubits, a circle for X-cut qubits.
    pub fn x(&self, lattice: &Lattice) -> QecResult<Circuit> {
        match self.cut {
            CutType::Z => self.line_gate(lattice),
            CutType::X => self.circle_gate(lattice),
        }
    }

    /// Logical Z: a circle for Z-cut qubits, a line for X-cut qubits.
    pub fn z(&self, lattice: &Lattice) -> QecResult<Circuit> {
        match self.cut {
            CutType::Z => self.circle_gate(lattice),
            CutType::X => self.line_gate(lattice),
        }
    }

    /// Pauli string on the data qubits between the two defects.
    ///
    /// X for Z-cut qubits, Z for X-cut qubits.
    pub fn line_gate(&self, lattice: &Lattice) -> QecResult<Circuit> {
        self.check_lattice(lattice)?;
        let mut circuit = self.empty_circuit("line_gate");
        for q in self.route_data(lattice)? {
            match self.cut {
                CutType::Z => circuit.x(q)?,
                CutType::X => circuit.z(q)?,
            };
        }
        circuit.barrier_all()?;
        Ok(circuit)
    }

    /// Pauli loop on the four data qubits around the measurement node.
    ///
    /// Z for Z-cut qubits, X for X-cut qubits.
    pub fn circle_gate(&self, lattice: &Lattice) -> QecResult<Circuit> {
        self.check_lattice(lattice)?;
        let mut circuit = self.empty_circuit("circle_gate");
        for &n in lattice.neighbors(self.measurement)? {
            let q = QubitId::from(n);
            match self.cut {
                CutType::Z => circuit.z(q)?,
                CutType::X => circuit.x(q)?,
            };
        }
        circuit.barrier_all()?;
        Ok(circuit)
    }

    /// Route between two nodes on this qubit's lattice.
    pub fn route(&self, lattice: &Lattice, start: usize, end: usize) -> QecResult<Vec<usize>> {
        self.check_lattice(lattice)?;
        lattice.route(start, end)
    }

    /// Drag a defect from `start` to `end` over two syndrome rounds.
    ///
    /// Every node on the route is switched off for the first round. For the
    /// second, `start` and the nodes this move switched off are switched back
    /// on, except `end`; nodes that were already off (another defect) stay
    /// off. Each round gets a fresh classical register.
    #[instrument(skip(self, lattice, cycle))]
    pub fn move_cell(
        &self,
        lattice: &mut Lattice,
        cycle: &dyn SyndromeCycle,
        start: usize,
        end: usize,
    ) -> QecResult<Circuit> {
        self.check_lattice(lattice)?;
        self.require_live("move")?;
        let route = lattice.route(start, end)?;
        let reopen = route
            .iter()
            .map(|&i| -> QecResult<(usize, bool)> { Ok((i, i == start || lattice.is_active(i)?)) })
            .collect::<QecResult<Vec<_>>>()?;

        let mut circuit = self.empty_circuit("move_cell");
        for &i in &route {
            lattice.switch_node(i, false)?;
        }
        circuit.concat(&cycle.circuit(lattice, 1)?)?;

        for &(i, was_open) in &reopen {
            if was_open && i != end {
                lattice.switch_node(i, true)?;
            }
        }
        circuit.concat(&cycle.circuit(lattice, 1)?)?;

        debug!(hops = route.len(), "moved defect");
        Ok(circuit)
    }

    /// Move the ancilla defect to `to` and track its new position.
    pub fn move_ancilla(
        &mut self,
        lattice: &mut Lattice,
        cycle: &dyn SyndromeCycle,
        to: usize,
    ) -> QecResult<Circuit> {
        self.check_lattice(lattice)?;
        let expected = self.cut.syndrome_role();
        let found = lattice.role(to)?;
        if found != expected {
            return Err(QecError::WrongRole {
                gadget: "move_ancilla",
                index: to,
                expected,
                found,
            });
        }
        self.ensure_clear(lattice, self.ancilla, to)?;

        let circuit = self.move_cell(lattice, cycle, self.ancilla, to)?;
        self.ancilla = to;
        Ok(circuit)
    }

    /// Braid this qubit's ancilla defect around `other`'s measurement defect.
    ///
    /// The defect travels in two-node hops to the top-left corner of the box
    /// around `other`'s measurement node, loops through the four corners,
    /// and returns home along the same path. `self` and `other` must have
    /// opposite cut types and both be live. Every hop is checked before the
    /// lattice is touched.
    #[instrument(skip(self, other, lattice, cycle), fields(moving = self.measurement, around = other.measurement))]
    pub fn braid_zx(
        &mut self,
        other: &LogicalQubit,
        lattice: &mut Lattice,
        cycle: &dyn SyndromeCycle,
    ) -> QecResult<Circuit> {
        self.check_lattice(lattice)?;
        other.check_lattice(lattice)?;
        if self.cut == other.cut {
            return Err(QecError::SameCutType(self.cut.to_string()));
        }
        self.require_live("braid")?;
        other.require_live("braid")?;

        let (mx, my) = lattice.coords(other.measurement)?;
        let corner = |x: usize, y: usize| {
            lattice.index_of(x, y).ok_or(QecError::NodeOutOfRange {
                index: x + lattice.width() * y,
                num_nodes: lattice.num_nodes(),
            })
        };
        let loop_corners = [
            corner(mx - 1, my - 1)?,
            corner(mx + 1, my - 1)?,
            corner(mx + 1, my + 1)?,
            corner(mx - 1, my + 1)?,
        ];

        let home = self.ancilla;
        let outbound = self.hop_path(lattice, home, loop_corners[0])?;
        let mut waypoints = outbound.clone();
        waypoints.extend(loop_corners.iter().skip(1));
        waypoints.push(loop_corners[0]);
        waypoints.extend(outbound.iter().rev().skip(1));

        let hops: Vec<_> = waypoints.windows(2).map(|w| (w[0], w[1])).collect();
        for &(from, to) in &hops {
            for blocked in [self.measurement, other.measurement, other.ancilla] {
                if lattice.route(from, to)?.contains(&blocked) {
                    return Err(QecError::RouteBlocked { from, to, blocked });
                }
            }
        }

        let mut circuit = self.empty_circuit("braid_zx");
        for &(from, to) in &hops {
            circuit.concat(&self.move_cell(lattice, cycle, from, to)?)?;
        }
        self.ancilla = home;

        info!(hops = hops.len(), ops = circuit.num_ops(), "braided defect");
        Ok(circuit)
    }

    /// Stride-2 waypoints from `start` to `end`, horizontal first.
    fn hop_path(&self, lattice: &Lattice, start: usize, end: usize) -> QecResult<Vec<usize>> {
        let (mut x, mut y) = lattice.coords(start)?;
        let (ex, ey) = lattice.coords(end)?;
        let mut path = vec![start];
        while x != ex {
            x = if x > ex { x.saturating_sub(2).max(ex) } else { (x + 2).min(ex) };
            path.push(x + lattice.width() * y);
        }
        while y != ey {
            y = if y > ey { y.saturating_sub(2).max(ey) } else { (y + 2).min(ey) };
            path.push(x + lattice.width() * y);
        }
        Ok(path)
    }

    fn ensure_clear(&self, lattice: &Lattice, from: usize, to: usize) -> QecResult<()> {
        if lattice.route(from, to)?.contains(&self.measurement) {
            return Err(QecError::RouteBlocked {
                from,
                to,
                blocked: self.measurement,
            });
        }
        Ok(())
    }

    /// Data qubits on the route from the measurement node to the ancilla.
    fn route_data(&self, lattice: &Lattice) -> QecResult<Vec<QubitId>> {
        Ok(lattice
            .route(self.measurement, self.ancilla)?
            .into_iter()
            .skip(1)
            .step_by(2)
            .map(QubitId::from)
            .collect())
    }

    /// Parity projection of the measurement plaquette into `logical[0]`.
    fn stabilizer_circuit(&self, lattice: &Lattice, name: &str) -> QecResult<Circuit> {
        let mut circuit = self.empty_circuit(name);
        let bits = circuit.add_creg(LOGICAL_REGISTER, 1);
        let m = QubitId::from(self.measurement);
        let neighbours: Vec<_> = lattice
            .neighbors(self.measurement)?
            .iter()
            .map(|&n| QubitId::from(n))
            .collect();

        match self.cut {
            CutType::Z => {
                for &n in &neighbours {
                    circuit.cx(n, m)?;
                }
            }
            CutType::X => {
                circuit.h(m)?;
                for &n in &neighbours {
                    circuit.cx(m, n)?;
                }
                circuit.h(m)?;
            }
        }
        circuit.measure(m, bits[0])?;
        circuit.barrier_all()?;
        Ok(circuit)
    }

    fn empty_circuit(&self, name: &str) -> Circuit {
        let mut circuit = Circuit::new(name);
        circuit.add_qreg("q", QubitId::from(self.num_nodes).0);
        circuit
    }

    fn check_lattice(&self, lattice: &Lattice) -> QecResult<()> {
        if lattice.num_nodes() != self.num_nodes || lattice.width() != self.width {
            return Err(QecError::LatticeMismatch {
                expected: self.num_nodes,
                found: lattice.num_nodes(),
            });
        }
        Ok(())
    }

    fn require_live(&self, operation: &'static str) -> QecResult<()> {
        if self.state != LogicalState::Live {
            return Err(self.state_error(operation));
        }
        Ok(())
    }

    fn state_error(&self, operation: &'static str) -> QecError {
        QecError::InvalidState {
            measurement: self.measurement,
            operation,
            state: self.state.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates_roles() {
        let lattice = Lattice::square(5, 5).unwrap();
        assert!(LogicalQubit::new(&lattice, 7, 17, CutType::Z).is_ok());
        assert!(matches!(
            LogicalQubit::new(&lattice, 7, 17, CutType::X),
            Err(QecError::WrongRole { index: 7, .. })
        ));
        assert!(matches!(
            LogicalQubit::new(&lattice, 5, 17, CutType::Z),
            Err(QecError::BoundaryMeasurementNode { index: 5, found: 3 })
        ));
    }

    #[test]
    fn test_route_data_alternates() {
        let lattice = Lattice::square(5, 5).unwrap();
        let qubit = LogicalQubit::new(&lattice, 11, 13, CutType::X).unwrap();
        assert_eq!(qubit.route(&lattice, 11, 13).unwrap(), vec![11, 12, 13]);
        assert_eq!(qubit.route_data(&lattice).unwrap(), vec![QubitId(12)]);
    }

    #[test]
    fn test_initialize_twice_rejected() {
        let mut lattice = Lattice::square(5, 5).unwrap();
        let mut qubit = LogicalQubit::new(&lattice, 7, 17, CutType::Z).unwrap();
        qubit.initialize(&mut lattice).unwrap();
        assert!(matches!(
            qubit.initialize(&mut lattice),
            Err(QecError::InvalidState { operation: "initialize", .. })
        ));
    }

    #[test]
    fn test_hop_path_stride_two() {
        let lattice = Lattice::square(7, 7).unwrap();
        let qubit = LogicalQubit::new(&lattice, 9, 37, CutType::Z).unwrap();
        // (2, 5) -> (6, 1)
        assert_eq!(qubit.hop_path(&lattice, 37, 13).unwrap(), vec![37, 39, 41, 27, 13]);
    }
}
