//! Tests for square-lattice syndrome rounds.

use qec_ir::{ClbitId, QubitId};
use qec_surface::{Lattice, NodeRole, QecError, SurfaceCodeCycle, SyndromeCycle};

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[test]
fn zero_cycles_returns_error() {
    let lattice = Lattice::square(3, 3).unwrap();
    let cycle = SurfaceCodeCycle::new(&lattice).unwrap();
    assert!(matches!(
        cycle.circuit(&lattice, 0),
        Err(QecError::InvalidCycleCount(0))
    ));
}

#[test]
fn foreign_lattice_returns_error() {
    let lattice = Lattice::square(3, 3).unwrap();
    let cycle = SurfaceCodeCycle::new(&lattice).unwrap();
    let bigger = Lattice::square(4, 3).unwrap();
    assert!(matches!(
        cycle.circuit(&bigger, 1),
        Err(QecError::LatticeMismatch {
            expected: 9,
            found: 12
        })
    ));
}

// ---------------------------------------------------------------------------
// Circuit structure
// ---------------------------------------------------------------------------

#[test]
fn three_rounds_on_3x3() {
    let lattice = Lattice::square(3, 3).unwrap();
    let cycle = SurfaceCodeCycle::new(&lattice).unwrap();
    let circuit = cycle.circuit(&lattice, 3).unwrap();

    assert_eq!(circuit.num_qubits(), 9);
    assert_eq!(circuit.num_clbits(), 27);
    let regs: Vec<_> = circuit.cregs().iter().map(|r| (r.name.as_str(), r.start, r.size)).collect();
    assert_eq!(regs, vec![("round0", 0, 9), ("round1", 9, 9), ("round2", 18, 9)]);

    let counts = circuit.count_ops();
    assert_eq!(counts["barrier"], 3);
    assert_eq!(counts["measure_z"], 6);
    assert_eq!(counts["measure_x"], 6);

    let flat = circuit.decompose();
    assert!(
        flat.instructions()
            .iter()
            .flat_map(|inst| inst.qubits.iter())
            .all(|q| q.index() < 9)
    );
}

#[test]
fn outcome_lands_on_node_plus_round_offset() {
    let lattice = Lattice::square(3, 3).unwrap();
    let cycle = SurfaceCodeCycle::new(&lattice).unwrap();
    let circuit = cycle.circuit(&lattice, 2).unwrap();

    for inst in circuit.instructions().iter().filter(|i| i.is_composite()) {
        let syndrome = inst.qubits[0].index();
        let bit = inst.clbits[0].index();
        assert_eq!(bit % 9, syndrome, "{} on node {syndrome}", inst.name());
    }

    let first_round: Vec<_> = circuit
        .instructions()
        .iter()
        .take_while(|i| !i.is_barrier())
        .map(|i| (i.name().to_string(), i.qubits[0], i.clbits[0]))
        .collect();
    assert_eq!(
        first_round,
        vec![
            ("measure_x".to_string(), QubitId(1), ClbitId(1)),
            ("measure_z".to_string(), QubitId(3), ClbitId(3)),
            ("measure_z".to_string(), QubitId(5), ClbitId(5)),
            ("measure_x".to_string(), QubitId(7), ClbitId(7)),
        ]
    );
}

#[test]
fn barriers_span_every_qubit() {
    let lattice = Lattice::square(4, 4).unwrap();
    let cycle = SurfaceCodeCycle::new(&lattice).unwrap();
    let circuit = cycle.circuit(&lattice, 2).unwrap();

    for barrier in circuit.instructions().iter().filter(|i| i.is_barrier()) {
        assert_eq!(barrier.qubits.len(), 16);
    }
    // Gadgets inside one round may interleave, but never cross a barrier.
    let dag = circuit.dag();
    let fenced = dag
        .layers()
        .iter()
        .filter(|layer| layer.iter().any(|i| i.is_barrier()))
        .count();
    assert_eq!(fenced, 2);
}

#[test]
fn switched_off_nodes_drop_out_of_the_round() {
    let mut lattice = Lattice::square(5, 5).unwrap();
    let cycle = SurfaceCodeCycle::new(&lattice).unwrap();
    let syndromes = lattice.nodes().iter().filter(|n| n.role.is_syndrome()).count();

    lattice.switch_node(7, false).unwrap();
    lattice.switch_node(12, false).unwrap();
    let circuit = cycle.circuit(&lattice, 1).unwrap();

    let gadgets: Vec<_> = circuit.instructions().iter().filter(|i| i.is_composite()).collect();
    assert_eq!(gadgets.len(), syndromes - 1);
    assert!(gadgets.iter().all(|g| g.qubits[0] != QubitId(7)));
    // Node 12 is data: it stays out of every neighbouring plaquette.
    assert!(gadgets.iter().all(|g| !g.qubits.contains(&QubitId(12))));
    assert_eq!(lattice.role(12).unwrap(), NodeRole::Data);
}
