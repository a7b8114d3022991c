//! Emission of generated syndrome and logical-qubit circuits.

use qec_qasm3::emit;
use qec_surface::{CutType, ExperimentConfig, Lattice, LogicalQubit, SurfaceCodeCycle, SyndromeCycle};

#[test]
fn surface_rounds_declare_one_register_per_round() {
    let lattice = Lattice::square(3, 3).unwrap();
    let cycle = SurfaceCodeCycle::new(&lattice).unwrap();
    let qasm = emit(&cycle.circuit(&lattice, 3).unwrap()).unwrap();

    assert!(qasm.contains("qubit[9] q;"));
    for round in 0..3 {
        assert!(qasm.contains(&format!("bit[9] round{round};")));
    }
    assert_eq!(qasm.matches("barrier q;").count(), 3);
    // Z node 3 in the last round.
    assert!(qasm.contains("round2[3] = measure q[3];"));
    // Every Z check is fenced by identities.
    assert_eq!(qasm.matches("id q[3];").count(), 6);
}

#[test]
fn heavy_hex_rounds_emit() {
    let lattice = Lattice::heavy_hex(3).unwrap();
    let cycle = qec_surface::cycle_for(&lattice).unwrap();
    let qasm = emit(&cycle.circuit(&lattice, 1).unwrap()).unwrap();

    assert!(qasm.contains("qubit[25] q;"));
    assert!(qasm.contains("bit[25] round0;"));
    // Weight-4 check on ancilla 6 reads flags 5 and 7 into their own slots.
    assert!(qasm.contains("round0[5] = measure q[5];"));
    assert!(qasm.contains("round0[6] = measure q[6];"));
    assert!(!qasm.contains("measure_x"));
}

#[test]
fn correction_conditions_on_logical_register() {
    let mut lattice = Lattice::square(5, 5).unwrap();
    let mut qubit = LogicalQubit::new(&lattice, 7, 17, CutType::Z).unwrap();

    let mut circuit = qubit.initialize(&mut lattice).unwrap();
    circuit.concat(&qubit.correction(&lattice, "logical").unwrap()).unwrap();
    let qasm = emit(&circuit).unwrap();

    assert!(qasm.contains("bit[1] logical;"));
    assert!(qasm.contains("logical[0] = measure q[7];"));
    assert!(qasm.contains("if (logical == 1) x q[12];"));
}

#[test]
fn experiment_with_renamed_registers_emits() {
    let config = ExperimentConfig::from_yaml(
        r"
name: two_qubits
lattice: { kind: square, width: 9, height: 9 }
logical:
  - { measurement: 65, ancilla: 47, cut: z }
  - { measurement: 41, ancilla: 43, cut: x }
program:
  - initialize: 0
  - initialize: 1
  - correct: 1
  - rounds: 1
  - measure: 1
",
    )
    .unwrap();
    let qasm = emit(&config.build().unwrap()).unwrap();

    assert!(qasm.contains("bit[1] logical;"));
    assert!(qasm.contains("bit[1] logical_1;"));
    assert!(qasm.contains("bit[1] logical_2;"));
    assert!(qasm.contains("if (logical_1 == 1) z q[42];"));
}
