//! Property-based tests for QASM3 emission.

use proptest::prelude::*;
use qec_ir::{Circuit, CircuitOps, ClbitId, QubitId};
use qec_qasm3::emit;

/// Gate operations that can be applied to a circuit.
#[derive(Debug, Clone)]
enum GateOp {
    H(u32),
    X(u32),
    Z(u32),
    Reset(u32),
    CX(u32, u32),
    Measure(u32),
}

impl GateOp {
    fn apply(self, circuit: &mut Circuit) {
        let _ = match self {
            GateOp::H(q) => circuit.h(QubitId(q)),
            GateOp::X(q) => circuit.x(QubitId(q)),
            GateOp::Z(q) => circuit.z(QubitId(q)),
            GateOp::Reset(q) => circuit.reset(QubitId(q)),
            GateOp::CX(a, b) => circuit.cx(QubitId(a), QubitId(b)),
            GateOp::Measure(q) => circuit.measure(QubitId(q), ClbitId(q)),
        };
    }
}

fn arb_gate_op(num_qubits: u32) -> impl Strategy<Value = GateOp> {
    prop_oneof![
        (0..num_qubits).prop_map(GateOp::H),
        (0..num_qubits).prop_map(GateOp::X),
        (0..num_qubits).prop_map(GateOp::Z),
        (0..num_qubits).prop_map(GateOp::Reset),
        (0..num_qubits).prop_map(GateOp::Measure),
        (0..num_qubits, 0..num_qubits)
            .prop_filter("distinct operands", |(a, b)| a != b)
            .prop_map(|(a, b)| GateOp::CX(a, b)),
    ]
}

fn arb_circuit() -> impl Strategy<Value = Circuit> {
    (2_u32..=6).prop_flat_map(|n| {
        prop::collection::vec(arb_gate_op(n), 1..=20).prop_map(move |ops| {
            let mut circuit = Circuit::with_size("random", n, n);
            for op in ops {
                op.apply(&mut circuit);
            }
            circuit
        })
    })
}

proptest! {
    #[test]
    fn one_statement_per_operation(circuit in arb_circuit()) {
        let qasm = emit(&circuit).unwrap();
        let statements = qasm
            .lines()
            .skip_while(|l| !l.starts_with("bit["))
            .skip(2)
            .count();
        prop_assert_eq!(statements, circuit.num_ops());
    }

    #[test]
    fn every_statement_is_terminated(circuit in arb_circuit()) {
        let qasm = emit(&circuit).unwrap();
        for line in qasm.lines().filter(|l| !l.is_empty()) {
            prop_assert!(line.ends_with(';'), "unterminated: {line}");
        }
    }

    #[test]
    fn operands_stay_in_declared_range(circuit in arb_circuit()) {
        let n = circuit.num_qubits();
        let qasm = emit(&circuit).unwrap();
        for i in n..n + 4 {
            let needle = format!("q[{i}]");
            prop_assert!(!qasm.contains(&needle));
        }
    }
}
