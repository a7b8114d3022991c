//! Property-based tests for circuit composition.
//!
//! Appending a composite and decomposing it must be equivalent to writing
//! the relabelled body inline, and `concat` must never reuse classical bits.

use qec_ir::{Circuit, CircuitOps, ClbitId, ConstrainedCircuit, QubitId};
use proptest::prelude::*;

/// Gate operations applied through [`CircuitOps`].
#[derive(Debug, Clone)]
enum GateOp {
    H(u32),
    X(u32),
    Z(u32),
    Reset(u32),
    CX(u32, u32),
}

impl GateOp {
    fn apply<C: CircuitOps>(&self, circuit: &mut C, map: impl Fn(u32) -> QubitId) {
        let _ = match *self {
            GateOp::H(q) => circuit.h(map(q)).map(|_| ()),
            GateOp::X(q) => circuit.x(map(q)).map(|_| ()),
            GateOp::Z(q) => circuit.z(map(q)).map(|_| ()),
            GateOp::Reset(q) => circuit.reset(map(q)).map(|_| ()),
            GateOp::CX(a, b) => circuit.cx(map(a), map(b)).map(|_| ()),
        };
    }
}

fn arb_gate_op(width: u32) -> impl Strategy<Value = GateOp> {
    prop_oneof![
        (0..width).prop_map(GateOp::H),
        (0..width).prop_map(GateOp::X),
        (0..width).prop_map(GateOp::Z),
        (0..width).prop_map(GateOp::Reset),
        (0..width, 0..width)
            .prop_filter("distinct operands", |(a, b)| a != b)
            .prop_map(|(a, b)| GateOp::CX(a, b)),
    ]
}

/// A gadget width, a circuit width at least as large, and a distinct
/// placement of the gadget's qubits inside the circuit.
fn arb_placement() -> impl Strategy<Value = (u32, Vec<u32>, Vec<GateOp>)> {
    (2_u32..=4, 0_u32..=6).prop_flat_map(|(k, extra)| {
        let n = k + extra;
        (
            Just(n),
            Just((0..n).collect::<Vec<_>>()).prop_shuffle(),
            prop::collection::vec(arb_gate_op(k), 1..=12),
        )
            .prop_map(move |(n, perm, ops)| (n, perm[..k as usize].to_vec(), ops))
    })
}

proptest! {
    #[test]
    fn decomposed_composite_matches_inline((n, placement, ops) in arb_placement()) {
        let declared: Vec<_> = placement.iter().map(|&q| QubitId(q)).collect();

        let mut gadget = ConstrainedCircuit::new("gadget", declared.clone(), 0).unwrap();
        for op in &ops {
            op.apply(&mut gadget, |q| declared[q as usize]);
        }

        let mut via_composite = Circuit::with_size("composite", n, 0);
        via_composite.append(gadget.to_instruction(), declared.clone(), []).unwrap();

        let mut inline = Circuit::with_size("composite", n, 0);
        for op in &ops {
            op.apply(&mut inline, |q| declared[q as usize]);
        }

        let decomposed = via_composite.decompose();
        prop_assert_eq!(decomposed.instructions(), inline.instructions());
    }

    #[test]
    fn concat_allocates_disjoint_bits(n in 1_u32..=6, rounds in 1_usize..=4) {
        let mut round = Circuit::new("round");
        round.add_qreg("q", n);
        round.add_creg("round0", n);
        for q in 0..n {
            round.measure(QubitId(q), ClbitId(q)).unwrap();
        }

        let mut total = Circuit::new("total");
        total.add_qreg("q", n);
        for _ in 0..rounds {
            total.concat(&round).unwrap();
        }

        prop_assert_eq!(total.num_clbits(), rounds * n as usize);
        prop_assert_eq!(total.cregs().len(), rounds);
        let mut written: Vec<_> = total
            .instructions()
            .iter()
            .flat_map(|inst| inst.clbits.iter().copied())
            .collect();
        written.sort();
        written.dedup();
        prop_assert_eq!(written.len(), rounds * n as usize);
    }

    #[test]
    fn depth_bounded_by_op_count((n, _placement, ops) in arb_placement()) {
        let mut circuit = Circuit::with_size("depth", n, 0);
        for op in &ops {
            op.apply(&mut circuit, QubitId);
        }
        let depth = circuit.depth();
        prop_assert!(depth <= circuit.num_ops());
        prop_assert_eq!(circuit.dag().layers().iter().map(Vec::len).sum::<usize>(), circuit.num_ops());
    }
}

#[test]
fn circuit_serializes_with_registers() {
    let mut circuit = Circuit::new("json");
    circuit.add_qreg("q", 2);
    circuit.add_creg("round0", 2);
    circuit.cx(QubitId(0), QubitId(1)).unwrap();

    let json = serde_json::to_string(&circuit).unwrap();
    assert!(json.contains("\"round0\""));
    let back: Circuit = serde_json::from_str(&json).unwrap();
    assert_eq!(back, circuit);
}
