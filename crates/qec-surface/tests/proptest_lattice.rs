//! Property-based tests for lattice geometry and routing.

use proptest::prelude::*;
use qec_surface::{Lattice, NodeRole, SurfaceCodeCycle, SyndromeCycle};

/// A square lattice plus two node indices inside it.
fn lattice_and_pair() -> impl Strategy<Value = (usize, usize, usize, usize)> {
    (1usize..12, 1usize..12).prop_flat_map(|(w, h)| (Just(w), Just(h), 0..w * h, 0..w * h))
}

proptest! {
    #[test]
    fn node_offsets_follow_row_major_order(w in 1usize..16, h in 1usize..16) {
        let lattice = Lattice::square(w, h).unwrap();
        prop_assert_eq!(lattice.num_nodes(), w * h);
        for j in 0..h {
            for i in 0..w {
                let index = i + j * w;
                prop_assert_eq!(lattice.index_of(i, j), Some(index));
                prop_assert_eq!(lattice.coords(index).unwrap(), (i, j));
                prop_assert_eq!(lattice.nodes()[index].index, index);
            }
        }
    }

    #[test]
    fn adjacency_is_symmetric_and_local(w in 1usize..10, h in 1usize..10) {
        let lattice = Lattice::square(w, h).unwrap();
        for a in 0..lattice.num_nodes() {
            let (ax, ay) = lattice.coords(a).unwrap();
            for &b in lattice.neighbors(a).unwrap() {
                prop_assert!(lattice.neighbors(b).unwrap().contains(&a));
                let (bx, by) = lattice.coords(b).unwrap();
                prop_assert_eq!(ax.abs_diff(bx) + ay.abs_diff(by), 1);
            }
        }
    }

    #[test]
    fn switch_node_is_idempotent((w, h, a, _) in lattice_and_pair(), active in any::<bool>()) {
        let mut once = Lattice::square(w, h).unwrap();
        once.switch_node(a, active).unwrap();
        let mut twice = once.clone();
        twice.switch_node(a, active).unwrap();

        prop_assert_eq!(once.is_active(a).unwrap(), active);
        prop_assert_eq!(once.active_count(), twice.active_count());
        for &n in once.neighbors(a).unwrap() {
            prop_assert_eq!(
                once.active_neighbors(n).unwrap(),
                twice.active_neighbors(n).unwrap()
            );
        }
    }

    #[test]
    fn route_is_symmetric((w, h, a, b) in lattice_and_pair()) {
        let lattice = Lattice::square(w, h).unwrap();
        let forward = lattice.route(a, b).unwrap();
        let mut backward = lattice.route(b, a).unwrap();
        backward.reverse();
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn route_steps_between_grid_neighbours((w, h, a, b) in lattice_and_pair()) {
        let lattice = Lattice::square(w, h).unwrap();
        let path = lattice.route(a, b).unwrap();
        prop_assert_eq!(path.first().copied(), Some(a));
        prop_assert_eq!(path.last().copied(), Some(b));

        let (ax, ay) = lattice.coords(a).unwrap();
        let (bx, by) = lattice.coords(b).unwrap();
        prop_assert_eq!(path.len(), ax.abs_diff(bx) + ay.abs_diff(by) + 1);
        for step in path.windows(2) {
            prop_assert!(lattice.neighbors(step[0]).unwrap().contains(&step[1]));
        }
    }

    #[test]
    fn route_to_self_is_single_node((w, h, a, _) in lattice_and_pair()) {
        let lattice = Lattice::square(w, h).unwrap();
        prop_assert_eq!(lattice.route(a, a).unwrap(), vec![a]);
    }

    #[test]
    fn one_gadget_per_active_syndrome_node(
        (w, h, a, b) in lattice_and_pair(),
        rounds in 1usize..4,
    ) {
        let mut lattice = Lattice::square(w, h).unwrap();
        let cycle = SurfaceCodeCycle::new(&lattice).unwrap();
        lattice.switch_node(a, false).unwrap();
        lattice.switch_node(b, false).unwrap();

        let live_syndromes = lattice
            .nodes()
            .iter()
            .filter(|n| n.active && matches!(n.role, NodeRole::Z | NodeRole::X))
            .count();
        let circuit = cycle.circuit(&lattice, rounds).unwrap();
        let gadgets = circuit.instructions().iter().filter(|i| i.is_composite()).count();
        prop_assert_eq!(gadgets, live_syndromes * rounds);
        prop_assert_eq!(circuit.num_clbits(), w * h * rounds);
    }
}
