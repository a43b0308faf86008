use endogen_kernel::exploration::Exploration;
use endogen_kernel::{
    AdjacentPossible, InsertionTemplate, NodeId, SeedTopology, TemplateError, TemplateKind,
};
use endogen_test_utils::ids;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::collections::HashSet;

fn choose(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    (0..k).fold(1, |acc, i| acc * (n - i) / (i + 1))
}

fn expected_local(kind: TemplateKind, k: usize) -> usize {
    match kind {
        TemplateKind::OneInOneOut => 2 * k,
        TemplateKind::OneInTwoOut | TemplateKind::TwoInOneOut => 2 * choose(k, 2),
        TemplateKind::InOutThree => 4 * choose(k, 2),
        TemplateKind::TwoInTwoOut => 6 * choose(k, 3),
    }
}

fn expected_global(kind: TemplateKind, m: usize) -> usize {
    match kind {
        TemplateKind::OneInOneOut => m * m.saturating_sub(1),
        TemplateKind::OneInTwoOut | TemplateKind::TwoInOneOut => m * choose(m.saturating_sub(1), 2),
        TemplateKind::InOutThree => 2 * m * choose(m.saturating_sub(1), 2),
        TemplateKind::TwoInTwoOut => choose(m, 2) * choose(m.saturating_sub(2), 2),
    }
}

#[test]
fn test_counts_match_table() {
    for kind in TemplateKind::ALL {
        let template = kind.build();
        for m in 1..8 {
            let real = ids(m);
            assert_eq!(
                template.enumerate_global(&real).len(),
                expected_global(kind, m),
                "{kind} global, m = {m}"
            );
            if m > 1 {
                let (pivot, alters) = (real[m - 1], &real[..m - 1]);
                assert_eq!(
                    template.enumerate_local(pivot, alters).len(),
                    expected_local(kind, m - 1),
                    "{kind} local, k = {}",
                    m - 1
                );
            }
        }
    }
}

#[test]
fn test_one_in_one_out_local_candidates_have_one_edge_each_way() {
    let real = SeedTopology::Cycle.build(5).unwrap();
    let template = TemplateKind::OneInOneOut.build();
    let positions = template.enumerate(&real, 0, Some(NodeId(4))).unwrap();
    assert_eq!(positions.len(), 8);

    let exploration = Exploration::materialize(&real, &positions).unwrap();
    let overlay = exploration.graph();
    for candidate in exploration.candidates() {
        assert_eq!(overlay.in_degree(candidate), 1);
        assert_eq!(overlay.out_degree(candidate), 1);
    }
    assert_eq!(overlay.edge_count(), real.edge_count() + 2 * 8);
}

#[test]
fn test_two_in_two_out_triple_has_six_distinct_wirings() {
    let template = TemplateKind::TwoInTwoOut.build();
    let positions = template.enumerate_local(NodeId(0), &[NodeId(1), NodeId(2), NodeId(3)]);
    let distinct: HashSet<_> = positions.iter().map(|p| p.canonical()).collect();
    assert_eq!(distinct.len(), 6);
    assert!(positions.iter().all(|p| p.involves(NodeId(0))));
}

#[test]
fn test_global_update_requires_empty_ledger() {
    let real = SeedTopology::Cycle.build(3).unwrap();
    let template = TemplateKind::OneInOneOut.build();
    let mut ledger = AdjacentPossible::new();

    assert_eq!(template.update(&real, &mut ledger, None).unwrap(), 6);
    assert_eq!(
        template.update(&real, &mut ledger, None),
        Err(TemplateError::CandidatesPresent { count: 6 })
    );
    assert_eq!(template.update(&real, &mut ledger, Some(NodeId(1))).unwrap(), 4);
    assert_eq!(ledger.len(), 10);
}

#[test]
fn test_local_update_rejects_placeholder_pivot() {
    let real = SeedTopology::Cycle.build(3).unwrap();
    let template = TemplateKind::TwoInOneOut.build();
    let mut ledger = AdjacentPossible::new();
    assert_eq!(
        template.update(&real, &mut ledger, Some(NodeId(3))),
        Err(TemplateError::PivotNotReal(NodeId(3)))
    );
    assert!(ledger.is_empty());
}

#[test]
fn test_min_seed_size_yields_positions() {
    for kind in TemplateKind::ALL {
        let m = kind.min_seed_size();
        assert!(!kind.build().enumerate_global(&ids(m)).is_empty(), "{kind}");
        assert!(kind.build().enumerate_global(&ids(m - 1)).is_empty(), "{kind}");
    }
}

proptest! {
    #[test]
    fn prop_positions_are_wired_to_distinct_real_nodes(
        kind in prop_oneof![
            Just(TemplateKind::OneInOneOut),
            Just(TemplateKind::OneInTwoOut),
            Just(TemplateKind::TwoInOneOut),
            Just(TemplateKind::InOutThree),
            Just(TemplateKind::TwoInTwoOut),
        ],
        m in 2usize..8,
        pivot_index in 0usize..8,
    ) {
        let template = kind.build();
        let real = ids(m);
        let pivot = real[pivot_index % m];
        let alters: Vec<NodeId> = real.iter().copied().filter(|&n| n != pivot).collect();

        for position in template.enumerate_global(&real) {
            prop_assert!(position.endpoints_distinct());
            prop_assert!(position.sources().iter().chain(position.targets()).all(|n| n.index() < m));
        }
        for position in template.enumerate_local(pivot, &alters) {
            prop_assert!(position.endpoints_distinct());
            prop_assert!(position.involves(pivot));
        }
    }
}
