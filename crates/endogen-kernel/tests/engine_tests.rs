use endogen_kernel::{
    EngineState, Evaluation, GrowthEngine, GrowthError, ModelConfig, NodeId, ScoreKind,
    SeedTopology, SelectKind, TemplateKind, SCORE_ATTRIBUTE,
};
use endogen_test_utils::{
    assert_no_placeholders, assert_simple_graph, assert_wired_like, engine_with, fingerprints,
    grown, seeded_rng, uniform_random_config,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;

#[test]
fn test_scenario_cycle_one_step() {
    let config = uniform_random_config(TemplateKind::OneInOneOut);
    let engine = grown(config, 4, 7);

    let network = engine.network();
    assert_eq!(network.node_count(), 4);
    assert_eq!(network.in_degree(NodeId(3)), 1);
    assert_eq!(network.out_degree(NodeId(3)), 1);

    let (source, _) = network.in_edges(NodeId(3))[0];
    let (_, target) = network.out_edges(NodeId(3))[0];
    assert_ne!(source, target);
    assert!(source.index() < 3 && target.index() < 3);

    let record = &engine.log().records()[0];
    assert_eq!(record.candidates, 6);
    assert_wired_like(network, NodeId(3), &record.position);
    assert_eq!(engine.state(), EngineState::Done);
}

#[test]
fn test_scenario_greedy_uniform_adds_one_node_per_step() {
    let config = ModelConfig::new()
        .with_score(ScoreKind::Uniform)
        .with_select(SelectKind::Greedy);
    let mut engine = engine_with(config);
    let mut rng = seeded_rng(1);

    for expected in 4..=10 {
        let outcome = engine.step(&mut rng).unwrap();
        assert_eq!(outcome.node, NodeId(expected - 1));
        assert_eq!(engine.network().node_count(), expected);
        assert_simple_graph(engine.network());
    }
}

#[test]
fn test_node_count_invariant_for_every_template() {
    for template in TemplateKind::ALL {
        let config = ModelConfig::new()
            .with_initial_size(template.min_seed_size().max(3))
            .with_template(template);
        let m = config.initial_size;
        let mut engine = engine_with(config);
        let steps = engine.grow(m + 6, &mut seeded_rng(11)).unwrap();

        assert_eq!(steps, 6, "{template}");
        assert_eq!(engine.network().node_count(), m + 6);
        assert_eq!(engine.snapshots().len(), m + 6);
        assert_eq!(engine.log().len(), 6);
        assert_no_placeholders(engine.network());
        assert_simple_graph(engine.network());
    }
}

#[test]
fn test_joined_nodes_mirror_their_position() {
    for template in TemplateKind::ALL {
        let engine = grown(uniform_random_config(template), 12, 5);
        for record in engine.log().records() {
            let snapshot = &engine.snapshots()[record.step];
            assert_eq!(record.node, NodeId(record.step));
            assert_eq!(record.fingerprint, snapshot.fingerprint());
            assert_wired_like(snapshot.network(), record.node, &record.position);
        }
    }
}

#[test]
fn test_candidates_never_leak_into_network() {
    let mut engine = engine_with(uniform_random_config(TemplateKind::InOutThree));
    let mut rng = seeded_rng(3);
    for _ in 0..8 {
        let before = engine.network().node_count();
        let outcome = engine.step(&mut rng).unwrap();
        assert!(outcome.candidates > 0);
        assert_eq!(engine.network().node_count(), before + 1);
        assert_no_placeholders(engine.network());
    }
    assert!(!engine.adjacent_possible().is_empty());
}

#[test]
fn test_chosen_position_leaves_the_ledger() {
    let mut engine = engine_with(uniform_random_config(TemplateKind::OneInOneOut));
    let mut rng = seeded_rng(8);
    engine.step(&mut rng).unwrap();
    // 6 global positions, one consumed
    assert_eq!(engine.adjacent_possible().len(), 5);
    let outcome = engine.step(&mut rng).unwrap();
    // 5 pending + 2 * 3 local positions for the new pivot, one consumed
    assert_eq!(outcome.candidates, 11);
    assert_eq!(engine.adjacent_possible().len(), 10);
    assert!(!engine.adjacent_possible().positions().contains(&outcome.position));
}

#[test]
fn test_seed_snapshot_is_shared_per_seed_node() {
    let engine = engine_with(ModelConfig::new().with_initial_size(5));
    let snapshots = engine.snapshots();
    assert_eq!(snapshots.len(), 5);
    assert!(snapshots.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    assert!(snapshots[0].score(NodeId(4)).is_some());
}

#[test]
fn test_snapshots_are_idempotent() {
    let mut engine = engine_with(ModelConfig::new());
    let mut rng = seeded_rng(21);
    engine.grow(8, &mut rng).unwrap();
    let early = fingerprints(&engine);
    let first = Arc::clone(&engine.snapshots()[5]);

    engine.grow(14, &mut rng).unwrap();
    assert_eq!(fingerprints(&engine)[..early.len()], early[..]);
    assert!(Arc::ptr_eq(&first, &engine.snapshots()[5]));
    assert_eq!(first.fingerprint(), engine.snapshots()[5].fingerprint());
}

#[test]
fn test_same_seed_same_snapshots() {
    let config = ModelConfig::new()
        .with_template(TemplateKind::TwoInOneOut)
        .with_select(SelectKind::Softmax { gamma: 8.0 });
    let a = grown(config.clone(), 15, 99);
    let b = grown(config, 15, 99);
    assert_eq!(fingerprints(&a), fingerprints(&b));
    assert_ne!(a.run_id(), b.run_id());
}

#[test]
fn test_influence_scores_sum_to_one() {
    let engine = grown(ModelConfig::new(), 10, 4);
    for snapshot in engine.snapshots() {
        let total: f64 = snapshot
            .network()
            .node_attributes(SCORE_ATTRIBUTE)
            .unwrap()
            .values()
            .sum();
        assert!((total - 1.0).abs() < 1e-9, "total = {total}");
    }
}

#[test]
fn test_global_evaluation_and_other_scores() {
    for score in [ScoreKind::Uniform, ScoreKind::Degree, ScoreKind::Influence { damping: 0.85 }] {
        let config = ModelConfig::new()
            .with_initial_size(4)
            .with_seed(SeedTopology::OutStar)
            .with_template(TemplateKind::OneInTwoOut)
            .with_score(score)
            .with_select(SelectKind::Weighted { gamma: 2.0 })
            .with_evaluation(Evaluation::Global);
        let engine = grown(config, 10, 13);
        assert_eq!(engine.network().node_count(), 10);
        assert_no_placeholders(engine.network());
    }
}

#[test]
fn test_sticks_seed_grows() {
    let config = ModelConfig::new()
        .with_initial_size(5)
        .with_seed(SeedTopology::Sticks)
        .with_select(SelectKind::Greedy);
    let engine = grown(config, 9, 2);
    assert_eq!(engine.network().node_count(), 9);
}

#[test]
fn test_grow_targets() {
    let mut engine = engine_with(ModelConfig::new());
    let mut rng = seeded_rng(6);

    assert!(matches!(
        engine.grow(2, &mut rng),
        Err(GrowthError::InvalidTarget { target: 2, current: 3 })
    ));
    assert_eq!(engine.state(), EngineState::Ready);

    assert_eq!(engine.grow(3, &mut rng).unwrap(), 0);
    assert_eq!(engine.state(), EngineState::Done);

    assert_eq!(engine.grow(7, &mut rng).unwrap(), 4);
    assert_eq!(engine.grow(9, &mut rng).unwrap(), 2);
    assert_eq!(engine.network().node_count(), 9);
    assert_eq!(engine.state(), EngineState::Done);
}

#[test]
fn test_invalid_config_is_rejected() {
    let err = GrowthEngine::new(
        ModelConfig::new()
            .with_template(TemplateKind::TwoInTwoOut)
            .with_initial_size(3),
    )
    .unwrap_err();
    assert!(matches!(err, GrowthError::Config(_)));
    assert!(!err.is_contract_violation());
}

#[test]
fn test_step_log_chain_verifies() {
    let engine = grown(ModelConfig::new().with_template(TemplateKind::InOutThree), 12, 17);
    let log = engine.log();
    assert_eq!(log.len(), 9);
    assert!(log.verify_integrity().is_ok());
    assert_eq!(log.run_id(), engine.run_id());
    let steps: Vec<usize> = log.records().iter().map(|r| r.step).collect();
    assert_eq!(steps, (3..12).collect::<Vec<_>>());
}
