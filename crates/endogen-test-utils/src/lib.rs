//! Testing utilities for the endogen workspace
//!
//! Shared fixtures and assertions for growth tests.

#![allow(missing_docs)]

use endogen_kernel::{
    GrowthEngine, ModelConfig, Network, NodeId, Position, ScoreKind, SelectKind, TemplateKind,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Ids `0..n`.
pub fn ids(n: usize) -> Vec<NodeId> {
    (0..n).map(NodeId).collect()
}

/// Cycle seed, uniform scores, random selection.
pub fn uniform_random_config(template: TemplateKind) -> ModelConfig {
    ModelConfig::new()
        .with_initial_size(template.min_seed_size().max(3))
        .with_template(template)
        .with_score(ScoreKind::Uniform)
        .with_select(SelectKind::Random)
}

pub fn engine_with(config: ModelConfig) -> GrowthEngine {
    GrowthEngine::new(config).unwrap()
}

/// Grow a fresh engine to `target` nodes under `seed`.
pub fn grown(config: ModelConfig, target: usize, seed: u64) -> GrowthEngine {
    let mut engine = engine_with(config);
    engine.grow(target, &mut seeded_rng(seed)).unwrap();
    engine
}

/// Fingerprints of every snapshot, in order.
pub fn fingerprints(engine: &GrowthEngine) -> Vec<String> {
    engine
        .snapshots()
        .iter()
        .map(|s| s.fingerprint().to_string())
        .collect()
}

pub fn assert_simple_graph(network: &Network) {
    assert!(network.is_simple(), "network has a self loop");
    let edges = network.edges();
    let mut deduped = edges.clone();
    deduped.dedup();
    assert_eq!(edges, deduped, "network has a parallel edge");
}

/// Real node ids are exactly `0..n`: no placeholder ever reached the network.
pub fn assert_no_placeholders(network: &Network) {
    assert_eq!(network.nodes(), ids(network.node_count()));
    assert_eq!(network.next_id(), NodeId(network.node_count()));
}

/// `node`'s edges are exactly the wiring of `position`.
pub fn assert_wired_like(network: &Network, node: NodeId, position: &Position) {
    let (sources, targets) = position.canonical();
    let actual_sources: Vec<NodeId> = network.in_edges(node).into_iter().map(|(s, _)| s).collect();
    let actual_targets: Vec<NodeId> = network.out_edges(node).into_iter().map(|(_, t)| t).collect();
    assert_eq!(actual_sources, sources, "in-edges of {node}");
    assert_eq!(actual_targets, targets, "out-edges of {node}");
}
