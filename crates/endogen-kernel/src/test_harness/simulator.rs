//! Growth simulator
//!
//! Drives one engine per template × selection combination with a fixed seed
//! and checks the growth invariants after every step.

use crate::config::ModelConfig;
use crate::engine::{GrowthEngine, StepOutcome};
use crate::network::SCORE_ATTRIBUTE;
use crate::score::ScoreKind;
use crate::select::SelectKind;
use crate::template::TemplateKind;
use crate::types::{Evaluation, NodeId};
use rand::{rngs::StdRng, SeedableRng};
use std::collections::BTreeMap;

/// Simulator configuration
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Random seed for reproducibility
    pub seed: u64,
    /// Seed network size; raised to the template minimum where needed
    pub initial_size: usize,
    /// Real node count each run grows to
    pub target_size: usize,
    pub templates: Vec<TemplateKind>,
    pub selections: Vec<SelectKind>,
    pub score: ScoreKind,
    pub evaluation: Evaluation,
    /// Re-run each combination and compare fingerprints
    pub check_reproducibility: bool,
    pub stop_on_first_violation: bool,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            initial_size: 3,
            target_size: 12,
            templates: TemplateKind::ALL.to_vec(),
            selections: vec![
                SelectKind::Random,
                SelectKind::Greedy,
                SelectKind::Weighted { gamma: 1.0 },
                SelectKind::Softmax { gamma: 2.0 },
            ],
            score: ScoreKind::default(),
            evaluation: Evaluation::Local,
            check_reproducibility: true,
            stop_on_first_violation: false,
        }
    }
}

/// A violation detected during simulation
#[derive(Debug, Clone)]
pub enum Violation {
    /// Engine refused to build or to step
    EngineError { label: String, step: usize, error: String },
    /// Invariant was violated
    Invariant(InvariantViolation),
}

#[derive(Debug, Clone)]
pub struct InvariantViolation {
    pub label: String,
    pub step: usize,
    pub check: InvariantCheck,
    pub details: String,
}

/// Types of invariant checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum InvariantCheck {
    OneNodePerStep,
    NoCandidateLeakage,
    NetworkIsSimple,
    JoinMirrorsPosition,
    SnapshotPerNode,
    SnapshotsAreImmutable,
    ScoresSumToOne,
    HashChainIsUnbroken,
    SeedReproducible,
}

/// Statistics collected during simulation
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    pub runs: usize,
    pub steps: u64,
    pub failed_runs: usize,
    pub checks: BTreeMap<String, u64>,
}

/// Final state of one combination.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub label: String,
    pub nodes: usize,
    pub edges: usize,
    pub pending: usize,
    pub fingerprint: String,
}

/// Final report from the simulator
#[derive(Debug, Clone)]
pub struct SimulatorReport {
    pub config: SimulatorConfig,
    pub stats: RunStats,
    pub violations: Vec<Violation>,
    pub runs: Vec<RunSummary>,
}

impl SimulatorReport {
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn generate_text(&self) -> String {
        let mut report = String::new();

        report.push_str("=== Growth Simulator Report ===\n\n");
        report.push_str(&format!("Seed: {}\n", self.config.seed));
        report.push_str(&format!("Target size: {}\n", self.config.target_size));
        report.push_str(&format!("Runs: {}\n", self.stats.runs));
        report.push_str(&format!("Steps: {}\n", self.stats.steps));
        report.push_str(&format!("Failed runs: {}\n", self.stats.failed_runs));
        report.push_str(&format!("Violations: {}\n", self.violations.len()));

        if !self.runs.is_empty() {
            report.push_str("\n=== Runs ===\n");
            for run in &self.runs {
                report.push_str(&format!(
                    "{:<28} nodes={:<4} edges={:<5} pending={:<6} {}\n",
                    run.label,
                    run.nodes,
                    run.edges,
                    run.pending,
                    &run.fingerprint[..run.fingerprint.len().min(12)]
                ));
            }
        }

        if !self.violations.is_empty() {
            report.push_str("\n=== Violations ===\n");
            for (i, v) in self.violations.iter().enumerate() {
                report.push_str(&format!("{}. {:?}\n", i + 1, v));
            }
        }

        report.push_str(&format!(
            "\n=== Result: {} ===\n",
            if self.passed() { "PASS" } else { "FAIL" }
        ));

        report
    }
}

/// Run the growth simulator
pub fn run_simulator(config: SimulatorConfig) -> SimulatorReport {
    let mut stats = RunStats::default();
    let mut violations = Vec::new();
    let mut runs = Vec::new();

    'combinations: for &template in &config.templates {
        for &select in &config.selections {
            let model = ModelConfig::new()
                .with_initial_size(config.initial_size.max(template.min_seed_size()))
                .with_template(template)
                .with_score(config.score)
                .with_select(select)
                .with_evaluation(config.evaluation);
            let label = model.label();
            stats.runs += 1;

            let before = violations.len();
            match simulate_run(&model, &config, &mut stats, &mut violations) {
                Some(engine) => {
                    if config.check_reproducibility {
                        check_reproducible(&engine, &model, &config, &mut violations);
                    }
                    let network = engine.network();
                    runs.push(RunSummary {
                        label,
                        nodes: network.node_count(),
                        edges: network.edge_count(),
                        pending: engine.adjacent_possible().len(),
                        fingerprint: engine
                            .latest_snapshot()
                            .map(|s| s.fingerprint().to_string())
                            .unwrap_or_default(),
                    });
                }
                None => stats.failed_runs += 1,
            }

            if config.stop_on_first_violation && violations.len() > before {
                break 'combinations;
            }
        }
    }

    SimulatorReport {
        config,
        stats,
        violations,
        runs,
    }
}

fn simulate_run(
    model: &ModelConfig,
    config: &SimulatorConfig,
    stats: &mut RunStats,
    violations: &mut Vec<Violation>,
) -> Option<GrowthEngine> {
    let label = model.label();
    let mut engine = match GrowthEngine::new(model.clone()) {
        Ok(engine) => engine,
        Err(e) => {
            violations.push(Violation::EngineError {
                label,
                step: 0,
                error: e.to_string(),
            });
            return None;
        }
    };
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut fingerprints: Vec<String> = engine
        .snapshots()
        .iter()
        .map(|s| s.fingerprint().to_string())
        .collect();

    while engine.network().node_count() < config.target_size {
        let step = engine.network().node_count();
        let outcome = match engine.step(&mut rng) {
            Ok(outcome) => outcome,
            Err(e) => {
                violations.push(Violation::EngineError {
                    label,
                    step,
                    error: e.to_string(),
                });
                return None;
            }
        };
        stats.steps += 1;

        let found = GrowthInvariants::check_all(&engine, &outcome, step, &fingerprints);
        for check in GrowthInvariants::CHECKED {
            *stats.checks.entry(format!("{check:?}")).or_insert(0) += 1;
        }
        for (check, details) in found {
            violations.push(Violation::Invariant(InvariantViolation {
                label: label.clone(),
                step,
                check,
                details,
            }));
        }

        if let Some(latest) = engine.latest_snapshot() {
            fingerprints.push(latest.fingerprint().to_string());
        }
    }

    Some(engine)
}

fn check_reproducible(
    engine: &GrowthEngine,
    model: &ModelConfig,
    config: &SimulatorConfig,
    violations: &mut Vec<Violation>,
) {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let replay = GrowthEngine::new(model.clone())
        .and_then(|mut e| e.grow(config.target_size, &mut rng).map(|_| e));
    let diverged = match replay {
        Ok(replay) => replay
            .snapshots()
            .iter()
            .zip(engine.snapshots())
            .position(|(a, b)| a.fingerprint() != b.fingerprint()),
        Err(e) => {
            violations.push(Violation::EngineError {
                label: model.label(),
                step: 0,
                error: format!("replay failed: {e}"),
            });
            return;
        }
    };
    if let Some(step) = diverged {
        violations.push(Violation::Invariant(InvariantViolation {
            label: model.label(),
            step,
            check: InvariantCheck::SeedReproducible,
            details: "replay with the same seed produced a different snapshot".to_string(),
        }));
    }
}

/// Growth invariant checks
pub struct GrowthInvariants;

impl GrowthInvariants {
    /// Checks run after every step.
    pub const CHECKED: [InvariantCheck; 8] = [
        InvariantCheck::OneNodePerStep,
        InvariantCheck::NoCandidateLeakage,
        InvariantCheck::NetworkIsSimple,
        InvariantCheck::JoinMirrorsPosition,
        InvariantCheck::SnapshotPerNode,
        InvariantCheck::SnapshotsAreImmutable,
        InvariantCheck::ScoresSumToOne,
        InvariantCheck::HashChainIsUnbroken,
    ];

    /// Check every invariant after the step that started with `before` real
    /// nodes. `fingerprints` holds the snapshot fingerprints seen so far.
    pub fn check_all(
        engine: &GrowthEngine,
        outcome: &StepOutcome,
        before: usize,
        fingerprints: &[String],
    ) -> Vec<(InvariantCheck, String)> {
        let mut found = Vec::new();
        let network = engine.network();
        let n = network.node_count();

        if n != before + 1 || outcome.node != NodeId(before) {
            found.push((
                InvariantCheck::OneNodePerStep,
                format!("expected node {before} and {} nodes, got {} and {n}", before + 1, outcome.node),
            ));
        }

        let expected: Vec<NodeId> = (0..n).map(NodeId).collect();
        if network.nodes() != expected {
            found.push((
                InvariantCheck::NoCandidateLeakage,
                format!("real network holds ids {:?}", network.nodes()),
            ));
        }

        if !network.is_simple() {
            found.push((InvariantCheck::NetworkIsSimple, "self loop present".to_string()));
        }

        let sources: Vec<NodeId> = network.in_edges(outcome.node).into_iter().map(|(s, _)| s).collect();
        let targets: Vec<NodeId> = network.out_edges(outcome.node).into_iter().map(|(_, t)| t).collect();
        let (want_sources, want_targets) = outcome.position.canonical();
        if sources != want_sources || targets != want_targets {
            found.push((
                InvariantCheck::JoinMirrorsPosition,
                format!("node {} wired {sources:?} -> {targets:?}, position {}", outcome.node, outcome.position),
            ));
        }

        let snapshots = engine.snapshots();
        if snapshots.len() != n {
            found.push((
                InvariantCheck::SnapshotPerNode,
                format!("{} snapshots for {n} nodes", snapshots.len()),
            ));
        }

        if let Some(index) = fingerprints
            .iter()
            .zip(snapshots)
            .position(|(fp, s)| fp != s.fingerprint())
        {
            found.push((
                InvariantCheck::SnapshotsAreImmutable,
                format!("snapshot {index} changed after commit"),
            ));
        }

        if matches!(
            engine.config().score,
            ScoreKind::Uniform | ScoreKind::Influence { .. }
        ) {
            let total: f64 = network
                .node_attributes(SCORE_ATTRIBUTE)
                .map(|scores| scores.values().sum())
                .unwrap_or_default();
            if (total - 1.0).abs() > 1e-6 {
                found.push((InvariantCheck::ScoresSumToOne, format!("scores sum to {total}")));
            }
        }

        if let Err(e) = engine.log().verify_integrity() {
            found.push((InvariantCheck::HashChainIsUnbroken, e.to_string()));
        }

        found
    }
}
