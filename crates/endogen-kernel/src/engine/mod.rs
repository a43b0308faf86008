//! Growth engine
//!
//! Owns the real network, the adjacent-possible ledger and the snapshot
//! sequence. Each step enumerates new positions, materialises them in an
//! [`Exploration`], scores and selects one candidate and joins a new real
//! node wired exactly like the chosen position.
//!
//! Steps are atomic: everything fallible runs against copies, and engine
//! state is only committed once the new snapshot and its log record exist.

use crate::config::ModelConfig;
use crate::error::{GrowthError, SelectionError};
use crate::exploration::Exploration;
use crate::logging::{StepLog, StepRecord};
use crate::network::{Network, SCORE_ATTRIBUTE};
use crate::score::ScoreFunction;
use crate::select::SelectionPolicy;
use crate::snapshot::Snapshot;
use crate::state_machine::validate_transition;
use crate::template::{AdjacentPossible, InsertionTemplate, Position};
use crate::types::{EngineState, NodeId, RunId};
use rand::RngCore;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug)]
pub struct GrowthEngine {
    config: ModelConfig,
    run_id: RunId,
    state: EngineState,
    template: Box<dyn InsertionTemplate>,
    score: Box<dyn ScoreFunction>,
    policy: Box<dyn SelectionPolicy>,
    network: Network,
    possible: AdjacentPossible,
    pivot: Option<NodeId>,
    snapshots: Vec<Arc<Snapshot>>,
    log: StepLog,
}

/// Outcome of one committed step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    pub node: NodeId,
    pub position: Position,
    pub candidates: usize,
    pub score: f64,
}

impl GrowthEngine {
    /// Validate `config`, build the seed network and record its snapshot once
    /// per seed node.
    pub fn new(config: ModelConfig) -> Result<Self, GrowthError> {
        config.validate()?;
        let template = config.template.build();
        let score = config.score.build()?;
        let policy = config.select.build()?;

        let mut network = config.seed.build(config.initial_size)?;
        let seed_scores = score.score(&network)?;
        network.set_node_attributes(SCORE_ATTRIBUTE, &seed_scores);

        let seed = Arc::new(Snapshot::new(network.clone()));
        let snapshots = vec![seed; network.node_count()];
        let run_id = RunId::new();

        let mut engine = Self {
            log: StepLog::new(run_id, network.node_count()),
            config,
            run_id,
            state: EngineState::Uninitialized,
            template,
            score,
            policy,
            network,
            possible: AdjacentPossible::new(),
            pivot: None,
            snapshots,
        };
        engine.transition(EngineState::Ready)?;

        info!(
            run = %engine.run_id,
            label = %engine.config.label(),
            seed = engine.config.seed.name(),
            nodes = engine.network.node_count(),
            "growth engine ready"
        );
        Ok(engine)
    }

    /// Grow until the network holds `target` real nodes.
    ///
    /// Returns the number of steps taken. A failed step aborts the call;
    /// snapshots committed so far stay, and a later call resumes from them.
    pub fn grow(&mut self, target: usize, rng: &mut dyn RngCore) -> Result<usize, GrowthError> {
        let current = self.network.node_count();
        if target < current {
            return Err(GrowthError::InvalidTarget { target, current });
        }
        if target == current {
            if self.state != EngineState::Done {
                self.transition(EngineState::Done)?;
            }
            return Ok(0);
        }

        self.transition(EngineState::Growing)?;
        info!(run = %self.run_id, from = current, target, "growing network");

        for _ in current..target {
            if let Err(err) = self.advance(rng) {
                warn!(run = %self.run_id, step = self.network.node_count(), error = %err, "growth step failed");
                return Err(err);
            }
        }

        self.transition(EngineState::Done)?;
        info!(
            run = %self.run_id,
            nodes = self.network.node_count(),
            edges = self.network.edge_count(),
            pending = self.possible.len(),
            "growth finished"
        );
        Ok(target - current)
    }

    /// Run a single step.
    pub fn step(&mut self, rng: &mut dyn RngCore) -> Result<StepOutcome, GrowthError> {
        self.transition(EngineState::Growing)?;
        self.advance(rng)
    }

    fn advance(&mut self, rng: &mut dyn RngCore) -> Result<StepOutcome, GrowthError> {
        let mut fresh = self
            .template
            .enumerate(&self.network, self.possible.len(), self.pivot)?;
        if fresh.is_empty() && self.possible.is_empty() && self.pivot.is_some() {
            debug!("local update found nothing, repopulating globally");
            fresh = self.template.enumerate(&self.network, 0, None)?;
        }

        let pending: Vec<Position> = self
            .possible
            .positions()
            .iter()
            .cloned()
            .chain(fresh.iter().cloned())
            .collect();
        if pending.is_empty() {
            return Err(SelectionError::NoCandidates.into());
        }

        let exploration = Exploration::materialize(&self.network, &pending)?;
        let scores = if self.policy.needs_scores() {
            exploration.score(self.score.as_ref(), self.config.evaluation)?
        } else {
            exploration.unit_scores()
        };
        let chosen = self.policy.select(&scores, rng)?;
        let index = exploration
            .position_index(chosen)
            .ok_or_else(|| GrowthError::Internal(format!("selected {chosen} is not a candidate")))?;
        let position = pending[index].clone();
        let chosen_score = scores.get(&chosen).copied().unwrap_or_default();

        let mut grown = self.network.clone();
        let node = join(&mut grown, &position)?;
        let snapshot_scores = self.score.score(&grown)?;
        grown.set_node_attributes(SCORE_ATTRIBUTE, &snapshot_scores);
        let snapshot = Snapshot::new(grown.clone());

        let record = StepRecord::new(
            node.index(),
            node,
            position.clone(),
            pending.len(),
            chosen_score,
            snapshot.fingerprint().to_string(),
        );
        self.log.append(record)?;

        self.possible.extend(fresh);
        self.possible.take(index);
        self.network = grown;
        self.snapshots.push(Arc::new(snapshot));
        self.pivot = Some(node);

        debug!(
            node = %node,
            position = %position,
            candidates = pending.len(),
            score = chosen_score,
            pending = self.possible.len(),
            "node joined"
        );

        Ok(StepOutcome {
            node,
            position,
            candidates: pending.len(),
            score: chosen_score,
        })
    }

    fn transition(&mut self, to: EngineState) -> Result<(), GrowthError> {
        validate_transition(self.state, to)?;
        self.state = to;
        Ok(())
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Real network as of the last committed step.
    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Snapshot `i` is the network as of node `i`'s creation; seed nodes all
    /// share the seed snapshot.
    pub fn snapshots(&self) -> &[Arc<Snapshot>] {
        &self.snapshots
    }

    pub fn latest_snapshot(&self) -> Option<&Arc<Snapshot>> {
        self.snapshots.last()
    }

    pub fn adjacent_possible(&self) -> &AdjacentPossible {
        &self.possible
    }

    /// Node joined by the last step.
    pub fn pivot(&self) -> Option<NodeId> {
        self.pivot
    }

    pub fn log(&self) -> &StepLog {
        &self.log
    }
}

/// Add a real node wired like `position`.
fn join(network: &mut Network, position: &Position) -> Result<NodeId, GrowthError> {
    let node = network.add_node();
    for &source in position.sources() {
        network.add_edge(source, node)?;
    }
    for &target in position.targets() {
        network.add_edge(node, target)?;
    }
    Ok(node)
}
