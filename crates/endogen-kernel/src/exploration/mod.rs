//! Per-step exploration overlay
//!
//! An [`Exploration`] is a throwaway copy of the real network extended with
//! one placeholder node per pending position. Placeholders take ids starting
//! at the real network's next id, in ledger order, and are wired exactly as
//! their position says. The overlay is dropped at the end of the step; the
//! permanent network never sees a placeholder.

use crate::error::{GrowthError, ScoringError, TemplateError};
use crate::network::Network;
use crate::score::{ScoreFunction, ScoreMap};
use crate::template::Position;
use crate::types::{Evaluation, NodeId};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone)]
pub struct Exploration {
    graph: Network,
    real: BTreeSet<NodeId>,
    /// Placeholder id to index into the positions it was built from.
    candidates: BTreeMap<NodeId, usize>,
}

impl Exploration {
    pub fn materialize(real: &Network, positions: &[Position]) -> Result<Self, GrowthError> {
        let mut graph = real.clone();
        let mut candidates = BTreeMap::new();

        for (index, position) in positions.iter().enumerate() {
            if let Some(&unknown) = position
                .sources()
                .iter()
                .chain(position.targets())
                .find(|n| !real.contains_node(**n))
            {
                return Err(TemplateError::UnknownEndpoint(unknown).into());
            }

            let placeholder = graph.add_node();
            for &source in position.sources() {
                graph.add_edge(source, placeholder)?;
            }
            for &target in position.targets() {
                graph.add_edge(placeholder, target)?;
            }
            candidates.insert(placeholder, index);
        }

        Ok(Self {
            graph,
            real: real.node_set(),
            candidates,
        })
    }

    /// Real network plus every placeholder.
    pub fn graph(&self) -> &Network {
        &self.graph
    }

    pub fn candidates(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.candidates.keys().copied()
    }

    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_candidate(&self, node: NodeId) -> bool {
        self.candidates.contains_key(&node)
    }

    /// Index of the position `candidate` was built from.
    pub fn position_index(&self, candidate: NodeId) -> Option<usize> {
        self.candidates.get(&candidate).copied()
    }

    /// Real nodes plus `candidate`, with the edges among them.
    pub fn candidate_subgraph(&self, candidate: NodeId) -> Network {
        let mut keep = self.real.clone();
        keep.insert(candidate);
        self.graph.induced_subgraph(&keep)
    }

    /// Score every candidate.
    ///
    /// Local evaluation scores each candidate on its own subgraph; global
    /// evaluation scores the whole overlay once.
    pub fn score(
        &self,
        function: &dyn ScoreFunction,
        evaluation: Evaluation,
    ) -> Result<ScoreMap, ScoringError> {
        match evaluation {
            Evaluation::Local => self
                .candidates()
                .map(|candidate| {
                    let scores = function.score(&self.candidate_subgraph(candidate))?;
                    scores
                        .get(&candidate)
                        .map(|&s| (candidate, s))
                        .ok_or(ScoringError::MissingCandidate(candidate))
                })
                .collect(),
            Evaluation::Global => {
                let scores = function.score(&self.graph)?;
                self.candidates()
                    .map(|candidate| {
                        scores
                            .get(&candidate)
                            .map(|&s| (candidate, s))
                            .ok_or(ScoringError::MissingCandidate(candidate))
                    })
                    .collect()
            }
        }
    }

    /// Score 1.0 for every candidate, for policies that ignore scores.
    pub fn unit_scores(&self) -> ScoreMap {
        self.candidates().map(|c| (c, 1.0)).collect()
    }
}
