//! Selection policies
//!
//! A policy turns a score map into a probability [`Distribution`] over the
//! candidates and samples one of them. Score maps are never mutated; every
//! call builds a fresh distribution.

mod greedy;
mod random;
mod softmax;
mod weighted;

pub use greedy::{Greedy, DEFAULT_TIE_TOLERANCE};
pub use random::Random;
pub use softmax::Softmax;
pub use weighted::Weighted;

use crate::error::{ConfigError, SelectionError};
use crate::score::ScoreMap;
use crate::types::NodeId;
use rand::distributions::{Distribution as _, WeightedIndex};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalised probabilities over candidates, in ascending id order.
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    entries: Vec<(NodeId, f64)>,
}

impl Distribution {
    /// Normalise raw non-negative weights. An all-zero vector becomes uniform.
    pub(crate) fn from_weights(weights: Vec<(NodeId, f64)>) -> Result<Self, SelectionError> {
        if weights.is_empty() {
            return Err(SelectionError::NoCandidates);
        }

        let total: f64 = weights.iter().map(|(_, w)| w).sum();
        if !total.is_finite() {
            return Err(SelectionError::Sampling(format!("weight total {total} is not finite")));
        }
        if total <= 0.0 {
            tracing::debug!(candidates = weights.len(), "all weights zero, selecting uniformly");
            return Ok(Self::uniform(weights.into_iter().map(|(node, _)| node)));
        }

        Ok(Self {
            entries: weights.into_iter().map(|(node, w)| (node, w / total)).collect(),
        })
    }

    pub(crate) fn uniform(nodes: impl IntoIterator<Item = NodeId>) -> Self {
        let nodes: Vec<NodeId> = nodes.into_iter().collect();
        let p = 1.0 / nodes.len().max(1) as f64;
        Self {
            entries: nodes.into_iter().map(|node| (node, p)).collect(),
        }
    }

    pub fn entries(&self) -> &[(NodeId, f64)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Probability of `node`; zero for anything outside the support.
    pub fn probability(&self, node: NodeId) -> f64 {
        self.entries
            .iter()
            .find(|(n, _)| *n == node)
            .map_or(0.0, |(_, p)| *p)
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, p)| p).sum()
    }

    /// Candidates with non-zero probability.
    pub fn support(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.entries.iter().filter(|(_, p)| *p > 0.0).map(|(n, _)| *n)
    }

    pub fn sample(&self, rng: &mut dyn RngCore) -> Result<NodeId, SelectionError> {
        let weights: Vec<f64> = self.entries.iter().map(|(_, p)| *p).collect();
        let sampler = WeightedIndex::new(&weights)
            .map_err(|e| SelectionError::Sampling(e.to_string()))?;
        Ok(self.entries[sampler.sample(rng)].0)
    }
}

/// Strategy choosing one candidate from a score map.
pub trait SelectionPolicy: Send + Sync + fmt::Debug {
    fn kind(&self) -> SelectKind;

    /// Whether scores influence the outcome. When false the engine skips
    /// scoring and hands every candidate a score of 1.0.
    fn needs_scores(&self) -> bool {
        true
    }

    fn distribution(&self, scores: &ScoreMap) -> Result<Distribution, SelectionError>;

    fn select(&self, scores: &ScoreMap, rng: &mut dyn RngCore) -> Result<NodeId, SelectionError> {
        self.distribution(scores)?.sample(rng)
    }
}

/// Check every score and return the maximum.
pub(crate) fn max_score(scores: &ScoreMap) -> Result<f64, SelectionError> {
    if scores.is_empty() {
        return Err(SelectionError::NoCandidates);
    }
    let mut max = 0.0_f64;
    for (&node, &score) in scores {
        if !score.is_finite() || score < 0.0 {
            return Err(SelectionError::InvalidScore { node, score });
        }
        max = max.max(score);
    }
    Ok(max)
}

/// Closed set of selection policies with their parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SelectKind {
    Random,
    Greedy,
    Weighted { gamma: f64 },
    Softmax { gamma: f64 },
}

impl Default for SelectKind {
    fn default() -> Self {
        SelectKind::Weighted { gamma: 1.0 }
    }
}

impl SelectKind {
    pub fn name(self) -> &'static str {
        match self {
            SelectKind::Random => "random",
            SelectKind::Greedy => "greedy",
            SelectKind::Weighted { .. } => "weighted",
            SelectKind::Softmax { .. } => "softmax",
        }
    }

    pub fn build(self) -> Result<Box<dyn SelectionPolicy>, ConfigError> {
        Ok(match self {
            SelectKind::Random => Box::new(Random),
            SelectKind::Greedy => Box::new(Greedy::default()),
            SelectKind::Weighted { gamma } => Box::new(Weighted::new(gamma)?),
            SelectKind::Softmax { gamma } => Box::new(Softmax::new(gamma)?),
        })
    }
}

impl fmt::Display for SelectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectKind::Weighted { gamma } | SelectKind::Softmax { gamma } => {
                write!(f, "{}(gamma={gamma})", self.name())
            }
            other => f.write_str(other.name()),
        }
    }
}

#[cfg(test)]
pub(crate) fn scores(values: &[f64]) -> ScoreMap {
    values
        .iter()
        .enumerate()
        .map(|(i, &s)| (NodeId(i), s))
        .collect()
}
