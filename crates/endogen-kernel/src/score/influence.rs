//! PageRank via power iteration.

use super::{uniform_scores, ScoreFunction, ScoreKind, ScoreMap};
use crate::error::ScoringError;
use crate::network::Network;
use crate::types::NodeId;
use std::collections::HashMap;

pub const DEFAULT_DAMPING: f64 = 0.95;
pub const DEFAULT_MAX_ITERATIONS: usize = 1000;
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Influence score: PageRank with uniform teleport.
///
/// Scores sum to 1.0. Dangling nodes spread their mass evenly. Iteration
/// stops once the L1 change falls below `n * tolerance`. A graph without
/// edges scores uniformly.
#[derive(Debug, Clone, Copy)]
pub struct Influence {
    damping: f64,
    max_iterations: usize,
    tolerance: f64,
}

impl Influence {
    pub fn new(damping: f64) -> Result<Self, ScoringError> {
        if !(damping > 0.0 && damping <= 1.0) {
            return Err(ScoringError::InvalidDamping(damping));
        }
        Ok(Self {
            damping,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
        })
    }

    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn damping(&self) -> f64 {
        self.damping
    }
}

impl ScoreFunction for Influence {
    fn kind(&self) -> ScoreKind {
        ScoreKind::Influence {
            damping: self.damping,
        }
    }

    fn score(&self, graph: &Network) -> Result<ScoreMap, ScoringError> {
        let node_ids = graph.nodes();
        let n = node_ids.len();
        if n == 0 {
            return Ok(ScoreMap::new());
        }
        if graph.edge_count() == 0 {
            tracing::debug!(nodes = n, "influence on edgeless graph, scoring uniformly");
            return Ok(uniform_scores(graph));
        }

        let id_to_idx: HashMap<NodeId, usize> =
            node_ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();
        let successors: Vec<Vec<usize>> = node_ids
            .iter()
            .map(|&id| graph.successors(id).map(|s| id_to_idx[&s]).collect())
            .collect();

        let d = self.damping;
        let inv_n = 1.0 / n as f64;
        let mut scores = vec![inv_n; n];
        let mut next = vec![0.0_f64; n];

        for _ in 0..self.max_iterations {
            let dangling: f64 = successors
                .iter()
                .zip(&scores)
                .filter(|(out, _)| out.is_empty())
                .map(|(_, s)| *s)
                .sum();
            let base = (d * dangling + (1.0 - d)) * inv_n;
            next.iter_mut().for_each(|s| *s = base);

            for (u, out) in successors.iter().enumerate() {
                if out.is_empty() {
                    continue;
                }
                let share = d * scores[u] / out.len() as f64;
                for &v in out {
                    next[v] += share;
                }
            }

            let diff: f64 = scores.iter().zip(&next).map(|(a, b)| (a - b).abs()).sum();
            std::mem::swap(&mut scores, &mut next);

            if diff < n as f64 * self.tolerance {
                return Ok(node_ids.into_iter().zip(scores).collect());
            }
        }

        Err(ScoringError::NotConverged {
            iterations: self.max_iterations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::SeedTopology;

    fn total(scores: &ScoreMap) -> f64 {
        scores.values().sum()
    }

    #[test]
    fn rejects_damping_outside_unit_interval() {
        assert!(Influence::new(0.0).is_err());
        assert!(Influence::new(1.5).is_err());
        assert!(Influence::new(f64::NAN).is_err());
        assert!(Influence::new(1.0).is_ok());
    }

    #[test]
    fn symmetric_cycle_scores_evenly() {
        let g = SeedTopology::Cycle.build(4).unwrap();
        let scores = Influence::new(0.85).unwrap().score(&g).unwrap();
        for s in scores.values() {
            assert!((s - 0.25).abs() < 1e-9);
        }
    }

    #[test]
    fn star_leaves_outrank_hub() {
        let g = SeedTopology::OutStar.build(4).unwrap();
        let scores = Influence::new(0.95).unwrap().score(&g).unwrap();
        assert!((total(&scores) - 1.0).abs() < 1e-9);
        assert!(scores[&NodeId(1)] > scores[&NodeId(0)]);
        assert!((scores[&NodeId(1)] - scores[&NodeId(3)]).abs() < 1e-12);
    }

    #[test]
    fn edgeless_graph_falls_back_to_uniform() {
        let g = SeedTopology::Sticks.build(1).unwrap();
        let scores = Influence::new(0.95).unwrap().score(&g).unwrap();
        assert_eq!(scores.len(), 1);
        assert!((scores[&NodeId(0)] - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn reports_non_convergence() {
        let g = SeedTopology::OutStar.build(5).unwrap();
        let err = Influence::new(0.95)
            .unwrap()
            .with_max_iterations(1)
            .with_tolerance(0.0)
            .score(&g)
            .unwrap_err();
        assert_eq!(err, ScoringError::NotConverged { iterations: 1 });
    }
}
