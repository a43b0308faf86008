use super::{uniform_scores, ScoreFunction, ScoreKind, ScoreMap};
use crate::error::ScoringError;
use crate::network::Network;

/// Every node scores `1 / n`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Uniform;

impl ScoreFunction for Uniform {
    fn kind(&self) -> ScoreKind {
        ScoreKind::Uniform
    }

    fn score(&self, graph: &Network) -> Result<ScoreMap, ScoringError> {
        Ok(uniform_scores(graph))
    }
}
