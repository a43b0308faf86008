use super::{max_score, Distribution, SelectKind, SelectionPolicy};
use crate::error::SelectionError;
use crate::score::ScoreMap;

/// Every candidate equally likely.
#[derive(Debug, Clone, Copy, Default)]
pub struct Random;

impl SelectionPolicy for Random {
    fn kind(&self) -> SelectKind {
        SelectKind::Random
    }

    fn needs_scores(&self) -> bool {
        false
    }

    fn distribution(&self, scores: &ScoreMap) -> Result<Distribution, SelectionError> {
        max_score(scores)?;
        Ok(Distribution::uniform(scores.keys().copied()))
    }
}
