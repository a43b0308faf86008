use super::{max_score, Distribution, SelectKind, SelectionPolicy};
use crate::error::SelectionError;
use crate::score::ScoreMap;

pub const DEFAULT_TIE_TOLERANCE: f64 = 1e-12;

/// Always picks a top-scoring candidate; ties share the mass evenly.
///
/// Two scores tie when they differ by at most `tolerance * max`.
#[derive(Debug, Clone, Copy)]
pub struct Greedy {
    tolerance: f64,
}

impl Greedy {
    #[must_use]
    pub fn with_tolerance(tolerance: f64) -> Self {
        Self {
            tolerance: tolerance.abs(),
        }
    }
}

impl Default for Greedy {
    fn default() -> Self {
        Self::with_tolerance(DEFAULT_TIE_TOLERANCE)
    }
}

impl SelectionPolicy for Greedy {
    fn kind(&self) -> SelectKind {
        SelectKind::Greedy
    }

    fn distribution(&self, scores: &ScoreMap) -> Result<Distribution, SelectionError> {
        let max = max_score(scores)?;
        let slack = self.tolerance * max;
        let weights = scores
            .iter()
            .map(|(&node, &s)| (node, if max - s <= slack { 1.0 } else { 0.0 }))
            .collect();
        Distribution::from_weights(weights)
    }
}
