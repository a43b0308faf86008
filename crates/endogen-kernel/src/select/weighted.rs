use super::{max_score, Distribution, SelectKind, SelectionPolicy};
use crate::error::{ConfigError, SelectionError};
use crate::score::ScoreMap;

/// Power-law selection: weight `(score / max)^gamma`.
///
/// `gamma = 1` is proportional, larger values sharpen towards the maximum,
/// smaller ones flatten, `gamma = 0` is uniform.
#[derive(Debug, Clone, Copy)]
pub struct Weighted {
    gamma: f64,
}

impl Weighted {
    pub fn new(gamma: f64) -> Result<Self, ConfigError> {
        if !gamma.is_finite() || gamma < 0.0 {
            return Err(ConfigError::InvalidGamma {
                policy: "weighted",
                gamma,
            });
        }
        Ok(Self { gamma })
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }
}

impl SelectionPolicy for Weighted {
    fn kind(&self) -> SelectKind {
        SelectKind::Weighted { gamma: self.gamma }
    }

    fn distribution(&self, scores: &ScoreMap) -> Result<Distribution, SelectionError> {
        let max = max_score(scores)?;
        if max == 0.0 {
            return Distribution::from_weights(scores.keys().map(|&n| (n, 0.0)).collect());
        }
        let weights = scores
            .iter()
            .map(|(&node, &s)| (node, (s / max).powf(self.gamma)))
            .collect();
        Distribution::from_weights(weights)
    }
}
