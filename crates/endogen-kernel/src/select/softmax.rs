use super::{max_score, Distribution, SelectKind, SelectionPolicy};
use crate::error::{ConfigError, SelectionError};
use crate::score::ScoreMap;

/// Boltzmann selection: weight `exp(gamma * score)`.
///
/// Exponents are shifted by their maximum before exponentiating, which for
/// `gamma >= 0` is `exp(gamma * (score - max))`.
#[derive(Debug, Clone, Copy)]
pub struct Softmax {
    gamma: f64,
}

impl Softmax {
    pub fn new(gamma: f64) -> Result<Self, ConfigError> {
        if !gamma.is_finite() {
            return Err(ConfigError::InvalidGamma {
                policy: "softmax",
                gamma,
            });
        }
        Ok(Self { gamma })
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }
}

impl SelectionPolicy for Softmax {
    fn kind(&self) -> SelectKind {
        SelectKind::Softmax { gamma: self.gamma }
    }

    fn distribution(&self, scores: &ScoreMap) -> Result<Distribution, SelectionError> {
        max_score(scores)?;
        let top = scores
            .values()
            .map(|&s| self.gamma * s)
            .fold(f64::NEG_INFINITY, f64::max);
        let weights = scores
            .iter()
            .map(|(&node, &s)| (node, (self.gamma * s - top).exp()))
            .collect();
        Distribution::from_weights(weights)
    }
}
