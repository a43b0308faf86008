//! Model configuration
//!
//! A [`ModelConfig`] fixes every policy choice of a growth run. It is
//! validated once when the engine is built and never changes afterwards.

use crate::error::ConfigError;
use crate::network::SeedTopology;
use crate::score::ScoreKind;
use crate::select::SelectKind;
use crate::template::TemplateKind;
use crate::types::Evaluation;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;

/// Smallest seed any template accepts.
pub const MIN_INITIAL_SIZE: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelConfig {
    /// Number of real nodes in the seed network
    pub initial_size: usize,
    /// Topology of the seed network
    pub seed: SeedTopology,
    /// Insertion template enumerating candidate positions
    pub template: TemplateKind,
    /// Scoring function for candidates and snapshots
    pub score: ScoreKind,
    /// Selection policy over candidate scores
    pub select: SelectKind,
    /// How candidate scores are computed on the overlay
    pub evaluation: Evaluation,
}

impl ModelConfig {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn with_initial_size(mut self, size: usize) -> Self {
        self.initial_size = size;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_seed(mut self, seed: SeedTopology) -> Self {
        self.seed = seed;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_template(mut self, template: TemplateKind) -> Self {
        self.template = template;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_score(mut self, score: ScoreKind) -> Self {
        self.score = score;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_select(mut self, select: SelectKind) -> Self {
        self.select = select;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_evaluation(mut self, evaluation: Evaluation) -> Self {
        self.evaluation = evaluation;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let minimum = MIN_INITIAL_SIZE.max(self.template.min_seed_size());
        if self.initial_size < minimum {
            return Err(ConfigError::InitialSizeTooSmall {
                size: self.initial_size,
                minimum,
                template: self.template.name(),
            });
        }

        if let ScoreKind::Influence { damping } = self.score {
            if !(damping > 0.0 && damping <= 1.0) {
                return Err(ConfigError::InvalidDamping(damping));
            }
        }

        // Policy constructors hold the parameter rules.
        self.select.build().map(|_| ())
    }

    /// Parse and validate a TOML document. Missing keys take defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Short provenance label, e.g. `i1o1_influence_softmax`.
    pub fn label(&self) -> String {
        format!(
            "{}_{}_{}",
            self.template.tag(),
            self.score.name(),
            self.select.name()
        )
    }

    /// Hex sha256 of the JSON form; equal configs share a digest.
    pub fn digest(&self) -> Result<String, ConfigError> {
        let json = self.to_json()?;
        Ok(hex::encode(Sha256::digest(json.as_bytes())))
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            initial_size: 3,
            seed: SeedTopology::default(),
            template: TemplateKind::default(),
            score: ScoreKind::default(),
            select: SelectKind::default(),
            evaluation: Evaluation::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = ModelConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.label(), "i1o1_influence_weighted");
    }

    #[test]
    fn seed_must_fit_template() {
        let err = ModelConfig::new()
            .with_template(TemplateKind::TwoInTwoOut)
            .with_initial_size(3)
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InitialSizeTooSmall { size: 3, minimum: 4, .. }
        ));
    }

    #[test]
    fn rejects_bad_parameters() {
        let bad_damping = ModelConfig::new().with_score(ScoreKind::Influence { damping: 0.0 });
        assert!(matches!(bad_damping.validate(), Err(ConfigError::InvalidDamping(_))));

        let bad_gamma = ModelConfig::new().with_select(SelectKind::Weighted { gamma: -2.0 });
        assert!(matches!(
            bad_gamma.validate(),
            Err(ConfigError::InvalidGamma { policy: "weighted", .. })
        ));
    }

    #[test]
    fn loads_partial_toml() {
        let config = ModelConfig::from_toml_str(
            r#"
            initial_size = 5
            template = "2in2out"
            evaluation = "global"

            [select]
            kind = "softmax"
            gamma = 3.0
            "#,
        )
        .unwrap();
        assert_eq!(config.initial_size, 5);
        assert_eq!(config.template, TemplateKind::TwoInTwoOut);
        assert_eq!(config.evaluation, Evaluation::Global);
        assert_eq!(config.select, SelectKind::Softmax { gamma: 3.0 });
        assert_eq!(config.score, ScoreKind::default());
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(matches!(
            ModelConfig::from_toml_str("size = 4"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn digest_tracks_content() {
        let a = ModelConfig::new();
        let b = ModelConfig::new().with_select(SelectKind::Greedy);
        assert_eq!(a.digest().unwrap(), ModelConfig::new().digest().unwrap());
        assert_ne!(a.digest().unwrap(), b.digest().unwrap());
        assert_eq!(a.digest().unwrap().len(), 64);
    }
}
