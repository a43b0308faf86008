//! Scoring functions
//!
//! A scoring function maps every node of a graph to a real value. It is a
//! pure function of the graph it is given.

mod degree;
mod influence;
mod uniform;

pub use degree::DegreeCentrality;
pub use influence::{Influence, DEFAULT_DAMPING, DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE};
pub use uniform::Uniform;

use crate::error::ScoringError;
use crate::network::Network;
use crate::types::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Score per node, ordered by id so iteration is reproducible.
pub type ScoreMap = BTreeMap<NodeId, f64>;

pub trait ScoreFunction: Send + Sync + fmt::Debug {
    fn kind(&self) -> ScoreKind;

    fn score(&self, graph: &Network) -> Result<ScoreMap, ScoringError>;
}

/// Closed set of scoring functions with their parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScoreKind {
    Uniform,
    Influence {
        #[serde(default = "default_damping")]
        damping: f64,
    },
    Degree,
}

fn default_damping() -> f64 {
    DEFAULT_DAMPING
}

impl Default for ScoreKind {
    fn default() -> Self {
        ScoreKind::Influence {
            damping: DEFAULT_DAMPING,
        }
    }
}

impl ScoreKind {
    pub fn name(self) -> &'static str {
        match self {
            ScoreKind::Uniform => "uniform",
            ScoreKind::Influence { .. } => "influence",
            ScoreKind::Degree => "degree",
        }
    }

    pub fn build(self) -> Result<Box<dyn ScoreFunction>, ScoringError> {
        Ok(match self {
            ScoreKind::Uniform => Box::new(Uniform),
            ScoreKind::Influence { damping } => Box::new(Influence::new(damping)?),
            ScoreKind::Degree => Box::new(DegreeCentrality),
        })
    }
}

impl fmt::Display for ScoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreKind::Influence { damping } => write!(f, "influence(damping={damping})"),
            other => f.write_str(other.name()),
        }
    }
}

/// `1 / n` for every node of `graph`.
pub(crate) fn uniform_scores(graph: &Network) -> ScoreMap {
    let n = graph.node_count();
    if n == 0 {
        return ScoreMap::new();
    }
    let share = 1.0 / n as f64;
    graph.nodes().into_iter().map(|node| (node, share)).collect()
}
