//! Insertion templates
//!
//! A template decides what a candidate position is: which real nodes a new
//! node would take as in-neighbours (sources) and out-neighbours (targets).
//!
//! - [`InsertionTemplate`]: core trait, global and local enumeration
//! - [`Position`]: one wiring pattern
//! - [`AdjacentPossible`]: ledger of pending positions carried between steps
//! - [`TemplateKind`]: closed set of templates, chosen once at construction
//!
//! Global mode enumerates every wiring among the real nodes and is only legal
//! while no positions are pending. Local mode enumerates the wirings that
//! involve the pivot (the node joined last), which is all that a new node
//! adds to the adjacent possible.

mod in_out_three;
mod one_in_one_out;
mod one_in_two_out;
mod two_in_one_out;
mod two_in_two_out;

pub use in_out_three::InOutThree;
pub use one_in_one_out::OneInOneOut;
pub use one_in_two_out::OneInTwoOut;
pub use two_in_one_out::TwoInOneOut;
pub use two_in_two_out::TwoInTwoOut;

use crate::error::{ConfigError, TemplateError};
use crate::network::Network;
use crate::types::NodeId;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

/// Wiring pattern of a candidate node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    sources: SmallVec<[NodeId; 2]>,
    targets: SmallVec<[NodeId; 2]>,
}

impl Position {
    pub fn new(
        sources: impl IntoIterator<Item = NodeId>,
        targets: impl IntoIterator<Item = NodeId>,
    ) -> Self {
        Self {
            sources: sources.into_iter().collect(),
            targets: targets.into_iter().collect(),
        }
    }

    /// Nodes that would point into the new node.
    pub fn sources(&self) -> &[NodeId] {
        &self.sources
    }

    /// Nodes the new node would point to.
    pub fn targets(&self) -> &[NodeId] {
        &self.targets
    }

    pub fn in_arity(&self) -> usize {
        self.sources.len()
    }

    pub fn out_arity(&self) -> usize {
        self.targets.len()
    }

    pub fn involves(&self, node: NodeId) -> bool {
        self.sources.contains(&node) || self.targets.contains(&node)
    }

    /// No endpoint appears twice across sources and targets.
    pub fn endpoints_distinct(&self) -> bool {
        let mut all: Vec<NodeId> = self.sources.iter().chain(self.targets.iter()).copied().collect();
        let len = all.len();
        all.sort_unstable();
        all.dedup();
        all.len() == len
    }

    /// Same wiring regardless of listing order.
    pub fn canonical(&self) -> (Vec<NodeId>, Vec<NodeId>) {
        let mut sources = self.sources.to_vec();
        let mut targets = self.targets.to_vec();
        sources.sort_unstable();
        targets.sort_unstable();
        (sources, targets)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let list = |nodes: &[NodeId]| {
            nodes.iter().map(ToString::to_string).collect::<Vec<_>>().join(",")
        };
        write!(f, "{{{}}} -> * -> {{{}}}", list(&self.sources), list(&self.targets))
    }
}

/// Positions pending between growth steps.
///
/// Positions are plain wiring records; they only become placeholder nodes
/// inside an [`Exploration`](crate::exploration::Exploration) built for a
/// single step.
#[derive(Debug, Clone, Default)]
pub struct AdjacentPossible {
    positions: Vec<Position>,
}

impl AdjacentPossible {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn get(&self, index: usize) -> Option<&Position> {
        self.positions.get(index)
    }

    pub fn extend(&mut self, positions: impl IntoIterator<Item = Position>) {
        self.positions.extend(positions);
    }

    /// Remove and return the position at `index`, keeping the order of the rest.
    pub fn take(&mut self, index: usize) -> Option<Position> {
        (index < self.positions.len()).then(|| self.positions.remove(index))
    }
}

/// Strategy enumerating candidate positions.
pub trait InsertionTemplate: Send + Sync + fmt::Debug {
    fn kind(&self) -> TemplateKind;

    /// Every wiring among `real` (ascending ids).
    fn enumerate_global(&self, real: &[NodeId]) -> Vec<Position>;

    /// Wirings involving `pivot`; `alters` are the other real nodes, ascending.
    fn enumerate_local(&self, pivot: NodeId, alters: &[NodeId]) -> Vec<Position>;

    /// Positions a step would add, without touching any state.
    ///
    /// `pending` is the number of positions already in the ledger; global
    /// mode requires it to be zero.
    fn enumerate(
        &self,
        real: &Network,
        pending: usize,
        pivot: Option<NodeId>,
    ) -> Result<Vec<Position>, TemplateError> {
        let nodes = real.nodes();
        match pivot {
            None => {
                if pending > 0 {
                    return Err(TemplateError::CandidatesPresent { count: pending });
                }
                Ok(self.enumerate_global(&nodes))
            }
            Some(pivot) => {
                if !real.contains_node(pivot) {
                    return Err(TemplateError::PivotNotReal(pivot));
                }
                let alters: Vec<NodeId> = nodes.into_iter().filter(|&n| n != pivot).collect();
                Ok(self.enumerate_local(pivot, &alters))
            }
        }
    }

    /// Append the new positions to the ledger; returns how many were added.
    fn update(
        &self,
        real: &Network,
        possible: &mut AdjacentPossible,
        pivot: Option<NodeId>,
    ) -> Result<usize, TemplateError> {
        let fresh = self.enumerate(real, possible.len(), pivot)?;
        let added = fresh.len();
        possible.extend(fresh);
        tracing::trace!(template = self.kind().name(), ?pivot, added, "adjacent possible updated");
        Ok(added)
    }
}

/// Closed set of insertion templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TemplateKind {
    #[default]
    #[serde(rename = "1in1out", alias = "i1o1")]
    OneInOneOut,
    #[serde(rename = "1in2out", alias = "i1o2")]
    OneInTwoOut,
    #[serde(rename = "2in1out", alias = "i2o1")]
    TwoInOneOut,
    #[serde(rename = "io3")]
    InOutThree,
    #[serde(rename = "2in2out", alias = "i2o2")]
    TwoInTwoOut,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 5] = [
        TemplateKind::OneInOneOut,
        TemplateKind::OneInTwoOut,
        TemplateKind::TwoInOneOut,
        TemplateKind::InOutThree,
        TemplateKind::TwoInTwoOut,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TemplateKind::OneInOneOut => "1in1out",
            TemplateKind::OneInTwoOut => "1in2out",
            TemplateKind::TwoInOneOut => "2in1out",
            TemplateKind::InOutThree => "io3",
            TemplateKind::TwoInTwoOut => "2in2out",
        }
    }

    /// Compact tag used in model labels.
    pub fn tag(self) -> &'static str {
        match self {
            TemplateKind::OneInOneOut => "i1o1",
            TemplateKind::OneInTwoOut => "i1o2",
            TemplateKind::TwoInOneOut => "i2o1",
            TemplateKind::InOutThree => "io3",
            TemplateKind::TwoInTwoOut => "i2o2",
        }
    }

    /// Smallest seed for which global mode yields at least one position.
    pub fn min_seed_size(self) -> usize {
        match self {
            TemplateKind::OneInOneOut => 2,
            TemplateKind::OneInTwoOut | TemplateKind::TwoInOneOut | TemplateKind::InOutThree => 3,
            TemplateKind::TwoInTwoOut => 4,
        }
    }

    pub fn build(self) -> Box<dyn InsertionTemplate> {
        match self {
            TemplateKind::OneInOneOut => Box::new(OneInOneOut),
            TemplateKind::OneInTwoOut => Box::new(OneInTwoOut),
            TemplateKind::TwoInOneOut => Box::new(TwoInOneOut),
            TemplateKind::InOutThree => Box::new(InOutThree),
            TemplateKind::TwoInTwoOut => Box::new(TwoInTwoOut),
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TemplateKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1in1out" | "i1o1" => Ok(TemplateKind::OneInOneOut),
            "1in2out" | "i1o2" => Ok(TemplateKind::OneInTwoOut),
            "2in1out" | "i2o1" => Ok(TemplateKind::TwoInOneOut),
            "io3" => Ok(TemplateKind::InOutThree),
            "2in2out" | "i2o2" => Ok(TemplateKind::TwoInTwoOut),
            other => Err(ConfigError::UnknownOption {
                option: "template",
                value: other.to_string(),
            }),
        }
    }
}

/// Unordered pairs `(a, b)` with `a` before `b` in `nodes`.
pub(crate) fn pairs(nodes: &[NodeId]) -> Vec<(NodeId, NodeId)> {
    let mut out = Vec::with_capacity(nodes.len() * nodes.len().saturating_sub(1) / 2);
    for (i, &a) in nodes.iter().enumerate() {
        for &b in &nodes[i + 1..] {
            out.push((a, b));
        }
    }
    out
}

/// Unordered triples in `nodes` order.
pub(crate) fn triples(nodes: &[NodeId]) -> Vec<(NodeId, NodeId, NodeId)> {
    let mut out = Vec::new();
    for (i, &a) in nodes.iter().enumerate() {
        for (j, &b) in nodes.iter().enumerate().skip(i + 1) {
            for &c in &nodes[j + 1..] {
                out.push((a, b, c));
            }
        }
    }
    out
}

/// `nodes` without the listed exclusions.
pub(crate) fn without(nodes: &[NodeId], excluded: &[NodeId]) -> Vec<NodeId> {
    nodes.iter().copied().filter(|n| !excluded.contains(n)).collect()
}

#[cfg(test)]
pub(crate) fn ids(range: std::ops::Range<usize>) -> Vec<NodeId> {
    range.map(NodeId).collect()
}
