//! Error types for the growth kernel
//!
//! Each concern has its own enum; [`GrowthError`] aggregates them for the
//! engine's public surface.

use crate::types::{EngineState, NodeId};

/// Top-level error returned by the growth engine
#[derive(Debug, thiserror::Error)]
pub enum GrowthError {
    /// Graph store rejected an operation
    #[error("graph error: {0}")]
    Graph(#[from] GraphError),

    /// Insertion template precondition failed
    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    /// Scoring function failed
    #[error("scoring error: {0}")]
    Scoring(#[from] ScoringError),

    /// Selection policy failed
    #[error("selection error: {0}")]
    Selection(#[from] SelectionError),

    /// Invalid model configuration
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Engine lifecycle violated
    #[error("state machine error: {0}")]
    StateMachine(#[from] StateMachineError),

    /// Step log rejected an append
    #[error("log error: {0}")]
    Log(#[from] LogError),

    /// Requested size is below the current real node count
    #[error("invalid target size {target}: network already has {current} nodes")]
    InvalidTarget {
        /// Requested size
        target: usize,
        /// Real node count at the time of the call
        current: usize,
    },

    /// Invariant broken inside the engine
    #[error("internal error: {0}")]
    Internal(String),
}

impl GrowthError {
    /// Programmer errors: a precondition of the growth contract was broken.
    #[must_use]
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            Self::Template(_)
                | Self::StateMachine(_)
                | Self::InvalidTarget { .. }
                | Self::Selection(SelectionError::NoCandidates)
                | Self::Internal(_)
        )
    }

    /// Whether a later `grow` call can pick up from the last snapshot.
    #[must_use]
    pub fn is_resumable(&self) -> bool {
        matches!(self, Self::Scoring(_) | Self::Selection(_) | Self::InvalidTarget { .. })
    }
}

/// Graph store errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// Node is not part of the graph
    #[error("node {0} not found")]
    NodeNotFound(NodeId),

    /// Edge from a node to itself
    #[error("self loop on node {0}")]
    SelfLoop(NodeId),
}

/// Insertion template errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    /// Local update pivot is not a real node
    #[error("pivot {0} is not a real node")]
    PivotNotReal(NodeId),

    /// Global population attempted while candidates are pending
    #[error("global update requires an empty adjacent possible, found {count} pending positions")]
    CandidatesPresent {
        /// Pending positions in the ledger
        count: usize,
    },

    /// Position wired to a node outside the real network
    #[error("position references unknown node {0}")]
    UnknownEndpoint(NodeId),
}

/// Scoring function errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    /// Power iteration did not settle
    #[error("power iteration did not converge after {iterations} iterations")]
    NotConverged {
        /// Iterations performed
        iterations: usize,
    },

    /// Damping outside (0, 1]
    #[error("damping factor {0} outside (0, 1]")]
    InvalidDamping(f64),

    /// Candidate missing from its own scoring result
    #[error("candidate {0} missing from score map")]
    MissingCandidate(NodeId),
}

/// Selection policy errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SelectionError {
    /// Empty score map
    #[error("no candidates to select from")]
    NoCandidates,

    /// Score is NaN, infinite or negative
    #[error("invalid score {score} for candidate {node}")]
    InvalidScore {
        /// Offending candidate
        node: NodeId,
        /// Offending score
        score: f64,
    },

    /// Sampler refused the weights
    #[error("sampling failed: {0}")]
    Sampling(String),
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Seed too small for the chosen template
    #[error("initial size {size} below minimum {minimum} for template {template}")]
    InitialSizeTooSmall {
        /// Requested seed size
        size: usize,
        /// Minimum seed size
        minimum: usize,
        /// Template name
        template: &'static str,
    },

    /// Damping outside (0, 1]
    #[error("damping factor {0} outside (0, 1]")]
    InvalidDamping(f64),

    /// Exponent not usable for the chosen policy
    #[error("invalid gamma {gamma} for {policy} selection")]
    InvalidGamma {
        /// Policy name
        policy: &'static str,
        /// Offending exponent
        gamma: f64,
    },

    /// Unknown option value
    #[error("unknown {option} '{value}'")]
    UnknownOption {
        /// Option name
        option: &'static str,
        /// Offending value
        value: String,
    },

    /// Config file could not be parsed
    #[error("parse error: {0}")]
    Parse(String),

    /// Config file could not be read
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Engine lifecycle errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateMachineError {
    /// Transition not in the allowed matrix
    #[error("illegal transition {from:?} -> {to:?}")]
    IllegalTransition {
        /// Current state
        from: EngineState,
        /// Requested state
        to: EngineState,
    },
}

/// Step log errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LogError {
    /// Records must be appended in step order
    #[error("expected step {expected}, got {actual}")]
    OutOfOrder {
        /// Next expected step
        expected: usize,
        /// Step that was offered
        actual: usize,
    },

    /// Hash chain broken
    #[error("hash chain broken at step {0}")]
    IntegrityViolation(usize),
}
