//! Endogenous growth of directed networks over the adjacent possible.
//!
//! A seed network grows one node at a time. Each step enumerates the wiring
//! patterns a new node could take (the adjacent possible), scores a
//! placeholder for each inside a throwaway overlay, samples one through a
//! selection policy and joins a real node wired exactly like it.
//!
//! ```no_run
//! use endogen_kernel::{GrowthEngine, ModelConfig, SelectKind, TemplateKind};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let config = ModelConfig::new()
//!     .with_template(TemplateKind::OneInTwoOut)
//!     .with_select(SelectKind::Softmax { gamma: 4.0 });
//! let mut engine = GrowthEngine::new(config)?;
//! engine.grow(50, &mut StdRng::seed_from_u64(7))?;
//! # Ok::<(), endogen_kernel::GrowthError>(())
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod exploration;
pub mod logging;
pub mod network;
pub mod score;
pub mod select;
pub mod snapshot;
pub mod state_machine;
pub mod template;
pub mod test_harness;
pub mod types;

pub use config::ModelConfig;
pub use engine::{GrowthEngine, StepOutcome};
pub use error::*;
pub use network::{Network, SeedTopology, SCORE_ATTRIBUTE};
pub use score::{ScoreFunction, ScoreKind, ScoreMap};
pub use select::{Distribution, SelectKind, SelectionPolicy};
pub use snapshot::{Snapshot, SnapshotRecord};
pub use template::{AdjacentPossible, InsertionTemplate, Position, TemplateKind};
pub use types::*;

/// Re-export test harness for external use
pub use test_harness::{run_simulator, SimulatorConfig, TestHarness};
