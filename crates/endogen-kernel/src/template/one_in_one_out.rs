//! One in-edge, one out-edge.

use super::{InsertionTemplate, Position, TemplateKind};
use crate::types::NodeId;

/// `s -> * -> t` for every ordered pair of distinct real nodes.
#[derive(Debug, Clone, Copy, Default)]
pub struct OneInOneOut;

impl InsertionTemplate for OneInOneOut {
    fn kind(&self) -> TemplateKind {
        TemplateKind::OneInOneOut
    }

    fn enumerate_global(&self, real: &[NodeId]) -> Vec<Position> {
        let mut out = Vec::with_capacity(real.len() * real.len().saturating_sub(1));
        for &source in real {
            for &target in real {
                if source != target {
                    out.push(Position::new([source], [target]));
                }
            }
        }
        out
    }

    fn enumerate_local(&self, pivot: NodeId, alters: &[NodeId]) -> Vec<Position> {
        let mut out = Vec::with_capacity(2 * alters.len());
        for &alter in alters {
            // downstream
            out.push(Position::new([pivot], [alter]));
            // upstream
            out.push(Position::new([alter], [pivot]));
        }
        out
    }
}
