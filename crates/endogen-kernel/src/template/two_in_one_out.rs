//! Two in-edges, one out-edge.

use super::{pairs, without, InsertionTemplate, Position, TemplateKind};
use crate::types::NodeId;

#[derive(Debug, Clone, Copy, Default)]
pub struct TwoInOneOut;

impl InsertionTemplate for TwoInOneOut {
    fn kind(&self) -> TemplateKind {
        TemplateKind::TwoInOneOut
    }

    fn enumerate_global(&self, real: &[NodeId]) -> Vec<Position> {
        let mut out = Vec::new();
        for &target in real {
            let sources = without(real, &[target]);
            for (s1, s2) in pairs(&sources) {
                out.push(Position::new([s1, s2], [target]));
            }
        }
        out
    }

    fn enumerate_local(&self, pivot: NodeId, alters: &[NodeId]) -> Vec<Position> {
        let mut out = Vec::new();
        for (a1, a2) in pairs(alters) {
            // downstream: pivot and first alter feed the second alter
            out.push(Position::new([pivot, a1], [a2]));
            // upstream: both alters feed the pivot
            out.push(Position::new([a1, a2], [pivot]));
        }
        out
    }
}
