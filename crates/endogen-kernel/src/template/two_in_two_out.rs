//! Two in-edges, two out-edges.

use super::{pairs, triples, without, InsertionTemplate, Position, TemplateKind};
use crate::types::NodeId;

/// Local mode yields six positions per alter triple: the pivot sits on the
/// source side (downstream) or the target side (upstream), paired with each
/// of the three alters in turn. The six wirings are pairwise distinct.
#[derive(Debug, Clone, Copy, Default)]
pub struct TwoInTwoOut;

impl InsertionTemplate for TwoInTwoOut {
    fn kind(&self) -> TemplateKind {
        TemplateKind::TwoInTwoOut
    }

    fn enumerate_global(&self, real: &[NodeId]) -> Vec<Position> {
        let mut out = Vec::new();
        for (s1, s2) in pairs(real) {
            let rest = without(real, &[s1, s2]);
            for (t1, t2) in pairs(&rest) {
                out.push(Position::new([s1, s2], [t1, t2]));
            }
        }
        out
    }

    fn enumerate_local(&self, pivot: NodeId, alters: &[NodeId]) -> Vec<Position> {
        let mut out = Vec::new();
        for (a1, a2, a3) in triples(alters) {
            let splits = [(a1, a2, a3), (a2, a1, a3), (a3, a1, a2)];
            for (partner, x, y) in splits {
                out.push(Position::new([pivot, partner], [x, y]));
            }
            for (partner, x, y) in splits {
                out.push(Position::new([x, y], [partner, pivot]));
            }
        }
        out
    }
}
