//! One in-edge, two out-edges.

use super::{pairs, without, InsertionTemplate, Position, TemplateKind};
use crate::types::NodeId;

#[derive(Debug, Clone, Copy, Default)]
pub struct OneInTwoOut;

impl InsertionTemplate for OneInTwoOut {
    fn kind(&self) -> TemplateKind {
        TemplateKind::OneInTwoOut
    }

    fn enumerate_global(&self, real: &[NodeId]) -> Vec<Position> {
        let mut out = Vec::new();
        for &source in real {
            let targets = without(real, &[source]);
            for (t1, t2) in pairs(&targets) {
                out.push(Position::new([source], [t1, t2]));
            }
        }
        out
    }

    fn enumerate_local(&self, pivot: NodeId, alters: &[NodeId]) -> Vec<Position> {
        let mut out = Vec::new();
        for (a1, a2) in pairs(alters) {
            // downstream: the pivot feeds both alters
            out.push(Position::new([pivot], [a1, a2]));
            // upstream: the first alter feeds the pivot and the second alter
            out.push(Position::new([a1], [pivot, a2]));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::ids;

    #[test]
    fn local_count_is_twice_pairs() {
        let positions = OneInTwoOut.enumerate_local(NodeId(5), &ids(0..5));
        assert_eq!(positions.len(), 2 * 10);
        assert!(positions.iter().all(|p| p.in_arity() == 1 && p.out_arity() == 2));
        assert!(positions.iter().all(Position::endpoints_distinct));
    }

    #[test]
    fn global_count() {
        // m * C(m-1, 2) with m = 4
        assert_eq!(OneInTwoOut.enumerate_global(&ids(0..4)).len(), 12);
    }

    #[test]
    fn upstream_wiring() {
        let positions = OneInTwoOut.enumerate_local(NodeId(3), &[NodeId(0), NodeId(1)]);
        assert_eq!(
            positions,
            vec![
                Position::new([NodeId(3)], [NodeId(0), NodeId(1)]),
                Position::new([NodeId(0)], [NodeId(3), NodeId(1)]),
            ]
        );
    }
}
