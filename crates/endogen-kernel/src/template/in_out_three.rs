//! Union of two-in/one-out and one-in/two-out.

use super::{pairs, without, InsertionTemplate, Position, TemplateKind};
use crate::types::NodeId;

/// Every candidate has three edges, split 2+1 or 1+2.
#[derive(Debug, Clone, Copy, Default)]
pub struct InOutThree;

impl InsertionTemplate for InOutThree {
    fn kind(&self) -> TemplateKind {
        TemplateKind::InOutThree
    }

    fn enumerate_global(&self, real: &[NodeId]) -> Vec<Position> {
        let mut out = Vec::new();
        for &hub in real {
            let others = without(real, &[hub]);
            for (a, b) in pairs(&others) {
                out.push(Position::new([a, b], [hub]));
                out.push(Position::new([hub], [a, b]));
            }
        }
        out
    }

    fn enumerate_local(&self, pivot: NodeId, alters: &[NodeId]) -> Vec<Position> {
        let mut out = Vec::new();
        for (a1, a2) in pairs(alters) {
            // downstream
            out.push(Position::new([pivot, a1], [a2]));
            out.push(Position::new([pivot], [a1, a2]));
            // upstream
            out.push(Position::new([a1, a2], [pivot]));
            out.push(Position::new([a1], [pivot, a2]));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::{ids, OneInTwoOut, TwoInOneOut};
    use std::collections::HashSet;

    #[test]
    fn local_is_union_of_both_templates() {
        let alters = ids(0..5);
        let pivot = NodeId(5);
        let union: HashSet<Position> = OneInTwoOut
            .enumerate_local(pivot, &alters)
            .into_iter()
            .chain(TwoInOneOut.enumerate_local(pivot, &alters))
            .collect();
        let mine: HashSet<Position> = InOutThree.enumerate_local(pivot, &alters).into_iter().collect();

        assert_eq!(mine.len(), 4 * 10);
        assert_eq!(mine, union);
    }

    #[test]
    fn global_count() {
        assert_eq!(InOutThree.enumerate_global(&ids(0..4)).len(), 2 * 4 * 3);
    }
}
