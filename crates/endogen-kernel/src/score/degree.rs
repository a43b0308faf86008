use super::{ScoreFunction, ScoreKind, ScoreMap};
use crate::error::ScoringError;
use crate::network::Network;

/// Degree centrality: `(in + out) / (n - 1)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DegreeCentrality;

impl ScoreFunction for DegreeCentrality {
    fn kind(&self) -> ScoreKind {
        ScoreKind::Degree
    }

    fn score(&self, graph: &Network) -> Result<ScoreMap, ScoringError> {
        let nodes = graph.nodes();
        if nodes.len() <= 1 {
            return Ok(nodes.into_iter().map(|node| (node, 1.0)).collect());
        }

        let denom = (nodes.len() - 1) as f64;
        Ok(nodes
            .into_iter()
            .map(|node| {
                let degree = graph.in_degree(node) + graph.out_degree(node);
                (node, degree as f64 / denom)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::SeedTopology;
    use crate::types::NodeId;

    #[test]
    fn hub_of_star_has_full_degree() {
        let g = SeedTopology::OutStar.build(5).unwrap();
        let scores = DegreeCentrality.score(&g).unwrap();
        assert!((scores[&NodeId(0)] - 1.0).abs() < f64::EPSILON);
        assert!((scores[&NodeId(4)] - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn single_node_scores_one() {
        let g = SeedTopology::Cycle.build(1).unwrap();
        let scores = DegreeCentrality.score(&g).unwrap();
        assert_eq!(scores.get(&NodeId(0)), Some(&1.0));
    }
}
