//! Immutable views of the network after each step.

use crate::network::{Network, SCORE_ATTRIBUTE};
use crate::types::NodeId;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::io::Write;
use std::sync::Arc;

/// Scored copy of the real network at one point of the growth run.
#[derive(Debug, Clone)]
pub struct Snapshot {
    network: Network,
    fingerprint: String,
}

impl Snapshot {
    /// Freeze `network`. Scores are read from its `score` attribute.
    pub fn new(network: Network) -> Self {
        let fingerprint = fingerprint(&network);
        Self {
            network,
            fingerprint,
        }
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn node_count(&self) -> usize {
        self.network.node_count()
    }

    pub fn score(&self, node: NodeId) -> Option<f64> {
        self.network.node_attribute(SCORE_ATTRIBUTE, node)
    }

    /// Hex sha256 over the sorted node and edge sets.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn to_record(&self, step: usize) -> SnapshotRecord {
        SnapshotRecord {
            step,
            fingerprint: self.fingerprint.clone(),
            nodes: self
                .network
                .nodes()
                .into_iter()
                .map(|id| NodeRecord {
                    id,
                    score: self.score(id),
                })
                .collect(),
            edges: self.network.edges().into_iter().map(|(u, v)| [u, v]).collect(),
        }
    }
}

fn fingerprint(network: &Network) -> String {
    let mut hasher = Sha256::new();
    for node in network.nodes() {
        hasher.update(node.index().to_le_bytes());
    }
    hasher.update([0xff]);
    for (u, v) in network.edges() {
        hasher.update(u.index().to_le_bytes());
        hasher.update(v.index().to_le_bytes());
    }
    hex::encode(hasher.finalize())
}

/// One line of the JSON Lines export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    pub step: usize,
    pub fingerprint: String,
    pub nodes: Vec<NodeRecord>,
    pub edges: Vec<[NodeId; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: NodeId,
    pub score: Option<f64>,
}

/// Write one record per snapshot, indexed by position in the sequence.
pub fn write_jsonl<W: Write>(mut writer: W, snapshots: &[Arc<Snapshot>]) -> std::io::Result<()> {
    for (step, snapshot) in snapshots.iter().enumerate() {
        serde_json::to_writer(&mut writer, &snapshot.to_record(step))?;
        writer.write_all(b"\n")?;
    }
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::SeedTopology;

    #[test]
    fn fingerprint_ignores_scores() {
        let plain = SeedTopology::Cycle.build(3).unwrap();
        let mut scored = plain.clone();
        scored.set_node_attributes(SCORE_ATTRIBUTE, &[(NodeId(0), 1.0)].into_iter().collect());
        assert_eq!(Snapshot::new(plain).fingerprint(), Snapshot::new(scored).fingerprint());
    }

    #[test]
    fn fingerprint_sees_edge_direction() {
        let a = SeedTopology::Cycle.build(3).unwrap();
        let mut b = Network::new();
        let n: Vec<_> = (0..3).map(|_| b.add_node()).collect();
        b.add_edge(n[1], n[0]).unwrap();
        b.add_edge(n[2], n[1]).unwrap();
        b.add_edge(n[0], n[2]).unwrap();
        assert_ne!(Snapshot::new(a).fingerprint(), Snapshot::new(b).fingerprint());
    }

    #[test]
    fn jsonl_has_one_line_per_snapshot() {
        let snap = Arc::new(Snapshot::new(SeedTopology::OutStar.build(3).unwrap()));
        let mut out = Vec::new();
        write_jsonl(&mut out, &[snap.clone(), snap]).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let second: SnapshotRecord = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second.step, 1);
        assert_eq!(second.edges, vec![[NodeId(0), NodeId(1)], [NodeId(0), NodeId(2)]]);
    }
}
