//! Hash-chained record of growth steps.

use crate::error::LogError;
use crate::template::Position;
use crate::types::{NodeId, RunId};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    /// Index of the snapshot this step produced; equals the joined node id.
    pub step: usize,
    pub node: NodeId,
    pub position: Position,
    /// Size of the adjacent possible the node was drawn from.
    pub candidates: usize,
    /// Exploration score of the chosen candidate.
    pub score: f64,
    pub fingerprint: String,
    pub prev_hash: [u8; 32],
    pub hash: [u8; 32],
}

impl StepRecord {
    pub fn new(
        step: usize,
        node: NodeId,
        position: Position,
        candidates: usize,
        score: f64,
        fingerprint: String,
    ) -> Self {
        Self {
            step,
            node,
            position,
            candidates,
            score,
            fingerprint,
            prev_hash: [0u8; 32],
            hash: [0u8; 32],
        }
    }
}

/// Append-only step log. Each record commits to its predecessor's hash.
#[derive(Debug, Clone)]
pub struct StepLog {
    run_id: RunId,
    first_step: usize,
    records: Vec<StepRecord>,
}

impl StepLog {
    pub fn new(run_id: RunId, first_step: usize) -> Self {
        Self {
            run_id,
            first_step,
            records: Vec::new(),
        }
    }

    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    pub fn next_step(&self) -> usize {
        self.first_step + self.records.len()
    }

    /// Seal and append `record`. Nothing is stored when the step is out of
    /// order.
    pub fn append(&mut self, mut record: StepRecord) -> Result<&StepRecord, LogError> {
        let expected = self.next_step();
        if record.step != expected {
            return Err(LogError::OutOfOrder {
                expected,
                actual: record.step,
            });
        }
        record.prev_hash = self.head();
        record.hash = compute_hash(self.run_id, &record);
        self.records.push(record);
        Ok(&self.records[self.records.len() - 1])
    }

    /// Hash of the latest record, zeroes when empty.
    pub fn head(&self) -> [u8; 32] {
        self.records.last().map_or([0u8; 32], |r| r.hash)
    }

    pub fn records(&self) -> &[StepRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn verify_integrity(&self) -> Result<(), LogError> {
        let mut prev = [0u8; 32];
        for r in &self.records {
            if r.prev_hash != prev || r.hash != compute_hash(self.run_id, r) {
                return Err(LogError::IntegrityViolation(r.step));
            }
            prev = r.hash;
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn records_mut(&mut self) -> &mut Vec<StepRecord> {
        &mut self.records
    }
}

fn compute_hash(run_id: RunId, record: &StepRecord) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(run_id.0.as_bytes());
    hasher.update(record.step.to_le_bytes());
    hasher.update(record.node.index().to_le_bytes());
    for n in record.position.sources() {
        hasher.update(n.index().to_le_bytes());
    }
    hasher.update([0]);
    for n in record.position.targets() {
        hasher.update(n.index().to_le_bytes());
    }
    hasher.update([0]);
    hasher.update(record.candidates.to_le_bytes());
    hasher.update(record.score.to_bits().to_le_bytes());
    hasher.update(record.fingerprint.as_bytes());
    hasher.update([0]);
    hasher.update(record.prev_hash);
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(step: usize) -> StepRecord {
        StepRecord::new(
            step,
            NodeId(step),
            Position::new([NodeId(0)], [NodeId(1)]),
            4,
            0.25,
            format!("fp-{step}"),
        )
    }

    #[test]
    fn chain_links_records() {
        let mut log = StepLog::new(RunId::new(), 3);
        let first = log.append(record(3)).unwrap().hash;
        let second = log.append(record(4)).unwrap();
        assert_eq!(second.prev_hash, first);
        assert!(log.verify_integrity().is_ok());
    }

    #[test]
    fn rejects_out_of_order_step() {
        let mut log = StepLog::new(RunId::new(), 3);
        assert_eq!(
            log.append(record(5)).unwrap_err(),
            LogError::OutOfOrder { expected: 3, actual: 5 }
        );
        assert!(log.is_empty());
    }

    #[test]
    fn tampering_is_detected() {
        let mut log = StepLog::new(RunId::new(), 3);
        log.append(record(3)).unwrap();
        log.append(record(4)).unwrap();
        log.records_mut()[0].candidates = 99;
        assert_eq!(log.verify_integrity(), Err(LogError::IntegrityViolation(3)));
    }
}
