//! Pending-operation buffering and causal readiness.

use super::operation::Operation;
use super::sequence::{IntegrationStats, Sequence};
use tracing::{debug, warn};

/// Outcome of draining the pending buffer into a sequence
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// Operations applied to the sequence
    pub integrated: usize,
    /// Inserts discarded because the character was already present
    pub duplicates: usize,
    /// Operations that violated the integration contract and were discarded
    pub dropped: usize,
    /// Operations still waiting for their dependencies
    pub pending: usize,
    /// Work performed by the integrated inserts
    pub stats: IntegrationStats,
}

/// Operations received before the characters they reference
///
/// Operations are kept in arrival order. Every drain re-scans the whole
/// buffer until a pass makes no progress, so an operation whose dependency
/// sits later in the same batch is still picked up.
#[derive(Debug, Clone, Default)]
pub struct PendingBuffer {
    ops: Vec<Operation>,
}

impl PendingBuffer {
    pub fn new() -> Self {
        Self { ops: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Buffer an operation and integrate everything that became ready
    pub fn submit(&mut self, op: Operation, sequence: &mut Sequence) -> DrainReport {
        self.ops.push(op);
        self.drain(sequence)
    }

    /// Buffer a batch of operations, then drain once
    pub fn submit_batch<I>(&mut self, ops: I, sequence: &mut Sequence) -> DrainReport
    where
        I: IntoIterator<Item = Operation>,
    {
        self.ops.extend(ops);
        self.drain(sequence)
    }

    /// Integrate buffered operations until a full pass makes no progress
    ///
    /// Never fails: operations that are not ready stay buffered, operations
    /// that break the integration contract are logged and discarded.
    pub fn drain(&mut self, sequence: &mut Sequence) -> DrainReport {
        let mut report = DrainReport::default();

        loop {
            let mut progressed = false;

            for op in std::mem::take(&mut self.ops) {
                if !sequence.is_integrable(&op) {
                    self.ops.push(op);
                    continue;
                }
                progressed = true;

                let target = op.target();
                if op.is_insert() && sequence.contains(&target) {
                    debug!(%target, "discarding duplicate insert");
                    report.duplicates += 1;
                    continue;
                }

                match sequence.integrate(op) {
                    Ok(stats) => {
                        report.integrated += 1;
                        report.stats.accumulate(&stats);
                    }
                    Err(err) => {
                        warn!(%target, error = %err, "dropping operation that failed to integrate");
                        report.dropped += 1;
                    }
                }
            }

            if !progressed {
                break;
            }
        }

        report.pending = self.ops.len();
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crdt::woot::{Character, Identifier, IdentifierGenerator};

    fn typed(site: i64, text: &str) -> (Sequence, Vec<Operation>) {
        let mut seq = Sequence::new(IdentifierGenerator::new(site));
        let ops = text
            .chars()
            .enumerate()
            .map(|(i, c)| seq.generate_insert(&c.to_string(), i).unwrap())
            .collect();
        (seq, ops)
    }

    #[test]
    fn test_ready_operation_integrates_immediately() {
        let (_, ops) = typed(1, "a");
        let mut seq = Sequence::new(IdentifierGenerator::new(2));
        let mut buffer = PendingBuffer::new();

        let report = buffer.submit(ops[0].clone(), &mut seq);

        assert_eq!(report.integrated, 1);
        assert_eq!(report.pending, 0);
        assert!(buffer.is_empty());
        assert_eq!(seq.visible_text(), "a");
    }

    #[test]
    fn test_waits_for_missing_bounds() {
        let (_, ops) = typed(1, "abc");
        let mut seq = Sequence::new(IdentifierGenerator::new(2));
        let mut buffer = PendingBuffer::new();

        // "c" names "b" as previous; neither "a" nor "b" has arrived
        let report = buffer.submit(ops[2].clone(), &mut seq);
        assert_eq!(report.integrated, 0);
        assert_eq!(report.pending, 1);
        assert_eq!(seq.visible_text(), "");

        buffer.submit(ops[0].clone(), &mut seq);
        assert_eq!(seq.visible_text(), "a");
        assert_eq!(buffer.len(), 1);

        let report = buffer.submit(ops[1].clone(), &mut seq);
        assert_eq!(report.integrated, 2);
        assert!(buffer.is_empty());
        assert_eq!(seq.visible_text(), "abc");
    }

    #[test]
    fn test_reversed_batch_reaches_fixed_point() {
        let (_, mut ops) = typed(1, "hello");
        ops.reverse();
        let mut seq = Sequence::new(IdentifierGenerator::new(2));
        let mut buffer = PendingBuffer::new();

        let report = buffer.submit_batch(ops, &mut seq);

        assert_eq!(report.integrated, 5);
        assert_eq!(report.pending, 0);
        assert_eq!(seq.visible_text(), "hello");
    }

    #[test]
    fn test_delete_for_unknown_character_is_not_forced() {
        let (mut origin, ops) = typed(1, "ab");
        let delete = origin.generate_delete(1).unwrap();
        let mut seq = Sequence::new(IdentifierGenerator::new(2));
        let mut buffer = PendingBuffer::new();

        let report = buffer.submit(delete, &mut seq);
        assert_eq!(report.pending, 1);
        assert_eq!(report.dropped, 0);

        buffer.submit_batch(ops, &mut seq);
        assert!(buffer.is_empty());
        assert_eq!(seq.visible_text(), "a");
    }

    #[test]
    fn test_duplicates_discarded() {
        let (_, ops) = typed(1, "ab");
        let mut seq = Sequence::new(IdentifierGenerator::new(2));
        let mut buffer = PendingBuffer::new();

        buffer.submit_batch(ops.clone(), &mut seq);
        let report = buffer.submit_batch(ops, &mut seq);

        assert_eq!(report.integrated, 0);
        assert_eq!(report.duplicates, 2);
        assert_eq!(seq.visible_text(), "ab");
    }

    #[test]
    fn test_contract_violation_dropped_without_corruption() {
        let mut seq = Sequence::new(IdentifierGenerator::new(2));
        let mut buffer = PendingBuffer::new();
        let reversed = Operation::insert(Character::new(
            Identifier::new(1, 1),
            "z",
            Identifier::END,
            Identifier::BEGIN,
        ));

        let report = buffer.submit(reversed, &mut seq);

        assert_eq!(report.dropped, 1);
        assert!(buffer.is_empty());
        assert_eq!(seq.total_len(), 2);
    }
}
