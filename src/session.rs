//! Session: one site's view of a shared document
//!
//! A session ties the replicated [`Sequence`] to the things around it:
//! - Local edits arrive as diff spans and become operations
//! - Outgoing operations are encoded and handed to a [`Broadcaster`]
//! - Incoming payloads are decoded and gated through the [`PendingBuffer`]
//!
//! Timers, debouncing and the diff algorithm itself belong to the host.

use crate::config::SessionConfig;
use crate::crdt::woot::{
    DrainReport, IdentifierGenerator, IntegrationStats, Operation, PendingBuffer, Sequence, SiteId,
};
use crate::error::{Result, WootError};
use crate::protocol;
use crate::sites::SiteAllocator;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use unicode_segmentation::UnicodeSegmentation;

/// One span of diff output between the last known text and the new text
///
/// Serialized as `{"kind": "equal", "text": "..."}` for hosts that run the
/// diff outside Rust.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum DiffSpan {
    /// Text present in both versions
    Equal(String),
    /// Text removed from the old version
    Delete(String),
    /// Text added in the new version
    Insert(String),
}

/// Outbound side of the broadcast channel
pub trait Broadcaster {
    /// Fire-and-forget delivery of `payload` to every other site
    fn broadcast(&mut self, topic: &str, payload: String);
}

/// Outcome of handling one inbound payload
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReceiveReport {
    /// Messages in the payload that failed to decode
    pub rejected: usize,
    pub drain: DrainReport,
}

/// A site's editing session
///
/// # Example
///
/// ```rust
/// use woot_core::{DiffSpan, Session};
///
/// let mut alice = Session::new(1).unwrap();
/// let mut bob = Session::new(2).unwrap();
///
/// let ops = alice.insert_text(0, "hello").unwrap();
/// bob.receive_batch(ops);
///
/// // "hello" -> "help"
/// let ops = bob
///     .apply_diff(vec![
///         DiffSpan::Equal("hel".into()),
///         DiffSpan::Delete("lo".into()),
///         DiffSpan::Insert("p".into()),
///     ])
///     .unwrap();
/// alice.receive_batch(ops);
///
/// assert_eq!(alice.text(), "help");
/// assert_eq!(bob.text(), "help");
/// ```
#[derive(Debug, Clone)]
pub struct Session {
    sequence: Sequence,
    pending: PendingBuffer,
    config: SessionConfig,
    stats: IntegrationStats,
    rejected: usize,
}

impl Session {
    /// Start a session for `site` with the default config
    pub fn new(site: SiteId) -> Result<Self> {
        Self::with_config(site, SessionConfig::default())
    }

    /// Start a session for `site`
    ///
    /// # Errors
    ///
    /// Returns `WootError::InvalidSite` for negative sites, which are reserved
    /// for the sentinels.
    pub fn with_config(site: SiteId, config: SessionConfig) -> Result<Self> {
        if site < 0 {
            return Err(WootError::InvalidSite(site));
        }

        Ok(Self {
            sequence: Sequence::new(IdentifierGenerator::new(site)),
            pending: PendingBuffer::new(),
            config,
            stats: IntegrationStats::default(),
            rejected: 0,
        })
    }

    /// Ask the numbering authority for a site id and start a session with it
    pub fn join<A: SiteAllocator + ?Sized>(allocator: &A, config: SessionConfig) -> Result<Self> {
        let site = allocator.allocate();
        debug!(site, "joined document");
        Self::with_config(site, config)
    }

    pub fn site(&self) -> SiteId {
        self.sequence.site()
    }

    /// Visible document text
    pub fn text(&self) -> String {
        self.sequence.visible_text()
    }

    /// Visible length in glyphs
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Operations waiting for their dependencies
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Integration work accumulated so far (only with `record_stats`)
    pub fn stats(&self) -> IntegrationStats {
        self.stats
    }

    /// Inbound messages rejected by the decoder so far
    pub fn rejected(&self) -> usize {
        self.rejected
    }

    /// Insert `text` so that its first glyph lands at visible `position`
    ///
    /// Produces one insert per grapheme cluster.
    pub fn insert_text(&mut self, position: usize, text: &str) -> Result<Vec<Operation>> {
        let length = self.len();
        if position > length {
            return Err(WootError::PositionOutOfBounds { position, length });
        }

        text.graphemes(true)
            .enumerate()
            .map(|(offset, glyph)| self.sequence.generate_insert(glyph, position + offset))
            .collect()
    }

    /// Delete `len` visible glyphs starting at `position`
    pub fn delete_range(&mut self, position: usize, len: usize) -> Result<Vec<Operation>> {
        let length = self.len();
        let end = position.saturating_add(len);
        if end > length {
            return Err(WootError::RangeOutOfBounds {
                start: position,
                end,
                length,
            });
        }

        (0..len)
            .map(|_| self.sequence.generate_delete(position))
            .collect()
    }

    /// Turn diff output into operations, integrating each one locally
    ///
    /// The spans must describe the current visible text: the glyphs covered
    /// by `Equal` and `Delete` spans must add up to `len()`. Nothing is
    /// generated if they do not.
    pub fn apply_diff<I>(&mut self, spans: I) -> Result<Vec<Operation>>
    where
        I: IntoIterator<Item = DiffSpan>,
    {
        let spans: Vec<DiffSpan> = spans.into_iter().collect();

        let covered: usize = spans
            .iter()
            .map(|span| match span {
                DiffSpan::Equal(text) | DiffSpan::Delete(text) => text.graphemes(true).count(),
                DiffSpan::Insert(_) => 0,
            })
            .sum();
        let length = self.len();
        if covered != length {
            return Err(WootError::RangeOutOfBounds {
                start: 0,
                end: covered,
                length,
            });
        }

        let mut ops = Vec::new();
        let mut cursor = 0;
        for span in &spans {
            match span {
                DiffSpan::Equal(text) => cursor += text.graphemes(true).count(),
                DiffSpan::Delete(text) => {
                    // The cursor stays put: the next glyph slides into place
                    for _ in text.graphemes(true) {
                        ops.push(self.sequence.generate_delete(cursor)?);
                    }
                }
                DiffSpan::Insert(text) => {
                    for glyph in text.graphemes(true) {
                        ops.push(self.sequence.generate_insert(glyph, cursor)?);
                        cursor += 1;
                    }
                }
            }
        }

        debug!(site = self.site(), operations = ops.len(), "applied local diff");
        Ok(ops)
    }

    /// Hand one remote operation to the pending buffer
    pub fn receive(&mut self, op: Operation) -> DrainReport {
        let report = self.pending.submit(op, &mut self.sequence);
        self.after_drain(&report);
        report
    }

    /// Hand a batch of remote operations to the pending buffer
    pub fn receive_batch<I>(&mut self, ops: I) -> DrainReport
    where
        I: IntoIterator<Item = Operation>,
    {
        let report = self.pending.submit_batch(ops, &mut self.sequence);
        self.after_drain(&report);
        report
    }

    /// Decode an inbound payload and integrate what is ready
    ///
    /// Messages that fail to decode are logged and skipped; the rest of the
    /// batch is still processed.
    ///
    /// # Errors
    ///
    /// Returns `WootError::Decode` only when the payload as a whole is not an
    /// operation or an array of operations.
    pub fn receive_payload(&mut self, payload: &str) -> Result<ReceiveReport> {
        let decoded = protocol::decode_batch(payload)?;

        let mut rejected = 0;
        let mut ops = Vec::with_capacity(decoded.len());
        for result in decoded {
            match result {
                Ok(op) => ops.push(op),
                Err(err) => {
                    warn!(site = self.site(), error = %err, "rejecting inbound message");
                    rejected += 1;
                }
            }
        }
        self.rejected += rejected;

        Ok(ReceiveReport {
            rejected,
            drain: self.receive_batch(ops),
        })
    }

    /// Encode `ops` and send them on the configured topic
    pub fn publish<B: Broadcaster + ?Sized>(&self, ops: &[Operation], channel: &mut B) -> Result<()> {
        if ops.is_empty() {
            return Ok(());
        }

        let payload = protocol::encode_batch(ops)?;
        channel.broadcast(&self.config.topic, payload);
        Ok(())
    }

    fn after_drain(&mut self, report: &DrainReport) {
        if self.config.record_stats {
            self.stats.accumulate(&report.stats);
        }
        if report.pending > self.config.pending_warn_threshold {
            warn!(
                site = self.site(),
                pending = report.pending,
                threshold = self.config.pending_warn_threshold,
                "pending buffer is growing; dependencies may be missing"
            );
        }
    }
}
