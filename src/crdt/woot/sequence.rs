//! Sequence: The replicated string and its integration engine
//!
//! This module owns the WOOT integration algorithm:
//! - Identifier minting for local inserts
//! - Causal readiness checks for remote operations
//! - Deterministic placement of concurrently inserted characters
//! - Tombstone deletion and the visible projection

use super::character::Character;
use super::id::{Identifier, IdentifierGenerator, SiteId};
use super::operation::Operation;
use crate::error::{Result, WootError};
use std::collections::HashMap;
use tracing::{debug, trace};

/// Work performed while integrating a single insert
///
/// `rounds` counts how many times the gap was narrowed (1 when the bounds were
/// already adjacent), `scanned` how many characters were inspected while
/// building contention sets, and `walked` how many contenders were passed over
/// by the identifier walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntegrationStats {
    pub rounds: usize,
    pub scanned: usize,
    pub walked: usize,
}

impl IntegrationStats {
    /// Add another integration's counters to this one
    pub fn accumulate(&mut self, other: &IntegrationStats) {
        self.rounds += other.rounds;
        self.scanned += other.scanned;
        self.walked += other.walked;
    }
}

/// WOOT replicated sequence
///
/// Characters are kept in a `Vec` in the total order every site agrees on,
/// bounded by the BEGIN and END sentinels. Deleted characters stay in place
/// as tombstones. A `HashMap` from identifier to position gives O(1)
/// membership and lookup; it is shifted in place on every insertion.
///
/// # Example
///
/// ```rust
/// use woot_core::crdt::woot::{IdentifierGenerator, Sequence};
///
/// let mut site1 = Sequence::new(IdentifierGenerator::new(1));
/// let mut site2 = Sequence::new(IdentifierGenerator::new(2));
///
/// // Concurrent inserts at the same position
/// let op1 = site1.generate_insert("a", 0).unwrap();
/// let op2 = site2.generate_insert("b", 0).unwrap();
///
/// site1.integrate(op2).unwrap();
/// site2.integrate(op1).unwrap();
///
/// // Both replicas converge, ordered by identifier
/// assert_eq!(site1.visible_text(), "ab");
/// assert_eq!(site2.visible_text(), "ab");
/// ```
#[derive(Debug, Clone)]
pub struct Sequence {
    /// Every character ever integrated, in sequence order
    chars: Vec<Character>,

    /// Identifier -> position in `chars`
    index: HashMap<Identifier, usize>,

    /// Mints identifiers for locally generated inserts
    generator: IdentifierGenerator,

    /// Visible characters, sentinels excluded
    visible_len: usize,
}

impl Sequence {
    /// Create an empty sequence (`[BEGIN, END]`) for the generator's site
    pub fn new(generator: IdentifierGenerator) -> Self {
        let begin = Character::begin();
        let end = Character::end();

        let mut index = HashMap::new();
        index.insert(begin.id, 0);
        index.insert(end.id, 1);

        Self {
            chars: vec![begin, end],
            index,
            generator,
            visible_len: 0,
        }
    }

    /// Site this sequence generates operations for
    pub fn site(&self) -> SiteId {
        self.generator.site()
    }

    /// Number of visible characters
    pub fn len(&self) -> usize {
        self.visible_len
    }

    pub fn is_empty(&self) -> bool {
        self.visible_len == 0
    }

    /// Number of stored characters, tombstones and sentinels included
    pub fn total_len(&self) -> usize {
        self.chars.len()
    }

    /// Iterate over every stored character in sequence order
    pub fn iter(&self) -> impl Iterator<Item = &Character> {
        self.chars.iter()
    }

    /// O(1) membership check, visible or not
    pub fn contains(&self, id: &Identifier) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, id: &Identifier) -> Option<&Character> {
        self.index.get(id).map(|&pos| &self.chars[pos])
    }

    /// Position of a character in the full order (BEGIN is 0)
    pub fn position_of(&self, id: &Identifier) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// The `n`th visible character, counting BEGIN as 0 and END as `len() + 1`
    fn ith_visible(&self, n: usize) -> Option<&Character> {
        self.chars.iter().filter(|ch| ch.visible).nth(n)
    }

    fn require(&self, id: &Identifier) -> Result<usize> {
        self.position_of(id)
            .ok_or(WootError::MissingIdentifier(*id))
    }

    /// Insert a glyph so that it becomes visible position `position`
    ///
    /// The new character is bounded by the visible characters currently at
    /// `position - 1` and `position` (BEGIN and END at the edges). It is
    /// integrated locally and returned as an operation to broadcast.
    ///
    /// # Errors
    ///
    /// Returns `WootError::InvalidGlyph` unless `glyph` is a single grapheme
    /// and `WootError::PositionOutOfBounds` if `position > len()`
    pub fn generate_insert(&mut self, glyph: &str, position: usize) -> Result<Operation> {
        if !Character::is_single_glyph(glyph) {
            return Err(WootError::InvalidGlyph(glyph.to_string()));
        }

        let length = self.len();
        let out_of_bounds = WootError::PositionOutOfBounds { position, length };
        if position > length {
            return Err(out_of_bounds);
        }

        let previous = self.ith_visible(position).ok_or(out_of_bounds.clone())?.id;
        let next = self.ith_visible(position + 1).ok_or(out_of_bounds)?.id;

        let id = self.generator.next();
        let character = Character::new(id, glyph, previous, next);
        self.integrate_insert(character.clone())?;

        Ok(Operation::insert(character))
    }

    /// Delete the visible character at `position` (0-based)
    ///
    /// # Errors
    ///
    /// Returns `WootError::PositionOutOfBounds` if `position >= len()`
    pub fn generate_delete(&mut self, position: usize) -> Result<Operation> {
        let length = self.len();
        let out_of_bounds = WootError::PositionOutOfBounds { position, length };
        if position >= length {
            return Err(out_of_bounds);
        }

        let id = self.ith_visible(position + 1).ok_or(out_of_bounds)?.id;
        self.integrate_delete(id)?;

        Ok(Operation::delete(id))
    }

    /// Check whether every identifier the operation references is present
    pub fn is_integrable(&self, op: &Operation) -> bool {
        op.dependencies().iter().all(|id| self.contains(id))
    }

    /// Integrate an operation whose readiness has already been checked
    pub fn integrate(&mut self, op: Operation) -> Result<IntegrationStats> {
        match op {
            Operation::Insert { character } => self.integrate_insert(character),
            Operation::Delete { id } => {
                self.integrate_delete(id)?;
                Ok(IntegrationStats::default())
            }
        }
    }

    /// Place a character between its recorded bounds
    ///
    /// When the bounds are adjacent the character goes straight between them.
    /// Otherwise the contention set is built: the bounds plus every character
    /// in the gap whose own bounds enclose the whole gap. Characters inserted
    /// into a narrower sub-gap are skipped; they are ordered relative to their
    /// own contenders. The walk passes contenders with a smaller identifier
    /// and the gap narrows to the pair around the stopping point. This repeats
    /// until the bounds are adjacent.
    ///
    /// An already present identifier is a duplicate delivery and is ignored.
    ///
    /// # Errors
    ///
    /// Fails without modifying the sequence if a bound is missing, if `next`
    /// does not come after `previous`, or if the gap cannot be narrowed.
    pub fn integrate_insert(&mut self, character: Character) -> Result<IntegrationStats> {
        let id = character.id;
        if id.is_sentinel() {
            return Err(WootError::SentinelTarget(id));
        }
        if self.contains(&id) {
            debug!(%id, "duplicate insert ignored");
            return Ok(IntegrationStats::default());
        }

        let mut stats = IntegrationStats::default();
        let mut previous = character.previous;
        let mut next = character.next;

        loop {
            stats.rounds += 1;

            let previous_pos = self.require(&previous)?;
            let next_pos = self.require(&next)?;
            if next_pos <= previous_pos {
                return Err(WootError::BoundsOutOfOrder { previous, next });
            }

            if next_pos == previous_pos + 1 {
                self.insert_at(next_pos, character);
                debug!(%id, position = next_pos, rounds = stats.rounds, "integrated insert");
                return Ok(stats);
            }

            let mut contenders = Vec::with_capacity(next_pos - previous_pos + 1);
            contenders.push(previous);
            for d in &self.chars[previous_pos + 1..next_pos] {
                stats.scanned += 1;
                let d_previous = self.require(&d.previous)?;
                let d_next = self.require(&d.next)?;
                if d_previous <= previous_pos && d_next >= next_pos {
                    contenders.push(d.id);
                }
            }
            contenders.push(next);

            let mut i = 1;
            while i < contenders.len() - 1 && contenders[i] < id {
                i += 1;
                stats.walked += 1;
            }

            let (narrowed_previous, narrowed_next) = (contenders[i - 1], contenders[i]);
            if narrowed_previous == previous && narrowed_next == next {
                return Err(WootError::IntegrationStalled { id, previous, next });
            }

            trace!(
                %id,
                %narrowed_previous,
                %narrowed_next,
                contenders = contenders.len() - 2,
                "narrowed gap"
            );
            previous = narrowed_previous;
            next = narrowed_next;
        }
    }

    /// Hide the character with the given identifier
    ///
    /// Hiding an already hidden character is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `WootError::MissingIdentifier` if the identifier is unknown and
    /// `WootError::SentinelTarget` for BEGIN and END.
    pub fn integrate_delete(&mut self, id: Identifier) -> Result<()> {
        if id.is_sentinel() {
            return Err(WootError::SentinelTarget(id));
        }

        let pos = self.require(&id)?;
        let ch = &mut self.chars[pos];
        if ch.visible {
            ch.mark_hidden();
            self.visible_len -= 1;
            debug!(%id, "integrated delete");
        }

        Ok(())
    }

    /// Concatenation of every visible glyph
    pub fn visible_text(&self) -> String {
        self.chars
            .iter()
            .filter(|ch| ch.visible)
            .map(|ch| ch.glyph.as_str())
            .collect()
    }

    fn insert_at(&mut self, pos: usize, character: Character) {
        if character.visible {
            self.visible_len += 1;
        }
        self.index.insert(character.id, pos);
        self.chars.insert(pos, character);

        for ch in &self.chars[pos + 1..] {
            if let Some(slot) = self.index.get_mut(&ch.id) {
                *slot += 1;
            }
        }
    }
}

impl std::fmt::Display for Sequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for ch in self.chars.iter().filter(|ch| ch.visible) {
            f.write_str(&ch.glyph)?;
        }
        Ok(())
    }
}
