//! Character: The unit of text in the replicated sequence
//!
//! Each character carries:
//! - Unique identifier
//! - Glyph (one user-perceived character)
//! - Identifiers of the neighbours it was inserted between
//! - Visible flag (tombstone when false)

use super::id::Identifier;
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// A single character of the sequence
///
/// `previous` and `next` record where the character was inserted at creation
/// time. They never change afterwards and are not live links; the live order
/// is the position inside the sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Character {
    /// Unique identifier for this character
    pub id: Identifier,

    /// Neighbour that must stay somewhere before this character
    pub previous: Identifier,

    /// Neighbour that must stay somewhere after this character
    pub next: Identifier,

    /// User-visible glyph (empty only for sentinels)
    pub glyph: String,

    /// False once the character has been deleted
    pub visible: bool,
}

impl Character {
    /// Create a new visible character
    pub fn new(id: Identifier, glyph: impl Into<String>, previous: Identifier, next: Identifier) -> Self {
        Self {
            id,
            previous,
            next,
            glyph: glyph.into(),
            visible: true,
        }
    }

    /// The BEGIN sentinel
    pub fn begin() -> Self {
        Self::sentinel(Identifier::BEGIN)
    }

    /// The END sentinel
    pub fn end() -> Self {
        Self::sentinel(Identifier::END)
    }

    fn sentinel(id: Identifier) -> Self {
        Self::new(id, String::new(), id, id)
    }

    pub fn is_sentinel(&self) -> bool {
        self.id.is_sentinel()
    }

    /// Check that `glyph` is exactly one extended grapheme cluster
    pub fn is_single_glyph(glyph: &str) -> bool {
        let mut graphemes = glyph.graphemes(true);
        graphemes.next().is_some() && graphemes.next().is_none()
    }

    /// Hide this character. Deletion is permanent and idempotent.
    pub fn mark_hidden(&mut self) {
        self.visible = false;
    }
}
