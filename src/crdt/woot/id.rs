//! Identifier: Unique, totally ordered key for every character
//!
//! Each character in the sequence carries an identifier composed of:
//! - Site: Identifies the replica that created the character
//! - Seq: Per-site counter, incremented for every generated character

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Site number handed out by the numbering authority
pub type SiteId = i64;

/// Site number reserved for the two sentinel characters
pub const SENTINEL_SITE: SiteId = -1;

/// Unique identifier for a character
///
/// Identifiers are ordered by site first and then by sequence number. This
/// order is the only tie-break used when concurrent inserts compete for the
/// same gap, so it must be identical on every replica.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Identifier {
    /// Site that created this character
    pub site: SiteId,

    /// Per-site sequence number at creation time
    pub seq: u64,
}

impl Identifier {
    /// Identifier of the BEGIN sentinel
    pub const BEGIN: Identifier = Identifier {
        site: SENTINEL_SITE,
        seq: 0,
    };

    /// Identifier of the END sentinel
    pub const END: Identifier = Identifier {
        site: SENTINEL_SITE,
        seq: 1,
    };

    /// Create a new identifier
    pub fn new(site: SiteId, seq: u64) -> Self {
        Self { site, seq }
    }

    /// Check if this is one of the two sentinel identifiers
    pub fn is_sentinel(&self) -> bool {
        *self == Self::BEGIN || *self == Self::END
    }

    /// Stable textual key ("site/seq")
    pub fn to_key(&self) -> String {
        self.to_string()
    }
}

impl PartialOrd for Identifier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Identifier {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.site.cmp(&other.site) {
            Ordering::Equal => self.seq.cmp(&other.seq),
            other => other,
        }
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.site, self.seq)
    }
}

/// Mints identifiers for one site
///
/// The generator is an explicit value owned by the sequence; sequence numbers
/// start at 1 and increase by one per generated character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierGenerator {
    site: SiteId,
    counter: u64,
}

impl IdentifierGenerator {
    /// Create a generator for the given site
    pub fn new(site: SiteId) -> Self {
        Self { site, counter: 0 }
    }

    /// Site this generator mints for
    pub fn site(&self) -> SiteId {
        self.site
    }

    /// Number of identifiers minted so far
    pub fn counter(&self) -> u64 {
        self.counter
    }

    /// Increment the counter and return the fresh identifier
    pub fn next(&mut self) -> Identifier {
        self.counter += 1;
        Identifier::new(self.site, self.counter)
    }
}
