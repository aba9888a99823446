//! WOOT Text CRDT: Replicated character sequence without coordination
//!
//! This module implements the WOOT ("WithOut Operational Transforms")
//! algorithm for collaborative plain-text editing.
//!
//! # Features
//! - **Stable identity**: every character keeps its `(site, seq)` identifier forever
//! - **Causal gating**: operations wait until the characters they name are present
//! - **Deterministic**: concurrent inserts into one gap are ordered by identifier
//! - **Tombstones**: deleted characters stay in place to anchor later inserts
//!
//! # Algorithm
//!
//! Every insert records the two characters it was placed between. A remote
//! insert is integrated by repeatedly narrowing that gap: the characters
//! inside the gap whose own bounds enclose it are the contention set, and the
//! new character is walked past contenders with a smaller identifier. The
//! narrowing is iterative, so long runs of tombstones cannot exhaust the
//! stack.
//!
//! # Example
//!
//! ```rust
//! use woot_core::crdt::woot::{IdentifierGenerator, PendingBuffer, Sequence};
//!
//! let mut alice = Sequence::new(IdentifierGenerator::new(1));
//! let mut bob = Sequence::new(IdentifierGenerator::new(2));
//! let mut inbox = PendingBuffer::new();
//!
//! let ops = vec![
//!     alice.generate_insert("h", 0).unwrap(),
//!     alice.generate_insert("i", 1).unwrap(),
//! ];
//!
//! // Out-of-order delivery is buffered until causally ready
//! for op in ops.into_iter().rev() {
//!     inbox.submit(op, &mut bob);
//! }
//!
//! assert_eq!(bob.visible_text(), "hi");
//! ```
//!
//! # References
//!
//! - "Data Consistency for P2P Collaborative Editing" (Oster et al., CSCW 2006)

mod character;
mod id;
mod operation;
mod pending;
mod sequence;

pub use character::Character;
pub use id::{Identifier, IdentifierGenerator, SiteId, SENTINEL_SITE};
pub use operation::Operation;
pub use pending::{DrainReport, PendingBuffer};
pub use sequence::{IntegrationStats, Sequence};
