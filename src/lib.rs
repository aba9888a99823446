//! woot-core - Replicated plain-text sequence for collaborative editing
//!
//! This is the Rust core of a WOOT-based collaborative editor, compiled to
//! both native and WASM. It implements:
//! - Stable `(site, seq)` identifiers for every character
//! - The WOOT integration algorithm with tombstones
//! - Causal buffering of operations that arrive early
//! - A JSON wire format for operations and batches
//! - A session layer turning diff spans into operations
//!
//! # Examples
//!
//! ```rust
//! use woot_core::{Session, SessionConfig, SiteRegistry};
//!
//! let registry = SiteRegistry::new();
//! let mut alice = Session::join(&registry, SessionConfig::default()).unwrap();
//! let mut bob = Session::join(&registry, SessionConfig::default()).unwrap();
//!
//! let from_alice = alice.insert_text(0, "abc").unwrap();
//! bob.receive_batch(from_alice);
//!
//! // Concurrent edits
//! let from_bob = bob.insert_text(1, "x").unwrap();
//! let from_alice = alice.delete_range(1, 1).unwrap();
//!
//! alice.receive_batch(from_bob);
//! bob.receive_batch(from_alice);
//!
//! assert_eq!(alice.text(), "axc");
//! assert_eq!(bob.text(), "axc");
//! ```

pub mod config;
pub mod crdt;
pub mod error;
pub mod protocol;
pub mod session;
pub mod sites;

#[cfg(feature = "wasm")]
pub mod wasm;

// Re-exports for convenience
pub use config::SessionConfig;
pub use crdt::woot::{Character, Identifier, IdentifierGenerator, Operation, SiteId};
pub use error::{ErrorKind, Result, WootError};
pub use session::{Broadcaster, DiffSpan, ReceiveReport, Session};
pub use sites::{SiteAllocator, SiteRegistry};
