//! CRDT (Conflict-free Replicated Data Types) implementations
//!
//! This module contains the replicated data structures used for
//! collaborative editing without coordination between replicas.
//!
//! # CRDTs Implemented
//!
//! - **WOOT Sequence:** Character sequence with tombstones and identifier tie-breaks
//!
//! # References
//!
//! - "A comprehensive study of CRDTs" by Marc Shapiro et al.
//! - "Data Consistency for P2P Collaborative Editing" (WOOT, Oster et al.)

pub mod woot;

pub use woot::{Operation, PendingBuffer, Sequence};
