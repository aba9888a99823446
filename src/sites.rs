//! Site numbering for newly joined participants
//!
//! Every site needs a unique non-negative integer before it may generate
//! operations. The numbering authority lives wherever the host puts it (a
//! relay server, a coordinator); this module defines the interface and an
//! in-process allocator that hands out 1, 2, 3, ...

use crate::crdt::woot::SiteId;
use std::sync::atomic::{AtomicI64, Ordering};

/// Source of globally unique site ids
pub trait SiteAllocator {
    /// Reserve the next unused site id
    fn allocate(&self) -> SiteId;
}

/// Thread-safe increasing site counter
#[derive(Debug)]
pub struct SiteRegistry {
    last: AtomicI64,
}

impl SiteRegistry {
    /// Create a registry whose first allocation is site 1
    pub fn new() -> Self {
        Self::starting_after(0)
    }

    /// Create a registry that resumes after `last` (e.g. after a restart)
    pub fn starting_after(last: SiteId) -> Self {
        Self {
            last: AtomicI64::new(last.max(0)),
        }
    }

    /// Last site id handed out (0 if none)
    pub fn last(&self) -> SiteId {
        self.last.load(Ordering::SeqCst)
    }
}

impl SiteAllocator for SiteRegistry {
    fn allocate(&self) -> SiteId {
        self.last.fetch_add(1, Ordering::SeqCst) + 1
    }
}

impl Default for SiteRegistry {
    fn default() -> Self {
        Self::new()
    }
}
