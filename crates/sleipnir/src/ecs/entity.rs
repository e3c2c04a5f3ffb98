//! # Entity — Lightweight Identifiers for Simulated Objects
//!
//! An [`Entity`] is just a number: it doesn't "contain" anything. The
//! [`World`](super::world::World) maps entities to their components.
//!
//! ## Design: Monotonic Ids
//!
//! Ids are handed out by a counter and never recycled. That makes the id
//! double as an arena index *and* a stable iteration order: systems that scan
//! pairs of entities (collision) always visit them oldest-first, so a tick is
//! reproducible from the same spawn sequence.
//!
//! ```text
//! spawn  → Entity(0), Entity(1), Entity(2)
//! despawn Entity(1)
//! spawn  → Entity(3)          ← slot 1 stays empty forever
//! ```
//!
//! A stale handle to a despawned entity simply finds an empty slot, so lookups
//! fail safely without a generation counter.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A lightweight handle to an entity in the [`World`](super::world::World).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entity(pub(crate) u32);

impl Entity {
    /// Rebuild a handle from a raw id, e.g. one received from the editor
    /// bridge. The handle is only meaningful for the world that issued it.
    pub const fn from_raw(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw id.
    pub fn id(self) -> u32 {
        self.0
    }

    pub(crate) fn slot(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Issues entity ids.
pub(crate) struct EntityAllocator {
    /// Next fresh id. Also the number of ids ever issued.
    next: u32,
}

impl EntityAllocator {
    pub fn new() -> Self {
        Self { next: 0 }
    }

    pub fn allocate(&mut self) -> Entity {
        let entity = Entity(self.next);
        self.next += 1;
        entity
    }

    /// Total number of ids issued so far (alive or not).
    pub fn issued(&self) -> u32 {
        self.next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_sequential() {
        let mut alloc = EntityAllocator::new();
        let e0 = alloc.allocate();
        let e1 = alloc.allocate();
        assert_eq!(e0.id(), 0);
        assert_eq!(e1.id(), 1);
        assert!(e0 < e1);
        assert_eq!(alloc.issued(), 2);
    }

    #[test]
    fn raw_round_trip() {
        let e = Entity::from_raw(42);
        assert_eq!(e.id(), 42);
        assert_eq!(format!("{e:?}"), "Entity(42)");
        assert_eq!(serde_json::to_string(&e).unwrap(), "42");
    }
}
