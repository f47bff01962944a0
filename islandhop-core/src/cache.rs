//! Per-day memo of name → entity-handle lookups.
//!
//! Misses are cached too, so a missing NPC costs one host lookup per day
//! rather than one per tick. The cache never owns an entity; it is cleared in
//! bulk by the lifecycle controller and by nobody else.

use std::collections::HashMap;

use tracing::trace;

use crate::host::EntityResolver;
use crate::types::EntityId;

/// Memoized entity lookups for the current day.
#[derive(Debug, Clone)]
pub struct EntityCache<H> {
    entries: HashMap<EntityId, Option<H>>,
    hits: u64,
    misses: u64,
}

impl<H: Clone> EntityCache<H> {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }

    /// Resolve `name`, asking `resolver` only on the first lookup of the day.
    pub fn resolve<R>(&mut self, name: &EntityId, resolver: &R) -> Option<H>
    where
        R: EntityResolver<Handle = H> + ?Sized,
    {
        if let Some(cached) = self.entries.get(name) {
            self.hits += 1;
            return cached.clone();
        }
        self.misses += 1;
        let handle = resolver.resolve(name);
        trace!(entity = %name, found = handle.is_some(), "entity cache fill");
        self.entries.insert(name.clone(), handle.clone());
        handle
    }

    /// Drop every entry. Hit/miss counters are kept for diagnostics.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of cached names (hits and misses alike).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lookups served from the cache.
    #[must_use]
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Lookups that went to the host.
    #[must_use]
    pub fn misses(&self) -> u64 {
        self.misses
    }
}

impl<H: Clone> Default for EntityCache<H> {
    fn default() -> Self {
        Self::new()
    }
}
