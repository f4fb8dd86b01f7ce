//! Entity type and the live-entity registry.
//!
//! An [`Entity`] is a lightweight `u64` identifier with no inherent data.
//! The [`EntityRegistry`] is the single source of truth for which ids have
//! been issued and which of them are currently live.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// A unique entity identifier.
///
/// Entities are pure identifiers with no data of their own. Meaning
/// comes entirely from which component stores hold an entry for the id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entity(pub u64);

impl Entity {
    /// Largest id a registry will accept. Ids above this do not survive a
    /// round trip through a JSON number as a double.
    pub const MAX_ID: u64 = (1 << 53) - 1;

    /// Create an entity from a raw `u64` identifier.
    #[must_use]
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` identifier.
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Allocates monotonically increasing entity ids and tracks the live set.
///
/// Ids are never recycled: once issued, an id is never handed out again even
/// after it is destroyed. Destroying an entity only removes it from the live
/// set; callers own the cleanup of any component stores that reference it.
#[derive(Debug, Clone)]
pub struct EntityRegistry {
    next_id: u64,
    /// Lowest id ever issued or reserved.
    first_id: u64,
    live: BTreeSet<Entity>,
}

impl EntityRegistry {
    /// Creates an empty registry. The first issued id is `1`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: 1,
            first_id: 1,
            live: BTreeSet::new(),
        }
    }

    /// Issues a fresh entity id and records it as live.
    pub fn create(&mut self) -> Entity {
        let entity = Entity(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.live.insert(entity);
        debug!(%entity, "entity created");
        entity
    }

    /// Marks an externally supplied id (e.g. from a loaded project) as live.
    ///
    /// The allocator is advanced past `entity` so that [`create`](Self::create)
    /// can never return it later. Returns `false` and leaves the registry
    /// untouched if the id is above [`Entity::MAX_ID`].
    pub fn reserve(&mut self, entity: Entity) -> bool {
        if entity.0 > Entity::MAX_ID {
            return false;
        }
        if entity.0 >= self.next_id {
            self.next_id = entity.0 + 1;
        }
        self.first_id = self.first_id.min(entity.0);
        self.live.insert(entity);
        true
    }

    /// Removes `entity` from the live set.
    ///
    /// Returns `false` if the id was not live. Destroying an unknown id is a
    /// no-op, not an error.
    pub fn destroy(&mut self, entity: Entity) -> bool {
        let removed = self.live.remove(&entity);
        if removed {
            debug!(%entity, "entity destroyed");
        }
        removed
    }

    /// Returns `true` if `entity` is currently live.
    #[must_use]
    pub fn is_live(&self, entity: Entity) -> bool {
        self.live.contains(&entity)
    }

    /// Returns `true` if `entity` was ever issued (or reserved) by this registry.
    #[must_use]
    pub fn was_issued(&self, entity: Entity) -> bool {
        (self.first_id..self.next_id).contains(&entity.0)
    }

    /// Iterates over live entities in ascending id order.
    pub fn all(&self) -> impl Iterator<Item = Entity> + '_ {
        self.live.iter().copied()
    }

    /// Returns the number of live entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// Returns `true` if no entity is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Drops every live entity. Issued ids stay retired.
    pub fn clear(&mut self) {
        self.live.clear();
    }
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new()
    }
}
