//! Entity identifiers, allocation and read handles.
//!
//! An [`Entity`] is a lightweight `u64` identifier with no inherent data.
//! All meaning comes from the component values stored against it.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::registry::ComponentRegistry;

/// A unique entity identifier.
///
/// Entities are pure identifiers — they carry no data of their own.
/// Components are attached to entities to give them meaning, and "removing"
/// an entity simply means no store retains data under its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Entity(pub u64);

impl Entity {
    /// The null / invalid entity sentinel.
    pub const INVALID: Entity = Entity(0);

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

    /// Returns `true` if this is a valid (non-zero) entity.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Allocates monotonically increasing entity IDs.
///
/// The allocator is the single source of entity identity for a world.
/// After a bulk import, [`EntityAllocator::reserve`] bumps the counter past
/// every imported id so they are never handed out again.
#[derive(Debug)]
pub struct EntityAllocator {
    next_id: u64,
}

impl EntityAllocator {
    /// Creates a new allocator. IDs start at 1 (0 is reserved for [`Entity::INVALID`]).
    #[must_use]
    pub fn new() -> Self {
        Self { next_id: 1 }
    }

    /// Allocates a fresh entity ID.
    pub fn allocate(&mut self) -> Entity {
        let id = self.next_id;
        self.next_id += 1;
        Entity(id)
    }

    /// Returns the number of entities allocated so far.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.next_id - 1
    }

    /// Marks the given ids as taken so future [`EntityAllocator::allocate`]
    /// calls never collide with them.
    ///
    /// An id of `u64::MAX` has no successor to continue from; it is left
    /// unreserved with a warning rather than wrapping the allocator.
    pub fn reserve(&mut self, ids: impl IntoIterator<Item = Entity>) {
        for entity in ids {
            match entity.id().checked_add(1) {
                Some(next) if next > self.next_id => self.next_id = next,
                Some(_) => {}
                None => warn!(%entity, "id too large to reserve past, allocator unchanged"),
            }
        }
    }
}

impl Default for EntityAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// A read-only handle pairing an entity id with the component registry.
///
/// Component access goes through explicit [`EntityRef::get`] / [`EntityRef::has`]
/// calls; undefined component names behave as "the entity does not have it"
/// rather than erroring.
#[derive(Clone, Copy)]
pub struct EntityRef<'a> {
    id: Entity,
    components: &'a ComponentRegistry,
}

impl<'a> EntityRef<'a> {
    /// Creates a handle for `id` backed by `components`.
    #[must_use]
    pub fn new(id: Entity, components: &'a ComponentRegistry) -> Self {
        Self { id, components }
    }

    /// The entity this handle refers to.
    #[must_use]
    pub fn id(&self) -> Entity {
        self.id
    }

    /// Returns the entity's value for the named component, if present.
    #[must_use]
    pub fn get(&self, component: &str) -> Option<&'a Value> {
        self.components.get(component).get(self.id)
    }

    /// Returns `true` if the entity currently has the named component.
    #[must_use]
    pub fn has(&self, component: &str) -> bool {
        self.components.get(component).has(self.id)
    }

    /// Every component currently on the entity, name → value, in component
    /// definition order.
    #[must_use]
    pub fn components(&self) -> IndexMap<String, &'a Value> {
        let registry = self.components;
        let mut values = IndexMap::new();
        for (name, store) in registry.iter() {
            if let Some(value) = store.get(self.id) {
                values.insert(name.to_string(), value);
            }
        }
        values
    }
}

impl std::fmt::Debug for EntityRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("EntityRef").field(&self.id).finish()
    }
}
