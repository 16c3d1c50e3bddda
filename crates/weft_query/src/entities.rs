//! The live entity list and its version pointer.

use std::rc::Rc;

use tracing::trace;
use weft_component::Entity;

use crate::Version;

/// Maintains the list of live entities plus the current head of the version
/// chain. Every membership change appends a structural version node;
/// component presence flips are recorded through [`EntitySet::bump`].
pub struct EntitySet {
    entities: Vec<Entity>,
    version: Rc<Version>,
}

impl EntitySet {
    /// Create a new empty set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            version: Version::root(),
        }
    }

    /// Adds an entity and records a structural change. Adding an entity
    /// that is already present changes nothing and appends no node.
    pub fn add(&mut self, entity: Entity) {
        if self.entities.contains(&entity) {
            return;
        }
        self.entities.push(entity);
        self.version = self.version.supersede(Some(entity), None);
        trace!(%entity, "entity added");
    }

    /// Removes an entity and records a structural change. Removing an
    /// absent entity is a no-op and appends no node.
    pub fn remove(&mut self, entity: Entity) {
        let before = self.entities.len();
        self.entities.retain(|candidate| *candidate != entity);
        if self.entities.len() != before {
            self.version = self.version.supersede(Some(entity), None);
            trace!(%entity, "entity removed");
        }
    }

    /// Records that `entity` gained or lost `component`. Called only on
    /// presence transitions — value changes that keep has-ness constant
    /// must not reach this method, so filters on unrelated data never
    /// rescan for them.
    pub fn bump(&mut self, entity: Entity, component: &str) {
        self.version = self
            .version
            .supersede(Some(entity), Some(component.to_string()));
        trace!(%entity, component, "component presence changed");
    }

    /// Returns `true` if `entity` is in the set.
    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.entities.contains(&entity)
    }

    /// Number of live entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns `true` if the set holds no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Iterates the live entities in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities.iter().copied()
    }

    /// The current head of the version chain. Node identity (`Rc::ptr_eq`)
    /// is what filters compare their cursor against.
    #[must_use]
    pub fn version(&self) -> Rc<Version> {
        Rc::clone(&self.version)
    }

    /// Unconditional synchronous scan: applies `predicate` across the
    /// current entities and collects the matches.
    pub fn filter(&self, mut predicate: impl FnMut(Entity) -> bool) -> Vec<Entity> {
        self.entities
            .iter()
            .copied()
            .filter(|entity| predicate(*entity))
            .collect()
    }
}

impl Default for EntitySet {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EntitySet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntitySet")
            .field("entities", &self.entities)
            .finish()
    }
}
