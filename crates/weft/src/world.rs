//! The world facade — wires the component registry, entity set and id
//! allocator together behind the end-user surface.
//!
//! Every mutation flows through here so the version chain stays honest:
//! component `set`/`remove` bump the chain only on presence transitions
//! (gaining or losing a component), never on plain value changes.

use serde_json::Value;
use tracing::debug;

use weft_component::{
    ComponentDefinition, ComponentRegistry, ComponentStore, Entity, EntityAllocator, EntityRef,
};
use weft_query::{scan, Criteria, EntitySet, Filter, Join};

/// Callback fired whenever an entity's component value is set or removed.
/// Arguments: entity, component name, old value, new value.
pub type ChangeHook = Box<dyn FnMut(Entity, &str, Option<&Value>, Option<&Value>)>;

/// An entity-component store: component registry, live entity set, id
/// allocation and change notification, behind one handle.
///
/// Each `World` is a fully independent bundle — there is no process-wide
/// state shared between worlds.
pub struct World {
    pub(crate) components: ComponentRegistry,
    pub(crate) entities: EntitySet,
    pub(crate) allocator: EntityAllocator,
    on_change: Option<ChangeHook>,
}

impl World {
    /// Create a new empty world.
    #[must_use]
    pub fn new() -> Self {
        Self {
            components: ComponentRegistry::new(),
            entities: EntitySet::new(),
            allocator: EntityAllocator::new(),
            on_change: None,
        }
    }

    // -- Component definition --

    /// (Re)defines a component, returning the displaced store if the name
    /// was already defined. Redefinition silently severs every entity's
    /// association with the old store.
    pub fn define_component(
        &mut self,
        name: impl Into<String>,
        definition: ComponentDefinition,
    ) -> Option<ComponentStore> {
        self.components.define(name, definition)
    }

    /// Define-once wrapper: returns `false` without touching anything when
    /// the component already exists, `true` after defining it.
    pub fn add_component(&mut self, name: &str, definition: ComponentDefinition) -> bool {
        if self.components.contains(name) {
            return false;
        }
        self.components.define(name, definition);
        true
    }

    // -- Entity lifecycle --

    /// Creates a new entity with a unique id.
    pub fn spawn(&mut self) -> Entity {
        let entity = self.allocator.allocate();
        self.entities.add(entity);
        entity
    }

    /// Creates a new entity and returns a write handle to it.
    pub fn spawn_entity(&mut self) -> EntityMut<'_> {
        let id = self.spawn();
        EntityMut { world: self, id }
    }

    /// Removes an entity: drops its data from every store, then removes it
    /// from the live set. Removal is logical — once no store holds data
    /// under the id, the entity is gone.
    pub fn despawn(&mut self, entity: Entity) {
        self.components.purge(entity);
        self.entities.remove(entity);
    }

    // -- Component operations --

    /// Sets a component value on an entity, resolving `data` through the
    /// component's definition. Unknown component names are ignored (the
    /// component must be defined first).
    ///
    /// The version chain advances only if the entity did not already have
    /// the component; value-only changes never invalidate filter caches.
    pub fn set(&mut self, entity: Entity, component: &str, data: impl Into<Value>) {
        let Some(store) = self.components.get_mut(component) else {
            debug!(component, "set ignored: component not defined");
            return;
        };
        let had = store.has(entity);
        let old = if self.on_change.is_some() {
            store.get(entity).cloned()
        } else {
            None
        };
        store.set(entity, data.into());

        if !had {
            self.entities.bump(entity, component);
        }
        if let Some(hook) = self.on_change.as_mut() {
            let new = self.components.get(component).get(entity);
            hook(entity, component, old.as_ref(), new);
        }
    }

    /// Removes a component from an entity. Idempotent: removing an absent
    /// component (or an unknown name) is a no-op and advances nothing.
    pub fn remove(&mut self, entity: Entity, component: &str) {
        let Some(store) = self.components.get_mut(component) else {
            debug!(component, "remove ignored: component not defined");
            return;
        };
        let old = if self.on_change.is_some() {
            store.get(entity).cloned()
        } else {
            None
        };
        if !store.remove(entity) {
            return;
        }

        self.entities.bump(entity, component);
        if let Some(hook) = self.on_change.as_mut() {
            hook(entity, component, old.as_ref(), None);
        }
    }

    /// Returns the entity's value for the named component, if present.
    /// Unknown names behave as "the entity does not have it".
    #[must_use]
    pub fn get(&self, entity: Entity, component: &str) -> Option<&Value> {
        self.components.get(component).get(entity)
    }

    /// Returns `true` if the entity currently has the named component.
    #[must_use]
    pub fn has(&self, entity: Entity, component: &str) -> bool {
        self.components.get(component).has(entity)
    }

    // -- Queries --

    /// One-shot uncached query over the live entities.
    #[must_use]
    pub fn filter_now(&self, criteria: &Criteria) -> Vec<Entity> {
        scan(&self.entities, &self.components, criteria)
    }

    /// Drives an incremental [`Filter`] over this world.
    pub fn run_filter(&self, filter: &mut Filter, f: impl FnMut(EntityRef<'_>)) {
        filter.for_each(&self.entities, &self.components, f);
    }

    /// Drives a [`Join`] over this world's components.
    pub fn run_join(&self, join: &Join, f: impl FnMut(&[&Value], EntityRef<'_>)) {
        join.for_each(&self.components, f);
    }

    // -- Handles and internals --

    /// A read-only handle for `id`.
    #[must_use]
    pub fn entity_ref(&self, id: Entity) -> EntityRef<'_> {
        EntityRef::new(id, &self.components)
    }

    /// A write handle for `id`.
    pub fn entity(&mut self, id: Entity) -> EntityMut<'_> {
        EntityMut { world: self, id }
    }

    /// The component registry.
    #[must_use]
    pub fn components(&self) -> &ComponentRegistry {
        &self.components
    }

    /// The live entity set (and the current version pointer).
    #[must_use]
    pub fn entities(&self) -> &EntitySet {
        &self.entities
    }

    /// Installs a change callback, fired on every set/remove of a known
    /// component — including value-only changes that do not advance the
    /// version chain.
    pub fn on_change(
        &mut self,
        hook: impl FnMut(Entity, &str, Option<&Value>, Option<&Value>) + 'static,
    ) {
        self.on_change = Some(Box::new(hook));
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("components", &self.components.len())
            .field("entities", &self.entities.len())
            .finish()
    }
}

/// A borrowing write handle for one entity, with chainable mutations.
///
/// Extension happens by wrapping or decorating the handle, not by
/// subclassing an entity type.
pub struct EntityMut<'w> {
    world: &'w mut World,
    id: Entity,
}

impl EntityMut<'_> {
    /// The entity this handle refers to.
    #[must_use]
    pub fn id(&self) -> Entity {
        self.id
    }

    /// Sets a component value; see [`World::set`].
    pub fn set(&mut self, component: &str, data: impl Into<Value>) -> &mut Self {
        self.world.set(self.id, component, data);
        self
    }

    /// Removes a component; see [`World::remove`].
    pub fn remove(&mut self, component: &str) -> &mut Self {
        self.world.remove(self.id, component);
        self
    }

    /// Returns the entity's value for the named component, if present.
    #[must_use]
    pub fn get(&self, component: &str) -> Option<&Value> {
        self.world.get(self.id, component)
    }

    /// Returns `true` if the entity currently has the named component.
    #[must_use]
    pub fn has(&self, component: &str) -> bool {
        self.world.has(self.id, component)
    }

    /// Every component currently on the entity, name → value.
    #[must_use]
    pub fn components(&self) -> indexmap::IndexMap<String, &Value> {
        self.world.entity_ref(self.id).components()
    }

    /// Strips every component from the entity without removing it from the
    /// live set. Each removal is a presence transition, so filters on the
    /// stripped components see the change.
    pub fn remove_all(&mut self) -> &mut Self {
        let names: Vec<String> = self
            .world
            .components
            .iter()
            .map(|(name, _)| name.to_string())
            .collect();
        for name in names {
            self.world.remove(self.id, &name);
        }
        self
    }

    /// Removes the entity from the world, consuming the handle.
    pub fn despawn(self) {
        self.world.despawn(self.id);
    }
}
