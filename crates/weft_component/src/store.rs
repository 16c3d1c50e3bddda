//! Per-component entity → value storage.
//!
//! A store holds the resolved values of exactly one component. A key is
//! present iff the entity currently "has" the component. Iteration order is
//! the insertion order of first `set` calls; re-`set`ting an existing key
//! keeps its position.

use indexmap::IndexMap;
use serde_json::Value;

use crate::{ComponentDefinition, Entity};

/// Keyed storage for one component's values, with factory-based defaulting.
#[derive(Debug)]
pub struct ComponentStore {
    definition: ComponentDefinition,
    entries: IndexMap<Entity, Value>,
}

impl ComponentStore {
    /// Creates an empty store resolving values through `definition`.
    #[must_use]
    pub fn new(definition: ComponentDefinition) -> Self {
        Self {
            definition,
            entries: IndexMap::new(),
        }
    }

    /// An empty pass-through store, used as the null object for undefined
    /// component names: `get` is always `None`, `has` always `false`.
    #[must_use]
    pub fn identity() -> Self {
        Self::new(ComponentDefinition::Identity)
    }

    /// The resolution rule this store was built with.
    #[must_use]
    pub fn definition(&self) -> &ComponentDefinition {
        &self.definition
    }

    /// Resolves `data` through the definition and stores the result for
    /// `entity`, overwriting any previous value.
    pub fn set(&mut self, entity: Entity, data: Value) {
        let value = self.definition.resolve(data);
        self.entries.insert(entity, value);
    }

    /// Returns the stored value for `entity`, if present.
    #[must_use]
    pub fn get(&self, entity: Entity) -> Option<&Value> {
        self.entries.get(&entity)
    }

    /// Returns `true` if a value is currently stored for `entity`.
    #[must_use]
    pub fn has(&self, entity: Entity) -> bool {
        self.entries.contains_key(&entity)
    }

    /// Deletes the stored value for `entity`. Idempotent; returns `true`
    /// if a value was actually removed. Remaining entries keep their
    /// insertion order.
    pub fn remove(&mut self, entity: Entity) -> bool {
        self.entries.shift_remove(&entity).is_some()
    }

    /// Number of entities currently holding this component.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no entity holds this component.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates all present entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &Value)> {
        self.entries.iter().map(|(entity, value)| (*entity, value))
    }

    /// Iterates the entity ids holding this component, in insertion order.
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entries.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn e(id: u64) -> Entity {
        Entity::from_raw(id)
    }

    #[test]
    fn test_set_then_get_round_trip() {
        let mut store = ComponentStore::identity();
        store.set(e(1), json!({"hp": 10}));
        assert_eq!(store.get(e(1)), Some(&json!({"hp": 10})));
        assert!(store.has(e(1)));
        assert!(!store.has(e(2)));
        assert_eq!(store.get(e(2)), None);
    }

    #[test]
    fn test_set_overwrites() {
        let mut store = ComponentStore::identity();
        store.set(e(1), json!(1));
        store.set(e(1), json!(2));
        assert_eq!(store.get(e(1)), Some(&json!(2)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_constant_store_resolves_every_set() {
        let mut store = ComponentStore::new(ComponentDefinition::constant(9));
        store.set(e(1), json!("ignored"));
        store.set(e(2), Value::Null);
        assert_eq!(store.get(e(1)), Some(&json!(9)));
        assert_eq!(store.get(e(2)), Some(&json!(9)));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut store = ComponentStore::identity();
        store.set(e(1), json!(true));
        assert!(store.remove(e(1)));
        assert!(!store.remove(e(1)));
        assert!(!store.remove(e(99)));
        assert!(!store.has(e(1)));
    }

    #[test]
    fn test_iteration_order_is_insertion_order() {
        let mut store = ComponentStore::identity();
        store.set(e(3), json!("c"));
        store.set(e(1), json!("a"));
        store.set(e(2), json!("b"));
        // Re-setting an existing key must not move it.
        store.set(e(3), json!("c2"));

        let order: Vec<Entity> = store.entities().collect();
        assert_eq!(order, vec![e(3), e(1), e(2)]);
    }

    #[test]
    fn test_remove_preserves_order_of_remaining() {
        let mut store = ComponentStore::identity();
        store.set(e(1), json!(1));
        store.set(e(2), json!(2));
        store.set(e(3), json!(3));
        store.remove(e(2));

        let order: Vec<Entity> = store.entities().collect();
        assert_eq!(order, vec![e(1), e(3)]);
    }
}
