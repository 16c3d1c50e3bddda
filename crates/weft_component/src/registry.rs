//! Component registry — tracks the current store for every component name.
//!
//! At most one store exists per name at a time; redefining a name builds a
//! brand-new store and displaces the old one. Undefined names resolve to a
//! shared null-object store so read paths never need to handle "missing".

use indexmap::{IndexMap, IndexSet};
use serde_json::Value;
use tracing::debug;

use crate::{ComponentDefinition, ComponentStore, Entity};

/// Mapping from component name to its current [`ComponentStore`], with
/// aggregate operations across all stores.
#[derive(Debug)]
pub struct ComponentRegistry {
    /// Stores keyed by component name, in definition order.
    stores: IndexMap<String, ComponentStore>,
    /// Returned for undefined names: empty, never written to.
    null_store: ComponentStore,
}

impl ComponentRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            stores: IndexMap::new(),
            null_store: ComponentStore::identity(),
        }
    }

    /// (Re)defines a component: builds a new store from `definition` and
    /// installs it under `name`.
    ///
    /// Returns the displaced store if the name was already defined. The old
    /// store's data is untouched but no longer reachable through the
    /// registry — entities silently "lose" the component under the new
    /// definition.
    pub fn define(
        &mut self,
        name: impl Into<String>,
        definition: ComponentDefinition,
    ) -> Option<ComponentStore> {
        let name = name.into();
        let displaced = self
            .stores
            .insert(name.clone(), ComponentStore::new(definition));
        if displaced.is_some() {
            debug!(component = %name, "component redefined, previous store displaced");
        }
        displaced
    }

    /// Returns the store for `name`, or the null-object store if `name` was
    /// never defined. The null store reports no data for any entity, so
    /// `registry.get(name).get(entity)` is always safe.
    #[must_use]
    pub fn get(&self, name: &str) -> &ComponentStore {
        self.stores.get(name).unwrap_or(&self.null_store)
    }

    /// Mutable access to a defined store. `None` for undefined names —
    /// writes to unknown components have nowhere to resolve.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut ComponentStore> {
        self.stores.get_mut(name)
    }

    /// Returns `true` if a component with this name is currently defined.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.stores.contains_key(name)
    }

    /// Iterates all defined components in definition order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ComponentStore)> {
        self.stores.iter().map(|(name, store)| (name.as_str(), store))
    }

    /// Number of defined components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stores.len()
    }

    /// Returns `true` if no components are defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }

    /// Deduplicated union of every entity id present in any store — "all
    /// entities with at least one component", in first-seen order.
    #[must_use]
    pub fn entity_ids(&self) -> Vec<Entity> {
        let mut ids = IndexSet::new();
        for store in self.stores.values() {
            for entity in store.entities() {
                ids.insert(entity);
            }
        }
        ids.into_iter().collect()
    }

    /// Drops all of `entity`'s data from every store.
    pub fn purge(&mut self, entity: Entity) {
        for store in self.stores.values_mut() {
            store.remove(entity);
        }
    }

    /// Full export: entity id → (component name → value), deterministic
    /// order (stores in definition order, entities in insertion order).
    #[must_use]
    pub fn export(&self) -> IndexMap<Entity, IndexMap<String, Value>> {
        let mut data: IndexMap<Entity, IndexMap<String, Value>> = IndexMap::new();
        for (name, store) in &self.stores {
            for (entity, value) in store.iter() {
                data.entry(entity)
                    .or_default()
                    .insert(name.clone(), value.clone());
            }
        }
        data
    }

    /// Full import. Only component names this registry already knows about
    /// are consumed; unknown names are skipped without error, so components
    /// must be defined before their data can be imported.
    pub fn import(&mut self, data: &IndexMap<Entity, IndexMap<String, Value>>) {
        for (entity, components) in data {
            for (name, value) in components {
                match self.stores.get_mut(name) {
                    Some(store) => store.set(*entity, value.clone()),
                    None => debug!(component = %name, "import skipped undefined component"),
                }
            }
        }
    }
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::new()
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
    fn test_define_and_contains() {
        let mut registry = ComponentRegistry::new();
        assert!(!registry.contains("pos"));
        assert!(registry.define("pos", ComponentDefinition::Identity).is_none());
        assert!(registry.contains("pos"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_undefined_name_is_null_object() {
        let registry = ComponentRegistry::new();
        let store = registry.get("ghost");
        assert!(!store.has(e(1)));
        assert_eq!(store.get(e(1)), None);
    }

    #[test]
    fn test_redefinition_displaces_old_store() {
        let mut registry = ComponentRegistry::new();
        registry.define("foo", ComponentDefinition::Identity);
        registry.get_mut("foo").unwrap().set(e(1), json!("old"));

        let old = registry
            .define("foo", ComponentDefinition::Identity)
            .expect("old store displaced");
        registry.get_mut("foo").unwrap().set(e(2), json!("new"));

        // Old data survives on the retained store, severed from the registry.
        assert_eq!(old.get(e(1)), Some(&json!("old")));
        // The current store knows only the new data.
        assert!(!registry.get("foo").has(e(1)));
        assert_eq!(registry.get("foo").get(e(2)), Some(&json!("new")));
    }

    #[test]
    fn test_entity_ids_union_deduplicates() {
        let mut registry = ComponentRegistry::new();
        registry.define("a", ComponentDefinition::Identity);
        registry.define("b", ComponentDefinition::Identity);
        registry.get_mut("a").unwrap().set(e(1), json!(1));
        registry.get_mut("a").unwrap().set(e(2), json!(2));
        registry.get_mut("b").unwrap().set(e(2), json!(2));
        registry.get_mut("b").unwrap().set(e(3), json!(3));

        assert_eq!(registry.entity_ids(), vec![e(1), e(2), e(3)]);
    }

    #[test]
    fn test_purge_clears_every_store() {
        let mut registry = ComponentRegistry::new();
        registry.define("a", ComponentDefinition::Identity);
        registry.define("b", ComponentDefinition::Identity);
        registry.get_mut("a").unwrap().set(e(1), json!(1));
        registry.get_mut("b").unwrap().set(e(1), json!(1));

        registry.purge(e(1));
        assert!(!registry.get("a").has(e(1)));
        assert!(!registry.get("b").has(e(1)));
    }

    #[test]
    fn test_export_import_round_trip() {
        let mut registry = ComponentRegistry::new();
        registry.define("pos", ComponentDefinition::Identity);
        registry.define("tag", ComponentDefinition::Identity);
        registry.get_mut("pos").unwrap().set(e(1), json!({"x": 1}));
        registry.get_mut("tag").unwrap().set(e(1), json!(true));
        registry.get_mut("pos").unwrap().set(e(2), json!({"x": 2}));

        let data = registry.export();

        let mut other = ComponentRegistry::new();
        other.define("pos", ComponentDefinition::Identity);
        other.define("tag", ComponentDefinition::Identity);
        other.import(&data);

        assert_eq!(other.get("pos").get(e(1)), Some(&json!({"x": 1})));
        assert_eq!(other.get("tag").get(e(1)), Some(&json!(true)));
        assert_eq!(other.get("pos").get(e(2)), Some(&json!({"x": 2})));
    }

    #[test]
    fn test_import_skips_unknown_components() {
        let mut source = ComponentRegistry::new();
        source.define("known", ComponentDefinition::Identity);
        source.define("unknown", ComponentDefinition::Identity);
        source.get_mut("known").unwrap().set(e(1), json!(1));
        source.get_mut("unknown").unwrap().set(e(1), json!(2));
        let data = source.export();

        let mut target = ComponentRegistry::new();
        target.define("known", ComponentDefinition::Identity);
        target.import(&data);

        assert_eq!(target.get("known").get(e(1)), Some(&json!(1)));
        assert!(!target.contains("unknown"));
        assert!(!target.get("unknown").has(e(1)));
    }

    #[test]
    fn test_import_resolves_through_definitions() {
        // Imported values pass through the target store's definition.
        let mut data: IndexMap<Entity, IndexMap<String, Value>> = IndexMap::new();
        data.entry(e(1))
            .or_default()
            .insert("label".to_string(), json!({"text": "hi"}));

        let mut target = ComponentRegistry::new();
        let defaults = match json!({"text": "", "size": 12}) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        target.define("label", ComponentDefinition::template(defaults));
        target.import(&data);

        assert_eq!(
            target.get("label").get(e(1)),
            Some(&json!({"text": "hi", "size": 12}))
        );
    }
}
