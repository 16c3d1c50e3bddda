//! Positional component-value iteration.
//!
//! Where a [`Filter`](crate::Filter) answers "which entities", a [`Join`]
//! hands back the resolved value of each required component, in declaration
//! order, for every entity that holds them all — enabling destructured
//! callback signatures instead of per-component lookups in the body.

use serde_json::Value;
use weft_component::{ComponentRegistry, Entity, EntityRef};

/// Iterates entities that hold all of the declared components, yielding the
/// component values positionally.
///
/// Presence semantics are identical to the boolean filter: an undefined
/// component name matches no entity. Rows are driven off the first
/// component's store in its insertion order. Joins are not cached.
#[derive(Debug, Clone)]
pub struct Join {
    components: Vec<String>,
}

impl Join {
    /// Declares the components every row must carry, in yield order.
    #[must_use]
    pub fn new<I, S>(components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            components: components.into_iter().map(Into::into).collect(),
        }
    }

    /// The declared component names.
    #[must_use]
    pub fn components(&self) -> &[String] {
        &self.components
    }

    /// Collects one row per matching entity: the component values in
    /// declaration order plus the entity id. An empty declaration yields no
    /// rows.
    #[must_use]
    pub fn rows<'a>(&self, components: &'a ComponentRegistry) -> Vec<(Vec<&'a Value>, Entity)> {
        let Some((first, rest)) = self.components.split_first() else {
            return Vec::new();
        };

        let mut rows = Vec::new();
        'entities: for (entity, first_value) in components.get(first).iter() {
            let mut values = Vec::with_capacity(self.components.len());
            values.push(first_value);
            for name in rest {
                match components.get(name).get(entity) {
                    Some(value) => values.push(value),
                    None => continue 'entities,
                }
            }
            rows.push((values, entity));
        }
        rows
    }

    /// Invokes `f` with each row's values and an entity handle.
    pub fn for_each<'a>(
        &self,
        components: &'a ComponentRegistry,
        mut f: impl FnMut(&[&'a Value], EntityRef<'a>),
    ) {
        for (values, entity) in self.rows(components) {
            f(&values, EntityRef::new(entity, components));
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use weft_component::ComponentDefinition;

    use super::*;

    fn e(id: u64) -> Entity {
        Entity::from_raw(id)
    }

    fn fixture() -> ComponentRegistry {
        let mut components = ComponentRegistry::new();
        components.define("pos", ComponentDefinition::Identity);
        components.define("vel", ComponentDefinition::Identity);
        let pos = components.get_mut("pos").unwrap();
        pos.set(e(1), json!({"x": 1}));
        pos.set(e(2), json!({"x": 2}));
        pos.set(e(3), json!({"x": 3}));
        let vel = components.get_mut("vel").unwrap();
        vel.set(e(1), json!({"dx": 10}));
        vel.set(e(3), json!({"dx": 30}));
        components
    }

    #[test]
    fn test_rows_require_all_components() {
        let components = fixture();
        let join = Join::new(["pos", "vel"]);
        let rows = join.rows(&components);

        let ids: Vec<Entity> = rows.iter().map(|(_, entity)| *entity).collect();
        assert_eq!(ids, vec![e(1), e(3)]);
    }

    #[test]
    fn test_values_are_positional() {
        let components = fixture();
        let join = Join::new(["vel", "pos"]);
        let rows = join.rows(&components);

        let (values, entity) = &rows[0];
        assert_eq!(*entity, e(1));
        assert_eq!(values[0], &json!({"dx": 10}));
        assert_eq!(values[1], &json!({"x": 1}));
    }

    #[test]
    fn test_empty_declaration_yields_nothing() {
        let components = fixture();
        let join = Join::new(Vec::<String>::new());
        assert!(join.rows(&components).is_empty());
    }

    #[test]
    fn test_undefined_component_yields_nothing() {
        let components = fixture();
        assert!(Join::new(["ghost"]).rows(&components).is_empty());
        assert!(Join::new(["pos", "ghost"]).rows(&components).is_empty());
    }

    #[test]
    fn test_for_each_hands_back_entity_handles() {
        let components = fixture();
        let join = Join::new(["pos", "vel"]);
        let mut seen = Vec::new();
        join.for_each(&components, |values, entity| {
            assert_eq!(values.len(), 2);
            assert!(entity.has("pos"));
            seen.push(entity.id());
        });
        assert_eq!(seen, vec![e(1), e(3)]);
    }
}
