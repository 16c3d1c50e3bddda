//! Save/load for the whole world's component data.
//!
//! The persisted shape is a plain nested mapping, entity ids rendered as
//! decimal strings so they behave as stable JSON object keys:
//!
//! ```json
//! { "1": { "position": {"x": 3}, "frozen": true } }
//! ```
//!
//! Loading routes through the registry's import, so components must be
//! defined before their data can land; unknown component names in the input
//! are skipped without error. Imported ids are reserved in the allocator so
//! future spawns never collide with them.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use weft_component::Entity;

use crate::World;

/// A full export of every entity's component data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot(pub IndexMap<String, IndexMap<String, Value>>);

/// Errors from encoding or decoding a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// The snapshot could not be serialised to or parsed from JSON.
    #[error("snapshot JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Snapshot {
    /// Encodes the snapshot as a JSON string.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses a snapshot from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Number of entities in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the snapshot holds no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl World {
    /// Exports every entity's component data, in deterministic order.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let mut data = IndexMap::new();
        for (entity, components) in self.components.export() {
            data.insert(entity.id().to_string(), components);
        }
        Snapshot(data)
    }

    /// Encodes the world's component data as a JSON string.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        self.snapshot().to_json()
    }

    /// Imports a snapshot into this world.
    ///
    /// - Only predefined components are consumed; unknown names are skipped.
    /// - Entity ids must parse as `u64`; entries with other keys are skipped
    ///   with a warning.
    /// - Every entity that ends up holding data joins the live set, and all
    ///   imported ids are reserved so they are never re-issued.
    pub fn load(&mut self, snapshot: &Snapshot) {
        let mut parsed: IndexMap<Entity, IndexMap<String, Value>> = IndexMap::new();
        for (key, components) in &snapshot.0 {
            match key.parse::<u64>() {
                Ok(id) => {
                    parsed.insert(Entity::from_raw(id), components.clone());
                }
                Err(_) => warn!(key = %key, "snapshot entry skipped: entity id is not numeric"),
            }
        }

        self.components.import(&parsed);
        self.allocator.reserve(parsed.keys().copied());
        for entity in self.components.entity_ids() {
            self.entities.add(entity);
        }
    }

    /// Parses and imports a JSON snapshot.
    pub fn load_json(&mut self, json: &str) -> Result<(), SnapshotError> {
        let snapshot = Snapshot::from_json(json)?;
        self.load(&snapshot);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use weft_component::ComponentDefinition;
    use weft_query::Criteria;

    use super::*;

    fn make_world() -> World {
        let mut world = World::new();
        world.add_component("pos", ComponentDefinition::from(json!({"x": 0, "y": 0})));
        world.add_component("tag", ComponentDefinition::Identity);
        world
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut source = make_world();
        let a = source.spawn();
        source.set(a, "pos", json!({"x": 1}));
        source.set(a, "tag", json!("alpha"));
        let b = source.spawn();
        source.set(b, "pos", json!({"y": 2}));

        let snapshot = source.snapshot();

        let mut target = make_world();
        target.load(&snapshot);

        assert_eq!(target.get(a, "pos"), Some(&json!({"x": 1, "y": 0})));
        assert_eq!(target.get(a, "tag"), Some(&json!("alpha")));
        assert_eq!(target.get(b, "pos"), Some(&json!({"x": 0, "y": 2})));
        assert!(target.entities().contains(a));
        assert!(target.entities().contains(b));
    }

    #[test]
    fn test_json_round_trip() {
        let mut source = make_world();
        let a = source.spawn();
        source.set(a, "tag", json!(true));

        let json = source.to_json().unwrap();

        let mut target = make_world();
        target.load_json(&json).unwrap();
        assert_eq!(target.get(a, "tag"), Some(&json!(true)));
    }

    #[test]
    fn test_load_reserves_imported_ids() {
        let mut source = make_world();
        for _ in 0..5 {
            let e = source.spawn();
            source.set(e, "tag", json!(1));
        }
        let snapshot = source.snapshot();

        let mut target = make_world();
        target.load(&snapshot);
        // The next spawn must not collide with any imported id.
        assert!(target.spawn().id() > 5);
    }

    #[test]
    fn test_load_with_maximum_id_does_not_panic() {
        let snapshot =
            Snapshot::from_json(r#"{"18446744073709551615": {"tag": 1}}"#).unwrap();

        let mut world = make_world();
        world.load(&snapshot);

        let max = Entity::from_raw(u64::MAX);
        assert_eq!(world.get(max, "tag"), Some(&json!(1)));
        assert!(world.entities().contains(max));
        // Allocation continues normally after the import.
        let next = world.spawn();
        assert!(next.is_valid());
        assert_ne!(next, max);
    }

    #[test]
    fn test_load_skips_non_numeric_ids() {
        let snapshot =
            Snapshot::from_json(r#"{"not-a-number": {"tag": 1}, "7": {"tag": 2}}"#).unwrap();

        let mut world = make_world();
        world.load(&snapshot);

        assert_eq!(world.entities().len(), 1);
        assert_eq!(world.get(Entity::from_raw(7), "tag"), Some(&json!(2)));
    }

    #[test]
    fn test_load_skips_unknown_components() {
        let snapshot = Snapshot::from_json(r#"{"1": {"tag": 1, "ghost": 2}}"#).unwrap();

        let mut world = make_world();
        world.load(&snapshot);

        let e = Entity::from_raw(1);
        assert_eq!(world.get(e, "tag"), Some(&json!(1)));
        assert!(!world.has(e, "ghost"));
    }

    #[test]
    fn test_loaded_entities_are_filterable() {
        let snapshot = Snapshot::from_json(r#"{"1": {"tag": "a"}, "2": {"pos": {}}}"#).unwrap();

        let mut world = make_world();
        world.load(&snapshot);

        let tagged = world.filter_now(&Criteria::components(["tag"]));
        assert_eq!(tagged, vec![Entity::from_raw(1)]);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let mut world = make_world();
        assert!(world.load_json("not json").is_err());
    }
}
