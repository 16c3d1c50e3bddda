//! # weft
//!
//! An in-memory entity-component store for client-side applications (games,
//! simulations, UI state machines). Components are named, runtime-defined
//! data slots attached to integer-identified entities; the query layer can
//! answer "every entity holding components {A, B, …}" repeatedly without
//! rescanning when nothing relevant changed.
//!
//! ## Usage
//!
//! ```rust
//! use serde_json::json;
//! use weft::{ComponentDefinition, Criteria, System, World};
//!
//! let mut world = World::new();
//! world.add_component("position", ComponentDefinition::from(json!({"x": 0, "y": 0})));
//! world.add_component("velocity", ComponentDefinition::from(json!({"dx": 0, "dy": 0})));
//!
//! let mover = world.spawn();
//! world.set(mover, "position", json!({"x": 3}));
//! world.set(mover, "velocity", json!({"dx": 1}));
//!
//! let mut movement = System::new("movement", Criteria::components(["position", "velocity"]));
//! movement.run(&world, |entity| {
//!     let position = entity.get("position").unwrap();
//!     assert_eq!(position["x"], 3);
//!     assert_eq!(position["y"], 0); // template default
//! });
//! ```

pub mod snapshot;
pub mod system;
pub mod world;

pub use snapshot::{Snapshot, SnapshotError};
pub use system::System;
pub use world::{ChangeHook, EntityMut, World};

pub use weft_component::{
    ComponentDefinition, ComponentRegistry, ComponentStore, Entity, EntityAllocator, EntityRef,
};
pub use weft_query::{scan, Criteria, EntitySet, Filter, Join, Version};
