//! # weft_component
//!
//! The data layer of the entity-component store.
//!
//! Components are defined at runtime by name, not as Rust types, so their
//! values are stored as `serde_json::Value`. This crate provides:
//!
//! - [`Entity`] — lightweight `u64` entity identifiers.
//! - [`EntityAllocator`] — monotonically increasing ID allocator with
//!   post-import reservation.
//! - [`ComponentDefinition`] — how instance data is resolved into a stored
//!   value (constant, factory, template merge, or identity).
//! - [`ComponentStore`] — per-component, insertion-ordered entity → value
//!   storage.
//! - [`ComponentRegistry`] — name → store mapping with a null-object store
//!   for undefined names, plus bulk export/import.
//! - [`EntityRef`] — a read-only entity handle backed by the registry.

pub mod definition;
pub mod entity;
pub mod registry;
pub mod store;

pub use definition::ComponentDefinition;
pub use entity::{Entity, EntityAllocator, EntityRef};
pub use registry::ComponentRegistry;
pub use store::ComponentStore;
