//! # weft_query
//!
//! The change-aware query layer of the entity-component store.
//!
//! Structural changes (entity added or removed, component gained or lost)
//! append nodes to an append-only [`Version`] chain. An incremental
//! [`Filter`] holds a cursor into that chain and only rescans the
//! [`EntitySet`] when a node relevant to its criteria appeared since its
//! last computation — per-frame queries over an unchanged world cost a few
//! pointer comparisons, not an O(n) scan.
//!
//! This crate provides:
//!
//! - [`Version`] — singly linked, append-only change markers.
//! - [`EntitySet`] — the live entity list plus the current version pointer.
//! - [`Criteria`] / [`Filter`] — cached "entities with all of {A, B, …}"
//!   (or arbitrary predicate) views.
//! - [`scan`] — the uncached one-shot variant.
//! - [`Join`] — positional component-value iteration for matching entities.

pub mod entities;
pub mod filter;
pub mod join;
pub mod version;

pub use entities::EntitySet;
pub use filter::{scan, Criteria, Filter};
pub use join::Join;
pub use version::Version;
