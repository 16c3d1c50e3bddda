//! System helper — a named criteria + incremental filter bundle.
//!
//! Typical per-frame usage: construct once, call [`System::run`] every
//! tick. The underlying filter only rescans when a change relevant to the
//! criteria occurred since the previous tick.

use tracing::trace;
use weft_component::EntityRef;
use weft_query::{Criteria, Filter};

use crate::World;

/// A reusable "for every matching entity" invocation.
///
/// Iteration is read-only; mutations observed while iterating are collected
/// by the caller and applied to the [`World`] between runs.
#[derive(Debug)]
pub struct System {
    name: String,
    filter: Filter,
}

impl System {
    /// Creates a system with the given name and match criteria.
    #[must_use]
    pub fn new(name: impl Into<String>, criteria: Criteria) -> Self {
        Self {
            name: name.into(),
            filter: Filter::new(criteria),
        }
    }

    /// The system's human-readable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Calls `each` once per entity matching the criteria.
    pub fn run(&mut self, world: &World, each: impl FnMut(EntityRef<'_>)) {
        trace!(system = %self.name, "system run");
        self.filter.for_each(world.entities(), world.components(), each);
    }

    /// The incremental filter backing this system.
    pub fn filter_mut(&mut self) -> &mut Filter {
        &mut self.filter
    }
}
