//! Incremental filtering over the entity set.
//!
//! A [`Filter`] caches the list of entities matching its criteria together
//! with a cursor into the version chain. On each query it walks the chain
//! forward from the cursor, stepping over nodes its criteria cannot care
//! about; only if a relevant node (or the end of an interesting stretch)
//! leaves the cursor short of the current version does it rescan.

use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use tracing::trace;
use weft_component::{ComponentRegistry, Entity, EntityRef};

use crate::{EntitySet, Version};

/// What a filter selects for.
pub enum Criteria {
    /// Entities holding all of the named components.
    Components(Vec<String>),
    /// Entities for which the predicate returns `true`. An arbitrary
    /// predicate may depend on anything, so caches built on it are
    /// invalidated by every change.
    Predicate(Box<dyn Fn(EntityRef<'_>) -> bool>),
}

impl Criteria {
    /// All-of criteria over the given component names.
    #[must_use]
    pub fn components<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Components(names.into_iter().map(Into::into).collect())
    }

    /// Arbitrary predicate criteria.
    #[must_use]
    pub fn predicate(f: impl Fn(EntityRef<'_>) -> bool + 'static) -> Self {
        Self::Predicate(Box::new(f))
    }

    /// Applies the criteria to one entity. An empty component list matches
    /// every entity; undefined component names match none (null-object
    /// store).
    #[must_use]
    pub fn matches(&self, entity: Entity, components: &ComponentRegistry) -> bool {
        match self {
            Self::Components(names) => names.iter().all(|name| components.get(name).has(entity)),
            Self::Predicate(f) => f(EntityRef::new(entity, components)),
        }
    }
}

impl fmt::Debug for Criteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Components(names) => f.debug_tuple("Components").field(names).finish(),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// A cached, lazily recomputed view of "entities matching the criteria".
///
/// Multiple filters over the same [`EntitySet`] are independent: each holds
/// its own cursor and cache, and observing one never disturbs another.
pub struct Filter {
    criteria: Criteria,
    /// Component names whose presence flips invalidate the cache. Empty for
    /// predicate criteria, which treat every node as relevant.
    interest: HashSet<String>,
    last_seen: Rc<Version>,
    cached: Vec<Entity>,
}

impl Filter {
    /// Creates a filter. The cursor starts on a detached node, so the first
    /// query always computes — filters may be built before any entities or
    /// components exist.
    #[must_use]
    pub fn new(criteria: Criteria) -> Self {
        let interest = match &criteria {
            Criteria::Components(names) => names.iter().cloned().collect(),
            Criteria::Predicate(_) => HashSet::new(),
        };
        Self {
            criteria,
            interest,
            last_seen: Version::root(),
            cached: Vec::new(),
        }
    }

    /// The criteria this filter was built with.
    #[must_use]
    pub fn criteria(&self) -> &Criteria {
        &self.criteria
    }

    /// `true` if this node forces a recomputation: structural changes
    /// always do, component flips only when the component is in the
    /// interest set. Predicate criteria are conservative and never skip.
    fn breaks_cache(&self, node: &Version) -> bool {
        match node.component() {
            None => true,
            Some(component) => {
                matches!(self.criteria, Criteria::Predicate(_)) || self.interest.contains(component)
            }
        }
    }

    /// Brings the cache up to date. Walks the version chain from the
    /// cursor, stepping over irrelevant nodes; if the cursor then differs
    /// from the set's current version, rescans.
    ///
    /// Returns `true` if a full scan was performed, `false` if the cached
    /// result was still valid.
    pub fn refresh(&mut self, entities: &EntitySet, components: &ComponentRegistry) -> bool {
        while let Some(next) = self.last_seen.next() {
            if self.breaks_cache(&next) {
                break;
            }
            self.last_seen = next;
        }

        let current = entities.version();
        if Rc::ptr_eq(&self.last_seen, &current) {
            return false;
        }

        let cached = entities.filter(|entity| self.criteria.matches(entity, components));
        trace!(matched = cached.len(), "filter cache recomputed");
        self.cached = cached;
        self.last_seen = current;
        true
    }

    /// The matching entities, recomputed only if a relevant change occurred
    /// since the last call.
    pub fn entities(&mut self, entities: &EntitySet, components: &ComponentRegistry) -> &[Entity] {
        self.refresh(entities, components);
        &self.cached
    }

    /// Invokes `f` once per matching entity, in entity-set order.
    pub fn for_each(
        &mut self,
        entities: &EntitySet,
        components: &ComponentRegistry,
        mut f: impl FnMut(EntityRef<'_>),
    ) {
        self.refresh(entities, components);
        for entity in &self.cached {
            f(EntityRef::new(*entity, components));
        }
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filter")
            .field("criteria", &self.criteria)
            .field("cached", &self.cached)
            .finish()
    }
}

/// One-shot uncached query: applies `criteria` across the current entities.
/// Suitable for queries that do not run repeatedly; looping callers should
/// hold a [`Filter`] instead.
#[must_use]
pub fn scan(
    entities: &EntitySet,
    components: &ComponentRegistry,
    criteria: &Criteria,
) -> Vec<Entity> {
    entities.filter(|entity| criteria.matches(entity, components))
}
