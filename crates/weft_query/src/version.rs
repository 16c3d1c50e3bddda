//! Append-only version chain.
//!
//! Every structural change to the world appends one node. A node's `next`
//! link is assigned exactly once, when the node is superseded; the chain is
//! singly linked and only ever walked forward. Filters keep an `Rc` cursor
//! into the chain, so nodes older than every live cursor are reclaimed by
//! reference counting.
//!
//! Shared ownership is single-threaded (`Rc` + `RefCell`) to match the
//! store's execution model.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use weft_component::Entity;

/// One change marker in the chain.
///
/// A node with no component name records a structural change (entity added
/// or removed); a node carrying a component name records that the named
/// component was gained or lost by some entity.
pub struct Version {
    entity: Option<Entity>,
    component: Option<String>,
    next: RefCell<Option<Rc<Version>>>,
}

impl Version {
    /// An initial node carrying no change. Every [`EntitySet`] starts from
    /// one, and detached filters use one as a never-current cursor.
    ///
    /// [`EntitySet`]: crate::EntitySet
    #[must_use]
    pub fn root() -> Rc<Self> {
        Rc::new(Self {
            entity: None,
            component: None,
            next: RefCell::new(None),
        })
    }

    /// Appends a node describing the change that just occurred and links it
    /// as this node's successor. O(1); `next` is set exactly once.
    pub fn supersede(
        self: &Rc<Self>,
        entity: Option<Entity>,
        component: Option<String>,
    ) -> Rc<Self> {
        let node = Rc::new(Self {
            entity,
            component,
            next: RefCell::new(None),
        });
        *self.next.borrow_mut() = Some(Rc::clone(&node));
        node
    }

    /// The successor node, if this node has been superseded.
    #[must_use]
    pub fn next(&self) -> Option<Rc<Version>> {
        self.next.borrow().clone()
    }

    /// The component whose presence changed, or `None` for a structural
    /// change.
    #[must_use]
    pub fn component(&self) -> Option<&str> {
        self.component.as_deref()
    }

    /// The entity involved in the change, when known.
    #[must_use]
    pub fn entity(&self) -> Option<Entity> {
        self.entity
    }

    /// `true` if this node records an entity add/remove rather than a
    /// single component flip.
    #[must_use]
    pub fn is_structural(&self) -> bool {
        self.component.is_none()
    }
}

impl fmt::Debug for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Version")
            .field("entity", &self.entity)
            .field("component", &self.component)
            .field("superseded", &self.next.borrow().is_some())
            .finish()
    }
}
