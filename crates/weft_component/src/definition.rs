//! Component definitions — how instance data becomes a stored value.
//!
//! A definition is fixed when a component is (re)defined and never changes
//! classification mid-life. Each variant is one resolution rule, applied on
//! every `set`.

use std::fmt;

use serde_json::{Map, Value};

/// A boxed resolution closure for [`ComponentDefinition::Factory`].
///
/// The store is single-threaded, so no `Send + Sync` bounds are required.
pub type FactoryFn = Box<dyn Fn(Value) -> Value>;

/// The resolution rule for a named component.
pub enum ComponentDefinition {
    /// Every entity that has this component gets a clone of this exact
    /// value; instance data passed to `set` is ignored.
    Constant(Value),
    /// The closure is invoked per `set` and its result stored as-is.
    Factory(FactoryFn),
    /// Instance data is shallow-merged over a fresh copy of this map.
    /// Template keys absent from the instance data keep their defaults;
    /// the template itself is never mutated.
    Template(Map<String, Value>),
    /// Instance data is stored unmodified.
    Identity,
}

impl ComponentDefinition {
    /// A constant-valued component.
    #[must_use]
    pub fn constant(value: impl Into<Value>) -> Self {
        Self::Constant(value.into())
    }

    /// A factory-resolved component.
    #[must_use]
    pub fn factory(f: impl Fn(Value) -> Value + 'static) -> Self {
        Self::Factory(Box::new(f))
    }

    /// A template component with the given default fields.
    #[must_use]
    pub fn template(defaults: Map<String, Value>) -> Self {
        Self::Template(defaults)
    }

    /// Resolves instance data into the value that will be stored.
    #[must_use]
    pub fn resolve(&self, data: Value) -> Value {
        match self {
            Self::Constant(value) => value.clone(),
            Self::Factory(f) => f(data),
            Self::Template(defaults) => {
                let mut merged = defaults.clone();
                // Non-object instance data contributes nothing; the entity
                // simply gets the template defaults.
                if let Value::Object(overrides) = data {
                    for (key, value) in overrides {
                        merged.insert(key, value);
                    }
                }
                Value::Object(merged)
            }
            Self::Identity => data,
        }
    }
}

/// Permissive dispatch for definitions supplied as plain values: JSON
/// objects become templates, everything else degrades to a constant.
impl From<Value> for ComponentDefinition {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self::Template(map),
            other => Self::Constant(other),
        }
    }
}

impl fmt::Debug for ComponentDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
            Self::Factory(_) => f.write_str("Factory(..)"),
            Self::Template(defaults) => f.debug_tuple("Template").field(defaults).finish(),
            Self::Identity => f.write_str("Identity"),
        }
    }
}
