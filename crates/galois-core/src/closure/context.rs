//! Formal contexts: objects, attributes, and an incidence relation.
//!
//! A context closes sets of attributes: `closure(X)` is the set of attributes
//! shared by every object having all attributes of `X`. Generated concepts
//! carry the closed attribute set as extent (the ordered closed set) and the
//! objects having those attributes as intent.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::closure::ClosureSystem;
use crate::lattice::concept::Concept;
use crate::set::ComparableSet;

/// A binary relation between objects and attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "ContextFile<T>",
    bound(deserialize = "T: Ord + Clone + Deserialize<'de>")
)]
pub struct Context<T> {
    objects: ComparableSet<T>,
    attributes: ComparableSet<T>,
    /// Object → attributes it has.
    incidence: BTreeMap<T, ComparableSet<T>>,
}

/// On-disk shape; objects and attributes named only in `incidence` join
/// the context.
#[derive(Deserialize)]
#[serde(bound(deserialize = "T: Ord + Deserialize<'de>"))]
struct ContextFile<T> {
    #[serde(default)]
    objects: ComparableSet<T>,
    #[serde(default)]
    attributes: ComparableSet<T>,
    #[serde(default)]
    incidence: BTreeMap<T, ComparableSet<T>>,
}

impl<T: Ord + Clone> From<ContextFile<T>> for Context<T> {
    fn from(file: ContextFile<T>) -> Self {
        let mut context = Self::new();
        for object in file.objects {
            context.add_object(object);
        }
        for attribute in file.attributes {
            context.add_attribute(attribute);
        }
        for (object, attributes) in file.incidence {
            for attribute in attributes {
                context.add_incidence(object.clone(), attribute);
            }
        }
        context
    }
}

impl<T: Ord + Clone> Default for Context<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord + Clone> Context<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            objects: ComparableSet::new(),
            attributes: ComparableSet::new(),
            incidence: BTreeMap::new(),
        }
    }

    /// Returns `true` if the object was new.
    pub fn add_object(&mut self, object: T) -> bool {
        self.objects.insert(object)
    }

    /// Returns `true` if the attribute was new.
    pub fn add_attribute(&mut self, attribute: T) -> bool {
        self.attributes.insert(attribute)
    }

    /// Relate `object` to `attribute`, adding either if missing.
    pub fn add_incidence(&mut self, object: T, attribute: T) -> bool {
        self.objects.insert(object.clone());
        self.attributes.insert(attribute.clone());
        self.incidence.entry(object).or_default().insert(attribute)
    }

    #[must_use]
    pub fn has(&self, object: &T, attribute: &T) -> bool {
        self.incidence
            .get(object)
            .is_some_and(|attributes| attributes.contains(attribute))
    }

    #[must_use]
    pub const fn objects(&self) -> &ComparableSet<T> {
        &self.objects
    }

    #[must_use]
    pub const fn attributes(&self) -> &ComparableSet<T> {
        &self.attributes
    }

    /// Attributes of one object.
    #[must_use]
    pub fn attributes_of(&self, object: &T) -> ComparableSet<T> {
        self.incidence.get(object).cloned().unwrap_or_default()
    }

    /// Objects having every attribute of `attributes`.
    #[must_use]
    pub fn objects_with(&self, attributes: &ComparableSet<T>) -> ComparableSet<T> {
        self.objects
            .iter()
            .filter(|object| {
                self.incidence
                    .get(*object)
                    .map_or(attributes.is_empty(), |own| own.is_superset(attributes))
            })
            .cloned()
            .collect()
    }

    /// Attributes shared by every object of `objects`.
    #[must_use]
    pub fn attributes_shared_by(&self, objects: &ComparableSet<T>) -> ComparableSet<T> {
        let mut shared = self.attributes.clone();
        for object in objects {
            let own = self.attributes_of(object);
            shared.retain(|attribute| own.contains(attribute));
        }
        shared
    }
}

impl<T: Ord + Clone + fmt::Debug> ClosureSystem for Context<T> {
    type Element = T;

    fn ground_set(&self) -> ComparableSet<T> {
        self.attributes.clone()
    }

    fn closure(&self, set: &ComparableSet<T>) -> ComparableSet<T> {
        // Attributes outside the context stay in the closure, keeping the
        // operator extensive for any input.
        let mut closed = self.attributes_shared_by(&self.objects_with(set));
        closed.extend(set.iter().cloned());
        closed
    }

    fn concept(&self, closed: ComparableSet<T>) -> Concept<T> {
        let objects = self.objects_with(&closed);
        Concept::new(closed, objects)
    }
}

impl<T: fmt::Display + Ord + Clone> fmt::Display for Context<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for object in &self.objects {
            writeln!(f, "{object}: {}", self.attributes_of(object))?;
        }
        Ok(())
    }
}
