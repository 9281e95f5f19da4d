//! Implicational systems: rules `premise → conclusion` over a universe.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::closure::ClosureSystem;
use crate::set::ComparableSet;

/// One implication `premise → conclusion`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Ord + Deserialize<'de>"))]
pub struct Rule<T> {
    pub premise: ComparableSet<T>,
    pub conclusion: ComparableSet<T>,
}

impl<T: Ord> Rule<T> {
    #[must_use]
    pub const fn new(premise: ComparableSet<T>, conclusion: ComparableSet<T>) -> Self {
        Self {
            premise,
            conclusion,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Rule<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.premise, self.conclusion)
    }
}

/// A universe of elements and a list of implications between them.
///
/// The closure of a set is the least superset closed under every rule,
/// computed by forward chaining.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "ImplicationsFile<T>",
    bound(deserialize = "T: Ord + Clone + Deserialize<'de>")
)]
pub struct ImplicationalSystem<T> {
    #[serde(rename = "elements")]
    universe: ComparableSet<T>,
    rules: Vec<Rule<T>>,
}

/// On-disk shape; elements mentioned only by rules join the universe.
#[derive(Deserialize)]
#[serde(bound(deserialize = "T: Ord + Deserialize<'de>"))]
struct ImplicationsFile<T> {
    #[serde(default)]
    elements: ComparableSet<T>,
    #[serde(default)]
    rules: Vec<Rule<T>>,
}

impl<T: Ord + Clone> From<ImplicationsFile<T>> for ImplicationalSystem<T> {
    fn from(file: ImplicationsFile<T>) -> Self {
        let mut system = Self::with_universe(file.elements);
        for rule in file.rules {
            system.add_rule(rule.premise, rule.conclusion);
        }
        system
    }
}

impl<T: Ord + Clone> Default for ImplicationalSystem<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord + Clone> ImplicationalSystem<T> {
    /// An empty system: no elements, no rules.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            universe: ComparableSet::new(),
            rules: Vec::new(),
        }
    }

    /// A system over `universe` without rules: every subset is closed.
    #[must_use]
    pub const fn with_universe(universe: ComparableSet<T>) -> Self {
        Self {
            universe,
            rules: Vec::new(),
        }
    }

    /// Add an element to the universe; returns `true` if it was new.
    pub fn add_element(&mut self, element: T) -> bool {
        self.universe.insert(element)
    }

    /// Add the rule `premise → conclusion`; its elements join the universe.
    ///
    /// Returns `false` when the identical rule is already present.
    pub fn add_rule(&mut self, premise: ComparableSet<T>, conclusion: ComparableSet<T>) -> bool {
        self.universe.extend(premise.iter().cloned());
        self.universe.extend(conclusion.iter().cloned());
        let rule = Rule::new(premise, conclusion);
        if self.rules.contains(&rule) {
            return false;
        }
        self.rules.push(rule);
        true
    }

    #[must_use]
    pub const fn universe(&self) -> &ComparableSet<T> {
        &self.universe
    }

    #[must_use]
    pub fn rules(&self) -> &[Rule<T>] {
        &self.rules
    }
}

impl<T: Ord + Clone + fmt::Debug> ClosureSystem for ImplicationalSystem<T> {
    type Element = T;

    fn ground_set(&self) -> ComparableSet<T> {
        self.universe.clone()
    }

    fn closure(&self, set: &ComparableSet<T>) -> ComparableSet<T> {
        let mut closed = set.clone();
        let mut changed = true;
        while changed {
            changed = false;
            for rule in &self.rules {
                if closed.is_superset(&rule.premise) && !closed.is_superset(&rule.conclusion) {
                    closed.extend(rule.conclusion.iter().cloned());
                    changed = true;
                }
            }
        }
        closed
    }
}

impl<T: fmt::Display> fmt::Display for ImplicationalSystem<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.universe)?;
        for rule in &self.rules {
            writeln!(f, "{rule}")?;
        }
        Ok(())
    }
}
