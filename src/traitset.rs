//! Trait sets and their composition from stereotypes
//!
//! A trait set is computed once from three ingredients:
//!
//! ```text
//! traits = (stereotype_1 ∪ ... ∪ stereotype_n ∪ includes) − excludes
//! ```
//!
//! Excludes are applied last, so an excluded token never survives even when a
//! stereotype reintroduces it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::token::{self, Token};

/// An ordered set of capability tokens.
///
/// The ordering is canonical, so two sets holding the same tokens compare and
/// hash equal no matter how they were built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
#[serde(bound(serialize = "T: Serialize", deserialize = "T: Deserialize<'de> + Ord"))]
pub struct TraitSet<T: Ord>(BTreeSet<T>);

impl<T: Token> TraitSet<T> {
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    pub fn contains(&self, token: &T) -> bool {
        self.0.contains(token)
    }

    /// Returns `true` if the token was not already present
    pub fn insert(&mut self, token: T) -> bool {
        self.0.insert(token)
    }

    /// Returns `true` if the token was present
    pub fn remove(&mut self, token: &T) -> bool {
        self.0.remove(token)
    }

    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self(self.0.union(&other.0).cloned().collect())
    }

    #[must_use]
    pub fn difference(&self, other: &Self) -> Self {
        Self(self.0.difference(&other.0).cloned().collect())
    }

    pub fn is_subset(&self, other: &Self) -> bool {
        self.0.is_subset(&other.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.0.iter()
    }

    /// Token labels in canonical order, for display and serialization to text
    pub fn labels(&self) -> Vec<String> {
        self.0.iter().map(token::label).collect()
    }
}

impl<T: Token> Default for TraitSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Token> FromIterator<T> for TraitSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<T: Token> Extend<T> for TraitSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl<T: Token> IntoIterator for TraitSet<T> {
    type Item = T;
    type IntoIter = std::collections::btree_set::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a, T: Token> IntoIterator for &'a TraitSet<T> {
    type Item = &'a T;
    type IntoIter = std::collections::btree_set::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<T: Token, const N: usize> From<[T; N]> for TraitSet<T> {
    fn from(tokens: [T; N]) -> Self {
        tokens.into_iter().collect()
    }
}

impl<T: Token> fmt::Display for TraitSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.labels().join(", "))
    }
}

/// A named, reusable group of capability tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(serialize = "T: Serialize", deserialize = "T: Deserialize<'de> + Ord"))]
pub struct Stereotype<T: Ord> {
    pub name: String,
    pub traits: TraitSet<T>,
}

impl<T: Token> Stereotype<T> {
    pub fn new(name: impl Into<String>, traits: impl IntoIterator<Item = T>) -> Self {
        Self {
            name: name.into(),
            traits: traits.into_iter().collect(),
        }
    }
}

impl<T: Token> AsRef<TraitSet<T>> for Stereotype<T> {
    fn as_ref(&self) -> &TraitSet<T> {
        &self.traits
    }
}

impl<T: Token> AsRef<TraitSet<T>> for TraitSet<T> {
    fn as_ref(&self) -> &TraitSet<T> {
        self
    }
}

/// Anything that currently holds a trait set.
///
/// Gates and dispatch registries only ever see their targets through this.
pub trait Traited<T: Token> {
    /// Identity label used in diagnostics
    fn name(&self) -> &str;

    fn traits(&self) -> &TraitSet<T>;

    /// Current lifecycle state, if the entity has one
    fn state_label(&self) -> Option<String> {
        None
    }

    fn has_trait(&self, token: &T) -> bool {
        self.traits().contains(token)
    }
}

/// A bare trait set can be dispatched on directly.
impl<T: Token> Traited<T> for TraitSet<T> {
    fn name(&self) -> &str {
        "traits"
    }

    fn traits(&self) -> &TraitSet<T> {
        self
    }
}

/// Compose a trait set: union of all stereotypes and includes, minus excludes.
///
/// Never fails; the result may be empty.
pub fn compose<'a, T, S>(
    stereotypes: impl IntoIterator<Item = &'a S>,
    includes: &TraitSet<T>,
    excludes: &TraitSet<T>,
) -> TraitSet<T>
where
    T: Token + 'a,
    S: AsRef<TraitSet<T>> + ?Sized + 'a,
{
    let mut traits: TraitSet<T> = stereotypes
        .into_iter()
        .flat_map(|s| s.as_ref().iter().cloned())
        .collect();
    traits.extend(includes.iter().cloned());
    traits.difference(excludes)
}

/// Builder form of [`compose`], used by the entity constructors
#[derive(Debug, Clone)]
pub struct Composition<T: Ord> {
    stereotypes: Vec<TraitSet<T>>,
    includes: TraitSet<T>,
    excludes: TraitSet<T>,
}

impl<T: Token> Composition<T> {
    pub fn new() -> Self {
        Self {
            stereotypes: Vec::new(),
            includes: TraitSet::new(),
            excludes: TraitSet::new(),
        }
    }

    pub fn stereotype(mut self, stereotype: impl AsRef<TraitSet<T>>) -> Self {
        self.stereotypes.push(stereotype.as_ref().clone());
        self
    }

    pub fn include(mut self, tokens: impl IntoIterator<Item = T>) -> Self {
        self.includes.extend(tokens);
        self
    }

    pub fn exclude(mut self, tokens: impl IntoIterator<Item = T>) -> Self {
        self.excludes.extend(tokens);
        self
    }

    pub fn build(&self) -> TraitSet<T> {
        compose(&self.stereotypes, &self.includes, &self.excludes)
    }
}

impl<T: Token> Default for Composition<T> {
    fn default() -> Self {
        Self::new()
    }
}
