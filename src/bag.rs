//! Quantity bags and stateless trait bags
//!
//! A [`Bag`] counts resources (water, clicks, ...). A [`TraitBag`] is the
//! stateless prototype entity: a name, a composed trait set and a bag.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::token::{self, Token};
use crate::traitset::{Composition, TraitSet, Traited};

/// Fresh identity label for entities created without a name
pub fn fresh_name() -> String {
    Uuid::new_v4().to_string()
}

/// A multiset of tokens.
///
/// Counts never go below zero and zero-count entries are dropped, so two bags
/// holding the same quantities always compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
#[serde(bound(serialize = "K: Serialize + std::hash::Hash + Eq"))]
pub struct Bag<K: std::hash::Hash + Eq> {
    counts: IndexMap<K, u32>,
}

/// Goes through [`Bag::from_counts`] so stored zero counts are dropped
impl<'de, K: Token + Deserialize<'de>> Deserialize<'de> for Bag<K> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let counts = IndexMap::<K, u32>::deserialize(deserializer)?;
        Ok(Self::from_counts(counts))
    }
}

impl<K: Token> Bag<K> {
    pub fn new() -> Self {
        Self { counts: IndexMap::new() }
    }

    /// Build from explicit `(token, count)` pairs. Repeated tokens add up.
    pub fn from_counts(counts: impl IntoIterator<Item = (K, u32)>) -> Self {
        let mut bag = Self::new();
        for (key, n) in counts {
            bag.add(key, n);
        }
        bag
    }

    pub fn add(&mut self, key: K, n: u32) {
        if n == 0 {
            return;
        }
        let count = self.counts.entry(key).or_insert(0);
        *count = count.saturating_add(n);
    }

    /// Remove up to `n` of `key`, returning how many were actually removed
    pub fn take(&mut self, key: &K, n: u32) -> u32 {
        let Some(count) = self.counts.get_mut(key) else {
            return 0;
        };
        let taken = n.min(*count);
        *count -= taken;
        if *count == 0 {
            self.counts.shift_remove(key);
        }
        taken
    }

    pub fn count(&self, key: &K) -> u32 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.values().map(|&n| u64::from(n)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, u32)> {
        self.counts.iter().map(|(k, &n)| (k, n))
    }
}

impl<K: Token> Default for Bag<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Every occurrence counts once, like a counter over a sequence
impl<K: Token> FromIterator<K> for Bag<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        Self::from_counts(iter.into_iter().map(|k| (k, 1)))
    }
}

impl<K: Token> fmt::Display for Bag<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(k, n)| format!("{}: {}", token::label(k), n))
            .collect();
        write!(f, "{{{}}}", parts.join(", "))
    }
}

/// Stateless prototype entity.
///
/// Traits are composed once at construction and never change afterwards;
/// build one carefully and replicate it with [`TraitBag::clone_as`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraitBag<T: Token, K: Token = T> {
    name: String,
    traits: TraitSet<T>,
    pub bag: Bag<K>,
}

impl<T: Token, K: Token> TraitBag<T, K> {
    /// Create a bag from a composition. A missing name becomes a fresh UUID.
    pub fn new(name: Option<String>, composition: &Composition<T>, bag: Bag<K>) -> Self {
        let name = name.unwrap_or_else(fresh_name);
        let traits = composition.build();
        log::debug!("Created trait bag {} with traits {}", name, traits);
        Self { name, traits, bag }
    }

    /// Copy this bag under a new identity.
    ///
    /// The quantity bag is copied, so the clone and the original never share
    /// counts afterwards.
    pub fn clone_as(&self, name: Option<String>) -> Self {
        Self {
            name: name.unwrap_or_else(fresh_name),
            traits: self.traits.clone(),
            bag: self.bag.clone(),
        }
    }
}

impl<T: Token, K: Token> Traited<T> for TraitBag<T, K> {
    fn name(&self) -> &str {
        &self.name
    }

    fn traits(&self) -> &TraitSet<T> {
        &self.traits
    }
}

impl<T: Token, K: Token> fmt::Display for TraitBag<T, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}, {}", self.name, self.traits, self.bag)
    }
}
