//! Trait machines: state machines whose trait set follows their state
//!
//! ```text
//! traits = stateless_traits ∪ stateful_traits[state]
//! ```
//!
//! `traits` is recomputed on every successful [`TraitMachine::flux_to`] and
//! left untouched when a transition is refused.

use indexmap::IndexMap;
use std::fmt;

use super::table::TransitionTable;
use super::world::EntityId;
use crate::bag::{Bag, fresh_name};
use crate::token::{self, Token};
use crate::traitset::{Composition, TraitSet, Traited};

/// Name given to machines built without one
pub const DEFAULT_NAME: &str = "thing";

/// The composite entity: a transition table plus a per-state trait overlay.
///
/// Parent and child links are [`EntityId`] handles into a
/// [`World`](super::World); they never keep the other machine alive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraitMachine<S: Token, T: Token, K: Token = T> {
    name: String,
    states: TransitionTable<S>,
    state: S,
    stateless_traits: TraitSet<T>,
    stateful_traits: IndexMap<S, TraitSet<T>>,
    traits: TraitSet<T>,
    pub bag: Bag<K>,
    pub(crate) children: Vec<EntityId>,
    pub(crate) parent: Option<EntityId>,
}

impl<S: Token, T: Token, K: Token> TraitMachine<S, T, K> {
    /// Start building a machine whose initial state is `first`
    pub fn builder(first: S) -> TraitMachineBuilder<S, T, K> {
        TraitMachineBuilder::new(first)
    }

    /// Move to `to` if the table allows it, then recompute the trait set.
    ///
    /// Returns `false` and changes nothing when the transition is not listed.
    pub fn flux_to(&mut self, to: S) -> bool {
        if !self.states.allows(&self.state, &to) {
            log::debug!(
                "{}: no transition {} -> {}",
                self.name,
                token::label(&self.state),
                token::label(&to)
            );
            return false;
        }
        self.state = to;
        self.traits = self.derive_traits(&self.state);
        log::debug!("{}: now {} with traits {}", self.name, token::label(&self.state), self.traits);
        true
    }

    /// The trait set this machine would hold in `state`
    pub fn derive_traits(&self, state: &S) -> TraitSet<T> {
        match self.stateful_traits.get(state) {
            Some(overlay) => self.stateless_traits.union(overlay),
            None => self.stateless_traits.clone(),
        }
    }

    pub fn can_flux_to(&self, to: &S) -> bool {
        self.states.allows(&self.state, to)
    }

    pub fn successors(&self) -> impl Iterator<Item = &S> {
        self.states.successors(&self.state)
    }

    pub fn is_stuck(&self) -> bool {
        self.states.is_terminal(&self.state)
    }

    /// True when neither the stateless set nor any per-state overlay holds a token
    pub fn is_traitless(&self) -> bool {
        self.stateless_traits.is_empty() && self.stateful_traits.values().all(TraitSet::is_empty)
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn states(&self) -> &TransitionTable<S> {
        &self.states
    }

    pub fn stateless_traits(&self) -> &TraitSet<T> {
        &self.stateless_traits
    }

    pub fn stateful_traits(&self) -> &IndexMap<S, TraitSet<T>> {
        &self.stateful_traits
    }

    pub fn children(&self) -> &[EntityId] {
        &self.children
    }

    pub fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    /// Copy every field under a new identity.
    ///
    /// Child and parent handles are copied as-is; the bag is an independent copy.
    pub fn clone_as(&self, name: Option<String>) -> Self {
        let mut copy = self.clone();
        copy.name = name.unwrap_or_else(fresh_name);
        copy
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    /// Jump straight to `state`, bypassing the table. Only used by restores.
    pub(crate) fn force_state(&mut self, state: S) {
        self.traits = self.derive_traits(&state);
        self.state = state;
    }
}

impl<S: Token, T: Token, K: Token> Traited<T> for TraitMachine<S, T, K> {
    fn name(&self) -> &str {
        &self.name
    }

    fn traits(&self) -> &TraitSet<T> {
        &self.traits
    }

    fn state_label(&self) -> Option<String> {
        Some(token::label(&self.state))
    }
}

impl<S: Token, T: Token, K: Token> fmt::Display for TraitMachine<S, T, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Builder for [`TraitMachine`]
#[derive(Debug, Clone)]
pub struct TraitMachineBuilder<S: Token, T: Token, K: Token = T> {
    name: String,
    first: S,
    final_state: Option<S>,
    edges: Vec<(S, Vec<S>)>,
    composition: Composition<T>,
    stateful: Vec<(S, TraitSet<T>)>,
    bag: Bag<K>,
}

impl<S: Token, T: Token, K: Token> TraitMachineBuilder<S, T, K> {
    pub fn new(first: S) -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            first,
            final_state: None,
            edges: Vec::new(),
            composition: Composition::new(),
            stateful: Vec::new(),
            bag: Bag::new(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Declare the terminal state
    pub fn final_state(mut self, state: S) -> Self {
        self.final_state = Some(state);
        self
    }

    pub fn transition(mut self, from: S, to: impl IntoIterator<Item = S>) -> Self {
        self.edges.push((from, to.into_iter().collect()));
        self
    }

    pub fn transitions<J>(mut self, edges: impl IntoIterator<Item = (S, J)>) -> Self
    where
        J: IntoIterator<Item = S>,
    {
        self.edges
            .extend(edges.into_iter().map(|(from, to)| (from, to.into_iter().collect())));
        self
    }

    pub fn stereotype(mut self, stereotype: impl AsRef<TraitSet<T>>) -> Self {
        self.composition = self.composition.stereotype(stereotype);
        self
    }

    pub fn include(mut self, tokens: impl IntoIterator<Item = T>) -> Self {
        self.composition = self.composition.include(tokens);
        self
    }

    pub fn exclude(mut self, tokens: impl IntoIterator<Item = T>) -> Self {
        self.composition = self.composition.exclude(tokens);
        self
    }

    /// Traits that only apply while the machine is in `state`
    pub fn stateful(mut self, state: S, tokens: impl IntoIterator<Item = T>) -> Self {
        self.stateful.push((state, tokens.into_iter().collect()));
        self
    }

    pub fn bag(mut self, bag: Bag<K>) -> Self {
        self.bag = bag;
        self
    }

    pub fn build(self) -> TraitMachine<S, T, K> {
        let mut states = TransitionTable::new(self.edges, self.final_state.clone());
        if states.ensure_state(&self.first) {
            log::warn!(
                "{} starts in {} which has no transitions declared",
                self.name,
                token::label(&self.first)
            );
        }

        let mut stateful_traits = IndexMap::new();
        stateful_traits.insert(self.first.clone(), TraitSet::new());
        if let Some(last) = &self.final_state {
            stateful_traits.insert(last.clone(), TraitSet::new());
        }
        stateful_traits.extend(self.stateful);

        let stateless_traits = self.composition.build();
        let traits = match stateful_traits.get(&self.first) {
            Some(overlay) => stateless_traits.union(overlay),
            None => stateless_traits.clone(),
        };

        let machine = TraitMachine {
            name: self.name,
            states,
            state: self.first,
            stateless_traits,
            stateful_traits,
            traits,
            bag: self.bag,
            children: Vec::new(),
            parent: None,
        };

        if machine.is_traitless() {
            log::warn!("{} has no traits!", machine.name);
        }

        machine
    }
}
