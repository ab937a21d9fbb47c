//! Transition tables
//!
//! A table maps each state to the states reachable from it in one step.
//! A state with no successors is terminal: every transition out of it fails,
//! including a transition to itself.

use indexmap::IndexMap;
use std::collections::BTreeSet;

use crate::token::{self, Token};

/// State → successor set, in declaration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionTable<S: Token> {
    edges: IndexMap<S, BTreeSet<S>>,
}

impl<S: Token> TransitionTable<S> {
    /// Build a table from `(state, successors)` pairs.
    ///
    /// A `final` state is always present; it has no successors unless the
    /// pairs list some for it explicitly. Every successor that is not itself
    /// declared becomes a terminal key, so a machine can never reach a state
    /// missing from its own table.
    pub fn new<I, J>(edges: I, final_state: Option<S>) -> Self
    where
        I: IntoIterator<Item = (S, J)>,
        J: IntoIterator<Item = S>,
    {
        let mut table = IndexMap::new();
        if let Some(last) = final_state {
            table.insert(last, BTreeSet::new());
        }
        for (state, successors) in edges {
            table.insert(state, successors.into_iter().collect::<BTreeSet<S>>());
        }

        let undeclared: BTreeSet<S> = table
            .values()
            .flatten()
            .filter(|s| !table.contains_key(*s))
            .cloned()
            .collect();
        for state in undeclared {
            log::debug!("State {} has no declared successors, treating it as terminal", token::label(&state));
            table.entry(state).or_default();
        }

        Self { edges: table }
    }

    /// Add a terminal key for `state` if the table does not know it yet.
    /// Returns `true` if the state had to be added.
    pub(crate) fn ensure_state(&mut self, state: &S) -> bool {
        if self.edges.contains_key(state) {
            return false;
        }
        self.edges.insert(state.clone(), BTreeSet::new());
        true
    }

    pub fn contains(&self, state: &S) -> bool {
        self.edges.contains_key(state)
    }

    /// Whether `to` is listed as a successor of `from`
    pub fn allows(&self, from: &S, to: &S) -> bool {
        self.edges.get(from).is_some_and(|next| next.contains(to))
    }

    pub fn successors(&self, state: &S) -> impl Iterator<Item = &S> {
        self.edges.get(state).into_iter().flatten()
    }

    pub fn is_terminal(&self, state: &S) -> bool {
        self.edges.get(state).is_none_or(|next| next.is_empty())
    }

    pub fn states(&self) -> impl Iterator<Item = &S> {
        self.edges.keys()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}
