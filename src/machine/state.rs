//! Plain state machine without traits

use std::fmt;

use super::table::TransitionTable;
use crate::bag::fresh_name;
use crate::token::{self, Token};

/// A finite state machine driven by a fixed [`TransitionTable`].
///
/// The only way to change `state` is [`StateMachine::flux_to`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateMachine<S: Token> {
    name: String,
    states: TransitionTable<S>,
    state: S,
}

impl<S: Token> StateMachine<S> {
    /// Create a machine in `first`. A missing name becomes a fresh UUID.
    ///
    /// If `first` is not in the table it is added as a terminal state and a
    /// warning is logged; the machine is then stuck but still valid.
    pub fn new(name: Option<String>, mut states: TransitionTable<S>, first: S) -> Self {
        let name = name.unwrap_or_else(fresh_name);
        if states.ensure_state(&first) {
            log::warn!(
                "{} starts in {} which has no transitions declared",
                name,
                token::label(&first)
            );
        }
        Self { name, states, state: first }
    }

    /// Move to `to` if the table allows it from the current state.
    ///
    /// Returns `false` and leaves the machine untouched otherwise.
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
        log::debug!("{}: {} -> {}", self.name, token::label(&self.state), token::label(&to));
        self.state = to;
        true
    }

    pub fn can_flux_to(&self, to: &S) -> bool {
        self.states.allows(&self.state, to)
    }

    pub fn successors(&self) -> impl Iterator<Item = &S> {
        self.states.successors(&self.state)
    }

    /// No outgoing transitions from the current state
    pub fn is_stuck(&self) -> bool {
        self.states.is_terminal(&self.state)
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn states(&self) -> &TransitionTable<S> {
        &self.states
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Copy this machine, current state included, under a new identity
    pub fn clone_as(&self, name: Option<String>) -> Self {
        Self {
            name: name.unwrap_or_else(fresh_name),
            states: self.states.clone(),
            state: self.state.clone(),
        }
    }
}

impl<S: Token> fmt::Display for StateMachine<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in {}", self.name, token::label(&self.state))
    }
}
