//! Saving and restoring machine state
//!
//! The runtime does not persist anything itself. A [`Snapshot`] carries what a
//! caller needs to put a machine back where it was: name, state, bag and the
//! trait set it held.

use serde::{Deserialize, Serialize};

use super::entity::TraitMachine;
use crate::bag::Bag;
use crate::error::MachineError;
use crate::token::{self, Token};
use crate::traitset::{TraitSet, Traited};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "S: Serialize, T: Serialize, K: Serialize",
    deserialize = "S: Deserialize<'de>, T: Deserialize<'de> + Token, K: Deserialize<'de> + Token"
))]
pub struct Snapshot<S, T: Token, K: Token> {
    pub name: String,
    pub state: S,
    pub bag: Bag<K>,
    pub traits: TraitSet<T>,
}

impl<S: Token, T: Token, K: Token> TraitMachine<S, T, K> {
    pub fn snapshot(&self) -> Snapshot<S, T, K> {
        Snapshot {
            name: self.name().to_string(),
            state: self.state().clone(),
            bag: self.bag.clone(),
            traits: self.traits().clone(),
        }
    }

    /// Put this machine into the snapshot's name, state and bag.
    ///
    /// Traits are derived again from this machine's own tables; a stored set
    /// that disagrees is logged and ignored.
    pub fn restore(&mut self, snapshot: &Snapshot<S, T, K>) -> Result<(), MachineError> {
        if !self.states().contains(&snapshot.state) {
            return Err(MachineError::UnknownState {
                name: self.name().to_string(),
                state: token::label(&snapshot.state),
            });
        }

        self.set_name(snapshot.name.clone());
        self.force_state(snapshot.state.clone());
        self.bag = snapshot.bag.clone();

        if *self.traits() != snapshot.traits {
            log::warn!(
                "{}: stored traits {} differ from derived {}",
                self.name(),
                snapshot.traits,
                self.traits()
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lamp() -> TraitMachine<String, String> {
        TraitMachine::builder("off".to_string())
            .name("lamp")
            .transition("off".to_string(), ["on".to_string()])
            .transition("on".to_string(), ["off".to_string()])
            .include(["switchable".to_string()])
            .stateful("on".to_string(), ["lit".to_string()])
            .build()
    }

    #[test]
    fn test_snapshot_roundtrip_through_json() {
        let mut original = lamp();
        original.flux_to("on".to_string());
        original.bag.add("hours".to_string(), 3);

        let json = serde_json::to_string(&original.snapshot()).unwrap();
        let snapshot: Snapshot<String, String, String> = serde_json::from_str(&json).unwrap();

        let mut restored = lamp();
        restored.restore(&snapshot).unwrap();
        assert_eq!(restored.state(), "on");
        assert!(restored.has_trait(&"lit".to_string()));
        assert_eq!(restored.bag.count(&"hours".to_string()), 3);
    }

    #[test]
    fn test_restore_unknown_state_fails() {
        let mut machine = lamp();
        let mut snapshot = machine.snapshot();
        snapshot.state = "exploded".to_string();

        let err = machine.restore(&snapshot).unwrap_err();
        assert!(matches!(err, MachineError::UnknownState { .. }));
        assert_eq!(machine.state(), "off");
    }

    #[test]
    fn test_restore_rederives_traits() {
        let mut machine = lamp();
        let mut snapshot = machine.snapshot();
        snapshot.state = "on".to_string();
        snapshot.traits = TraitSet::new();

        machine.restore(&snapshot).unwrap();
        assert!(machine.has_trait(&"lit".to_string()));
    }
}
