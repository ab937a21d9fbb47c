//! Entity trait/state runtime
//!
//! Entities are bags of capability tokens ("traits") whose shape changes as
//! they move through discrete lifecycle states. Behavior is gated on those
//! traits or routed by the exact set an entity currently holds.
//!
//! - [`traitset`]: trait sets, stereotypes and composition
//! - [`bag`]: quantity multisets and stateless [`TraitBag`]s
//! - [`machine`]: transition tables, state machines, trait machines and the
//!   [`World`] arena that holds their hierarchy
//! - [`gate`]: run a behavior only while the target holds a trait
//! - [`dispatch`]: route a call by exact trait set
//! - [`definition`]: build string-token worlds from YAML files

pub mod bag;
pub mod config;
pub mod definition;
pub mod dispatch;
pub mod error;
pub mod gate;
pub mod machine;
pub mod token;
pub mod traitset;

pub use bag::{Bag, TraitBag};
pub use dispatch::{FnDispatch, MethodDispatch};
pub use error::{DefinitionError, DispatchError, MachineError};
pub use gate::{GateOutcome, Gated, can, can_with};
pub use machine::{EntityId, StateMachine, TraitMachine, TransitionTable, World, walk};
pub use token::Token;
pub use traitset::{Composition, Stereotype, TraitSet, Traited, compose};
