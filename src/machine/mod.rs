//! State machines and trait machines
//!
//! - [`TransitionTable`]: which state may follow which
//! - [`StateMachine`]: a bare FSM over a table
//! - [`TraitMachine`]: an FSM whose trait set follows its state
//! - [`World`]: arena owning machines and their non-owning hierarchy
//! - [`walk`]: pre-order traversal of that hierarchy
//! - [`Snapshot`]: what a caller needs to save and restore a machine

pub mod entity;
pub mod snapshot;
pub mod state;
pub mod table;
pub mod walk;
pub mod world;

pub use entity::{DEFAULT_NAME, TraitMachine, TraitMachineBuilder};
pub use snapshot::Snapshot;
pub use state::StateMachine;
pub use table::TransitionTable;
pub use walk::{Walk, WithDepth, walk};
pub use world::{EntityId, World};
