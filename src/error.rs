//! Hard failures of the runtime
//!
//! Refused transitions and refused gated behaviors are not errors: they come
//! back as `false` or [`GateOutcome::Refused`](crate::gate::GateOutcome).
//! What is left here is the short list of things a caller cannot recover from.

use thiserror::Error;

/// Errors raised by machines and worlds
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MachineError {
    #[error("Unknown state {state} for {name}")]
    UnknownState { name: String, state: String },
}

/// Errors raised by trait-set dispatch registries
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    /// The behavior matrix has no entry for this exact trait set
    #[error("No implementation of {operation} registered for traits {traits}")]
    NoImplementation { operation: String, traits: String },
}

/// Errors raised while turning a definition file into machines
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DefinitionError {
    #[error("Invalid token name '{0}'")]
    InvalidToken(String),

    #[error("Entity '{entity}' uses unknown stereotype '{stereotype}'")]
    UnknownStereotype { entity: String, stereotype: String },

    #[error("Entity '{entity}' declares child '{child}' which is not defined before it")]
    UnknownChild { entity: String, child: String },

    #[error("Entity '{0}' is defined more than once")]
    DuplicateEntity(String),

    #[error("Entity '{entity}' starts in '{state}' which is not in its transition table")]
    UnknownFirstState { entity: String, state: String },
}
