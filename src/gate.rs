//! Capability gates
//!
//! A gate wraps a behavior `(actor, target)` and runs it only while the target
//! holds the required trait. A refused call is a no-op that logs a warning and
//! reports [`GateOutcome::Refused`]; it is never an error.
//!
//! # Example
//!
//! ```
//! use traitflux::gate::{can, GateOutcome};
//! use traitflux::machine::TraitMachine;
//!
//! type Pot = TraitMachine<&'static str, &'static str>;
//!
//! let mut pot: Pot = TraitMachine::builder("cold")
//!     .name("pot")
//!     .transition("cold", ["hot"])
//!     .stateful("hot", ["pourable"])
//!     .build();
//!
//! let mut pour = can("pourable", "pour", |poured: &mut u32, _pot: &mut Pot| {
//!     *poured += 1;
//! });
//!
//! let mut poured = 0;
//! assert!(matches!(pour.invoke(&mut poured, &mut pot), GateOutcome::Refused { .. }));
//! pot.flux_to("hot");
//! assert!(pour.invoke(&mut poured, &mut pot).is_performed());
//! assert_eq!(poured, 1);
//! ```

use std::fmt;

use crate::token::Token;
use crate::traitset::Traited;

/// What happened when a gated behavior was called
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// The target held the trait and the behavior ran
    Performed,
    /// The target lacked the trait; nothing ran
    Refused { message: String },
}

impl GateOutcome {
    pub fn is_performed(&self) -> bool {
        matches!(self, GateOutcome::Performed)
    }

    pub fn is_refused(&self) -> bool {
        !self.is_performed()
    }
}

impl fmt::Display for GateOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateOutcome::Performed => write!(f, "performed"),
            GateOutcome::Refused { message } => write!(f, "refused: {}", message),
        }
    }
}

/// Check `target` against `required` without running anything.
///
/// On refusal the diagnostic is logged at warn level and returned.
pub fn check<T: Token, X: Traited<T> + ?Sized>(required: &T, behavior: &str, target: &X) -> GateOutcome {
    if target.has_trait(required) {
        return GateOutcome::Performed;
    }

    let message = match target.state_label() {
        Some(state) => format!("{} isn't available while {} {}", behavior, target.name(), state),
        None => format!("{} isn't available for {}", behavior, target.name()),
    };
    log::warn!("{}", message);
    GateOutcome::Refused { message }
}

/// A behavior that only runs while its target holds `required`
pub struct Gated<T: Token, F> {
    required: T,
    behavior: String,
    action: F,
}

/// Wrap a two-argument behavior in a gate on `required`
pub fn can<T, A, X, F>(required: T, behavior: impl Into<String>, action: F) -> Gated<T, F>
where
    T: Token,
    X: Traited<T>,
    F: FnMut(&mut A, &mut X),
{
    Gated {
        required,
        behavior: behavior.into(),
        action,
    }
}

/// Like [`can`], for behaviors that take extra arguments
pub fn can_with<T, A, X, Args, F>(required: T, behavior: impl Into<String>, action: F) -> Gated<T, F>
where
    T: Token,
    X: Traited<T>,
    F: FnMut(&mut A, &mut X, Args),
{
    Gated {
        required,
        behavior: behavior.into(),
        action,
    }
}

impl<T: Token, F> Gated<T, F> {
    pub fn invoke<A, X>(&mut self, actor: &mut A, target: &mut X) -> GateOutcome
    where
        X: Traited<T>,
        F: FnMut(&mut A, &mut X),
    {
        let outcome = check(&self.required, &self.behavior, &*target);
        if outcome.is_performed() {
            (self.action)(actor, target);
        }
        outcome
    }

    pub fn invoke_with<A, X, Args>(&mut self, actor: &mut A, target: &mut X, args: Args) -> GateOutcome
    where
        X: Traited<T>,
        F: FnMut(&mut A, &mut X, Args),
    {
        let outcome = check(&self.required, &self.behavior, &*target);
        if outcome.is_performed() {
            (self.action)(actor, target, args);
        }
        outcome
    }

    pub fn required(&self) -> &T {
        &self.required
    }

    pub fn behavior(&self) -> &str {
        &self.behavior
    }
}

impl<T: Token, F> fmt::Debug for Gated<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gated")
            .field("required", &self.required)
            .field("behavior", &self.behavior)
            .finish_non_exhaustive()
    }
}
