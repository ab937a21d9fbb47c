//! Capability and state tokens
//!
//! The runtime never looks inside a token. Consumers bring their own closed
//! enumerations (or plain strings for file-driven definitions) and the runtime
//! only compares, hashes and orders them.

use std::fmt::Debug;
use std::hash::Hash;

/// Marker for anything usable as a capability or state token.
///
/// `Ord` is required so that trait sets have one canonical ordering, which is
/// what makes them usable as exact-match dispatch keys.
pub trait Token: Clone + Eq + Hash + Ord + Debug {}

impl<T> Token for T where T: Clone + Eq + Hash + Ord + Debug {}

/// Render a token for diagnostics.
///
/// Strings are printed bare, enums through their `Debug` form.
pub fn label<T: Debug>(token: &T) -> String {
    let raw = format!("{:?}", token);
    raw.trim_matches('"').to_string()
}
