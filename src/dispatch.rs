//! Exact trait-set dispatch
//!
//! A registry maps one exact, unordered set of tokens to one implementation.
//! A call is routed by the trait set its first argument holds *right now*:
//!
//! ```text
//! registered: {working}            -> a
//!             {working, selected}  -> b
//!
//! caller {working, selected}  -> b     (never a, there is no subset matching)
//! caller {working, broken}    -> Err(NoImplementation)
//! ```
//!
//! A miss is a hard error: registries are expected to be filled in completely
//! ahead of time.

use std::collections::HashMap;
use std::fmt;

use crate::error::DispatchError;
use crate::token::Token;
use crate::traitset::{TraitSet, Traited};

type Handler<X, Args, R> = Box<dyn Fn(&mut X, Args) -> R>;
type MethodHandler<Recv, X, Args, R> = Box<dyn Fn(&mut Recv, &mut X, Args) -> R>;

/// Free-function style registry for a single operation
pub struct FnDispatch<T: Token, X, Args = (), R = ()> {
    operation: String,
    table: HashMap<TraitSet<T>, Handler<X, Args, R>>,
}

impl<T: Token, X: Traited<T>, Args, R> FnDispatch<T, X, Args, R> {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            table: HashMap::new(),
        }
    }

    /// Register `handler` for exactly `traits`.
    ///
    /// Returns `true` if it replaced an earlier registration for the same set.
    pub fn register<F>(&mut self, traits: impl Into<TraitSet<T>>, handler: F) -> bool
    where
        F: Fn(&mut X, Args) -> R + 'static,
    {
        let traits = traits.into();
        log::debug!("Registering {} for {}", self.operation, traits);
        self.table.insert(traits, Box::new(handler)).is_some()
    }

    /// Route to the handler registered for `first`'s current trait set
    pub fn dispatch(&self, first: &mut X, args: Args) -> Result<R, DispatchError> {
        let handler = self
            .table
            .get(first.traits())
            .ok_or_else(|| DispatchError::NoImplementation {
                operation: self.operation.clone(),
                traits: first.traits().to_string(),
            })?;
        Ok(handler(first, args))
    }

    pub fn contains(&self, traits: &TraitSet<T>) -> bool {
        self.table.contains_key(traits)
    }

    pub fn keys(&self) -> impl Iterator<Item = &TraitSet<T>> {
        self.table.keys()
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl<T: Token, X, Args, R> fmt::Debug for FnDispatch<T, X, Args, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnDispatch")
            .field("operation", &self.operation)
            .field("keys", &self.table.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Method style registry: one table shared by many named operations.
///
/// Entries are keyed by `(operation, traits)`, so two operations can each
/// register the same trait set without colliding.
pub struct MethodDispatch<T: Token, Recv, X, Args = (), R = ()> {
    table: HashMap<(String, TraitSet<T>), MethodHandler<Recv, X, Args, R>>,
}

impl<T: Token, Recv, X: Traited<T>, Args, R> MethodDispatch<T, Recv, X, Args, R> {
    pub fn new() -> Self {
        Self { table: HashMap::new() }
    }

    /// Returns `true` if it replaced an earlier registration for the same key
    pub fn register<F>(&mut self, operation: impl Into<String>, traits: impl Into<TraitSet<T>>, handler: F) -> bool
    where
        F: Fn(&mut Recv, &mut X, Args) -> R + 'static,
    {
        let key = (operation.into(), traits.into());
        log::debug!("Registering {} for {}", key.0, key.1);
        self.table.insert(key, Box::new(handler)).is_some()
    }

    pub fn dispatch(&self, operation: &str, receiver: &mut Recv, first: &mut X, args: Args) -> Result<R, DispatchError> {
        let key = (operation.to_string(), first.traits().clone());
        let handler = self.table.get(&key).ok_or_else(|| DispatchError::NoImplementation {
            operation: operation.to_string(),
            traits: key.1.to_string(),
        })?;
        Ok(handler(receiver, first, args))
    }

    pub fn contains(&self, operation: &str, traits: &TraitSet<T>) -> bool {
        self.table.contains_key(&(operation.to_string(), traits.clone()))
    }

    /// Names of all operations with at least one registration
    pub fn operations(&self) -> Vec<&str> {
        let mut ops: Vec<&str> = self.table.keys().map(|(op, _)| op.as_str()).collect();
        ops.sort_unstable();
        ops.dedup();
        ops
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl<T: Token, Recv, X: Traited<T>, Args, R> Default for MethodDispatch<T, Recv, X, Args, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Token, Recv, X, Args, R> fmt::Debug for MethodDispatch<T, Recv, X, Args, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDispatch")
            .field("keys", &self.table.keys().collect::<Vec<_>>())
            .finish()
    }
}
