//! Depth-first traversal of a machine hierarchy

use super::world::{EntityId, World};
use crate::token::Token;

/// Lazy pre-order walk over a root and everything reachable through `children`.
///
/// Each call to [`walk`] starts over. A node reachable along two paths is
/// yielded once per path. Despawned children are skipped. A cyclic hierarchy
/// (only possible through [`World::adopt`]) never ends, so check
/// [`World::find_cycle`] before walking one.
pub struct Walk<'w, S: Token, T: Token, K: Token> {
    world: &'w World<S, T, K>,
    stack: Vec<(EntityId, usize)>,
}

pub fn walk<S: Token, T: Token, K: Token>(world: &World<S, T, K>, root: EntityId) -> Walk<'_, S, T, K> {
    let stack = if world.contains(root) { vec![(root, 0)] } else { Vec::new() };
    Walk { world, stack }
}

impl<'w, S: Token, T: Token, K: Token> Walk<'w, S, T, K> {
    /// Yield `(id, depth)` pairs instead, the root being at depth 0
    pub fn with_depth(self) -> WithDepth<'w, S, T, K> {
        WithDepth(self)
    }

    fn advance(&mut self) -> Option<(EntityId, usize)> {
        let (id, depth) = self.stack.pop()?;
        let children = self.world.children_of(id);
        self.stack.extend(children.into_iter().rev().map(|child| (child, depth + 1)));
        Some((id, depth))
    }
}

impl<S: Token, T: Token, K: Token> Iterator for Walk<'_, S, T, K> {
    type Item = EntityId;

    fn next(&mut self) -> Option<Self::Item> {
        self.advance().map(|(id, _)| id)
    }
}

/// See [`Walk::with_depth`]
pub struct WithDepth<'w, S: Token, T: Token, K: Token>(Walk<'w, S, T, K>);

impl<S: Token, T: Token, K: Token> Iterator for WithDepth<'_, S, T, K> {
    type Item = (EntityId, usize);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.advance()
    }
}
