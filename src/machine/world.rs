//! Arena of trait machines
//!
//! Machines refer to each other through [`EntityId`] handles. A handle holds a
//! slot index and the generation that slot had when the machine was spawned;
//! once the machine is despawned the generation moves on and the handle stops
//! resolving. Nothing in the hierarchy keeps a machine alive.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use super::entity::TraitMachine;
use super::walk::{Walk, walk};
use crate::token::Token;
use crate::traitset::Traited;

/// Handle to a machine stored in a [`World`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId {
    index: u32,
    generation: u32,
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

#[derive(Debug, Clone)]
struct Slot<M> {
    generation: u32,
    machine: Option<M>,
}

/// Owner of every machine in a hierarchy
#[derive(Debug, Clone)]
pub struct World<S: Token, T: Token, K: Token = T> {
    slots: Vec<Slot<TraitMachine<S, T, K>>>,
    free: Vec<u32>,
    live: usize,
}

impl<S: Token, T: Token, K: Token> World<S, T, K> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
        }
    }

    /// Store a machine and hand back its id
    pub fn spawn(&mut self, machine: TraitMachine<S, T, K>) -> EntityId {
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.machine = Some(machine);
            return EntityId {
                index,
                generation: slot.generation,
            };
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            machine: Some(machine),
        });
        EntityId { index, generation: 0 }
    }

    /// Store a machine that observes `children`, and point each live child's
    /// parent back at it.
    ///
    /// A child that already has a live parent is re-parented with a warning.
    /// Stale child handles are kept as given. Children form a set: a repeated
    /// id is stored once.
    pub fn spawn_with_children(
        &mut self,
        mut machine: TraitMachine<S, T, K>,
        children: impl IntoIterator<Item = EntityId>,
    ) -> EntityId {
        for child in children {
            if !machine.children.contains(&child) {
                machine.children.push(child);
            }
        }
        let kids = machine.children.clone();
        let id = self.spawn(machine);
        for child in kids {
            self.wire_parent(id, child);
        }
        id
    }

    /// Append `child` to `parent` after construction.
    ///
    /// Returns `false` if either handle is stale. Adopting a child that is
    /// already listed changes nothing. If the new edge closes a cycle it is
    /// kept and a warning names the entity involved.
    pub fn adopt(&mut self, parent: EntityId, child: EntityId) -> bool {
        if !self.contains(child) {
            return false;
        }
        let Some(machine) = self.get_mut(parent) else {
            return false;
        };
        if machine.children.contains(&child) {
            return true;
        }
        machine.children.push(child);
        self.wire_parent(parent, child);

        if let Some(at) = self.find_cycle(parent) {
            let name = self.get(at).map(|m| m.name().to_string()).unwrap_or_default();
            log::warn!("Cycle detected: {} ({}) is its own descendant", name, at);
        }
        true
    }

    fn wire_parent(&mut self, parent: EntityId, child: EntityId) {
        let previous = match self.get(child) {
            Some(machine) => machine.parent.filter(|p| *p != parent && self.contains(*p)),
            None => {
                log::debug!("Child {} of {} is no longer present", child, parent);
                return;
            }
        };
        if let Some(previous) = previous {
            log::warn!(
                "{} already has parent {}, re-parenting to {}",
                self.name_of(child),
                self.name_of(previous),
                self.name_of(parent)
            );
        }
        if let Some(machine) = self.get_mut(child) {
            machine.parent = Some(parent);
        }
    }

    fn name_of(&self, id: EntityId) -> String {
        self.get(id).map(|m| m.name().to_string()).unwrap_or_else(|| id.to_string())
    }

    /// Remove a machine. Every handle to it goes stale.
    pub fn despawn(&mut self, id: EntityId) -> Option<TraitMachine<S, T, K>> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let machine = slot.machine.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.live -= 1;
        log::debug!("Despawned {} ({})", machine.name(), id);
        Some(machine)
    }

    pub fn get(&self, id: EntityId) -> Option<&TraitMachine<S, T, K>> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.machine.as_ref())
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut TraitMachine<S, T, K>> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.machine.as_mut())
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    /// The parent of `id`, if it is still present
    pub fn parent_of(&self, id: EntityId) -> Option<EntityId> {
        self.get(id)?.parent.filter(|p| self.contains(*p))
    }

    /// Children of `id` that are still present
    pub fn children_of(&self, id: EntityId) -> Vec<EntityId> {
        self.get(id)
            .map(|m| m.children.iter().copied().filter(|c| self.contains(*c)).collect())
            .unwrap_or_default()
    }

    /// First machine with the given name
    pub fn find(&self, name: &str) -> Option<EntityId> {
        self.iter().find(|(_, m)| m.name() == name).map(|(id, _)| id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &TraitMachine<S, T, K>)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.machine.as_ref().map(|m| {
                (
                    EntityId {
                        index: index as u32,
                        generation: slot.generation,
                    },
                    m,
                )
            })
        })
    }

    /// Pre-order walk from `root`; see [`walk`]
    pub fn walk(&self, root: EntityId) -> Walk<'_, S, T, K> {
        walk(self, root)
    }

    /// An entity below `root` that can reach itself through `children`, if any
    pub fn find_cycle(&self, root: EntityId) -> Option<EntityId> {
        let mut path = Vec::new();
        let mut done = HashSet::new();
        self.cycle_from(root, &mut path, &mut done)
    }

    /// `done` holds nodes whose whole subtree is known to be acyclic
    fn cycle_from(&self, id: EntityId, path: &mut Vec<EntityId>, done: &mut HashSet<EntityId>) -> Option<EntityId> {
        if path.contains(&id) {
            return Some(id);
        }
        if done.contains(&id) {
            return None;
        }
        path.push(id);
        for child in self.children_of(id) {
            if let Some(hit) = self.cycle_from(child, path, done) {
                return Some(hit);
            }
        }
        path.pop();
        done.insert(id);
        None
    }

    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }
}

impl<S: Token, T: Token, K: Token> Default for World<S, T, K> {
    fn default() -> Self {
        Self::new()
    }
}
