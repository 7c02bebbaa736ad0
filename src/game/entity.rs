//! Entity identity
//!
//! An entity is a slot index plus a generation counter. Freed slots are
//! recycled with a bumped generation, so a stale handle to a despawned
//! entity never aliases whatever reuses its slot — it just stops resolving.

use serde::{Deserialize, Serialize};

/// Stable identity of a game entity.
///
/// Cheap to copy and compare; resolves through the tables that store the
/// actual data. Same index + different generation means a different entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entity {
    index: u32,
    generation: u32,
}

impl Entity {
    /// Sentinel for "no entity".
    pub const NULL: Entity = Entity {
        index: u32::MAX,
        generation: 0,
    };

    pub(crate) fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index, used to address component tables.
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn is_null(&self) -> bool {
        self.index == u32::MAX
    }
}

impl Default for Entity {
    fn default() -> Self {
        Entity::NULL
    }
}

/// Hands out entity slots and tracks which handles are still live.
pub struct EntityAllocator {
    /// Current generation per slot; a handle is live iff generations match.
    generations: Vec<u32>,
    /// Recycled slots, popped LIFO.
    free: Vec<u32>,
    alive: u32,
}

impl EntityAllocator {
    pub fn new() -> Self {
        Self {
            generations: Vec::new(),
            free: Vec::new(),
            alive: 0,
        }
    }

    pub fn allocate(&mut self) -> Entity {
        self.alive += 1;
        match self.free.pop() {
            // Generation was already bumped when the slot was freed.
            Some(index) => Entity::new(index, self.generations[index as usize]),
            None => {
                let index = self.generations.len() as u32;
                self.generations.push(0);
                Entity::new(index, 0)
            }
        }
    }

    /// Release an entity's slot. Returns false if the handle was already dead.
    pub fn free(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }
        self.generations[entity.index as usize] += 1;
        self.free.push(entity.index);
        self.alive -= 1;
        true
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        !entity.is_null()
            && self
                .generations
                .get(entity.index as usize)
                .is_some_and(|gen| *gen == entity.generation)
    }

    pub fn alive_count(&self) -> u32 {
        self.alive
    }
}

impl Default for EntityAllocator {
    fn default() -> Self {
        Self::new()
    }
}
