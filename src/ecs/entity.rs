//! Generational entity handles
//!
//! An `Entity` is an index into the allocator's slot table plus the
//! generation that slot had when the handle was issued. Destroying an
//! entity bumps the slot's generation, so every handle issued before the
//! destroy fails validation forever, even after the slot is recycled.

use serde::{Deserialize, Serialize};

/// Opaque entity handle: slot index + generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entity {
    index: u32,
    generation: u32,
}

impl Entity {
    pub const NULL: Entity = Entity {
        index: u32::MAX,
        generation: u32::MAX,
    };

    pub fn null() -> Self {
        Self::NULL
    }

    pub fn is_null(&self) -> bool {
        *self == Self::NULL
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::NULL
    }
}

/// Slot allocator with free-list reuse
#[derive(Debug, Default)]
pub struct EntityAllocator {
    generations: Vec<u32>,
    free: Vec<u32>,
    alive: usize,
}

impl EntityAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self) -> Entity {
        self.alive += 1;
        if let Some(index) = self.free.pop() {
            Entity {
                index,
                generation: self.generations[index as usize],
            }
        } else {
            let index = self.generations.len() as u32;
            self.generations.push(0);
            Entity {
                index,
                generation: 0,
            }
        }
    }

    /// Invalidates the handle; returns false if it was already dead.
    pub fn destroy(&mut self, entity: Entity) -> bool {
        if !self.is_valid(entity) {
            return false;
        }
        self.generations[entity.index as usize] += 1;
        self.free.push(entity.index);
        self.alive -= 1;
        true
    }

    pub fn is_valid(&self, entity: Entity) -> bool {
        if entity.is_null() {
            return false;
        }
        self.generations
            .get(entity.index as usize)
            .is_some_and(|&gen| gen == entity.generation)
    }

    pub fn len(&self) -> usize {
        self.alive
    }

    pub fn is_empty(&self) -> bool {
        self.alive == 0
    }

    pub fn clear(&mut self) {
        self.generations.clear();
        self.free.clear();
        self.alive = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destroyed_handle_never_validates_again() {
        let mut alloc = EntityAllocator::new();
        let a = alloc.create();
        assert!(alloc.is_valid(a));

        assert!(alloc.destroy(a));
        assert!(!alloc.is_valid(a), "stale handle must fail validation");

        // Recycling the slot must not resurrect the old handle
        let b = alloc.create();
        assert_eq!(b.index(), a.index(), "slot should be reused");
        assert!(alloc.is_valid(b));
        assert!(!alloc.is_valid(a), "recycled slot must not revive stale handle");
    }

    #[test]
    fn test_destroy_is_idempotent() {
        let mut alloc = EntityAllocator::new();
        let e = alloc.create();
        assert!(alloc.destroy(e));
        assert!(!alloc.destroy(e), "second destroy must be a no-op");
        assert_eq!(alloc.len(), 0);
    }

    #[test]
    fn test_null_handle_is_never_valid() {
        let alloc = EntityAllocator::new();
        assert!(!alloc.is_valid(Entity::null()));
    }

    #[test]
    fn test_alive_count_tracks_create_destroy() {
        let mut alloc = EntityAllocator::new();
        let a = alloc.create();
        let _b = alloc.create();
        assert_eq!(alloc.len(), 2);
        alloc.destroy(a);
        assert_eq!(alloc.len(), 1);
    }
}
