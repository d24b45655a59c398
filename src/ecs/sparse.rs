//! Sparse-set component storage
//!
//! One `SparseSet<T>` per component type: values packed in a dense array,
//! a parallel dense array of owning entities, and a sparse table mapping
//! entity index to dense slot. Insert, lookup and remove are O(1); removal
//! swap-removes so iteration stays dense. Dense order is whatever the
//! insert/remove history produced, and is stable within a frame.
//!
//! Lookups compare the stored handle against the queried one, so a stale
//! generation misses even if the slot index was recycled.

use super::entity::Entity;

#[derive(Debug)]
pub struct SparseSet<T> {
    sparse: Vec<Option<u32>>,
    dense_entities: Vec<Entity>,
    dense: Vec<T>,
}

impl<T> Default for SparseSet<T> {
    fn default() -> Self {
        Self {
            sparse: Vec::new(),
            dense_entities: Vec::new(),
            dense: Vec::new(),
        }
    }
}

impl<T> SparseSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    fn dense_index(&self, entity: Entity) -> Option<usize> {
        let slot = (*self.sparse.get(entity.index() as usize)?)? as usize;
        if self.dense_entities[slot] == entity {
            Some(slot)
        } else {
            None
        }
    }

    /// Attach a component, overwriting any existing value for this entity.
    pub fn insert(&mut self, entity: Entity, value: T) {
        if let Some(slot) = self.dense_index(entity) {
            self.dense[slot] = value;
            return;
        }
        let index = entity.index() as usize;
        if index >= self.sparse.len() {
            self.sparse.resize(index + 1, None);
        }
        self.sparse[index] = Some(self.dense.len() as u32);
        self.dense_entities.push(entity);
        self.dense.push(value);
    }

    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.dense_index(entity).map(|slot| &self.dense[slot])
    }

    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.dense_index(entity).map(|slot| &mut self.dense[slot])
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.dense_index(entity).is_some()
    }

    /// Swap-removes the component, keeping the dense arrays packed.
    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        let slot = self.dense_index(entity)?;
        self.sparse[entity.index() as usize] = None;
        let last = self.dense.len() - 1;
        self.dense_entities.swap_remove(slot);
        let value = self.dense.swap_remove(slot);
        if slot != last {
            let moved = self.dense_entities[slot];
            self.sparse[moved.index() as usize] = Some(slot as u32);
        }
        Some(value)
    }

    pub fn len(&self) -> usize {
        self.dense.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    pub fn clear(&mut self) {
        self.sparse.clear();
        self.dense_entities.clear();
        self.dense.clear();
    }

    /// Snapshot of the member entities in dense order.
    pub fn entities(&self) -> Vec<Entity> {
        self.dense_entities.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.dense_entities.iter().copied().zip(self.dense.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.dense_entities
            .iter()
            .copied()
            .zip(self.dense.iter_mut())
    }
}
