//! Fixed-capacity particle pool with a free-list stack

use crate::WorldError;
use crate::simulation::Particle;

/// Handle to a pool slot
pub type SlotIndex = u32;

/// Pre-allocated particle storage
///
/// Allocation pops from `free_list`, release pushes back; both are O(1).
/// A fresh pool hands out slot 0 first, then 1, and so on.
pub struct ParticlePool {
    slots: Vec<Particle>,
    free_list: Vec<SlotIndex>,
}

impl ParticlePool {
    /// Allocate storage for `capacity` particles, reporting allocator failure
    /// instead of aborting
    pub fn with_capacity(capacity: usize, width: usize, height: usize) -> Result<Self, WorldError> {
        if capacity > SlotIndex::MAX as usize {
            return Err(WorldError::InvalidDimensions { width, height });
        }

        let exhausted = |what| WorldError::ResourceExhaustion {
            what,
            width,
            height,
        };

        let mut slots = Vec::new();
        slots
            .try_reserve_exact(capacity)
            .map_err(|_| exhausted("particle pool"))?;
        slots.resize(capacity, Particle::EMPTY);

        let mut free_list = Vec::new();
        free_list
            .try_reserve_exact(capacity)
            .map_err(|_| exhausted("free list"))?;
        // Reversed so the stack top is slot 0
        free_list.extend((0..capacity as SlotIndex).rev());

        Ok(Self { slots, free_list })
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn free_count(&self) -> usize {
        self.free_list.len()
    }

    /// Claim a free slot and store `particle` in it
    pub fn allocate(&mut self, particle: Particle) -> Option<SlotIndex> {
        let slot = self.free_list.pop()?;
        self.slots[slot as usize] = particle;
        Some(slot)
    }

    /// Return a slot to the free list
    ///
    /// The caller guarantees `slot` is currently allocated.
    pub fn release(&mut self, slot: SlotIndex) {
        debug_assert!(self.free_list.len() < self.slots.len());

        self.slots[slot as usize] = Particle::EMPTY;
        self.free_list.push(slot);
    }

    pub fn get(&self, slot: SlotIndex) -> Option<&Particle> {
        self.slots.get(slot as usize)
    }

    pub fn get_mut(&mut self, slot: SlotIndex) -> Option<&mut Particle> {
        self.slots.get_mut(slot as usize)
    }
}
