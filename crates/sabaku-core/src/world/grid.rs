//! Index grid over the particle pool

use super::pool::{ParticlePool, SlotIndex};
use crate::WorldError;
use crate::simulation::{Particle, ParticleType, Particles};

/// Fixed-size 2D grid of optional pool handles
///
/// Each occupied cell holds the handle of exactly one allocated pool slot, and
/// every allocated slot is referenced by exactly one cell. `swap` is the only
/// way a particle changes cell, so movement never touches the pool.
///
/// Coordinates are `(x, y)` with `y = 0` at the top row; gravity points
/// towards increasing `y`.
pub struct ParticleGrid {
    width: usize,
    height: usize,
    cells: Vec<Option<SlotIndex>>,
    pool: ParticlePool,
}

impl ParticleGrid {
    pub fn new(width: usize, height: usize) -> Result<Self, WorldError> {
        let area = width
            .checked_mul(height)
            .filter(|&area| area > 0 && width <= i32::MAX as usize && height <= i32::MAX as usize)
            .ok_or(WorldError::InvalidDimensions { width, height })?;

        let mut cells = Vec::new();
        cells
            .try_reserve_exact(area)
            .map_err(|_| WorldError::ResourceExhaustion {
                what: "grid",
                width,
                height,
            })?;
        cells.resize(area, None);

        let pool = ParticlePool::with_capacity(area, width, height)?;

        Ok(Self {
            width,
            height,
            cells,
            pool,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        self.in_bounds(x, y)
            .then(|| y as usize * self.width + x as usize)
    }

    /// Handle of the slot occupying a cell
    pub fn slot_at(&self, x: i32, y: i32) -> Option<SlotIndex> {
        self.index(x, y).and_then(|idx| self.cells[idx])
    }

    pub fn get(&self, x: i32, y: i32) -> Option<&Particle> {
        self.slot_at(x, y).and_then(|slot| self.pool.get(slot))
    }

    pub fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut Particle> {
        let slot = self.slot_at(x, y)?;
        self.pool.get_mut(slot)
    }

    /// Place a new particle in an empty in-bounds cell
    ///
    /// Returns false without mutating anything when the cell is out of
    /// bounds, already occupied, or the pool is exhausted.
    pub fn spawn(&mut self, x: i32, y: i32, kind: ParticleType, particles: &Particles) -> bool {
        let Some(idx) = self.index(x, y) else {
            return false;
        };
        if self.cells[idx].is_some() {
            return false;
        }

        match self.pool.allocate(particles.create(kind)) {
            Some(slot) => {
                self.cells[idx] = Some(slot);
                true
            }
            None => false,
        }
    }

    /// Release the particle in a cell; returns whether one was there
    pub fn remove(&mut self, x: i32, y: i32) -> bool {
        let Some(idx) = self.index(x, y) else {
            return false;
        };

        match self.cells[idx].take() {
            Some(slot) => {
                self.pool.release(slot);
                true
            }
            None => false,
        }
    }

    /// Exchange the occupants of two cells
    ///
    /// Both cells must be in bounds; out-of-bounds arguments are ignored.
    pub fn swap(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        debug_assert!(self.in_bounds(x1, y1) && self.in_bounds(x2, y2));

        if let (Some(a), Some(b)) = (self.index(x1, y1), self.index(x2, y2)) {
            self.cells.swap(a, b);
        }
    }

    /// Reset the per-tick updated flag on every live particle
    pub fn clear_updated_flags(&mut self) {
        for slot in self.cells.iter().flatten() {
            if let Some(particle) = self.pool.get_mut(*slot) {
                particle.set_updated(false);
            }
        }
    }

    /// Remove every particle
    pub fn clear(&mut self) -> usize {
        let mut removed = 0;
        for cell in self.cells.iter_mut() {
            if let Some(slot) = cell.take() {
                self.pool.release(slot);
                removed += 1;
            }
        }
        removed
    }

    pub fn capacity(&self) -> usize {
        self.pool.capacity()
    }

    pub fn free_count(&self) -> usize {
        self.pool.free_count()
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }
}
