//! World - owns the grid, particle registry and RNG, and advances ticks

use super::brush;
use super::ca_update::CellularAutomataUpdater;
use super::grid::ParticleGrid;
use super::pool::SlotIndex;
use super::rng_trait::{WorldRng, Xorshift32};
use super::stats::TickStats;
use crate::WorldError;
use crate::simulation::{Particle, ParticleType, Particles};

/// Horizontal order cells are visited in during one tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanDirection {
    LeftToRight,
    RightToLeft,
}

impl ScanDirection {
    /// Even ticks scan left to right, odd ticks right to left
    pub fn for_tick(tick: u64) -> Self {
        if tick % 2 == 0 {
            ScanDirection::LeftToRight
        } else {
            ScanDirection::RightToLeft
        }
    }
}

/// A fixed-size falling-sand simulation
///
/// Not synchronised: callers must not read the grid while a tick is running.
pub struct World {
    grid: ParticleGrid,
    particles: Particles,
    rng: Xorshift32,
    current_tick: u64,
    last_tick_stats: TickStats,
}

impl World {
    /// Create an empty world seeded from the clock
    pub fn new(width: usize, height: usize) -> Result<Self, WorldError> {
        Self::with_rng(width, height, Xorshift32::from_time())
    }

    /// Create an empty world with a fixed RNG seed
    pub fn with_seed(width: usize, height: usize, seed: u32) -> Result<Self, WorldError> {
        Self::with_rng(width, height, Xorshift32::new(seed))
    }

    fn with_rng(width: usize, height: usize, rng: Xorshift32) -> Result<Self, WorldError> {
        let grid = ParticleGrid::new(width, height)?;
        log::debug!(
            "Created {}x{} world (rng state {:#010x})",
            width,
            height,
            rng.state()
        );

        Ok(Self {
            grid,
            particles: Particles::new(),
            rng,
            current_tick: 0,
            last_tick_stats: TickStats::default(),
        })
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn current_tick(&self) -> u64 {
        self.current_tick
    }

    pub fn particles(&self) -> &Particles {
        &self.particles
    }

    pub fn grid(&self) -> &ParticleGrid {
        &self.grid
    }

    /// Stats from the most recent tick
    pub fn last_tick_stats(&self) -> TickStats {
        self.last_tick_stats
    }

    /// Advance one tick using the world's own RNG
    pub fn step(&mut self) -> TickStats {
        self.current_tick += 1;
        let stats = Self::advance(
            &mut self.grid,
            &self.particles,
            self.current_tick,
            &mut self.rng,
        );
        self.last_tick_stats = stats;
        stats
    }

    /// Advance one tick drawing random choices from `rng`
    pub fn step_with_rng<R: WorldRng>(&mut self, rng: &mut R) -> TickStats {
        self.current_tick += 1;
        let stats = Self::advance(&mut self.grid, &self.particles, self.current_tick, rng);
        self.last_tick_stats = stats;
        stats
    }

    /// Run `ticks` steps; returns the total movement
    pub fn run(&mut self, ticks: usize) -> TickStats {
        let mut total = TickStats::default();
        for _ in 0..ticks {
            let stats = self.step();
            total.moved += stats.moved;
            total.settled += stats.settled;
        }
        total
    }

    fn advance<R: WorldRng>(
        grid: &mut ParticleGrid,
        particles: &Particles,
        tick: u64,
        rng: &mut R,
    ) -> TickStats {
        let mut stats = TickStats::default();
        grid.clear_updated_flags();

        let width = grid.width() as i32;
        let height = grid.height() as i32;
        let direction = ScanDirection::for_tick(tick);

        for y in (0..height).rev() {
            match direction {
                ScanDirection::LeftToRight => {
                    for x in 0..width {
                        CellularAutomataUpdater::update_particle(grid, x, y, particles, &mut stats, rng);
                    }
                }
                ScanDirection::RightToLeft => {
                    for x in (0..width).rev() {
                        CellularAutomataUpdater::update_particle(grid, x, y, particles, &mut stats, rng);
                    }
                }
            }
        }

        log::trace!(
            "Tick {tick}: {} moved, {} settled",
            stats.moved,
            stats.settled
        );
        stats
    }

    /// Place one particle; false if off-grid, occupied or the pool is full
    pub fn spawn(&mut self, x: i32, y: i32, kind: ParticleType) -> bool {
        self.grid.spawn(x, y, kind, &self.particles)
    }

    /// Remove the particle at a cell, if any
    pub fn remove(&mut self, x: i32, y: i32) -> bool {
        self.grid.remove(x, y)
    }

    /// Paint a filled circle of `kind`; true if at least one cell was filled
    pub fn paint(&mut self, x: i32, y: i32, radius: i32, kind: ParticleType) -> bool {
        brush::brush_circle(&mut self.grid, x, y, radius, kind, &self.particles) > 0
    }

    /// Erase a filled circle; returns how many particles were removed
    pub fn erase(&mut self, x: i32, y: i32, radius: i32) -> usize {
        brush::brush_erase(&mut self.grid, x, y, radius)
    }

    /// Occupant of a cell, `None` for empty or off-grid cells
    pub fn get_particle(&self, x: i32, y: i32) -> Option<&Particle> {
        self.grid.get(x, y)
    }

    /// Type at a cell, `ParticleType::None` for empty or off-grid cells
    pub fn kind_at(&self, x: i32, y: i32) -> ParticleType {
        self.grid
            .get(x, y)
            .map(|particle| particle.kind)
            .unwrap_or_default()
    }

    /// Pool slot of a cell's occupant
    pub fn slot_at(&self, x: i32, y: i32) -> Option<SlotIndex> {
        self.grid.slot_at(x, y)
    }

    /// Remove every particle; returns how many there were
    pub fn clear(&mut self) -> usize {
        let removed = self.grid.clear();
        log::debug!("Cleared {removed} particles");
        removed
    }

    pub fn free_count(&self) -> usize {
        self.grid.free_count()
    }

    pub fn particle_count(&self) -> usize {
        self.grid.occupied_count()
    }

    /// Number of live particles of one type
    pub fn count_of(&self, kind: ParticleType) -> usize {
        let mut count = 0;
        for y in 0..self.height() as i32 {
            for x in 0..self.width() as i32 {
                if self.grid.get(x, y).is_some_and(|particle| particle.kind == kind) {
                    count += 1;
                }
            }
        }
        count
    }
}
