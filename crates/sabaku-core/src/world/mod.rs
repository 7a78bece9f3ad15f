//! World management - particle pool, grid, update rules and brushes

pub mod brush;
mod ca_update;
mod grid;
mod pool;
pub mod rng_trait;
pub mod stats;
#[allow(clippy::module_inception)]
mod world;

pub use brush::{brush_circle, brush_erase, circle_cells, circle_offsets};
pub use ca_update::{CellularAutomataUpdater, GRAVITY};
pub use grid::ParticleGrid;
pub use pool::{ParticlePool, SlotIndex};
pub use rng_trait::{WorldRng, Xorshift32};
pub use stats::{NoopStats, SimStats, TickStats};
pub use world::{ScanDirection, World};
