//! Stone basin demo: pours sand and water from two spouts

use std::time::Duration;

use anyhow::{Context, Result};
use glam::IVec2;
use sabaku_core::simulation::ParticleType;
use sabaku_core::world::World;

use crate::tools::Brush;

/// Ticks between two pours from each spout
const POUR_INTERVAL: u64 = 4;

/// Inputs for one demo run
#[derive(Debug, Clone)]
pub struct DemoSettings {
    pub width: usize,
    pub height: usize,
    pub ticks: usize,
    /// Interactive cadence the run stands in for
    pub tick_interval_ms: u64,
    pub seed: Option<u32>,
    pub brush: Brush,
}

impl DemoSettings {
    /// Wall-clock time the same ticks would take at the interactive cadence
    pub fn simulated_duration(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.saturating_mul(self.ticks as u64))
    }
}

/// Cells of the U-shaped stone basin for a grid of this size
///
/// The floor is a slab from `floor` down to the bottom row. A fast fall only
/// checks its target cell, so a thin floor with empty rows beneath would let
/// particles drop through it.
pub struct Basin {
    pub left: i32,
    pub right: i32,
    pub top: i32,
    pub floor: i32,
}

impl Basin {
    pub fn for_grid(width: usize, height: usize) -> Self {
        let w = width as i32;
        let h = height as i32;
        Self {
            left: w / 8,
            right: w - 1 - w / 8,
            top: h / 3,
            floor: h - 1 - h / 10,
        }
    }

    /// Lay the basin in stone; returns how many cells were placed
    pub fn build(&self, world: &mut World) -> usize {
        let mut placed = 0;
        for y in self.floor..world.height() as i32 {
            for x in self.left..=self.right {
                placed += usize::from(world.spawn(x, y, ParticleType::Stone));
            }
        }
        for y in self.top..self.floor {
            placed += usize::from(world.spawn(self.left, y, ParticleType::Stone));
            placed += usize::from(world.spawn(self.right, y, ParticleType::Stone));
        }
        placed
    }

    /// Sand spout position, above the left half
    pub fn sand_spout(&self) -> IVec2 {
        IVec2::new(self.left + (self.right - self.left) * 2 / 5, 2)
    }

    /// Water spout position, above the right half
    pub fn water_spout(&self) -> IVec2 {
        IVec2::new(self.left + (self.right - self.left) * 3 / 5, 2)
    }
}

/// Build the basin, pour for the first two thirds of the run, then let it settle
pub fn run_demo(settings: &DemoSettings) -> Result<World> {
    let mut world = match settings.seed {
        Some(seed) => World::with_seed(settings.width, settings.height, seed),
        None => World::new(settings.width, settings.height),
    }
    .with_context(|| format!("Failed to create {}x{} demo world", settings.width, settings.height))?;

    let basin = Basin::for_grid(settings.width, settings.height);
    let stones = basin.build(&mut world);
    log::info!("Built basin from {} stone cells", stones);

    let mut brush = settings.brush;
    let pour_until = (settings.ticks as u64 * 2) / 3;

    for _ in 0..settings.ticks {
        let tick = world.current_tick();
        if tick < pour_until && tick % POUR_INTERVAL == 0 {
            brush.select_hotkey('1');
            brush.paint(&mut world, basin.sand_spout());
            brush.select_hotkey('2');
            brush.paint(&mut world, basin.water_spout());
        }
        world.step();
    }

    log::info!(
        "Demo finished after {} ticks ({:.1}s at {}ms per tick): {} sand, {} water, {} free slots",
        world.current_tick(),
        settings.simulated_duration().as_secs_f32(),
        settings.tick_interval_ms,
        world.count_of(ParticleType::Sand),
        world.count_of(ParticleType::Water),
        world.free_count()
    );

    Ok(world)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> DemoSettings {
        let mut brush = Brush::default();
        brush.set_radius(2);
        DemoSettings {
            width: 40,
            height: 30,
            ticks: 60,
            tick_interval_ms: 16,
            seed: Some(1),
            brush,
        }
    }

    #[test]
    fn test_basin_geometry() {
        let basin = Basin::for_grid(40, 30);
        assert_eq!((basin.left, basin.right), (5, 34));
        assert_eq!((basin.top, basin.floor), (10, 26));

        let mut world = World::with_seed(40, 30, 1).unwrap();
        // Four floor rows of 30 plus two walls of 16
        assert_eq!(basin.build(&mut world), 152);
        assert_eq!(world.count_of(ParticleType::Stone), 152);
    }

    #[test]
    fn test_simulated_duration() {
        assert_eq!(settings().simulated_duration(), Duration::from_millis(960));

        let idle = DemoSettings {
            tick_interval_ms: 0,
            ..settings()
        };
        assert_eq!(idle.simulated_duration(), Duration::ZERO);
    }

    #[test]
    fn test_demo_fills_basin() {
        let world = run_demo(&settings()).unwrap();
        let basin = Basin::for_grid(40, 30);

        assert_eq!(world.current_tick(), 60);
        assert!(world.count_of(ParticleType::Sand) > 0);
        assert!(world.count_of(ParticleType::Water) > 0);
        assert_eq!(world.count_of(ParticleType::Stone), 152);

        // Nothing leaks into or under the floor
        for y in basin.floor..30 {
            for x in 0..40 {
                let expected = if (basin.left..=basin.right).contains(&x) {
                    ParticleType::Stone
                } else {
                    ParticleType::None
                };
                assert_eq!(world.kind_at(x, y), expected);
            }
        }
    }

    #[test]
    fn test_demo_is_deterministic_with_seed() {
        let a = run_demo(&settings()).unwrap();
        let b = run_demo(&settings()).unwrap();
        for y in 0..30 {
            for x in 0..40 {
                assert_eq!(a.kind_at(x, y), b.kind_at(x, y));
            }
        }
    }
}
