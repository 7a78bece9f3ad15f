//! Pen tool for drawing particles

use super::Tool;
use sabaku_core::simulation::ParticleType;
use sabaku_core::world::World;

/// Pen tool that paints a specific particle type
pub struct PenTool {
    particle: ParticleType,
}

impl PenTool {
    /// Create a new pen tool for the given particle type
    pub fn new(particle: ParticleType) -> Self {
        Self { particle }
    }

    /// Set the particle this pen paints
    pub fn set_particle(&mut self, particle: ParticleType) {
        self.particle = particle;
    }

    /// Get the current particle
    pub fn particle(&self) -> ParticleType {
        self.particle
    }
}

impl Tool for PenTool {
    fn name(&self) -> &str {
        "Pen"
    }

    fn apply(&self, world: &mut World, x: i32, y: i32, brush_size: u32) -> bool {
        if self.particle == ParticleType::None {
            return false;
        }
        world.paint(x, y, radius(brush_size), self.particle)
    }
}

pub(super) fn radius(brush_size: u32) -> i32 {
    i32::try_from(brush_size).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pen_paints_selected_particle() {
        let mut world = World::with_seed(10, 10, 1).unwrap();
        let mut pen = PenTool::new(ParticleType::Sand);

        assert!(pen.apply(&mut world, 5, 5, 1));
        assert_eq!(world.count_of(ParticleType::Sand), 5);

        pen.set_particle(ParticleType::Water);
        assert_eq!(pen.particle(), ParticleType::Water);
        assert!(pen.apply(&mut world, 1, 1, 0));
        assert_eq!(world.kind_at(1, 1), ParticleType::Water);
    }

    #[test]
    fn test_pen_with_none_does_nothing() {
        let mut world = World::with_seed(10, 10, 1).unwrap();
        let pen = PenTool::new(ParticleType::None);

        assert!(!pen.apply(&mut world, 5, 5, 3));
        assert_eq!(world.particle_count(), 0);
    }
}
