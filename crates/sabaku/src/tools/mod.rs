//! Drawing tools and the brush state that drives them

mod erase;
mod pen;

pub use erase::EraseTool;
pub use pen::PenTool;

use glam::IVec2;
use sabaku_core::simulation::ParticleType;
use sabaku_core::world::World;

pub const DEFAULT_RADIUS: u32 = 3;
pub const MIN_RADIUS: u32 = 1;
pub const MAX_RADIUS: u32 = 20;

/// Trait for drawing tools
pub trait Tool {
    /// Tool display name
    fn name(&self) -> &str;

    /// Apply tool at position with given brush size; true if any cell changed
    fn apply(&self, world: &mut World, x: i32, y: i32, brush_size: u32) -> bool;
}

/// Particle bound to a number key, `1`-`4`
pub fn hotkey_particle(key: char) -> Option<ParticleType> {
    match key {
        '1' => Some(ParticleType::Sand),
        '2' => Some(ParticleType::Water),
        '3' => Some(ParticleType::Stone),
        '4' => Some(ParticleType::Oil),
        _ => None,
    }
}

/// Current brush radius and selected particle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Brush {
    radius: u32,
    min_radius: u32,
    max_radius: u32,
    particle: ParticleType,
}

impl Brush {
    pub fn new(particle: ParticleType) -> Self {
        Self::with_limits(DEFAULT_RADIUS, MIN_RADIUS, MAX_RADIUS, particle)
    }

    /// Brush with custom radius limits; `radius` is clamped into them
    pub fn with_limits(radius: u32, min_radius: u32, max_radius: u32, particle: ParticleType) -> Self {
        let max_radius = max_radius.max(min_radius);
        Self {
            radius: radius.clamp(min_radius, max_radius),
            min_radius,
            max_radius,
            particle,
        }
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    pub fn particle(&self) -> ParticleType {
        self.particle
    }

    pub fn set_particle(&mut self, particle: ParticleType) {
        self.particle = particle;
    }

    pub fn set_radius(&mut self, radius: u32) {
        self.radius = radius.clamp(self.min_radius, self.max_radius);
    }

    /// Grow or shrink by `delta` (one wheel notch = 1); returns the new radius
    pub fn adjust(&mut self, delta: i32) -> u32 {
        let radius = (self.radius as i64 + delta as i64)
            .clamp(self.min_radius as i64, self.max_radius as i64);
        self.radius = radius as u32;
        self.radius
    }

    /// Select the particle bound to a number key; false for unbound keys
    pub fn select_hotkey(&mut self, key: char) -> bool {
        match hotkey_particle(key) {
            Some(particle) => {
                self.particle = particle;
                true
            }
            None => false,
        }
    }

    /// Paint the selected particle at a grid cell
    pub fn paint(&self, world: &mut World, at: IVec2) -> bool {
        PenTool::new(self.particle).apply(world, at.x, at.y, self.radius)
    }

    /// Erase around a grid cell
    pub fn erase(&self, world: &mut World, at: IVec2) -> bool {
        EraseTool.apply(world, at.x, at.y, self.radius)
    }
}

impl Default for Brush {
    fn default() -> Self {
        Self::new(ParticleType::Sand)
    }
}
