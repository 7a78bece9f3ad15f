//! Per-instance particle record

use crate::ParticleType;
use serde::{Deserialize, Serialize};

/// A single live particle, owned by exactly one pool slot
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub kind: ParticleType,
    /// Display color (RGBA)
    pub color: [u8; 4],
    /// Horizontal velocity (cells/tick)
    pub vx: f32,
    /// Vertical velocity (cells/tick, positive is down)
    pub vy: f32,
    /// State flags (updated this tick, ...)
    pub flags: u8,
}

impl Particle {
    /// Contents of a slot that holds nothing
    pub const EMPTY: Particle = Particle {
        kind: ParticleType::None,
        color: [0, 0, 0, 0],
        vx: 0.0,
        vy: 0.0,
        flags: 0,
    };

    pub fn new(kind: ParticleType, color: [u8; 4]) -> Self {
        Self {
            kind,
            color,
            ..Self::EMPTY
        }
    }

    pub fn is_updated(&self) -> bool {
        self.flags & particle_flags::UPDATED != 0
    }

    pub fn set_updated(&mut self, updated: bool) {
        if updated {
            self.flags |= particle_flags::UPDATED;
        } else {
            self.flags &= !particle_flags::UPDATED;
        }
    }
}

impl Default for Particle {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Flag bits for particle state
pub mod particle_flags {
    pub const UPDATED: u8 = 1 << 0; // Already updated this tick
}
