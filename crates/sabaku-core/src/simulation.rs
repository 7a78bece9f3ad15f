//! Particle registry re-exports

pub use sabaku_simulation::{
    Particle, ParticleProperties, ParticleState, ParticleType, Particles, particle_flags,
};
