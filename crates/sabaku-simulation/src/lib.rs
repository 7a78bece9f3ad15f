//! Particle simulation data for Sabaku
//!
//! This crate provides the foundational data types for the falling-sand grid:
//! - Particle types and their physical state class (ParticleType, ParticleState)
//! - The read-only property table (ParticleProperties, Particles)
//! - Per-instance particle records (Particle, particle_flags)

mod particle;
mod particles;

pub use particle::{Particle, particle_flags};
pub use particles::{ParticleProperties, ParticleState, ParticleType, Particles};
