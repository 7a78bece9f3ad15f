//! # Sabaku - falling-sand sandbox
//!
//! Headless front end around `sabaku-core`: brush tools, letterboxed
//! rendering to RGBA buffers and PNG files, RON scenarios and the `sabaku`
//! command line.

#[cfg(not(target_arch = "wasm32"))]
pub mod config;
pub mod demo;
pub mod headless;
pub mod scenario;
pub mod tools;
pub mod viewport;

// Re-export core modules for convenience
pub use sabaku_core::simulation;
pub use sabaku_core::world;

/// Common imports for internal use
pub mod prelude {
    pub use glam::{IVec2, UVec2, Vec2};
    pub use sabaku_core::simulation::{ParticleType, Particles};
    pub use sabaku_core::world::World;
}
