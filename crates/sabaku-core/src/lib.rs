pub mod error;
pub mod simulation;
pub mod world;

pub use error::WorldError;
