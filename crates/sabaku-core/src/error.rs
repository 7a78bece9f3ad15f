//! Errors raised while building a world

use thiserror::Error;

/// Failure to construct a [`World`](crate::world::World)
///
/// Out-of-bounds access and a full particle pool are not errors: accessors
/// treat them as no-ops and `spawn` reports them as `false`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WorldError {
    #[error("invalid grid dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("failed to allocate {what} for a {width}x{height} grid")]
    ResourceExhaustion {
        what: &'static str,
        width: usize,
        height: usize,
    },
}
