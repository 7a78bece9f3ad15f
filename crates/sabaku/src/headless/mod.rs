//! Headless rendering
//!
//! CPU pixel buffers for captures and the demo, written out as PNG files.

mod pixel_renderer;

pub use pixel_renderer::{PixelRenderer, blend_over};
