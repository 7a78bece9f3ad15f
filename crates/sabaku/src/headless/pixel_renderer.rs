//! CPU-based pixel buffer renderer
//!
//! Rasterises the grid into an RGBA buffer and letterboxes it onto an output
//! surface without GPU dependencies.

use std::path::Path;

use anyhow::{Context, Result};
use glam::{UVec2, Vec2};
use sabaku_core::world::World;

use crate::viewport::Viewport;

/// CPU-based renderer that outputs to a pixel buffer
#[derive(Debug, Clone)]
pub struct PixelRenderer {
    /// Width of the buffer in pixels
    pub width: usize,
    /// Height of the buffer in pixels
    pub height: usize,
    /// RGBA pixel buffer (4 bytes per pixel)
    pub buffer: Vec<u8>,
}

impl PixelRenderer {
    /// Create a transparent buffer of the given size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            buffer: vec![0u8; width * height * 4],
        }
    }

    /// One pixel per cell: empty cells transparent, occupied cells in their
    /// particle's colour
    pub fn rasterize(world: &World) -> Self {
        let mut renderer = Self::new(world.width(), world.height());
        renderer.render(world);
        renderer
    }

    /// Redraw `world` into this buffer, resizing it to the grid if needed
    pub fn render(&mut self, world: &World) {
        if self.width != world.width() || self.height != world.height() {
            *self = Self::new(world.width(), world.height());
        }

        for (idx, pixel) in self.buffer.chunks_exact_mut(4).enumerate() {
            let x = (idx % self.width) as i32;
            let y = (idx / self.width) as i32;
            let color = world
                .get_particle(x, y)
                .map(|particle| particle.color)
                .unwrap_or([0, 0, 0, 0]);
            pixel.copy_from_slice(&color);
        }
    }

    /// Scale this buffer into a window-sized surface
    ///
    /// The surface is filled with `background`, then every pixel inside the
    /// letterbox rectangle samples its nearest grid cell and is blended over
    /// the background.
    pub fn compose(&self, viewport: &Viewport, background: [u8; 4]) -> Self {
        let width = viewport.window_size.x as usize;
        let height = viewport.window_size.y as usize;
        let mut out = Self::new(width, height);
        out.fill(background);

        let sampled = Viewport::new(
            viewport.window_size,
            UVec2::new(self.width as u32, self.height as u32),
        );

        for (idx, pixel) in out.buffer.chunks_exact_mut(4).enumerate() {
            let centre = Vec2::new((idx % width) as f32 + 0.5, (idx / width) as f32 + 0.5);
            let cell = sampled.screen_to_grid(centre);
            if !sampled.contains_cell(cell) {
                continue;
            }

            if let Some(src) = self.pixel(cell.x as usize, cell.y as usize) {
                let dst = [pixel[0], pixel[1], pixel[2], pixel[3]];
                pixel.copy_from_slice(&blend_over(src, dst));
            }
        }

        out
    }

    /// Fill the whole buffer with one colour
    pub fn fill(&mut self, color: [u8; 4]) {
        for pixel in self.buffer.chunks_exact_mut(4) {
            pixel.copy_from_slice(&color);
        }
    }

    /// Read a pixel; `None` outside the buffer
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 4;
        Some([
            self.buffer[idx],
            self.buffer[idx + 1],
            self.buffer[idx + 2],
            self.buffer[idx + 3],
        ])
    }

    /// Write the buffer as a PNG image
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        use image::{ImageBuffer, Rgba};

        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let img: ImageBuffer<Rgba<u8>, _> =
            ImageBuffer::from_raw(self.width as u32, self.height as u32, self.buffer.clone())
                .context("Failed to create image buffer")?;

        img.save(path)
            .with_context(|| format!("Failed to save PNG: {}", path.display()))?;

        log::debug!("Saved {}x{} image to {}", self.width, self.height, path.display());
        Ok(())
    }
}

/// Source-over alpha compositing of `src` onto `dst`
pub fn blend_over(src: [u8; 4], dst: [u8; 4]) -> [u8; 4] {
    let sa = src[3] as u32;
    let da = dst[3] as u32;
    let inv = 255 - sa;

    let out_a = sa + (da * inv + 127) / 255;
    if out_a == 0 {
        return [0, 0, 0, 0];
    }

    let mut out = [0u8; 4];
    for c in 0..3 {
        // Premultiply, combine, then un-premultiply by the output alpha
        let premul = src[c] as u32 * sa + (dst[c] as u32 * da * inv + 127) / 255;
        out[c] = ((premul + out_a / 2) / out_a).min(255) as u8;
    }
    out[3] = out_a.min(255) as u8;
    out
}
