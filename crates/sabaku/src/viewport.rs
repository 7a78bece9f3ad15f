//! Letterboxed mapping between output pixels and grid cells

use glam::{IVec2, UVec2, Vec2};

/// Fits a grid into an output surface at a uniform scale, centred
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub window_size: UVec2,
    pub grid_size: UVec2,
}

impl Viewport {
    pub fn new(window_size: UVec2, grid_size: UVec2) -> Self {
        Self {
            window_size,
            grid_size,
        }
    }

    /// Output pixels per grid cell; the smaller of the two axis ratios
    pub fn scale(&self) -> f32 {
        let window = self.window_size.as_vec2();
        let grid = self.grid_size.as_vec2().max(Vec2::ONE);
        (window.x / grid.x).min(window.y / grid.y)
    }

    /// Top-left corner of the grid in output pixels
    pub fn offset(&self) -> Vec2 {
        (self.window_size.as_vec2() - self.grid_size.as_vec2() * self.scale()) * 0.5
    }

    /// Output-space rectangle the grid occupies, as `(origin, size)`
    pub fn dest_rect(&self) -> (Vec2, Vec2) {
        (self.offset(), self.grid_size.as_vec2() * self.scale())
    }

    /// Grid cell under an output position; may lie outside the grid
    pub fn screen_to_grid(&self, position: Vec2) -> IVec2 {
        let scale = self.scale();
        if scale <= 0.0 {
            return IVec2::splat(-1);
        }
        ((position - self.offset()) / scale).floor().as_ivec2()
    }

    /// Output position of a cell's top-left corner
    pub fn grid_to_screen(&self, cell: IVec2) -> Vec2 {
        self.offset() + cell.as_vec2() * self.scale()
    }

    /// Whether a cell coordinate lies on the grid
    pub fn contains_cell(&self, cell: IVec2) -> bool {
        cell.x >= 0
            && cell.y >= 0
            && (cell.x as u32) < self.grid_size.x
            && (cell.y as u32) < self.grid_size.y
    }
}
