//! Circular paint and erase brushes

use super::grid::ParticleGrid;
use crate::simulation::{ParticleType, Particles};

/// Offsets `(dx, dy)` covered by a circle of `radius`, row by row
///
/// A cell is covered when `dx² + dy² <= radius²`. Negative radii cover nothing.
pub fn circle_offsets(radius: i32) -> impl Iterator<Item = (i32, i32)> {
    let r = radius.max(-1);
    let r2 = r as i64 * r as i64;
    (-r..=r).flat_map(move |dy| {
        (-r..=r)
            .filter(move |&dx| (dx as i64 * dx as i64 + dy as i64 * dy as i64) <= r2)
            .map(move |dx| (dx, dy))
    })
}

/// Absolute cells of the circle that lie on a `width` x `height` grid
///
/// The row and column ranges are clipped to the grid first, so the cost is
/// bounded by the grid area however large `radius` is. Cells come row by
/// row, left to right, matching [`circle_offsets`].
pub fn circle_cells(
    width: usize,
    height: usize,
    cx: i32,
    cy: i32,
    radius: i32,
) -> impl Iterator<Item = (i32, i32)> {
    let r = i64::from(radius.max(-1));
    let r2 = r * r;
    let (cx, cy) = (i64::from(cx), i64::from(cy));
    let max_x = width as i64 - 1;
    let max_y = height as i64 - 1;

    ((cy - r).max(0)..=(cy + r).min(max_y)).flat_map(move |y| {
        let dy = y - cy;
        ((cx - r).max(0)..=(cx + r).min(max_x))
            .filter(move |&x| {
                let dx = x - cx;
                dx * dx + dy * dy <= r2
            })
            .map(move |x| (x as i32, y as i32))
    })
}

/// Spawn `kind` in every free in-bounds cell of the circle
///
/// Occupied or off-grid cells are skipped. Returns how many particles were
/// placed.
pub fn brush_circle(
    grid: &mut ParticleGrid,
    cx: i32,
    cy: i32,
    radius: i32,
    kind: ParticleType,
    particles: &Particles,
) -> usize {
    let mut placed = 0;
    for (x, y) in circle_cells(grid.width(), grid.height(), cx, cy, radius) {
        if grid.spawn(x, y, kind, particles) {
            placed += 1;
        }
    }

    if placed == 0 && grid.free_count() == 0 {
        log::warn!("Particle pool exhausted, brush at ({cx}, {cy}) placed nothing");
    }
    placed
}

/// Remove every particle inside the circle; returns how many were removed
pub fn brush_erase(grid: &mut ParticleGrid, cx: i32, cy: i32, radius: i32) -> usize {
    let mut removed = 0;
    for (x, y) in circle_cells(grid.width(), grid.height(), cx, cy, radius) {
        if grid.remove(x, y) {
            removed += 1;
        }
    }
    removed
}
