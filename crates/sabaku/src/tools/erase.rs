//! Eraser tool

use super::Tool;
use super::pen::radius;
use sabaku_core::world::World;

/// Eraser tool that frees every cell under the brush
pub struct EraseTool;

impl Tool for EraseTool {
    fn name(&self) -> &str {
        "Eraser"
    }

    fn apply(&self, world: &mut World, x: i32, y: i32, brush_size: u32) -> bool {
        world.erase(x, y, radius(brush_size)) > 0
    }
}
