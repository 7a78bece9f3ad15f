//! Verification conditions and state checks for scenarios

use sabaku_core::simulation::ParticleType;
use sabaku_core::world::{World, circle_cells};
use serde::{Deserialize, Serialize};

/// Conditions that can be verified against world state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum VerificationCondition {
    // === CELL CHECKS ===
    /// Assert the type occupying a cell
    ParticleAt {
        x: i32,
        y: i32,
        expected: ParticleType,
    },

    /// Assert a cell holds nothing
    EmptyAt { x: i32, y: i32 },

    // === COUNT CHECKS ===
    /// Assert how many particles of a type lie in a region
    ParticleCount {
        particle: ParticleType,
        #[serde(default)]
        region: Region,
        expected: usize,
        #[serde(default)]
        tolerance: Option<usize>, // Allow ±N variance
    },

    /// Assert the number of unused pool slots
    FreeSlots { expected: usize },

    // === LOGICAL OPERATORS ===
    /// All conditions must pass
    All {
        conditions: Vec<VerificationCondition>,
    },

    /// Any condition must pass
    Any {
        conditions: Vec<VerificationCondition>,
    },

    /// Condition must NOT pass
    Not {
        condition: Box<VerificationCondition>,
    },
}

/// Spatial region for verification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Region {
    /// Entire grid
    #[default]
    Whole,

    /// Inclusive rectangle
    Rect {
        min_x: i32,
        min_y: i32,
        max_x: i32,
        max_y: i32,
    },

    /// Filled circle, same coverage as the brush
    Circle {
        center_x: i32,
        center_y: i32,
        radius: i32,
    },
}

/// Result of a verification check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationResult {
    pub passed: bool,
    pub message: String,
    pub actual_value: Option<String>, // For debugging
}

impl VerificationCondition {
    /// Evaluate condition against world state
    pub fn evaluate(&self, world: &World) -> VerificationResult {
        match self {
            VerificationCondition::ParticleAt { x, y, expected } => {
                let actual = world.kind_at(*x, *y);
                VerificationResult {
                    passed: actual == *expected,
                    message: format!("Particle at ({x}, {y}): expected {expected}, got {actual}"),
                    actual_value: Some(actual.to_string()),
                }
            }

            VerificationCondition::EmptyAt { x, y } => {
                let actual = world.kind_at(*x, *y);
                VerificationResult {
                    passed: world.get_particle(*x, *y).is_none(),
                    message: format!("Cell ({x}, {y}) empty: got {actual}"),
                    actual_value: Some(actual.to_string()),
                }
            }

            VerificationCondition::ParticleCount {
                particle,
                region,
                expected,
                tolerance,
            } => {
                let actual = count_in_region(world, *particle, region);
                let tol = tolerance.unwrap_or(0);
                let passed =
                    actual >= expected.saturating_sub(tol) && actual <= expected.saturating_add(tol);

                VerificationResult {
                    passed,
                    message: format!(
                        "{particle} count in {region:?}: expected {expected}±{tol}, got {actual}"
                    ),
                    actual_value: Some(actual.to_string()),
                }
            }

            VerificationCondition::FreeSlots { expected } => {
                let actual = world.free_count();
                VerificationResult {
                    passed: actual == *expected,
                    message: format!("Free slots: expected {expected}, got {actual}"),
                    actual_value: Some(actual.to_string()),
                }
            }

            VerificationCondition::All { conditions } => {
                let mut all_passed = true;
                let mut messages = Vec::new();

                for cond in conditions {
                    let result = cond.evaluate(world);
                    if !result.passed {
                        all_passed = false;
                    }
                    messages.push(format!("  - {}", result.message));
                }

                VerificationResult {
                    passed: all_passed,
                    message: format!("All conditions:\n{}", messages.join("\n")),
                    actual_value: None,
                }
            }

            VerificationCondition::Any { conditions } => {
                let mut any_passed = false;
                let mut messages = Vec::new();

                for cond in conditions {
                    let result = cond.evaluate(world);
                    if result.passed {
                        any_passed = true;
                    }
                    messages.push(format!("  - {}", result.message));
                }

                VerificationResult {
                    passed: any_passed,
                    message: format!("Any condition:\n{}", messages.join("\n")),
                    actual_value: None,
                }
            }

            VerificationCondition::Not { condition } => {
                let result = condition.evaluate(world);
                VerificationResult {
                    passed: !result.passed,
                    message: format!("NOT ({})", result.message),
                    actual_value: result.actual_value,
                }
            }
        }
    }
}

/// Count cells of `particle` in a region; `ParticleType::None` counts empty
/// cells. Parts of the region off the grid are ignored.
fn count_in_region(world: &World, particle: ParticleType, region: &Region) -> usize {
    let width = world.width() as i32;
    let height = world.height() as i32;
    let matches = |x: i32, y: i32| {
        x >= 0 && y >= 0 && x < width && y < height && world.kind_at(x, y) == particle
    };

    match *region {
        Region::Whole => count_rect(0, 0, width - 1, height - 1, &matches),
        Region::Rect {
            min_x,
            min_y,
            max_x,
            max_y,
        } => count_rect(
            min_x.max(0),
            min_y.max(0),
            max_x.min(width - 1),
            max_y.min(height - 1),
            &matches,
        ),
        Region::Circle {
            center_x,
            center_y,
            radius,
        } => circle_cells(world.width(), world.height(), center_x, center_y, radius)
            .filter(|&(x, y)| matches(x, y))
            .count(),
    }
}

fn count_rect(
    min_x: i32,
    min_y: i32,
    max_x: i32,
    max_y: i32,
    matches: &dyn Fn(i32, i32) -> bool,
) -> usize {
    let mut count = 0;
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            if matches(x, y) {
                count += 1;
            }
        }
    }
    count
}
