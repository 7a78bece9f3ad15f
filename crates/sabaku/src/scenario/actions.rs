//! Scenario actions

use anyhow::{Result, bail};
use sabaku_core::simulation::ParticleType;
use serde::{Deserialize, Serialize};

/// One step of a scenario script
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScenarioAction {
    /// Place a single particle
    Spawn {
        x: i32,
        y: i32,
        particle: ParticleType,
    },

    /// Remove whatever occupies a cell
    Remove { x: i32, y: i32 },

    /// Paint a filled circle, leaving occupied cells alone
    Paint {
        x: i32,
        y: i32,
        radius: i32,
        particle: ParticleType,
    },

    /// Erase a filled circle
    Erase { x: i32, y: i32, radius: i32 },

    /// Advance the simulation
    Step { ticks: usize },

    /// Remove every particle
    Clear,

    /// Log a message
    Log { message: String },

    /// Save a PNG of the current grid into the output directory
    Capture { filename: String },
}

impl ScenarioAction {
    /// Reject actions no world could carry out
    pub fn validate(&self) -> Result<()> {
        match self {
            ScenarioAction::Spawn { particle, .. } | ScenarioAction::Paint { particle, .. }
                if *particle == ParticleType::None =>
            {
                bail!("Cannot place particle type 'none'")
            }
            ScenarioAction::Paint { radius, .. } | ScenarioAction::Erase { radius, .. }
                if *radius < 0 =>
            {
                bail!("Brush radius must not be negative, got {radius}")
            }
            ScenarioAction::Capture { filename } => {
                if filename.trim().is_empty() {
                    bail!("Capture filename must not be empty");
                }
                if std::path::Path::new(filename).is_absolute() || filename.contains("..") {
                    bail!("Capture filename must stay inside the output directory: {filename}");
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Short label for logs
    pub fn describe(&self) -> String {
        match self {
            ScenarioAction::Spawn { x, y, particle } => format!("Spawn {particle} at ({x}, {y})"),
            ScenarioAction::Remove { x, y } => format!("Remove ({x}, {y})"),
            ScenarioAction::Paint {
                x,
                y,
                radius,
                particle,
            } => format!("Paint {particle} r={radius} at ({x}, {y})"),
            ScenarioAction::Erase { x, y, radius } => format!("Erase r={radius} at ({x}, {y})"),
            ScenarioAction::Step { ticks } => format!("Step {ticks} ticks"),
            ScenarioAction::Clear => "Clear".to_string(),
            ScenarioAction::Log { message } => format!("Log: {message}"),
            ScenarioAction::Capture { filename } => format!("Capture {filename}"),
        }
    }
}
