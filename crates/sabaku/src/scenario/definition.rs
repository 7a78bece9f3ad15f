//! Scenario definition and RON file loading

use anyhow::{Context, Result, bail};
use sabaku_core::world::World;
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::actions::ScenarioAction;
use super::verification::VerificationCondition;

/// Top-level scenario definition loaded from RON files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioDefinition {
    /// Scenario name
    pub name: String,

    /// Description
    #[serde(default)]
    pub description: String,

    /// Grid width in cells
    pub width: usize,

    /// Grid height in cells
    pub height: usize,

    /// Fixed RNG seed; the world is seeded from the clock when absent
    #[serde(default)]
    pub seed: Option<u32>,

    /// Initial setup actions (run before main scenario)
    #[serde(default)]
    pub setup: Vec<ScenarioAction>,

    /// Main scenario actions
    #[serde(default)]
    pub actions: Vec<ScenarioAction>,

    /// Verification checks to run after scenario
    #[serde(default)]
    pub verify: Vec<VerificationCondition>,
}

impl ScenarioDefinition {
    /// Load scenario from RON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario file: {}", path.display()))?;

        let scenario: Self = ron::from_str(&content)
            .with_context(|| format!("Failed to parse RON scenario: {}", path.display()))?;

        scenario
            .validate()
            .with_context(|| format!("Invalid scenario: {}", path.display()))?;

        Ok(scenario)
    }

    /// Save scenario to RON file
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let ron = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .context("Failed to serialize scenario to RON")?;

        std::fs::write(path.as_ref(), ron).with_context(|| {
            format!("Failed to write scenario file: {}", path.as_ref().display())
        })?;

        Ok(())
    }

    /// Check grid size and every action
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            bail!(
                "Scenario '{}' has an empty grid ({}x{})",
                self.name,
                self.width,
                self.height
            );
        }

        let phases = [("setup", &self.setup), ("actions", &self.actions)];
        for (phase, actions) in phases {
            for (idx, action) in actions.iter().enumerate() {
                action
                    .validate()
                    .with_context(|| format!("{phase}[{idx}]: {}", action.describe()))?;
            }
        }

        Ok(())
    }

    /// Fresh world sized and seeded for this scenario
    pub fn create_world(&self) -> Result<World> {
        let world = match self.seed {
            Some(seed) => World::with_seed(self.width, self.height, seed),
            None => World::new(self.width, self.height),
        };

        world.with_context(|| {
            format!(
                "Failed to create {}x{} world for scenario '{}'",
                self.width, self.height, self.name
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::verification::Region;
    use sabaku_core::simulation::ParticleType;

    fn sample() -> ScenarioDefinition {
        ScenarioDefinition {
            name: "Test Scenario".to_string(),
            description: "A test scenario".to_string(),
            width: 10,
            height: 10,
            seed: Some(42),
            setup: vec![ScenarioAction::Spawn {
                x: 5,
                y: 9,
                particle: ParticleType::Stone,
            }],
            actions: vec![
                ScenarioAction::Step { ticks: 60 },
                ScenarioAction::Log {
                    message: "Test message".to_string(),
                },
            ],
            verify: vec![VerificationCondition::ParticleCount {
                particle: ParticleType::Stone,
                region: Region::Whole,
                expected: 1,
                tolerance: None,
            }],
        }
    }

    #[test]
    fn test_scenario_serialization() {
        let scenario = sample();

        let ron = ron::ser::to_string_pretty(&scenario, ron::ser::PrettyConfig::default()).unwrap();
        assert!(ron.contains("Test Scenario"));
        assert!(ron.contains("Spawn"));
        assert!(ron.contains("stone"));

        let deserialized: ScenarioDefinition = ron::from_str(&ron).unwrap();
        assert_eq!(deserialized.name, scenario.name);
        assert_eq!(deserialized.seed, Some(42));
        assert_eq!(deserialized.actions, scenario.actions);
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.ron");

        sample().to_file(&path).unwrap();
        let loaded = ScenarioDefinition::from_file(&path).unwrap();

        assert_eq!(loaded.setup, sample().setup);
        assert_eq!(loaded.verify.len(), 1);
    }

    #[test]
    fn test_minimal_scenario_uses_defaults() {
        let scenario: ScenarioDefinition =
            ron::from_str("(name: \"tiny\", width: 3, height: 2)").unwrap();

        assert_eq!(scenario.description, "");
        assert_eq!(scenario.seed, None);
        assert!(scenario.setup.is_empty());
        assert!(scenario.actions.is_empty());
        assert!(scenario.verify.is_empty());

        let world = scenario.create_world().unwrap();
        assert_eq!((world.width(), world.height()), (3, 2));
    }

    #[test]
    fn test_invalid_scenarios_rejected() {
        let mut empty = sample();
        empty.width = 0;
        assert!(empty.validate().is_err());
        assert!(empty.create_world().is_err());

        let mut bad_action = sample();
        bad_action.actions.push(ScenarioAction::Paint {
            x: 0,
            y: 0,
            radius: -2,
            particle: ParticleType::Sand,
        });
        let err = bad_action.validate().unwrap_err();
        assert!(format!("{err:#}").contains("actions[2]"));
    }

    #[test]
    fn test_from_file_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ron");
        std::fs::write(&path, "(name: \"broken\", width: ").unwrap();

        let err = ScenarioDefinition::from_file(&path).unwrap_err();
        assert!(format!("{err}").contains("Failed to parse RON scenario"));
        assert!(ScenarioDefinition::from_file(dir.path().join("missing.ron")).is_err());
    }
}
