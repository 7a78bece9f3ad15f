//! Front-end configuration with layered loading
//!
//! Configuration is loaded from multiple sources (lowest to highest priority):
//! 1. Compiled defaults
//! 2. `sabaku.ron` file (if exists)
//! 3. Environment variables prefixed with `SABAKU_`
//!
//! Example environment variable: `SABAKU_SIMULATION__WIDTH=320`

use std::path::Path;

use anyhow::{Context, Result};
use config::{Config, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};
use sabaku_core::simulation::ParticleType;
use serde::{Deserialize, Serialize};

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SabakuConfig {
    #[serde(default)]
    pub simulation: SimulationConfig,

    #[serde(default)]
    pub brush: BrushConfig,

    #[serde(default)]
    pub render: RenderConfig,

    #[serde(default)]
    pub run: RunConfig,
}

/// Grid size and seeding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Grid width in cells
    pub width: usize,
    /// Grid height in cells
    pub height: usize,
    /// Fixed RNG seed; seeded from the clock when absent
    #[serde(default)]
    pub seed: Option<u32>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            width: 200,
            height: 150,
            seed: None,
        }
    }
}

/// Brush radius limits and the particle selected on startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrushConfig {
    pub default_radius: u32,
    pub min_radius: u32,
    pub max_radius: u32,
    pub default_particle: ParticleType,
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self {
            default_radius: 3,
            min_radius: 1,
            max_radius: 20,
            default_particle: ParticleType::Sand,
        }
    }
}

/// Output surface settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Output width in pixels
    pub window_width: u32,
    /// Output height in pixels
    pub window_height: u32,
    /// Letterbox fill colour (RGBA)
    pub background: [u8; 4],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 800,
            window_height: 600,
            background: [25, 23, 36, 192],
        }
    }
}

/// Tick pacing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Reference interval between interactive ticks
    pub tick_interval_ms: u64,
    /// Ticks simulated by `sabaku demo` when `--ticks` is not given
    pub demo_ticks: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 16,
            demo_ticks: 300,
        }
    }
}

impl SabakuConfig {
    /// Load configuration with layered priority:
    /// 1. Compiled defaults (lowest priority)
    /// 2. `sabaku.ron` file (if exists)
    /// 3. Environment variables prefixed with `SABAKU_` (highest priority)
    pub fn load() -> Result<Self> {
        let builder = Self::defaults()?
            // Layer 2: Config file (optional, won't error if missing)
            .add_source(
                File::with_name("sabaku")
                    .format(FileFormat::Ron)
                    .required(false),
            )
            // Layer 3: Environment variables (SABAKU_SIMULATION__WIDTH, etc.)
            .add_source(Environment::with_prefix("SABAKU").separator("__"));

        Self::finish(builder)
    }

    /// Load compiled defaults overridden by an explicit RON file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let path_str = path
            .to_str()
            .with_context(|| format!("Config path is not valid UTF-8: {}", path.display()))?;

        let builder = Self::defaults()?
            .add_source(File::new(path_str, FileFormat::Ron).required(true))
            .add_source(Environment::with_prefix("SABAKU").separator("__"));

        Self::finish(builder)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>> {
        let builder = Config::builder()
            .set_default("simulation.width", 200_i64)?
            .set_default("simulation.height", 150_i64)?
            .set_default("brush.default_radius", 3_i64)?
            .set_default("brush.min_radius", 1_i64)?
            .set_default("brush.max_radius", 20_i64)?
            .set_default("brush.default_particle", "sand")?
            .set_default("render.window_width", 800_i64)?
            .set_default("render.window_height", 600_i64)?
            .set_default("render.background", vec![25_i64, 23, 36, 192])?
            .set_default("run.tick_interval_ms", 16_i64)?
            .set_default("run.demo_ticks", 300_i64)?;

        Ok(builder)
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let config = builder.build().context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}
