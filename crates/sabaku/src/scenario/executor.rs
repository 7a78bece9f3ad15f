//! Scenario execution engine

use std::path::PathBuf;

use anyhow::{Context, Result};
use glam::UVec2;
use sabaku_core::world::World;
use web_time::Instant;

use super::actions::ScenarioAction;
use super::definition::ScenarioDefinition;
use super::results::ExecutionReport;
use crate::headless::PixelRenderer;
use crate::tools::{EraseTool, PenTool, Tool};
use crate::viewport::Viewport;

/// Configuration for scenario executor
#[derive(Debug, Clone)]
pub struct ScenarioExecutorConfig {
    /// Directory captures are written to; captures are skipped when unset
    pub output_dir: Option<PathBuf>,

    /// Letterbox captures onto a surface this size instead of one pixel per cell
    pub capture_size: Option<UVec2>,

    /// Letterbox fill colour for sized captures
    pub background: [u8; 4],
}

impl Default for ScenarioExecutorConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            capture_size: None,
            background: [25, 23, 36, 192],
        }
    }
}

/// Executes scenario actions against a world
pub struct ScenarioExecutor {
    /// Configuration
    config: ScenarioExecutorConfig,

    /// Ticks advanced in the current run
    ticks_run: u64,

    /// Action execution log
    log: Vec<String>,

    /// Captures written
    captures: Vec<String>,
}

impl ScenarioExecutor {
    /// Create new executor with default config
    pub fn new() -> Self {
        Self::with_config(ScenarioExecutorConfig::default())
    }

    /// Create new executor with custom config
    pub fn with_config(config: ScenarioExecutorConfig) -> Self {
        Self {
            config,
            ticks_run: 0,
            log: Vec::new(),
            captures: Vec::new(),
        }
    }

    /// Build a fresh world for the scenario and run it
    pub fn run(&mut self, scenario: &ScenarioDefinition) -> Result<(ExecutionReport, World)> {
        scenario.validate()?;
        let mut world = scenario.create_world()?;
        let report = self.execute_scenario(scenario, &mut world)?;
        Ok((report, world))
    }

    /// Execute a complete scenario against `world`
    ///
    /// Errors only when an action cannot be carried out; failed checks are
    /// reported in the returned report.
    pub fn execute_scenario(
        &mut self,
        scenario: &ScenarioDefinition,
        world: &mut World,
    ) -> Result<ExecutionReport> {
        let start_time = Instant::now();
        let mut report = ExecutionReport::new(scenario.name.clone());

        self.log.clear();
        self.captures.clear();
        self.ticks_run = 0;

        self.log(&format!("Starting scenario: {}", scenario.name));
        if !scenario.description.is_empty() {
            self.log(&format!("Description: {}", scenario.description));
        }

        // Execute setup actions
        if !scenario.setup.is_empty() {
            self.log(&format!("Running {} setup actions", scenario.setup.len()));
            for (idx, action) in scenario.setup.iter().enumerate() {
                if let Err(e) = self.execute_action(action, world) {
                    let msg = format!("Setup action {} failed: {:#}", idx, e);
                    self.log(&msg);
                    report.log = self.log.clone();
                    return Err(anyhow::anyhow!(msg));
                }
            }
        }

        // Execute main actions
        self.log(&format!("Running {} main actions", scenario.actions.len()));
        for (idx, action) in scenario.actions.iter().enumerate() {
            if let Err(e) = self.execute_action(action, world) {
                let msg = format!("Action {} failed: {:#}", idx, e);
                self.log(&msg);
                report.log = self.log.clone();
                return Err(anyhow::anyhow!(msg));
            }
        }

        report.actions_executed = scenario.setup.len() + scenario.actions.len();

        // Run verifications
        if !scenario.verify.is_empty() {
            self.log(&format!("Running {} verifications", scenario.verify.len()));
            for condition in &scenario.verify {
                let result = condition.evaluate(world);
                self.log(&format!(
                    "  {} {}",
                    if result.passed { "✓" } else { "✗" },
                    result.message
                ));

                if !result.passed {
                    report.verification_failures.push(result);
                }
            }
        }

        // Finalize report
        report.ticks_run = self.ticks_run;
        report.final_particle_count = world.particle_count();
        report.captures = self.captures.clone();
        report.passed = report.success();
        report.duration_ms = start_time.elapsed().as_secs_f64() * 1000.0;

        self.log(&format!(
            "Scenario complete: {} ({} ticks, {:.1}ms)",
            if report.passed { "PASSED" } else { "FAILED" },
            self.ticks_run,
            report.duration_ms
        ));
        report.log = self.log.clone();

        Ok(report)
    }

    /// Execute a single action
    pub fn execute_action(&mut self, action: &ScenarioAction, world: &mut World) -> Result<()> {
        action.validate()?;

        match action {
            ScenarioAction::Spawn { x, y, particle } => {
                if !world.spawn(*x, *y, *particle) {
                    self.log(&format!("Spawn {} at ({}, {}) placed nothing", particle, x, y));
                }
            }

            ScenarioAction::Remove { x, y } => {
                world.remove(*x, *y);
            }

            ScenarioAction::Paint {
                x,
                y,
                radius,
                particle,
            } => {
                let before = world.particle_count();
                PenTool::new(*particle).apply(world, *x, *y, *radius as u32);
                log::debug!(
                    "Painted {} {} at ({}, {})",
                    world.particle_count() - before,
                    particle,
                    x,
                    y
                );
            }

            ScenarioAction::Erase { x, y, radius } => {
                let before = world.particle_count();
                EraseTool.apply(world, *x, *y, *radius as u32);
                log::debug!(
                    "Erased {} particles at ({}, {})",
                    before - world.particle_count(),
                    x,
                    y
                );
            }

            ScenarioAction::Step { ticks } => {
                let stats = world.run(*ticks);
                self.ticks_run += *ticks as u64;
                log::debug!(
                    "Stepped {} ticks: {} moves, {} settles",
                    ticks,
                    stats.moved,
                    stats.settled
                );
            }

            ScenarioAction::Clear => {
                let removed = world.clear();
                self.log(&format!("Cleared {} particles", removed));
            }

            ScenarioAction::Log { message } => {
                self.log(message);
            }

            ScenarioAction::Capture { filename } => {
                self.capture(world, filename)?;
            }
        }

        Ok(())
    }

    fn capture(&mut self, world: &World, filename: &str) -> Result<()> {
        let Some(dir) = self.config.output_dir.clone() else {
            self.log(&format!("Capture '{}' skipped (no output directory)", filename));
            return Ok(());
        };

        let grid = PixelRenderer::rasterize(world);
        let image = match self.config.capture_size {
            Some(size) => {
                let viewport = Viewport::new(
                    size,
                    UVec2::new(world.width() as u32, world.height() as u32),
                );
                grid.compose(&viewport, self.config.background)
            }
            None => grid,
        };

        let path = dir.join(filename);
        image
            .save_png(&path)
            .with_context(|| format!("Failed to capture tick {}", world.current_tick()))?;

        let path = path.display().to_string();
        self.log(&format!("Captured {}", path));
        self.captures.push(path);
        Ok(())
    }

    fn log(&mut self, message: &str) {
        log::info!("{}", message);
        self.log.push(message.to_string());
    }
}

impl Default for ScenarioExecutor {
    fn default() -> Self {
        Self::new()
    }
}
