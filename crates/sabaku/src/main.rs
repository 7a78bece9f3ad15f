//! Sabaku - headless falling-sand sandbox

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use glam::UVec2;
use sabaku::config::SabakuConfig;
use sabaku::demo::{DemoSettings, run_demo};
use sabaku::headless::PixelRenderer;
use sabaku::scenario::{ScenarioDefinition, ScenarioExecutor, ScenarioExecutorConfig};
use sabaku::simulation::Particles;
use sabaku::tools::Brush;
use sabaku::viewport::Viewport;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file to load instead of ./sabaku.ron
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a RON scenario and verify its checks
    Run {
        /// Scenario file
        scenario: PathBuf,

        /// Directory for captures and the JSON report
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    /// Pour sand and water into a stone basin and save a PNG
    Demo {
        /// Ticks to simulate (default from config)
        #[arg(long)]
        ticks: Option<usize>,

        /// Output image path
        #[arg(long, default_value = "sabaku_demo.png")]
        output: PathBuf,

        /// RNG seed (default from config, else the clock)
        #[arg(long)]
        seed: Option<u32>,
    },

    /// List the particle registry
    Materials,
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => SabakuConfig::load_from(path)?,
        None => SabakuConfig::load()?,
    };
    log::debug!("Loaded config: {:?}", config);

    match args.command {
        Command::Run {
            scenario,
            output_dir,
        } => {
            let passed = run_scenario(&config, scenario, output_dir)?;
            if !passed {
                std::process::exit(1);
            }
            Ok(())
        }
        Command::Demo {
            ticks,
            output,
            seed,
        } => demo(&config, ticks, output, seed),
        Command::Materials => {
            list_materials();
            Ok(())
        }
    }
}

fn run_scenario(
    config: &SabakuConfig,
    path: PathBuf,
    output_dir: Option<PathBuf>,
) -> anyhow::Result<bool> {
    let scenario = ScenarioDefinition::from_file(&path)?;

    let mut executor = ScenarioExecutor::with_config(ScenarioExecutorConfig {
        output_dir: output_dir.clone(),
        capture_size: Some(UVec2::new(
            config.render.window_width,
            config.render.window_height,
        )),
        background: config.render.background,
    });

    let (report, _world) = executor
        .run(&scenario)
        .with_context(|| format!("Scenario failed to run: {}", path.display()))?;

    println!("{}", report.summary());
    for failure in &report.verification_failures {
        println!("  ✗ {}", failure.message);
    }

    if let Some(dir) = output_dir {
        let report_path = dir.join("report.json");
        report.save_json(&report_path)?;
        log::info!("Report written to {}", report_path.display());
    }

    Ok(report.passed)
}

fn demo(
    config: &SabakuConfig,
    ticks: Option<usize>,
    output: PathBuf,
    seed: Option<u32>,
) -> anyhow::Result<()> {
    let brush = Brush::with_limits(
        config.brush.default_radius,
        config.brush.min_radius,
        config.brush.max_radius,
        config.brush.default_particle,
    );

    let settings = DemoSettings {
        width: config.simulation.width,
        height: config.simulation.height,
        ticks: ticks.unwrap_or(config.run.demo_ticks),
        tick_interval_ms: config.run.tick_interval_ms,
        seed: seed.or(config.simulation.seed),
        brush,
    };

    log::info!(
        "Running {}x{} demo for {} ticks",
        settings.width,
        settings.height,
        settings.ticks
    );
    let world = run_demo(&settings)?;

    let viewport = Viewport::new(
        UVec2::new(config.render.window_width, config.render.window_height),
        UVec2::new(world.width() as u32, world.height() as u32),
    );
    PixelRenderer::rasterize(&world)
        .compose(&viewport, config.render.background)
        .save_png(&output)?;

    println!("Saved {}", output.display());
    Ok(())
}

fn list_materials() {
    let particles = Particles::new();
    println!(
        "{:<4} {:<8} {:<8} {:>8} {:>10}  color",
        "id", "name", "state", "density", "viscosity"
    );
    for props in particles.iter() {
        println!(
            "{:<4} {:<8} {:<8} {:>8.2} {:>10.2}  {:?}",
            props.kind.id(),
            props.name,
            format!("{:?}", props.state),
            props.density,
            props.viscosity,
            props.color
        );
    }
}
