use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use grainfall::MaterialKind;
use grainfall::config::GrainfallConfig;
use grainfall::render::{PixelRenderer, RenderMode};
use grainfall::scenario::{ScenarioDefinition, ScenarioExecutor, ScenarioExecutorConfig};
use grainfall::tools::Preset;
use grainfall::world::{TickStats, World};
use indicatif::{ProgressBar, ProgressStyle};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file (defaults to grainfall.ron in the working directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run a RON scenario file
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Drop a preset in the middle of the grid before running
    #[arg(long)]
    preset: Option<Preset>,

    /// Frames to run when no scenario is given
    #[arg(long)]
    ticks: Option<u32>,

    /// Grid width in cells
    #[arg(long)]
    width: Option<i32>,

    /// Grid height in cells
    #[arg(long)]
    height: Option<i32>,

    /// Gravity sub-steps per tick
    #[arg(long)]
    gravity: Option<u32>,

    /// Ticks per frame
    #[arg(long)]
    speed: Option<u32>,

    /// Fixed RNG seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Write a PNG snapshot of the final grid
    #[arg(long)]
    output: Option<PathBuf>,

    /// Snapshot coloring
    #[arg(long, value_enum)]
    mode: Option<RenderMode>,

    /// Pixels per cell in snapshots
    #[arg(long)]
    cell_size: Option<u32>,

    /// Write the scenario execution report as JSON
    #[arg(long)]
    report: Option<PathBuf>,

    /// List available presets
    #[arg(long)]
    list_presets: bool,

    /// List materials and their properties
    #[arg(long)]
    list_materials: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if args.list_presets {
        for preset in Preset::ALL {
            println!("{preset}");
        }
        return Ok(());
    }

    if args.list_materials {
        list_materials();
        return Ok(());
    }

    let mut config = GrainfallConfig::load_from(args.config.as_deref())?;
    apply_overrides(&mut config, &args);
    config.validate().context("Invalid settings after command-line overrides")?;

    match &args.scenario {
        Some(path) => run_scenario(path, &config, &args),
        None => run_free(&config, &args),
    }
}

/// Command-line flags take priority over every config layer
fn apply_overrides(config: &mut GrainfallConfig, args: &Args) {
    if let Some(width) = args.width {
        config.grid.width = width;
    }
    if let Some(height) = args.height {
        config.grid.height = height;
    }
    if let Some(gravity) = args.gravity {
        config.simulation.gravity_strength = gravity;
    }
    if let Some(speed) = args.speed {
        config.simulation.sim_speed = speed;
    }
    if let Some(mode) = args.mode {
        config.render.mode = mode;
    }
    if let Some(cell_size) = args.cell_size {
        config.render.cell_size = cell_size;
    }
    if let Some(ticks) = args.ticks {
        config.run.ticks = ticks;
    }
    if args.seed.is_some() {
        config.run.seed = args.seed;
    }
}

fn list_materials() {
    println!(
        "{:<3} {:<6} {:>7} {:>9} {:>8} {:>9}",
        "id", "name", "density", "flammable", "lifespan", "spawn °C"
    );
    for kind in MaterialKind::ALL {
        let props = kind.properties();
        let spawn = props
            .spawn_temperature
            .map(|t| format!("{t:.0}"))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<3} {:<6} {:>7.1} {:>9} {:>8} {:>9}",
            kind.id(),
            kind.name(),
            props.density,
            props.flammable,
            props.default_lifespan,
            spawn
        );
    }
}

fn run_scenario(path: &Path, config: &GrainfallConfig, args: &Args) -> Result<()> {
    let scenario = ScenarioDefinition::from_file(path)?;
    let mut world = scenario.create_world(
        config.grid.width,
        config.grid.height,
        config.simulation.to_sim_config()?,
    )?;

    let snapshot_dir = args
        .output
        .as_ref()
        .and_then(|p| p.parent())
        .filter(|p| !p.as_os_str().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("snapshots"));

    let mut executor = ScenarioExecutor::with_config(ScenarioExecutorConfig {
        snapshot_dir,
        cell_size: config.render.cell_size,
        render_mode: config.render.mode,
        seed: config.run.seed,
        ..Default::default()
    });
    let report = executor.execute_scenario(&scenario, &mut world)?;

    if let Some(report_path) = &args.report {
        report.save_json(report_path)?;
        log::info!("Report written to {}", report_path.display());
    }
    if let Some(output) = &args.output {
        save_snapshot(&world, config, output)?;
    }

    if !report.success() {
        for failure in &report.verification_failures {
            log::error!("{}", failure.message);
        }
        bail!(
            "Scenario '{}' failed {} verification(s)",
            scenario.name,
            report.verification_failures.len()
        );
    }
    Ok(())
}

fn run_free(config: &GrainfallConfig, args: &Args) -> Result<()> {
    let mut world = World::with_config(
        config.grid.width,
        config.grid.height,
        config.simulation.to_sim_config()?,
    )?;

    let seed = config.run.seed.unwrap_or_else(rand::random);
    let mut rng = Xoshiro256StarStar::seed_from_u64(seed);
    log::info!("Seed {seed}");

    if let Some(preset) = args.preset {
        world.create_preset(preset, world.width() / 2, world.height() / 2, &mut rng);
    }

    let frames = u64::from(config.run.ticks);
    let mut stats = TickStats::default();
    if frames > 0 {
        let pb = ProgressBar::new(frames);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")?
                .progress_chars("█▓░"),
        );
        for _ in 0..frames {
            world.update(&mut stats, &mut rng);
            pb.inc(1);
        }
        pb.finish_with_message("done");
    }

    log::info!(
        "Ran {} frames: {} moves, {} state changes, {} reactions, {} particles",
        frames,
        stats.cells_moved,
        stats.state_changes,
        stats.reactions,
        world.grid().particle_count()
    );

    if let Some(output) = &args.output {
        save_snapshot(&world, config, output)?;
    }
    Ok(())
}

fn save_snapshot(world: &World, config: &GrainfallConfig, path: &Path) -> Result<()> {
    let mut renderer = PixelRenderer::new(world.grid(), config.render.cell_size);
    renderer.render(world.grid(), config.render.mode);
    renderer.save_png(path)
}
