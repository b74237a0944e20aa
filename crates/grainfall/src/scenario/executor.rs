//! Scenario execution engine

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use grainfall_core::world::{TickStats, World};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;
use web_time::Instant;

use super::actions::ScenarioAction;
use super::definition::ScenarioDefinition;
use super::results::ExecutionReport;
use super::verification::VerificationCondition;
use crate::render::{PixelRenderer, RenderMode};

/// Configuration for scenario executor
#[derive(Debug, Clone)]
pub struct ScenarioExecutorConfig {
    /// Enable snapshot capture
    pub capture_snapshots: bool,

    /// Snapshot output directory
    pub snapshot_dir: PathBuf,

    /// Pixels per cell in snapshots
    pub cell_size: u32,

    /// Render mode for snapshots that don't name one
    pub render_mode: RenderMode,

    /// RNG seed (random when unset)
    pub seed: Option<u64>,

    /// Log every action as it runs
    pub verbose: bool,
}

impl Default for ScenarioExecutorConfig {
    fn default() -> Self {
        Self {
            capture_snapshots: true,
            snapshot_dir: PathBuf::from("snapshots"),
            cell_size: 4,
            render_mode: RenderMode::Materials,
            seed: None,
            verbose: false,
        }
    }
}

/// Executes scenario actions against a world
pub struct ScenarioExecutor {
    /// Configuration
    config: ScenarioExecutorConfig,

    /// Randomness for drawing and ticking, reseeded per scenario
    rng: Xoshiro256StarStar,

    /// Counters accumulated over the scenario
    stats: TickStats,

    /// Current frame counter
    frame_count: usize,

    /// Ticks run, including the ones inside frames
    tick_count: usize,

    /// Action execution log
    log: Vec<String>,

    /// Snapshots written
    snapshots: Vec<String>,

    /// Engine call timings (milliseconds)
    update_times: Vec<f64>,
}

impl ScenarioExecutor {
    /// Create new executor with default config
    pub fn new() -> Self {
        Self::with_config(ScenarioExecutorConfig::default())
    }

    /// Create new executor with custom config
    pub fn with_config(config: ScenarioExecutorConfig) -> Self {
        let rng = Xoshiro256StarStar::seed_from_u64(config.seed.unwrap_or(0));
        Self {
            config,
            rng,
            stats: TickStats::default(),
            frame_count: 0,
            tick_count: 0,
            log: Vec::new(),
            snapshots: Vec::new(),
            update_times: Vec::new(),
        }
    }

    /// Execute a complete scenario
    ///
    /// Fails if an action fails; failed verifications are reported, not
    /// returned as errors.
    pub fn execute_scenario(
        &mut self,
        scenario: &ScenarioDefinition,
        world: &mut World,
    ) -> Result<ExecutionReport> {
        let start_time = Instant::now();

        let seed = self.config.seed.unwrap_or_else(rand::random);
        self.rng = Xoshiro256StarStar::seed_from_u64(seed);
        let mut report = ExecutionReport::new(scenario.name.clone(), seed);

        self.log.clear();
        self.snapshots.clear();
        self.stats.reset();
        self.frame_count = 0;
        self.tick_count = 0;
        self.update_times.clear();

        self.log(&format!("Starting scenario: {}", scenario.name));
        if !scenario.description.is_empty() {
            self.log(&format!("Description: {}", scenario.description));
        }
        self.log(&format!(
            "World {}x{}, seed {}",
            world.width(),
            world.height(),
            seed
        ));

        // Execute setup actions
        let setup_start = Instant::now();
        if !scenario.setup.is_empty() {
            self.log(&format!("Running {} setup actions", scenario.setup.len()));
            for (idx, action) in scenario.setup.iter().enumerate() {
                if let Err(e) = self.execute_action(action, world) {
                    let msg = format!("Setup action {} failed: {}", idx, e);
                    self.log(&msg);
                    return Err(anyhow::anyhow!(msg));
                }
            }
        }
        report.performance.setup_duration_ms = setup_start.elapsed().as_secs_f64() * 1000.0;

        // Execute main actions
        let action_start = Instant::now();
        self.log(&format!("Running {} main actions", scenario.actions.len()));
        for (idx, action) in scenario.actions.iter().enumerate() {
            if let Err(e) = self.execute_action(action, world) {
                let msg = format!("Action {} failed: {}", idx, e);
                self.log(&msg);
                return Err(anyhow::anyhow!(msg));
            }
        }
        report.performance.action_duration_ms = action_start.elapsed().as_secs_f64() * 1000.0;

        report.actions_executed = scenario.setup.len() + scenario.actions.len();

        // Run verifications
        let verify_start = Instant::now();
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
        report.performance.verification_duration_ms =
            verify_start.elapsed().as_secs_f64() * 1000.0;

        // Finalize report
        report.frames_executed = self.frame_count;
        report.stats = self.stats;
        report.record_material_counts(world.grid());
        report.snapshots = self.snapshots.clone();
        report.passed = report.verification_failures.is_empty();

        report.performance.total_duration_ms = start_time.elapsed().as_secs_f64() * 1000.0;
        report.performance.update_count = self.update_times.len();
        report.performance.tick_count = self.tick_count;

        if !self.update_times.is_empty() {
            let total: f64 = self.update_times.iter().sum();
            report.performance.avg_update_time_ms = total / self.update_times.len() as f64;
            report.performance.peak_update_time_ms =
                self.update_times.iter().copied().fold(0.0, f64::max);
        }

        self.log(&format!(
            "Scenario complete: {} ({} frames, {} ticks, {:.1}ms)",
            if report.passed { "PASSED" } else { "FAILED" },
            self.frame_count,
            self.tick_count,
            report.performance.total_duration_ms
        ));
        self.log(&format!("  Performance: {}", report.performance.summary()));
        report.log = self.log.clone();

        Ok(report)
    }

    /// Execute a single action
    fn execute_action(&mut self, action: &ScenarioAction, world: &mut World) -> Result<()> {
        if self.config.verbose {
            self.log(&format!("[Frame {}] {:?}", self.frame_count, action));
        }

        match action {
            ScenarioAction::Draw(request) => {
                world.apply(request, &mut self.rng);
                self.log(&format!("  Drew {:?} of {}", request.shape, request.material));
            }

            ScenarioAction::Brush { x, y, material } => {
                world.stamp_brush(*x, *y, *material, &mut self.rng);
                self.log(&format!(
                    "  Brushed {} at ({}, {}) r={}",
                    material,
                    x,
                    y,
                    world.config().brush_size
                ));
            }

            ScenarioAction::Preset { preset, x, y } => {
                world.create_preset(*preset, *x, *y, &mut self.rng);
                self.log(&format!("  Created {} at ({}, {})", preset, x, y));
            }

            ScenarioAction::Clear => {
                world.clear();
                self.log("  Cleared world");
            }

            ScenarioAction::SetGravity { strength } => {
                world.config_mut().set_gravity_strength(*strength);
                self.log(&format!(
                    "  Set gravity strength to {}",
                    world.config().gravity_strength
                ));
            }

            ScenarioAction::SetBrushSize { size } => {
                world.config_mut().set_brush_size(*size);
                self.log(&format!("  Set brush size to {}", world.config().brush_size));
            }

            ScenarioAction::SetSimSpeed { ticks_per_frame } => {
                world.config_mut().set_sim_speed(*ticks_per_frame);
                self.log(&format!(
                    "  Set sim speed to {} ticks/frame",
                    world.config().sim_speed
                ));
            }

            ScenarioAction::RunTicks { ticks } => {
                self.simulate_ticks(world, *ticks);
                self.log(&format!("  Ran {} ticks", ticks));
            }

            ScenarioAction::RunFrames { frames } => {
                self.simulate_frames(world, *frames);
                self.log(&format!("  Ran {} frames", frames));
            }

            ScenarioAction::WaitUntil {
                condition,
                timeout_frames,
            } => {
                self.wait_until(world, condition, *timeout_frames)?;
            }

            ScenarioAction::Snapshot { filename, mode } => {
                if self.config.capture_snapshots {
                    let mode = mode.unwrap_or(self.config.render_mode);
                    self.capture_snapshot(world, filename, mode)?;
                } else {
                    self.log(&format!("  Snapshot capture disabled: {}", filename));
                }
            }

            ScenarioAction::Log { message } => {
                self.log(&format!("  [USER] {}", message));
            }
        }

        Ok(())
    }

    /// Wait until condition is met
    fn wait_until(
        &mut self,
        world: &mut World,
        condition: &VerificationCondition,
        timeout_frames: u32,
    ) -> Result<()> {
        for frame in 0..timeout_frames {
            let result = condition.evaluate(world);

            if result.passed {
                self.log(&format!(
                    "  Condition met after {} frames: {}",
                    frame, result.message
                ));
                return Ok(());
            }

            self.simulate_frames(world, 1);
        }

        let result = condition.evaluate(world);
        if result.passed {
            self.log(&format!(
                "  Condition met after {} frames: {}",
                timeout_frames, result.message
            ));
            return Ok(());
        }

        bail!(
            "WaitUntil timed out after {} frames: {}",
            timeout_frames,
            result.message
        );
    }

    /// Run single ticks, one engine call each
    fn simulate_ticks(&mut self, world: &mut World, ticks: u32) {
        for _ in 0..ticks {
            let tick_start = Instant::now();
            world.tick(&mut self.stats, &mut self.rng);
            self.update_times
                .push(tick_start.elapsed().as_secs_f64() * 1000.0);
            self.tick_count += 1;
        }
    }

    /// Run whole frames of `sim_speed` ticks
    fn simulate_frames(&mut self, world: &mut World, frames: u32) {
        for _ in 0..frames {
            let frame_start = Instant::now();
            world.update(&mut self.stats, &mut self.rng);
            self.update_times
                .push(frame_start.elapsed().as_secs_f64() * 1000.0);
            self.frame_count += 1;
            self.tick_count += world.config().sim_speed.max(1) as usize;
        }
    }

    /// Render the grid and write it to the snapshot directory
    fn capture_snapshot(&mut self, world: &World, filename: &str, mode: RenderMode) -> Result<()> {
        let mut renderer = PixelRenderer::new(world.grid(), self.config.cell_size);
        renderer.render(world.grid(), mode);

        std::fs::create_dir_all(&self.config.snapshot_dir).with_context(|| {
            format!(
                "Failed to create snapshot directory: {}",
                self.config.snapshot_dir.display()
            )
        })?;

        let path = self.config.snapshot_dir.join(filename);
        renderer.save_png(&path)?;

        let path = path.display().to_string();
        self.log(&format!("  Snapshot saved: {} ({})", path, mode.name()));
        self.snapshots.push(path);
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
