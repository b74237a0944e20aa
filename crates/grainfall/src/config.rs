//! Runner configuration with layered loading
//!
//! Configuration is loaded from multiple sources (lowest to highest priority):
//! 1. Compiled defaults
//! 2. `grainfall.ron` file (if exists)
//! 3. Environment variables prefixed with `GRAINFALL_`
//!
//! Example environment variable: `GRAINFALL_SIMULATION__GRAVITY_STRENGTH=3`
//!
//! Command-line flags are applied on top by the binary.

use std::path::Path;

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use grainfall_core::simulation::SimConfig;
use serde::{Deserialize, Serialize};

use crate::render::RenderMode;

/// Main runner configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GrainfallConfig {
    #[serde(default)]
    pub grid: GridConfig,

    #[serde(default)]
    pub simulation: SimulationConfig,

    #[serde(default)]
    pub render: RenderConfig,

    #[serde(default)]
    pub run: RunConfig,
}

/// Grid dimensions in cells
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    pub width: i32,
    pub height: i32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 200,
            height: 150,
        }
    }
}

/// Mirrors the core `SimConfig`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Gravity sub-steps per tick
    pub gravity_strength: u32,
    /// Brush radius for brush actions
    pub brush_size: u32,
    /// Ticks per frame
    pub sim_speed: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let core = SimConfig::default();
        Self {
            gravity_strength: core.gravity_strength,
            brush_size: core.brush_size,
            sim_speed: core.sim_speed,
        }
    }
}

impl SimulationConfig {
    pub fn to_sim_config(&self) -> Result<SimConfig> {
        let config = SimConfig {
            gravity_strength: self.gravity_strength,
            brush_size: self.brush_size,
            sim_speed: self.sim_speed,
        };
        config.validate().context("Invalid simulation settings")?;
        Ok(config)
    }
}

/// PNG export settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Side length in pixels of one cell
    pub cell_size: u32,
    pub mode: RenderMode,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            cell_size: 4,
            mode: RenderMode::Materials,
        }
    }
}

/// Headless run settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Frames to run when no scenario is given
    pub ticks: u32,
    /// Fixed RNG seed (random when unset)
    pub seed: Option<u64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            ticks: 300,
            seed: None,
        }
    }
}

impl GrainfallConfig {
    /// Load configuration from `grainfall.ron` in the working directory
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with layered priority:
    /// 1. Compiled defaults (lowest priority)
    /// 2. `path`, or `grainfall.ron` if none is given (optional either way)
    /// 3. Environment variables prefixed with `GRAINFALL_` (highest priority)
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let defaults = Self::default();

        let file = match path {
            Some(path) => File::from(path),
            None => File::with_name("grainfall"),
        };

        let builder = Config::builder()
            // Layer 1: Compiled defaults
            .set_default("grid.width", i64::from(defaults.grid.width))?
            .set_default("grid.height", i64::from(defaults.grid.height))?
            .set_default(
                "simulation.gravity_strength",
                i64::from(defaults.simulation.gravity_strength),
            )?
            .set_default(
                "simulation.brush_size",
                i64::from(defaults.simulation.brush_size),
            )?
            .set_default(
                "simulation.sim_speed",
                i64::from(defaults.simulation.sim_speed),
            )?
            .set_default("render.cell_size", i64::from(defaults.render.cell_size))?
            .set_default("render.mode", defaults.render.mode.name())?
            .set_default("run.ticks", i64::from(defaults.run.ticks))?
            // Layer 2: Config file (optional, won't error if missing)
            .add_source(file.format(FileFormat::Ron).required(false))
            // Layer 3: Environment variables (GRAINFALL_GRID__WIDTH, etc.)
            .add_source(Environment::with_prefix("GRAINFALL").separator("__"));

        let config = builder.build().context("Failed to build configuration")?;

        let config: Self = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the simulation or renderer cannot use
    pub fn validate(&self) -> Result<()> {
        if self.grid.width <= 0 || self.grid.height <= 0 {
            anyhow::bail!(
                "Grid dimensions must be positive, got {}x{}",
                self.grid.width,
                self.grid.height
            );
        }
        if self.render.cell_size == 0 {
            anyhow::bail!("render.cell_size must be at least 1");
        }
        self.simulation.to_sim_config()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = GrainfallConfig::default();
        assert_eq!(config.grid.width, 200);
        assert_eq!(config.grid.height, 150);
        assert_eq!(config.simulation.gravity_strength, 1);
        assert_eq!(config.simulation.sim_speed, 1);
        assert_eq!(config.render.cell_size, 4);
        assert_eq!(config.render.mode, RenderMode::Materials);
        assert_eq!(config.run.ticks, 300);
        assert!(config.run.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.ron");
        let config = GrainfallConfig::load_from(Some(&path)).expect("Failed to load config");
        assert_eq!(config.grid.width, 200);
        assert_eq!(config.render.cell_size, 4);
    }

    #[test]
    fn test_load_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".ron").tempfile().unwrap();
        write!(
            file,
            r#"(
                grid: (width: 64, height: 48),
                simulation: (gravity_strength: 3),
                render: (mode: "temperature"),
                run: (ticks: 500, seed: 7),
            )"#
        )
        .unwrap();

        let config = GrainfallConfig::load_from(Some(file.path())).unwrap();
        assert_eq!(config.grid.width, 64);
        assert_eq!(config.grid.height, 48);
        assert_eq!(config.simulation.gravity_strength, 3);
        // Untouched keys keep their defaults
        assert_eq!(config.simulation.sim_speed, 1);
        assert_eq!(config.render.cell_size, 4);
        assert_eq!(config.render.mode, RenderMode::Temperature);
        assert_eq!(config.run.ticks, 500);
        assert_eq!(config.run.seed, Some(7));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = GrainfallConfig::default();
        config.simulation.sim_speed = 0;
        assert!(config.validate().is_err());

        let mut config = GrainfallConfig::default();
        config.grid.width = 0;
        assert!(config.validate().is_err());

        let mut config = GrainfallConfig::default();
        config.render.cell_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_simulation_section_converts() {
        let section = SimulationConfig {
            gravity_strength: 2,
            brush_size: 5,
            sim_speed: 3,
        };
        let core = section.to_sim_config().unwrap();
        assert_eq!(core.gravity_strength, 2);
        assert_eq!(core.brush_size, 5);
        assert_eq!(core.sim_speed, 3);
    }
}
