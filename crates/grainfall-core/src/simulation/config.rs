//! Runtime simulation settings
//!
//! Passed into every tick explicitly; the engine holds no global state.

use crate::SimError;
use serde::{Deserialize, Serialize};

/// Largest brush radius the input layer may request
pub const MAX_BRUSH_SIZE: u32 = 64;

/// Settings the input/UI layer reads and writes between frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Gravity sub-steps per tick for falling materials (>= 1)
    pub gravity_strength: u32,
    /// Brush radius used by brush stamps (>= 1)
    pub brush_size: u32,
    /// Ticks run per frame (>= 1)
    pub sim_speed: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            gravity_strength: 1,
            brush_size: 3,
            sim_speed: 1,
        }
    }
}

impl SimConfig {
    /// Check values loaded from outside (config files, scenarios)
    pub fn validate(&self) -> Result<(), SimError> {
        if self.gravity_strength == 0 {
            return Err(SimError::InvalidConfig(
                "gravity_strength must be at least 1".to_string(),
            ));
        }
        if self.brush_size == 0 || self.brush_size > MAX_BRUSH_SIZE {
            return Err(SimError::InvalidConfig(format!(
                "brush_size must be within 1..={MAX_BRUSH_SIZE}, got {}",
                self.brush_size
            )));
        }
        if self.sim_speed == 0 {
            return Err(SimError::InvalidConfig(
                "sim_speed must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn set_gravity_strength(&mut self, strength: u32) {
        self.gravity_strength = strength.max(1);
    }

    pub fn set_brush_size(&mut self, size: u32) {
        self.brush_size = size.clamp(1, MAX_BRUSH_SIZE);
    }

    pub fn set_sim_speed(&mut self, ticks_per_frame: u32) {
        self.sim_speed = ticks_per_frame.max(1);
    }

    /// Sub-steps for falling materials
    pub fn gravity_substeps(&self) -> u32 {
        self.gravity_strength.max(1)
    }

    /// Oil is more viscous and gets one sub-step less than everything else
    pub fn oil_substeps(&self) -> u32 {
        self.gravity_strength.saturating_sub(1).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = SimConfig::default();
        assert_eq!(config.gravity_strength, 1);
        assert_eq!(config.sim_speed, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero() {
        let config = SimConfig {
            gravity_strength: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(SimError::InvalidConfig(_))));

        let config = SimConfig {
            sim_speed: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = SimConfig {
            brush_size: MAX_BRUSH_SIZE + 1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_setters_clamp() {
        let mut config = SimConfig::default();
        config.set_gravity_strength(0);
        config.set_sim_speed(0);
        config.set_brush_size(1000);
        assert_eq!(config.gravity_strength, 1);
        assert_eq!(config.sim_speed, 1);
        assert_eq!(config.brush_size, MAX_BRUSH_SIZE);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_oil_substeps() {
        let mut config = SimConfig::default();
        assert_eq!(config.oil_substeps(), 1);
        config.set_gravity_strength(2);
        assert_eq!(config.oil_substeps(), 1);
        config.set_gravity_strength(4);
        assert_eq!(config.oil_substeps(), 3);
        assert_eq!(config.gravity_substeps(), 4);
    }

    #[test]
    fn test_partial_ron_fills_defaults() {
        let config: SimConfig = ron::from_str("(gravity_strength: 3)").unwrap();
        assert_eq!(config.gravity_strength, 3);
        assert_eq!(config.brush_size, 3);
        assert_eq!(config.sim_speed, 1);
    }
}
