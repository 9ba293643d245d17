//! Configuration for the collision subsystem
//!
//! The collision core is configured by exactly two values: the half-width of
//! the broad-phase grid volume and the maximum object scale used to size grid
//! cells. Both are loadable from TOML so a game can tune them without a
//! rebuild.

use crate::foundation::math::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error while reading or writing a config file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// A configured value is out of its valid range
    #[error("Invalid config value: {0}")]
    Invalid(String),
}

/// Tuning parameters for the collision subsystem
///
/// `max_object_scale` is the largest half-extent any staged collider is
/// expected to have; grid resolution is derived from it so that no object
/// spans more than roughly one cell width. `grid_half_width` is the
/// half-extent of the whole grid volume, which covers
/// `[-grid_half_width, +grid_half_width]` in world space.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollisionConfig {
    /// Largest expected collider half-extent, used to size grid cells
    pub max_object_scale: f32,

    /// Half-extent of the grid volume per axis
    pub grid_half_width: [f32; 3],
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            max_object_scale: 1.0,
            grid_half_width: [50.0, 50.0, 50.0],
        }
    }
}

impl CollisionConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self =
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let contents =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Check that every value is in its valid range
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.max_object_scale.is_finite() && self.max_object_scale > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "max_object_scale must be positive, got {}",
                self.max_object_scale
            )));
        }
        for (axis, &half) in ["x", "y", "z"].iter().zip(&self.grid_half_width) {
            if !(half.is_finite() && half > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "grid_half_width.{axis} must be positive, got {half}"
                )));
            }
        }
        if self.grid_half_width[0] < self.max_object_scale {
            return Err(ConfigError::Invalid(
                "grid_half_width.x must be at least max_object_scale".to_string(),
            ));
        }
        Ok(())
    }

    /// Grid half-width as a vector
    pub fn half_width(&self) -> Vec3 {
        Vec3::new(
            self.grid_half_width[0],
            self.grid_half_width[1],
            self.grid_half_width[2],
        )
    }
}
