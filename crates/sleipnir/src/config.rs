//! Simulation settings, loadable from JSON.
//!
//! ```json
//! {
//!   "max_delta": 0.05,
//!   "force": [0.0, -9.8, 0.0],
//!   "integrator": { "angular_mode": "InertiaOnly" },
//!   "collision": { "plane_restitution": 0.7 }
//! }
//! ```
//!
//! Every field is optional; missing ones take their defaults.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::math::Vec3;
use crate::physics::{CollisionConfig, IntegratorConfig};

/// Errors from loading or validating a [`SimConfig`].
#[derive(Debug)]
pub enum ConfigError {
    /// The file could not be read.
    Io(String),
    /// The contents are not valid config JSON.
    Parse(String),
    /// A value is out of range.
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config read failed: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse failed: {e}"),
            ConfigError::Invalid(e) => write!(f, "invalid config: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Settings for a [`Simulation`](crate::sim::Simulation).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Upper bound on the per-tick delta, in seconds.
    pub max_delta: f32,
    /// Constant force fed to [`ForceSystem`](crate::physics::ForceSystem).
    pub force: Vec3,
    /// Constant torque fed to [`TorqueSystem`](crate::physics::TorqueSystem).
    pub torque: Vec3,
    pub integrator: IntegratorConfig,
    pub collision: CollisionConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            max_delta: 0.05,
            force: Vec3::ZERO,
            torque: Vec3::ZERO,
            integrator: IntegratorConfig::default(),
            collision: CollisionConfig::default(),
        }
    }
}

impl SimConfig {
    /// Read and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;
        let config = Self::from_json_str(&text)?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.max_delta.is_finite() && self.max_delta > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "max_delta must be positive, got {}",
                self.max_delta
            )));
        }
        if !self.force.is_finite() {
            return Err(ConfigError::Invalid("force must be finite".into()));
        }
        if !self.torque.is_finite() {
            return Err(ConfigError::Invalid("torque must be finite".into()));
        }

        let c = &self.collision;
        let coefficients = [
            ("plane_restitution", c.plane_restitution),
            ("sphere_plane_friction", c.sphere_plane_friction),
            ("aabb_plane_friction", c.aabb_plane_friction),
            ("aabb_restitution", c.aabb_restitution),
            ("sphere_aabb_damping", c.sphere_aabb_damping),
        ];
        for (name, value) in coefficients {
            if !value.is_finite() {
                return Err(ConfigError::Invalid(format!("collision.{name} must be finite")));
            }
        }
        if !(c.min_distance.is_finite() && c.min_distance > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "collision.min_distance must be positive, got {}",
                c.min_distance
            )));
        }
        Ok(())
    }
}
