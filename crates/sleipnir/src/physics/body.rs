//! Rigid-body state and the optional motion modifiers.
//!
//! [`RigidBody`] is the only required component; everything else is consumed
//! by the [`Integrator`](super::integrator::Integrator) only when present on
//! the same entity.

use serde::{Deserialize, Serialize};

use crate::math::Vec3;

/// Linear rigid-body state.
///
/// A mass of zero or less marks the body immovable: the integrator skips it,
/// although collision passes can still push it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RigidBody {
    pub mass: f32,
    pub velocity: Vec3,
    /// Force accumulated for the current tick. Cleared by the integrator.
    #[serde(default)]
    pub force: Vec3,
}

impl RigidBody {
    pub fn new(mass: f32) -> Self {
        Self {
            mass,
            velocity: Vec3::ZERO,
            force: Vec3::ZERO,
        }
    }

    /// A body the integrator never moves.
    pub fn immovable() -> Self {
        Self::new(0.0)
    }

    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn is_dynamic(&self) -> bool {
        self.mass > 0.0
    }

    /// Add a force for this tick only.
    pub fn apply_force(&mut self, force: Vec3) {
        self.force += force;
    }
}

/// Constant linear acceleration (e.g. gravity), independent of mass.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Acceleration(pub Vec3);

/// Per-tick velocity multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Damping {
    pub factor: f32,
}

impl Default for Damping {
    fn default() -> Self {
        Self { factor: 1.0 }
    }
}

/// Angular velocity in radians per second, per axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AngularVelocity(pub Vec3);

/// Angular acceleration, per axis. Persists across ticks.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AngularAcceleration(pub Vec3);

/// Per-tick angular velocity multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngularDamping {
    pub factor: f32,
}

impl Default for AngularDamping {
    fn default() -> Self {
        Self { factor: 1.0 }
    }
}

/// Diagonal moment of inertia. Axes with inertia ≤ 0 are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngularMass {
    pub inertia: Vec3,
}

impl Default for AngularMass {
    fn default() -> Self {
        Self { inertia: Vec3::ONE }
    }
}
