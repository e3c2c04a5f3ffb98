//! Semi-implicit Euler integration of linear and angular motion.
//!
//! For every entity with a [`RigidBody`] of positive mass and a [`Transform`]:
//!
//! ```text
//! a  = force / mass + Acceleration
//! v += a · dt
//! v *= Damping.factor                     (if present)
//! p += v · dt
//! force = 0
//! ```
//!
//! The angular path only runs with an [`AngularVelocity`]; see
//! [`AngularAccelerationMode`] for how [`AngularAcceleration`] and
//! [`AngularMass`] combine. Rotation is advanced by adding `ω · dt` to the
//! quaternion's vector part and renormalising. The vector part holds
//! `sin(θ/2) · axis`, so this turns the body at roughly `2ω`, whatever the
//! step size.

use serde::{Deserialize, Serialize};

use crate::ecs::{Components, System, World};
use crate::math::{Quat, Transform, Vec3};
use crate::physics::body::{
    Acceleration, AngularAcceleration, AngularDamping, AngularMass, AngularVelocity, Damping,
    RigidBody,
};

/// How [`AngularAcceleration`] reaches [`AngularVelocity`] when an
/// [`AngularMass`] is also present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AngularAccelerationMode {
    /// Acceleration is always added as-is, and with an `AngularMass` an extra
    /// `acceleration / inertia` term is added on top. The same acceleration
    /// therefore counts twice for bodies with inertia.
    #[default]
    Legacy,
    /// With an `AngularMass`, only the inertia-scaled term is applied (axes
    /// with inertia ≤ 0 fall back to the raw acceleration); without one,
    /// the raw acceleration is applied.
    InertiaOnly,
}

/// Integrator settings.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegratorConfig {
    pub angular_mode: AngularAccelerationMode,
}

/// Pipeline stage that advances every dynamic body by `dt`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Integrator {
    config: IntegratorConfig,
}

impl Integrator {
    pub fn new(config: IntegratorConfig) -> Self {
        if config.angular_mode == AngularAccelerationMode::Legacy {
            log::debug!(
                "integrator: legacy angular mode, AngularAcceleration is applied twice to bodies with AngularMass"
            );
        }
        Self { config }
    }

    pub fn config(&self) -> &IntegratorConfig {
        &self.config
    }
}

impl System for Integrator {
    fn update(&mut self, world: &mut World, dt: f32) {
        let mode = self.config.angular_mode;
        let mut integrated = 0usize;
        world.for_each(|_, c| {
            if integrate_entity(c, dt, mode) {
                integrated += 1;
            }
        });
        log::trace!("integrator: advanced {integrated} bodies by {dt}s");
    }
}

/// Integrate one entity. Returns `false` when it was skipped.
fn integrate_entity(c: &mut Components, dt: f32, mode: AngularAccelerationMode) -> bool {
    let Some(mut body) = c.get::<RigidBody>().copied() else {
        return false;
    };
    if !c.has::<Transform>() {
        return false;
    }
    if !body.is_dynamic() {
        // Immovable: nothing consumes the accumulator, so keep it bounded.
        body.force = Vec3::ZERO;
        c.insert(body.into());
        return false;
    }

    // ── Linear ──
    let mut accel = body.force / body.mass;
    if let Some(a) = c.get::<Acceleration>() {
        accel += a.0;
    }
    body.velocity += accel * dt;
    if let Some(d) = c.get::<Damping>() {
        body.velocity *= d.factor;
    }
    let delta = body.velocity * dt;
    body.force = Vec3::ZERO;

    // ── Angular ──
    let omega = c.get::<AngularVelocity>().map(|w| w.0);
    let spin = omega.map(|w| integrate_angular(c, w, dt, mode));

    if let Some(transform) = c.get_mut::<Transform>() {
        transform.translate(delta);
        if let Some(omega) = spin {
            transform.set_rotation(advance_rotation(transform.rotation(), omega, dt));
        }
    }
    if let Some(omega) = spin {
        c.insert(AngularVelocity(omega).into());
    }
    c.insert(body.into());
    true
}

/// New angular velocity after acceleration and damping.
fn integrate_angular(
    c: &Components,
    mut omega: Vec3,
    dt: f32,
    mode: AngularAccelerationMode,
) -> Vec3 {
    if let Some(alpha) = c.get::<AngularAcceleration>().map(|a| a.0) {
        let inertia = c.get::<AngularMass>().map(|m| m.inertia);
        match (mode, inertia) {
            (AngularAccelerationMode::Legacy, Some(inertia)) => {
                omega += alpha * dt;
                omega += divide_by_inertia(alpha, inertia, Vec3::ZERO) * dt;
            }
            (AngularAccelerationMode::InertiaOnly, Some(inertia)) => {
                omega += divide_by_inertia(alpha, inertia, alpha) * dt;
            }
            (_, None) => omega += alpha * dt,
        }
    }
    if let Some(d) = c.get::<AngularDamping>() {
        omega *= d.factor;
    }
    omega
}

/// `alpha / inertia` per axis; axes with inertia ≤ 0 take `fallback`.
fn divide_by_inertia(alpha: Vec3, inertia: Vec3, fallback: Vec3) -> Vec3 {
    let axis = |a: f32, i: f32, f: f32| if i > 0.0 { a / i } else { f };
    Vec3::new(
        axis(alpha.x, inertia.x, fallback.x),
        axis(alpha.y, inertia.y, fallback.y),
        axis(alpha.z, inertia.z, fallback.z),
    )
}

/// Raw per-axis addition of `ω · dt` onto the quaternion's vector part.
fn advance_rotation(rotation: Quat, omega: Vec3, dt: f32) -> Quat {
    let step = omega * dt;
    let q = Quat::from_xyzw(
        rotation.x + step.x,
        rotation.y + step.y,
        rotation.z + step.z,
        rotation.w,
    );
    let len = q.length();
    if len > f32::EPSILON { q / len } else { rotation }
}
