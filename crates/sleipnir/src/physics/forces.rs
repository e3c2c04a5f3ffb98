//! Constant force and torque sources.
//!
//! These run before the [`Integrator`](super::integrator::Integrator). Forces
//! are one-tick impulses: the integrator clears `RigidBody::force` after
//! consuming it, so [`ForceSystem`] re-applies its force every tick.

use crate::ecs::{System, World};
use crate::math::Vec3;
use crate::physics::body::{AngularAcceleration, AngularVelocity, RigidBody};

/// Adds a constant force to every [`RigidBody`].
#[derive(Debug, Clone, Copy)]
pub struct ForceSystem {
    pub force: Vec3,
}

impl ForceSystem {
    pub fn new(force: Vec3) -> Self {
        Self { force }
    }
}

impl System for ForceSystem {
    fn update(&mut self, world: &mut World, _dt: f32) {
        if self.force == Vec3::ZERO {
            return;
        }
        let force = self.force;
        world.query::<RigidBody>(|_, body| body.apply_force(force));
    }
}

/// Applies a constant torque.
///
/// An entity with [`AngularAcceleration`] has the torque added to it (so it
/// builds up across ticks, since angular acceleration is never cleared);
/// otherwise the torque is applied straight to [`AngularVelocity`] as
/// `ω += torque · dt`.
#[derive(Debug, Clone, Copy)]
pub struct TorqueSystem {
    pub torque: Vec3,
}

impl TorqueSystem {
    pub fn new(torque: Vec3) -> Self {
        Self { torque }
    }
}

impl System for TorqueSystem {
    fn update(&mut self, world: &mut World, dt: f32) {
        if self.torque == Vec3::ZERO {
            return;
        }
        let torque = self.torque;
        world.for_each(|_, c| {
            if !c.has::<RigidBody>() {
                return;
            }
            if let Some(acc) = c.get_mut::<AngularAcceleration>() {
                acc.0 += torque;
            } else if let Some(vel) = c.get_mut::<AngularVelocity>() {
                vel.0 += torque * dt;
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn force_added_to_every_body() {
        let mut world = World::new();
        let a = world.spawn((RigidBody::new(1.0),));
        let b = world.spawn((RigidBody::new(0.0),));
        let mut sys = ForceSystem::new(Vec3::new(0.0, -9.8, 0.0));

        sys.update(&mut world, 0.1);
        sys.update(&mut world, 0.1);

        assert_eq!(world.get::<RigidBody>(a).unwrap().force, Vec3::new(0.0, -19.6, 0.0));
        assert_eq!(world.get::<RigidBody>(b).unwrap().force, Vec3::new(0.0, -19.6, 0.0));
    }

    #[test]
    fn torque_prefers_angular_acceleration() {
        let mut world = World::new();
        let with_acc = world.spawn((
            RigidBody::new(1.0),
            AngularVelocity(Vec3::ZERO),
            AngularAcceleration(Vec3::ZERO),
        ));
        let vel_only = world.spawn((RigidBody::new(1.0), AngularVelocity(Vec3::ZERO)));
        let mut sys = TorqueSystem::new(Vec3::new(0.0, 2.0, 0.0));

        sys.update(&mut world, 0.5);

        assert_eq!(world.get::<AngularAcceleration>(with_acc).unwrap().0, Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(world.get::<AngularVelocity>(with_acc).unwrap().0, Vec3::ZERO);
        assert_eq!(world.get::<AngularVelocity>(vel_only).unwrap().0, Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn torque_skips_entities_without_body() {
        let mut world = World::new();
        let e = world.spawn((AngularVelocity(Vec3::ZERO),));
        TorqueSystem::new(Vec3::ONE).update(&mut world, 1.0);
        assert_eq!(world.get::<AngularVelocity>(e).unwrap().0, Vec3::ZERO);
    }
}
