//! # Rigid-Body Physics
//!
//! A deliberately small solver: constant force/torque sources, a
//! semi-implicit Euler integrator and brute-force narrow-phase collision
//! between spheres, boxes and horizontal planes.
//!
//! ## Module Overview
//!
//! - [`body`] — [`RigidBody`] and the optional motion modifiers
//! - [`collider`] — [`Collider`] shapes
//! - [`forces`] — [`ForceSystem`] and [`TorqueSystem`]
//! - [`integrator`] — [`Integrator`]
//! - [`collision`] — [`CollisionResolver`]
//!
//! Systems read and write local [`Transform`](crate::math::Transform)
//! positions, so physics bodies are expected to be hierarchy roots.

pub mod body;
pub mod collider;
pub mod collision;
pub mod forces;
pub mod integrator;

pub use body::{
    Acceleration, AngularAcceleration, AngularDamping, AngularMass, AngularVelocity, Damping,
    RigidBody,
};
pub use collider::Collider;
pub use collision::{CollisionConfig, CollisionResolver, CollisionStats, resolve_collisions};
pub use forces::{ForceSystem, TorqueSystem};
pub use integrator::{AngularAccelerationMode, Integrator, IntegratorConfig};
