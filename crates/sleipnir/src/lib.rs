//! # Sleipnir — Headless 3D Simulation Core
//!
//! Advances an entity-component world one frame at a time: constant forces,
//! semi-implicit Euler integration, sphere/box/plane collision response and
//! transform hierarchy resolution. Rendering, assets and the editor live
//! elsewhere; they read [`render`] and [`snapshot`] output after a tick and
//! send [`commands::Command`]s back.
//!
//! Start with `use sleipnir::prelude::*` and build a [`Simulation`](sim::Simulation).
//!
//! ```ignore
//! let mut sim = Simulation::new(SimConfig::default());
//! sim.world_mut().spawn((
//!     Transform::from_xyz(0.0, 2.0, 0.0),
//!     RigidBody::new(1.0),
//!     Acceleration(Vec3::new(0.0, -9.8, 0.0)),
//!     Collider::sphere(0.5),
//! ));
//! sim.tick(1.0 / 60.0);
//! ```

pub mod commands;
pub mod config;
pub mod diag;
pub mod ecs;
pub mod math;
pub mod physics;
pub mod prelude;
pub mod render;
pub mod sim;
pub mod snapshot;
pub mod time;
