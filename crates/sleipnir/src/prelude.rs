//! Convenience re-exports — `use sleipnir::prelude::*` for the common items.

pub use crate::commands::{Command, CommandQueue, apply_commands};
pub use crate::config::{ConfigError, SimConfig};
pub use crate::ecs::{
    Bundle, Children, Component, ComponentKind, ComponentType, Components, Entity, Material, Name,
    Parent, Schedule, System, TransformPropagation, World, propagate_transforms,
};
pub use crate::math::{Mat3, Mat4, Quat, Transform, Trs, Vec3, Vec4};
pub use crate::physics::{
    Acceleration, AngularAcceleration, AngularAccelerationMode, AngularDamping, AngularMass,
    AngularVelocity, Collider, CollisionConfig, CollisionResolver, Damping, ForceSystem,
    Integrator, IntegratorConfig, RigidBody, TorqueSystem,
};
pub use crate::render::{Gizmo, GizmoShape, InstanceData, collect_gizmos, collect_instances};
pub use crate::sim::Simulation;
pub use crate::snapshot::{EntitySnapshot, WorldSnapshot, snapshot_world};
pub use crate::time::SimTime;
