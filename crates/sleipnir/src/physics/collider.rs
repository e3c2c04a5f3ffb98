//! Collider shapes.

use serde::{Deserialize, Serialize};

use crate::math::Vec3;

/// Collision shape attached to an entity.
///
/// Sphere and box colliders are centered on the entity's
/// [`Transform`](crate::math::Transform) position. The plane ignores the
/// transform's position but, like every collider, is inert without one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Collider {
    Sphere { radius: f32 },
    /// Infinite horizontal plane at height `y`.
    Plane { y: f32 },
    /// Axis-aligned box; rotation is ignored.
    Aabb { half_extents: Vec3 },
}

impl Collider {
    pub fn sphere(radius: f32) -> Self {
        Self::Sphere { radius }
    }

    pub fn plane(y: f32) -> Self {
        Self::Plane { y }
    }

    pub fn aabb(half_extents: Vec3) -> Self {
        Self::Aabb { half_extents }
    }

    /// A cube with the given half-extent on every axis.
    pub fn cube(half_extent: f32) -> Self {
        Self::aabb(Vec3::splat(half_extent))
    }
}
