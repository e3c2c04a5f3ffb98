//! # Render Extraction
//!
//! The renderer lives outside this crate. After each tick it pulls two
//! things from the world:
//!
//! - [`collect_instances`]: one GPU-ready [`InstanceData`] per entity with a
//!   `Transform`, built from the resolved world matrix and the entity's
//!   [`Material`] (white if absent). [`instance_bytes`] views the slice as raw
//!   bytes for a buffer upload.
//! - [`collect_gizmos`]: collider outlines for a debug overlay, expanded to
//!   line-list vertices by [`gizmo_lines`].
//!
//! Both walk entities in id order, so output is stable between frames.

use bytemuck::{Pod, Zeroable};

use crate::ecs::{Entity, Material, World};
use crate::math::{Mat3, Mat4, Transform, Vec3};
use crate::physics::Collider;

// ── Instances ───────────────────────────────────────────────────────────

/// Per-instance vertex data, laid out for direct upload.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct InstanceData {
    pub model: [[f32; 4]; 4],
    /// Inverse-transpose of the model's upper 3×3, padded to 4×4.
    pub normal_matrix: [[f32; 4]; 4],
    pub color: [f32; 4],
}

impl InstanceData {
    pub fn new(model: Mat4, color: [f32; 4]) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            normal_matrix: normal_matrix(model).to_cols_array_2d(),
            color,
        }
    }
}

/// Inverse-transpose of the linear part. Singular matrices (zero scale)
/// fall back to the plain linear part.
fn normal_matrix(model: Mat4) -> Mat4 {
    let linear = Mat3::from_mat4(model);
    let det = linear.determinant();
    let n = if det.abs() > f32::EPSILON {
        linear.inverse().transpose()
    } else {
        linear
    };
    Mat4::from_mat3(n)
}

/// Gather an instance for every entity with a `Transform`.
pub fn collect_instances(world: &World) -> Vec<InstanceData> {
    let mut instances = Vec::new();
    for entity in world.entities() {
        let Some(c) = world.components(entity) else {
            continue;
        };
        let Some(transform) = c.get::<Transform>() else {
            continue;
        };
        let color = c.get::<Material>().copied().unwrap_or_default().base_color;
        instances.push(InstanceData::new(transform.world_matrix(), color.to_array()));
    }
    instances
}

pub fn instance_bytes(instances: &[InstanceData]) -> &[u8] {
    bytemuck::cast_slice(instances)
}

// ── Gizmos ──────────────────────────────────────────────────────────────

/// Half-size of the square drawn for an (infinite) plane.
pub const PLANE_GIZMO_EXTENT: f32 = 10.0;
const CIRCLE_SEGMENTS: u32 = 24;

/// Outline shape of a collider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GizmoShape {
    Sphere { radius: f32 },
    Box { half_extents: Vec3 },
    /// Horizontal square, already placed at the plane's height.
    Plane,
}

/// A collider outline at the position the collision passes use.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gizmo {
    pub entity: Entity,
    pub center: Vec3,
    pub shape: GizmoShape,
}

/// One line-list vertex.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
}

/// Gather an outline for every collider that takes part in collision.
///
/// Centers come from the local `Transform` position, the same value the
/// collision passes read. Planes are centered under the entity's x/z.
pub fn collect_gizmos(world: &World) -> Vec<Gizmo> {
    let mut gizmos = Vec::new();
    for entity in world.entities() {
        let Some(c) = world.components(entity) else {
            continue;
        };
        let (Some(collider), Some(transform)) = (c.get::<Collider>(), c.get::<Transform>()) else {
            continue;
        };
        let position = transform.position();
        let (center, shape) = match *collider {
            Collider::Sphere { radius } => (position, GizmoShape::Sphere { radius }),
            Collider::Aabb { half_extents } => (position, GizmoShape::Box { half_extents }),
            Collider::Plane { y } => (Vec3::new(position.x, y, position.z), GizmoShape::Plane),
        };
        gizmos.push(Gizmo {
            entity,
            center,
            shape,
        });
    }
    gizmos
}

/// Expand gizmos into line-list vertices (two per segment).
pub fn gizmo_lines(gizmos: &[Gizmo]) -> Vec<LineVertex> {
    let mut verts = Vec::new();
    for gizmo in gizmos {
        let start = verts.len();
        match gizmo.shape {
            GizmoShape::Sphere { radius } => circle_lines(&mut verts, radius),
            GizmoShape::Box { half_extents } => box_lines(&mut verts, half_extents),
            GizmoShape::Plane => {
                let e = PLANE_GIZMO_EXTENT;
                box_edges(
                    &mut verts,
                    &[
                        [-e, 0.0, -e],
                        [e, 0.0, -e],
                        [e, 0.0, e],
                        [-e, 0.0, e],
                    ],
                    &[(0, 1), (1, 2), (2, 3), (3, 0)],
                );
            }
        }
        let offset = gizmo.center.to_array();
        for v in &mut verts[start..] {
            for k in 0..3 {
                v.position[k] += offset[k];
            }
        }
    }
    verts
}

fn box_lines(verts: &mut Vec<LineVertex>, h: Vec3) {
    let corners = [
        [-h.x, -h.y, -h.z],
        [h.x, -h.y, -h.z],
        [h.x, h.y, -h.z],
        [-h.x, h.y, -h.z],
        [-h.x, -h.y, h.z],
        [h.x, -h.y, h.z],
        [h.x, h.y, h.z],
        [-h.x, h.y, h.z],
    ];
    box_edges(
        verts,
        &corners,
        &[
            (0, 1), (1, 2), (2, 3), (3, 0), // back face
            (4, 5), (5, 6), (6, 7), (7, 4), // front face
            (0, 4), (1, 5), (2, 6), (3, 7), // connecting edges
        ],
    );
}

fn box_edges(verts: &mut Vec<LineVertex>, corners: &[[f32; 3]], edges: &[(usize, usize)]) {
    for &(a, b) in edges {
        verts.push(LineVertex { position: corners[a] });
        verts.push(LineVertex { position: corners[b] });
    }
}

/// Three great circles (XY, XZ, YZ).
fn circle_lines(verts: &mut Vec<LineVertex>, radius: f32) {
    let step = std::f32::consts::TAU / CIRCLE_SEGMENTS as f32;
    let point = |plane: usize, angle: f32| {
        let (s, c) = angle.sin_cos();
        match plane {
            0 => [radius * c, radius * s, 0.0],
            1 => [radius * c, 0.0, radius * s],
            _ => [0.0, radius * c, radius * s],
        }
    };
    for plane in 0..3 {
        for i in 0..CIRCLE_SEGMENTS {
            let a = i as f32 * step;
            let b = (i + 1) as f32 * step;
            verts.push(LineVertex { position: point(plane, a) });
            verts.push(LineVertex { position: point(plane, b) });
        }
    }
}
