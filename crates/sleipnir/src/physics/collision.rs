//! Narrow-phase collision detection and response.
//!
//! Five passes run back to back every tick, each a brute-force scan over
//! every candidate pair:
//!
//! | pass | detect | respond |
//! |------|--------|---------|
//! | sphere / plane  | `y - r < plane`            | clamp onto plane, bounce `v.y`, damp `v.xz` |
//! | sphere / sphere | `dist² < (r1 + r2)²`       | push apart ½ each, swap normal velocities |
//! | box / plane     | `y - h.y < plane`          | clamp onto plane, bounce `v.y`, damp `v.xz` |
//! | box / box       | overlap on x, y and z      | separate on the shallowest axis (ties x < y < z) |
//! | sphere / box    | `dist²(center, clamp) < r²` | push sphere out, reflect, damp |
//!
//! Pairs are visited in ascending entity id order and resolved in place, so
//! a later pair sees positions and velocities already changed by an earlier
//! one. With three or more bodies touching at once, the result depends on
//! spawn order (but is fully reproducible for a given order).
//!
//! A sphere whose center is already inside a box leaves through the nearest
//! face, pushed by that face's depth plus its radius. If the centers
//! coincide exactly it leaves through the top face.
//!
//! A pair is skipped when either side lacks what its response needs: moving
//! participants need a [`Transform`] and a [`RigidBody`]; planes and the box
//! side of sphere/box only need a [`Transform`].

use serde::{Deserialize, Serialize};

use crate::ecs::{Entity, System, World};
use crate::math::{Transform, Vec3};
use crate::physics::body::RigidBody;
use crate::physics::collider::Collider;

/// Response coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Plane contacts: `v.y *= -plane_restitution`.
    pub plane_restitution: f32,
    /// Sphere on plane: `v.x`, `v.z` scaled by this.
    pub sphere_plane_friction: f32,
    /// Box on plane: `v.x`, `v.z` scaled by this.
    pub aabb_plane_friction: f32,
    /// Box on box: `v[axis] *= -aabb_restitution` for both boxes.
    pub aabb_restitution: f32,
    /// Sphere on box: whole velocity scaled by this after reflecting.
    pub sphere_aabb_damping: f32,
    /// Distances below this are clamped to it when deriving a contact normal.
    pub min_distance: f32,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            plane_restitution: 0.5,
            sphere_plane_friction: 0.9,
            aabb_plane_friction: 0.8,
            aabb_restitution: 0.5,
            sphere_aabb_damping: 0.5,
            min_distance: 1e-4,
        }
    }
}

/// Contacts resolved in one call to [`resolve_collisions`], per pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionStats {
    pub sphere_plane: usize,
    pub sphere_sphere: usize,
    pub aabb_plane: usize,
    pub aabb_aabb: usize,
    pub sphere_aabb: usize,
}

impl CollisionStats {
    pub fn total(&self) -> usize {
        self.sphere_plane + self.sphere_sphere + self.aabb_plane + self.aabb_aabb + self.sphere_aabb
    }
}

/// Pipeline stage running all five passes.
#[derive(Debug, Clone, Default)]
pub struct CollisionResolver {
    config: CollisionConfig,
    last: CollisionStats,
}

impl CollisionResolver {
    pub fn new(config: CollisionConfig) -> Self {
        Self {
            config,
            last: CollisionStats::default(),
        }
    }

    pub fn config(&self) -> &CollisionConfig {
        &self.config
    }

    /// Contacts resolved during the most recent update.
    pub fn last_stats(&self) -> CollisionStats {
        self.last
    }
}

impl System for CollisionResolver {
    fn update(&mut self, world: &mut World, _dt: f32) {
        self.last = resolve_collisions(world, &self.config);
        if self.last.total() > 0 {
            log::trace!("collision: {:?}", self.last);
        }
    }
}

// ── Participants ────────────────────────────────────────────────────────

/// Colliders with a transform, bucketed by shape, in ascending id order.
#[derive(Default)]
struct Shapes {
    spheres: Vec<(Entity, f32)>,
    planes: Vec<(Entity, f32)>,
    boxes: Vec<(Entity, Vec3)>,
}

fn gather_shapes(world: &World) -> Shapes {
    let mut shapes = Shapes::default();
    for entity in world.entities() {
        let Some(c) = world.components(entity) else {
            continue;
        };
        if !c.has::<Transform>() {
            continue;
        }
        match c.get::<Collider>() {
            Some(Collider::Sphere { radius }) => shapes.spheres.push((entity, *radius)),
            Some(Collider::Plane { y }) => shapes.planes.push((entity, *y)),
            Some(Collider::Aabb { half_extents }) => shapes.boxes.push((entity, *half_extents)),
            None => {}
        }
    }
    shapes
}

/// Position and velocity of a moving participant.
fn body_state(world: &World, entity: Entity) -> Option<(Vec3, Vec3)> {
    let c = world.components(entity)?;
    Some((c.get::<Transform>()?.position(), c.get::<RigidBody>()?.velocity))
}

fn write_body(world: &mut World, entity: Entity, position: Vec3, velocity: Vec3) {
    let Some(c) = world.components_mut(entity) else {
        return;
    };
    if let Some(t) = c.get_mut::<Transform>() {
        t.set_position(position);
    }
    if let Some(b) = c.get_mut::<RigidBody>() {
        b.velocity = velocity;
    }
}

/// Contact normal and distance for an offset, with the distance clamped to
/// `min_distance`. Offsets shorter than that use `fallback` as the normal.
fn contact_normal(offset: Vec3, min_distance: f32, fallback: Vec3) -> (Vec3, f32) {
    let len = offset.length();
    if len < min_distance {
        (fallback, min_distance)
    } else {
        (offset / len, len)
    }
}

// ── Passes ──────────────────────────────────────────────────────────────

/// Run every pass once, in order.
pub fn resolve_collisions(world: &mut World, config: &CollisionConfig) -> CollisionStats {
    let shapes = gather_shapes(world);
    CollisionStats {
        sphere_plane: sphere_plane_pass(world, &shapes, config),
        sphere_sphere: sphere_sphere_pass(world, &shapes, config),
        aabb_plane: aabb_plane_pass(world, &shapes, config),
        aabb_aabb: aabb_aabb_pass(world, &shapes, config),
        sphere_aabb: sphere_aabb_pass(world, &shapes, config),
    }
}

/// Push a body resting `extent` above its center up onto a plane.
fn land_on_plane(
    world: &mut World,
    entity: Entity,
    extent: f32,
    plane_y: f32,
    restitution: f32,
    friction: f32,
) -> bool {
    let Some((mut pos, mut vel)) = body_state(world, entity) else {
        return false;
    };
    if pos.y - extent >= plane_y {
        return false;
    }
    pos.y = plane_y + extent;
    vel.y *= -restitution;
    vel.x *= friction;
    vel.z *= friction;
    write_body(world, entity, pos, vel);
    true
}

fn sphere_plane_pass(world: &mut World, shapes: &Shapes, config: &CollisionConfig) -> usize {
    let mut hits = 0;
    for &(sphere, radius) in &shapes.spheres {
        for &(_, plane_y) in &shapes.planes {
            if land_on_plane(
                world,
                sphere,
                radius,
                plane_y,
                config.plane_restitution,
                config.sphere_plane_friction,
            ) {
                hits += 1;
            }
        }
    }
    hits
}

fn aabb_plane_pass(world: &mut World, shapes: &Shapes, config: &CollisionConfig) -> usize {
    let mut hits = 0;
    for &(aabb, half) in &shapes.boxes {
        for &(_, plane_y) in &shapes.planes {
            if land_on_plane(
                world,
                aabb,
                half.y,
                plane_y,
                config.plane_restitution,
                config.aabb_plane_friction,
            ) {
                hits += 1;
            }
        }
    }
    hits
}

fn sphere_sphere_pass(world: &mut World, shapes: &Shapes, config: &CollisionConfig) -> usize {
    let mut hits = 0;
    for (i, &(a, ra)) in shapes.spheres.iter().enumerate() {
        for &(b, rb) in &shapes.spheres[i + 1..] {
            let (Some((mut pa, mut va)), Some((mut pb, mut vb))) =
                (body_state(world, a), body_state(world, b))
            else {
                continue;
            };
            let offset = pb - pa;
            let reach = ra + rb;
            if offset.length_squared() >= reach * reach {
                continue;
            }

            let (normal, dist) = contact_normal(offset, config.min_distance, Vec3::Y);
            let half_pen = (reach - dist) * 0.5;
            pa -= normal * half_pen;
            pb += normal * half_pen;

            // Elastic swap of the normal components, regardless of mass.
            let va_n = va.dot(normal);
            let vb_n = vb.dot(normal);
            va += (vb_n - va_n) * normal;
            vb += (va_n - vb_n) * normal;

            write_body(world, a, pa, va);
            write_body(world, b, pb, vb);
            hits += 1;
        }
    }
    hits
}

/// Index of the smallest component; earlier axes win ties.
fn min_axis(v: Vec3) -> usize {
    let mut axis = 0;
    for k in 1..3 {
        if v[k] < v[axis] {
            axis = k;
        }
    }
    axis
}

fn aabb_aabb_pass(world: &mut World, shapes: &Shapes, config: &CollisionConfig) -> usize {
    let mut hits = 0;
    for (i, &(a, ha)) in shapes.boxes.iter().enumerate() {
        for &(b, hb) in &shapes.boxes[i + 1..] {
            let (Some((mut pa, mut va)), Some((mut pb, mut vb))) =
                (body_state(world, a), body_state(world, b))
            else {
                continue;
            };
            let offset = pb - pa;
            let overlap = (ha + hb) - offset.abs();
            if overlap.x <= 0.0 || overlap.y <= 0.0 || overlap.z <= 0.0 {
                continue;
            }

            let axis = min_axis(overlap);
            let dir = if offset[axis] >= 0.0 { 1.0 } else { -1.0 };
            let half_pen = overlap[axis] * 0.5;
            pa[axis] -= dir * half_pen;
            pb[axis] += dir * half_pen;
            va[axis] *= -config.aabb_restitution;
            vb[axis] *= -config.aabb_restitution;

            write_body(world, a, pa, va);
            write_body(world, b, pb, vb);
            hits += 1;
        }
    }
    hits
}

fn sphere_aabb_pass(world: &mut World, shapes: &Shapes, config: &CollisionConfig) -> usize {
    let mut hits = 0;
    for &(sphere, radius) in &shapes.spheres {
        for &(aabb, half) in &shapes.boxes {
            let Some((mut center, mut vel)) = body_state(world, sphere) else {
                break;
            };
            let Some(box_center) = world.get::<Transform>(aabb).map(Transform::position) else {
                continue;
            };

            let closest = center.clamp(box_center - half, box_center + half);
            let offset = center - closest;
            if offset.length_squared() >= radius * radius {
                continue;
            }

            let dist = offset.length();
            let (normal, push) = if dist >= config.min_distance {
                (offset / dist, radius - dist)
            } else {
                exit_through_face(center - box_center, half, radius, config.min_distance)
            };
            center += normal * push;
            vel -= 2.0 * vel.dot(normal) * normal;
            vel *= config.sphere_aabb_damping;

            write_body(world, sphere, center, vel);
            hits += 1;
        }
    }
    hits
}

/// Normal and push distance for a sphere whose center sits inside a box, at
/// `local` relative to the box center.
fn exit_through_face(local: Vec3, half: Vec3, radius: f32, min_distance: f32) -> (Vec3, f32) {
    if local.length() < min_distance {
        return (Vec3::Y, half.y - local.y + radius);
    }
    let depth = half - local.abs();
    let axis = min_axis(depth);
    let mut normal = Vec3::ZERO;
    normal[axis] = if local[axis] >= 0.0 { 1.0 } else { -1.0 };
    (normal, depth[axis] + radius)
}
