//! Math types and glam re-exports.
//!
//! We re-export [glam](https://docs.rs/glam) types so users don't need to
//! depend on it directly. The [`Transform`] component stores an entity's local
//! position, rotation, and scale together with two cached matrices:
//!
//! ```text
//! local = T(position) * R(rotation) * S(scale)
//! world = parent.world * local          (identity parent for roots)
//! ```
//!
//! Every TRS setter raises the dirty flag. The cached matrices are only
//! refreshed by the hierarchy resolver
//! ([`propagate_transforms`](crate::ecs::hierarchy::propagate_transforms)), so
//! reading [`Transform::world_matrix`] between a mutation and the next
//! propagation returns the previous frame's value.

use serde::{Deserialize, Serialize};

pub use glam::{Mat3, Mat4, Quat, Vec3, Vec4};

/// Local transform of an entity plus its cached local/world matrices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "Trs", into = "Trs")]
pub struct Transform {
    position: Vec3,
    rotation: Quat,
    scale: Vec3,
    local: Mat4,
    world: Mat4,
    dirty: bool,
}

impl Transform {
    /// Identity transform (origin, no rotation, uniform scale of 1).
    ///
    /// Starts dirty so the first propagation fills in the world matrix.
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
        local: Mat4::IDENTITY,
        world: Mat4::IDENTITY,
        dirty: true,
    };

    pub fn new(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
            ..Self::IDENTITY
        }
    }

    /// Create a transform at the given position.
    pub fn from_xyz(x: f32, y: f32, z: f32) -> Self {
        Self::from_position(Vec3::new(x, y, z))
    }

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// Build a transform from a raw TRS matrix, e.g. an imported scene node.
    ///
    /// The matrix is decomposed with [`decompose_trs`]; the cached local
    /// matrix keeps the input as-is so an exactly round-tripped value is not
    /// needed before the first propagation.
    pub fn from_matrix(matrix: Mat4) -> Self {
        let (position, rotation, scale) = decompose_trs(&matrix);
        Self {
            position,
            rotation,
            scale,
            local: matrix,
            world: Mat4::IDENTITY,
            dirty: true,
        }
    }

    /// Return a copy with the given rotation.
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.set_rotation(rotation);
        self
    }

    /// Return a copy with uniform scale applied.
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.set_scale(Vec3::splat(scale));
        self
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.dirty = true;
    }

    pub fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
        self.dirty = true;
    }

    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
        self.dirty = true;
    }

    /// Offset the position by `delta`.
    pub fn translate(&mut self, delta: Vec3) {
        self.set_position(self.position + delta);
    }

    /// Replace position, rotation and scale at once.
    pub fn set_trs(&mut self, position: Vec3, rotation: Quat, scale: Vec3) {
        self.position = position;
        self.rotation = rotation;
        self.scale = scale;
        self.dirty = true;
    }

    /// `true` when the TRS values changed since the last propagation.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Force a recompute on the next propagation.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Cached local matrix. Stale while [`is_dirty`](Self::is_dirty).
    pub fn local_matrix(&self) -> Mat4 {
        self.local
    }

    /// Cached world matrix. Stale while [`is_dirty`](Self::is_dirty).
    pub fn world_matrix(&self) -> Mat4 {
        self.world
    }

    /// World-space position taken from the cached world matrix.
    pub fn world_position(&self) -> Vec3 {
        self.world.w_axis.truncate()
    }

    /// Compute the local TRS matrix from the current fields, ignoring the cache.
    pub fn compute_matrix(&self) -> Mat4 {
        compose_trs(self.position, self.rotation, self.scale)
    }

    /// Recompute the local matrix if dirty. Returns whether it was dirty.
    pub(crate) fn refresh_local(&mut self) -> bool {
        if !self.dirty {
            return false;
        }
        self.local = self.compute_matrix();
        true
    }

    /// Store the world matrix and clear the dirty flag.
    pub(crate) fn commit_world(&mut self, world: Mat4) {
        self.world = world;
        self.dirty = false;
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Plain position/rotation/scale triple.
///
/// This is the serialized form of [`Transform`] and the shape used by editor
/// snapshots and `SetTransform` commands. Cached matrices are never
/// serialized; a deserialized transform starts dirty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trs {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Trs {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl From<Trs> for Transform {
    fn from(trs: Trs) -> Self {
        Transform::new(trs.position, trs.rotation, trs.scale)
    }
}

impl From<Transform> for Trs {
    fn from(t: Transform) -> Self {
        Self {
            position: t.position,
            rotation: t.rotation,
            scale: t.scale,
        }
    }
}

// ── TRS composition / decomposition ─────────────────────────────────────

/// Compose `T * R * S` as a column-major matrix.
///
/// The rotation block is the standard quaternion rotation matrix with each
/// basis column scaled by the matching scale axis; the translation goes in
/// the last column.
pub fn compose_trs(position: Vec3, rotation: Quat, scale: Vec3) -> Mat4 {
    Mat4::from_scale_rotation_translation(scale, rotation, position)
}

/// Split a TRS matrix into `(position, rotation, scale)`.
///
/// - position is the translation column
/// - scale is the length of each basis column (the x scale is negated for a
///   mirrored basis so the remaining rotation stays proper)
/// - rotation comes from [`quat_from_basis`] on the normalised columns
///
/// A zero-length column yields a zero scale on that axis and is replaced by
/// the matching identity axis when extracting the rotation.
pub fn decompose_trs(matrix: &Mat4) -> (Vec3, Quat, Vec3) {
    let position = matrix.w_axis.truncate();

    let mut x = matrix.x_axis.truncate();
    let y = matrix.y_axis.truncate();
    let z = matrix.z_axis.truncate();

    let mut scale = Vec3::new(x.length(), y.length(), z.length());
    if x.cross(y).dot(z) < 0.0 {
        scale.x = -scale.x;
        x = -x;
    }

    let axis = |col: Vec3, len: f32, fallback: Vec3| {
        if len.abs() > f32::EPSILON {
            col / len.abs()
        } else {
            fallback
        }
    };
    let rotation = quat_from_basis(
        axis(x, scale.x, Vec3::X),
        axis(y, scale.y, Vec3::Y),
        axis(z, scale.z, Vec3::Z),
    );

    (position, rotation, scale)
}

/// Trace-based quaternion from an orthonormal basis (the columns of a
/// rotation matrix).
///
/// One of four branches is taken depending on whether the trace or one of
/// the diagonal terms is largest, so the square root never sees a value
/// close to zero (the unstable case is a rotation of nearly 180°).
pub fn quat_from_basis(x_axis: Vec3, y_axis: Vec3, z_axis: Vec3) -> Quat {
    // m{row}{col}
    let (m00, m10, m20) = (x_axis.x, x_axis.y, x_axis.z);
    let (m01, m11, m21) = (y_axis.x, y_axis.y, y_axis.z);
    let (m02, m12, m22) = (z_axis.x, z_axis.y, z_axis.z);

    let trace = m00 + m11 + m22;
    let q = if trace > 0.0 {
        let s = (trace + 1.0).sqrt() * 2.0;
        Quat::from_xyzw((m21 - m12) / s, (m02 - m20) / s, (m10 - m01) / s, 0.25 * s)
    } else if m00 > m11 && m00 > m22 {
        let s = (1.0 + m00 - m11 - m22).sqrt() * 2.0;
        Quat::from_xyzw(0.25 * s, (m01 + m10) / s, (m02 + m20) / s, (m21 - m12) / s)
    } else if m11 > m22 {
        let s = (1.0 + m11 - m00 - m22).sqrt() * 2.0;
        Quat::from_xyzw((m01 + m10) / s, 0.25 * s, (m12 + m21) / s, (m02 - m20) / s)
    } else {
        let s = (1.0 + m22 - m00 - m11).sqrt() * 2.0;
        Quat::from_xyzw((m02 + m20) / s, (m12 + m21) / s, 0.25 * s, (m10 - m01) / s)
    };
    q.normalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_mat_close(a: Mat4, b: Mat4, eps: f32) {
        let (a, b) = (a.to_cols_array(), b.to_cols_array());
        for i in 0..16 {
            assert!(
                (a[i] - b[i]).abs() < eps,
                "element {i}: {} vs {}",
                a[i],
                b[i]
            );
        }
    }

    #[test]
    fn setters_mark_dirty() {
        let mut t = Transform::default();
        t.commit_world(Mat4::IDENTITY);
        assert!(!t.is_dirty());
        t.set_position(Vec3::X);
        assert!(t.is_dirty());

        t.commit_world(Mat4::IDENTITY);
        t.translate(Vec3::Y);
        assert!(t.is_dirty());
        assert_eq!(t.position(), Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn compose_matches_manual_trs() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        let r = Quat::from_rotation_y(0.7);
        let s = Vec3::new(2.0, 1.0, 0.5);
        let expected = Mat4::from_translation(p) * Mat4::from_quat(r) * Mat4::from_scale(s);
        assert_mat_close(compose_trs(p, r, s), expected, 1e-5);
    }

    #[test]
    fn matrix_round_trip() {
        let rotations = [
            Quat::IDENTITY,
            Quat::from_rotation_x(0.3),
            Quat::from_rotation_y(-1.2),
            Quat::from_rotation_z(2.0),
            Quat::from_euler(glam::EulerRot::XYZ, 0.4, -0.9, 1.3),
            Quat::from_axis_angle(Vec3::new(1.0, 1.0, 0.0).normalize(), 2.5),
        ];
        for r in rotations {
            let m = compose_trs(Vec3::new(-4.0, 0.5, 9.0), r, Vec3::new(1.5, 0.25, 3.0));
            let t = Transform::from_matrix(m);
            assert_mat_close(t.compute_matrix(), m, 1e-5);
        }
    }

    #[test]
    fn decompose_recovers_components() {
        let r = Quat::from_rotation_z(0.5);
        let m = compose_trs(Vec3::new(3.0, 4.0, 5.0), r, Vec3::new(2.0, 3.0, 4.0));
        let (p, q, s) = decompose_trs(&m);
        assert!((p - Vec3::new(3.0, 4.0, 5.0)).length() < 1e-5);
        assert!((s - Vec3::new(2.0, 3.0, 4.0)).length() < 1e-5);
        // q and -q are the same rotation.
        assert!(q.dot(r).abs() > 1.0 - 1e-5);
    }

    #[test]
    fn quat_from_basis_takes_every_branch() {
        // trace > 0
        let q = quat_from_basis(Vec3::X, Vec3::Y, Vec3::Z);
        assert!(q.dot(Quat::IDENTITY).abs() > 1.0 - 1e-6);

        // 180° about X, Y and Z hit the three diagonal branches.
        for r in [
            Quat::from_rotation_x(std::f32::consts::PI),
            Quat::from_rotation_y(std::f32::consts::PI),
            Quat::from_rotation_z(std::f32::consts::PI),
        ] {
            let m = Mat3::from_quat(r);
            let q = quat_from_basis(m.x_axis, m.y_axis, m.z_axis);
            assert!(q.dot(r).abs() > 1.0 - 1e-5, "{q:?} vs {r:?}");
        }
    }

    #[test]
    fn zero_scale_column_is_guarded() {
        let m = compose_trs(Vec3::ONE, Quat::IDENTITY, Vec3::new(1.0, 0.0, 1.0));
        let (_, q, s) = decompose_trs(&m);
        assert_eq!(s.y, 0.0);
        assert!(q.is_finite());
    }

    #[test]
    fn from_matrix_starts_dirty_with_local_cached() {
        let m = compose_trs(Vec3::new(1.0, 0.0, 0.0), Quat::IDENTITY, Vec3::ONE);
        let t = Transform::from_matrix(m);
        assert!(t.is_dirty());
        assert_eq!(t.local_matrix(), m);
    }

    #[test]
    fn serde_uses_trs_only() {
        let mut t = Transform::from_xyz(1.0, 2.0, 3.0);
        t.commit_world(Mat4::from_translation(Vec3::splat(9.0)));
        let json = serde_json::to_string(&t).unwrap();
        assert!(!json.contains("world"));
        let back: Transform = serde_json::from_str(&json).unwrap();
        assert_eq!(back.position(), Vec3::new(1.0, 2.0, 3.0));
        assert!(back.is_dirty());
    }
}
