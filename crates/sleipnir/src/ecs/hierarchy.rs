//! # Entity Hierarchies — Parent/Child Relationships
//!
//! Provides [`Parent`] and [`Children`] components for expressing entity
//! hierarchies, and the resolver that turns every [`Transform`]'s local TRS
//! into a world matrix.
//!
//! Both components hold plain entity ids. The [`World`] owns every entity; a
//! `Children` list is only a traversal order, so dropping it never destroys
//! anything. Use [`World::set_parent`] / [`World::spawn_child`] rather than
//! inserting the components by hand so both sides stay in sync.
//!
//! ## Usage
//!
//! ```ignore
//! let parent = world.spawn((Transform::from_xyz(100.0, 50.0, 0.0),));
//! let child = world.spawn_child(parent, (Transform::from_xyz(10.0, 0.0, 0.0),));
//!
//! propagate_transforms(&mut world);
//! // child world position is now (110, 50, 0)
//! ```
//!
//! ## Dirty tracking
//!
//! ```text
//!            TRS setter
//!   clean ───────────────▶ dirty
//!     ▲                      │
//!     └──── propagation ─────┘   local = T·R·S, world = parent.world · local
//! ```
//!
//! A clean child under a parent that was recomputed this pass keeps its
//! cached local matrix but still gets a fresh world matrix.

use serde::{Deserialize, Serialize};

use crate::ecs::Entity;
use crate::ecs::system::System;
use crate::ecs::world::World;
use crate::math::{Mat4, Transform};

/// Marks an entity as a child of another entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parent(pub Entity);

/// The ordered list of child entities for a parent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Children(pub Vec<Entity>);

/// Propagate local transforms down the entity hierarchy.
///
/// - Roots are entities with no [`Parent`]; their parent matrix is identity.
/// - Children are visited depth-first in [`Children`] order.
/// - An entity without a `Transform` passes its parent's matrix through to
///   its own children.
///
/// Returns the number of world matrices that were rewritten.
pub fn propagate_transforms(world: &mut World) -> usize {
    let roots: Vec<Entity> = world
        .entities()
        .filter(|&e| !world.has::<Parent>(e))
        .collect();

    let mut updated = 0;
    // (entity, parent world matrix, parent changed this pass)
    let mut stack: Vec<(Entity, Mat4, bool)> = Vec::new();
    for root in roots.into_iter().rev() {
        stack.push((root, Mat4::IDENTITY, false));
    }

    while let Some((entity, parent_world, parent_changed)) = stack.pop() {
        let (world_matrix, changed) = match world.get_mut::<Transform>(entity) {
            Some(transform) => {
                let dirty = transform.refresh_local();
                if dirty || parent_changed {
                    let m = parent_world * transform.local_matrix();
                    transform.commit_world(m);
                    updated += 1;
                    (m, true)
                } else {
                    (transform.world_matrix(), false)
                }
            }
            None => (parent_world, parent_changed),
        };

        if let Some(children) = world.get::<Children>(entity) {
            for &child in children.0.iter().rev() {
                stack.push((child, world_matrix, changed));
            }
        }
    }

    updated
}

/// Pipeline stage wrapping [`propagate_transforms`].
#[derive(Debug, Default, Clone, Copy)]
pub struct TransformPropagation;

impl System for TransformPropagation {
    fn update(&mut self, world: &mut World, _dt: f32) {
        let updated = propagate_transforms(world);
        log::trace!("transform propagation rewrote {updated} world matrices");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Quat, Vec3};

    fn world_pos(world: &World, e: Entity) -> Vec3 {
        world.get::<Transform>(e).unwrap().world_position()
    }

    #[test]
    fn root_gets_world_matrix() {
        let mut world = World::new();
        let root = world.spawn((Transform::from_xyz(10.0, 20.0, 0.0),));

        propagate_transforms(&mut world);

        let t = world.get::<Transform>(root).unwrap();
        assert_eq!(t.world_matrix(), Transform::from_xyz(10.0, 20.0, 0.0).compute_matrix());
        assert!(!t.is_dirty());
    }

    #[test]
    fn child_inherits_parent_transform() {
        let mut world = World::new();
        let parent = world.spawn((Transform::from_xyz(100.0, 0.0, 0.0),));
        let child = world.spawn_child(parent, (Transform::from_xyz(10.0, 0.0, 0.0),));

        propagate_transforms(&mut world);

        // Child at local (10,0,0) under parent at (100,0,0) → world (110,0,0)
        let p = world_pos(&world, child);
        assert!((p.x - 110.0).abs() < 0.001);
        assert!(p.y.abs() < 0.001);
    }

    #[test]
    fn rotated_parent_rotates_child_offset() {
        let mut world = World::new();
        let parent = world.spawn((Transform::default()
            .with_rotation(Quat::from_rotation_z(std::f32::consts::FRAC_PI_2)),));
        let child = world.spawn_child(parent, (Transform::from_xyz(1.0, 0.0, 0.0),));

        propagate_transforms(&mut world);

        let p = world_pos(&world, child);
        assert!(p.x.abs() < 1e-5);
        assert!((p.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn parent_moves_clean_child_follows() {
        let mut world = World::new();
        let parent = world.spawn((Transform::default(),));
        let child = world.spawn_child(parent, (Transform::from_xyz(5.0, 0.0, 0.0),));

        propagate_transforms(&mut world);
        assert!(!world.get::<Transform>(child).unwrap().is_dirty());

        // Only the parent is dirtied.
        world
            .get_mut::<Transform>(parent)
            .unwrap()
            .set_position(Vec3::new(50.0, 0.0, 0.0));
        propagate_transforms(&mut world);

        assert!((world_pos(&world, child).x - 55.0).abs() < 0.001);
    }

    #[test]
    fn second_pass_is_idempotent() {
        let mut world = World::new();
        let a = world.spawn((Transform::from_xyz(1.0, 2.0, 3.0)
            .with_rotation(Quat::from_rotation_y(0.4)),));
        let b = world.spawn_child(a, (Transform::from_xyz(0.0, 1.0, 0.0).with_scale(2.0),));

        assert_eq!(propagate_transforms(&mut world), 2);
        let first = world.get::<Transform>(b).unwrap().world_matrix();

        assert_eq!(propagate_transforms(&mut world), 0);
        assert_eq!(world.get::<Transform>(b).unwrap().world_matrix(), first);
    }

    #[test]
    fn deep_hierarchy_propagation() {
        let mut world = World::new();
        let a = world.spawn((Transform::from_xyz(1.0, 0.0, 0.0),));
        let b = world.spawn_child(a, (Transform::from_xyz(2.0, 0.0, 0.0),));
        let c = world.spawn_child(b, (Transform::from_xyz(3.0, 0.0, 0.0),));

        propagate_transforms(&mut world);

        assert!((world_pos(&world, c).x - 6.0).abs() < 0.001); // 1 + 2 + 3
    }

    #[test]
    fn transformless_link_passes_matrix_through() {
        let mut world = World::new();
        let a = world.spawn((Transform::from_xyz(4.0, 0.0, 0.0),));
        let group = world.spawn_child(a, ());
        let leaf = world.spawn_child(group, (Transform::from_xyz(1.0, 0.0, 0.0),));

        propagate_transforms(&mut world);

        assert!((world_pos(&world, leaf).x - 5.0).abs() < 0.001);
    }

    #[test]
    fn reparent_recomputes_world() {
        let mut world = World::new();
        let a = world.spawn((Transform::from_xyz(10.0, 0.0, 0.0),));
        let b = world.spawn((Transform::from_xyz(-10.0, 0.0, 0.0),));
        let c = world.spawn_child(a, (Transform::from_xyz(1.0, 0.0, 0.0),));
        propagate_transforms(&mut world);
        assert!((world_pos(&world, c).x - 11.0).abs() < 0.001);

        assert!(world.set_parent(c, Some(b)));
        propagate_transforms(&mut world);
        assert!((world_pos(&world, c).x + 9.0).abs() < 0.001);
    }
}
