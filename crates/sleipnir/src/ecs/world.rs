//! # World — The Central Container
//!
//! The [`World`] owns all entities and their components. It's the single
//! source of truth for the simulation state; every pipeline stage reads and
//! writes it in place.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │ World                                               │
//! │                                                     │
//! │  EntityAllocator: monotonically increasing ids      │
//! │                                                     │
//! │  slots: Vec<Option<Components>>                     │
//! │    index = entity id                                │
//! │    None  = despawned (ids are never reused)         │
//! │                                                     │
//! │  commands: CommandQueue                             │
//! │    structural changes deferred to the post-tick     │
//! │    phase                                            │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## Comparison
//!
//! - **hecs / bevy_ecs**: archetype tables keyed by `TypeId`, generational
//!   handles, free lists.
//! - **sleipnir**: a flat arena indexed by id, one fixed-size component table
//!   per entity. Iteration order is ascending id, which the collision passes
//!   rely on for reproducible results.

use crate::commands::{Command, CommandQueue};
use crate::ecs::component::{Bundle, Component, ComponentKind, ComponentType, Components};
use crate::ecs::entity::{Entity, EntityAllocator};
use crate::ecs::hierarchy::{Children, Parent};
use crate::math::Transform;

/// The central container for all simulation state.
pub struct World {
    allocator: EntityAllocator,
    /// Component tables, indexed by entity id.
    slots: Vec<Option<Components>>,
    /// Number of live entities.
    alive: usize,
    /// Changes queued by systems during a tick.
    commands: CommandQueue,
}

impl World {
    pub fn new() -> Self {
        Self {
            allocator: EntityAllocator::new(),
            slots: Vec::new(),
            alive: 0,
            commands: CommandQueue::new(),
        }
    }

    // ── Entity Management ────────────────────────────────────────────

    /// Returns the number of alive entities.
    pub fn entity_count(&self) -> usize {
        self.alive
    }

    /// Check if an entity is alive.
    pub fn is_alive(&self, entity: Entity) -> bool {
        matches!(self.slots.get(entity.slot()), Some(Some(_)))
    }

    /// Live entities in ascending id order.
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .map(|(i, _)| Entity(i as u32))
    }

    /// Collect all entities that have a component of the given kind, in
    /// ascending id order.
    pub fn entities_with(&self, kind: ComponentKind) -> Vec<Entity> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.as_ref().is_some_and(|c| c.contains(kind)))
            .map(|(i, _)| Entity(i as u32))
            .collect()
    }

    // ── Spawn / Despawn ──────────────────────────────────────────────

    /// Create an entity with no components.
    pub fn create_entity(&mut self) -> Entity {
        self.spawn(())
    }

    /// Spawn an entity with a bundle of components.
    ///
    /// A [`Parent`] in the bundle links the entity through
    /// [`set_parent`](Self::set_parent); a [`Children`] list is dropped, since
    /// children link themselves.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let ball = world.spawn((Transform::from_xyz(0.0, 2.0, 0.0), RigidBody::new(1.0)));
    /// ```
    pub fn spawn<B: Bundle>(&mut self, bundle: B) -> Entity {
        let entity = self.allocator.allocate();
        let mut components = Components::new();
        bundle.insert_into(&mut components);
        let parent = components.take::<Parent>();
        if components.remove(ComponentKind::Children).is_some() {
            log::warn!("spawn: Children is managed by the world, ignored on {entity:?}");
        }

        debug_assert_eq!(self.slots.len(), entity.slot());
        self.slots.push(Some(components));
        self.alive += 1;
        debug_assert_eq!(self.slots.len(), self.allocator.issued() as usize);

        if let Some(Parent(parent)) = parent {
            if !self.set_parent(entity, Some(parent)) {
                log::warn!("spawn: cannot link {entity:?} under {parent:?}, spawned as a root");
            }
        }
        entity
    }

    /// Spawn a child entity under a parent, updating the parent's [`Children`].
    ///
    /// If the parent is not alive the entity is spawned as a root.
    pub fn spawn_child<B: Bundle>(&mut self, parent: Entity, bundle: B) -> Entity {
        let child = self.spawn(bundle);
        if !self.set_parent(child, Some(parent)) {
            log::warn!("spawn_child: parent {parent:?} is not alive, {child:?} spawned as a root");
        }
        child
    }

    /// Despawn an entity.
    ///
    /// The entity is removed from its parent's [`Children`] list and its own
    /// children become roots. Returns `true` if the entity was alive.
    pub fn despawn(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }

        self.unlink_from_parent(entity);

        if let Some(children) = self.get::<Children>(entity).map(|c| c.0.clone()) {
            for child in children {
                if let Some(components) = self.components_mut(child) {
                    components.remove(ComponentKind::Parent);
                    if let Some(t) = components.get_mut::<Transform>() {
                        t.mark_dirty();
                    }
                }
            }
        }

        self.slots[entity.slot()] = None;
        self.alive -= 1;
        true
    }

    /// Despawn an entity and all its descendants.
    ///
    /// Returns `true` if the entity was alive and successfully despawned.
    pub fn despawn_recursive(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }

        self.unlink_from_parent(entity);

        // Collect all descendants via BFS.
        let mut to_despawn = vec![entity];
        let mut i = 0;
        while i < to_despawn.len() {
            if let Some(children) = self.get::<Children>(to_despawn[i]) {
                to_despawn.extend(children.0.iter().copied());
            }
            i += 1;
        }

        for e in to_despawn {
            if let Some(slot) = self.slots.get_mut(e.slot()) {
                if slot.take().is_some() {
                    self.alive -= 1;
                }
            }
        }
        true
    }

    /// Despawn every entity in the world. Ids keep counting up afterwards.
    pub fn despawn_all(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
        self.alive = 0;
    }

    // ── Component Access ─────────────────────────────────────────────

    /// All components of an entity, or `None` if it is dead.
    pub fn components(&self, entity: Entity) -> Option<&Components> {
        self.slots.get(entity.slot())?.as_ref()
    }

    pub fn components_mut(&mut self, entity: Entity) -> Option<&mut Components> {
        self.slots.get_mut(entity.slot())?.as_mut()
    }

    /// Attach a component, replacing any prior component of the same kind.
    ///
    /// Returns the replaced component. Does nothing (returns `None`) for a
    /// dead entity. A [`Parent`] goes through [`set_parent`](Self::set_parent)
    /// so the parent's [`Children`] stays in sync; [`Children`] itself cannot
    /// be attached directly and is ignored with a warning.
    pub fn add_component(&mut self, entity: Entity, component: Component) -> Option<Component> {
        match component {
            Component::Parent(Parent(parent)) => {
                let previous = self.get::<Parent>(entity).copied();
                if self.set_parent(entity, Some(parent)) {
                    previous.map(Component::Parent)
                } else {
                    None
                }
            }
            Component::Children(_) => {
                log::warn!(
                    "add_component: Children is managed by the world, ignored on {entity:?}"
                );
                None
            }
            other => self.components_mut(entity)?.insert(other),
        }
    }

    pub fn get_component(&self, entity: Entity, kind: ComponentKind) -> Option<&Component> {
        self.components(entity)?.get_kind(kind)
    }

    /// Detach a component. Removing [`Parent`] turns the entity into a root;
    /// [`Children`] cannot be removed directly.
    pub fn remove_component(&mut self, entity: Entity, kind: ComponentKind) -> Option<Component> {
        match kind {
            ComponentKind::Parent => {
                let previous = self.get::<Parent>(entity).copied()?;
                self.set_parent(entity, None);
                Some(Component::Parent(previous))
            }
            ComponentKind::Children => {
                log::warn!(
                    "remove_component: Children is managed by the world, kept on {entity:?}"
                );
                None
            }
            _ => self.components_mut(entity)?.remove(kind),
        }
    }

    /// Get a shared reference to a component on a specific entity.
    ///
    /// Returns `None` if the entity is dead or doesn't have the component.
    pub fn get<T: ComponentType>(&self, entity: Entity) -> Option<&T> {
        self.components(entity)?.get::<T>()
    }

    /// Get a mutable reference to a component on a specific entity.
    pub fn get_mut<T: ComponentType>(&mut self, entity: Entity) -> Option<&mut T> {
        self.components_mut(entity)?.get_mut::<T>()
    }

    pub fn has<T: ComponentType>(&self, entity: Entity) -> bool {
        self.components(entity).is_some_and(|c| c.has::<T>())
    }

    /// Typed [`add_component`](Self::add_component).
    pub fn insert<T: ComponentType>(&mut self, entity: Entity, component: T) -> Option<T> {
        self.add_component(entity, component.into())
            .and_then(T::from_component_owned)
    }

    /// Typed [`remove_component`](Self::remove_component).
    pub fn remove<T: ComponentType>(&mut self, entity: Entity) -> Option<T> {
        self.remove_component(entity, T::KIND)
            .and_then(T::from_component_owned)
    }

    // ── Query ────────────────────────────────────────────────────────

    /// Visit every live entity's component table in ascending id order.
    ///
    /// # Example
    ///
    /// ```ignore
    /// world.for_each(|_entity, components| {
    ///     if let Some(body) = components.get_mut::<RigidBody>() {
    ///         body.force += Vec3::NEG_Y;
    ///     }
    /// });
    /// ```
    pub fn for_each(&mut self, mut f: impl FnMut(Entity, &mut Components)) {
        for (i, slot) in self.slots.iter_mut().enumerate() {
            if let Some(components) = slot {
                f(Entity(i as u32), components);
            }
        }
    }

    /// Visit every entity that has a `T`, handing out the component mutably.
    pub fn query<T: ComponentType>(&mut self, mut f: impl FnMut(Entity, &mut T)) {
        self.for_each(|entity, components| {
            if let Some(value) = components.get_mut::<T>() {
                f(entity, value);
            }
        });
    }

    // ── Hierarchy ────────────────────────────────────────────────────

    pub fn parent_of(&self, entity: Entity) -> Option<Entity> {
        self.get::<Parent>(entity).map(|p| p.0)
    }

    pub fn children_of(&self, entity: Entity) -> &[Entity] {
        self.get::<Children>(entity)
            .map(|c| c.0.as_slice())
            .unwrap_or(&[])
    }

    /// Attach `child` under `parent`, or detach it to a root with `None`.
    ///
    /// Keeps [`Parent`] and [`Children`] consistent and marks the child's
    /// transform dirty. Returns `false` (and changes nothing) if either entity
    /// is dead or the link would create a cycle.
    pub fn set_parent(&mut self, child: Entity, parent: Option<Entity>) -> bool {
        if !self.is_alive(child) {
            return false;
        }
        if let Some(parent) = parent {
            if !self.is_alive(parent) {
                return false;
            }
            if self.is_ancestor_or_self(child, parent) {
                log::warn!("set_parent: linking {child:?} under {parent:?} would create a cycle");
                return false;
            }
        }

        self.unlink_from_parent(child);

        if let Some(parent) = parent {
            if let Some(c) = self.components_mut(child) {
                c.insert(Parent(parent).into());
            }
            if let Some(c) = self.components_mut(parent) {
                match c.get_mut::<Children>() {
                    Some(children) => children.0.push(child),
                    None => {
                        c.insert(Children(vec![child]).into());
                    }
                }
            }
        }

        if let Some(t) = self.get_mut::<Transform>(child) {
            t.mark_dirty();
        }
        true
    }

    /// `true` if `ancestor` is `entity` or one of its ancestors.
    fn is_ancestor_or_self(&self, ancestor: Entity, entity: Entity) -> bool {
        let mut current = Some(entity);
        let mut steps = 0;
        while let Some(e) = current {
            if e == ancestor {
                return true;
            }
            // A malformed graph could loop; bail after visiting every slot.
            steps += 1;
            if steps > self.slots.len() {
                return true;
            }
            current = self.parent_of(e);
        }
        false
    }

    /// Remove `entity` from its parent's `Children` and drop its `Parent`.
    fn unlink_from_parent(&mut self, entity: Entity) {
        let Some(Parent(parent)) = self.components_mut(entity).and_then(|c| c.take::<Parent>())
        else {
            return;
        };
        if let Some(c) = self.components_mut(parent) {
            if let Some(children) = c.get_mut::<Children>() {
                children.0.retain(|&e| e != entity);
                if children.0.is_empty() {
                    c.remove(ComponentKind::Children);
                }
            }
        }
    }

    // ── Deferred Commands ────────────────────────────────────────────

    /// Queue a change to be applied after the current tick.
    pub fn queue(&mut self, command: Command) {
        self.commands.push(command);
    }

    /// Pending command queue.
    pub fn commands(&self) -> &CommandQueue {
        &self.commands
    }

    /// Take the pending commands, leaving an empty queue behind.
    pub(crate) fn take_commands(&mut self) -> CommandQueue {
        std::mem::take(&mut self.commands)
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::component::Name;
    use crate::math::Vec3;
    use crate::physics::body::{Acceleration, RigidBody};

    #[test]
    fn create_and_despawn() {
        let mut world = World::new();
        let e0 = world.create_entity();
        let e1 = world.create_entity();
        assert_eq!(world.entity_count(), 2);

        assert!(world.despawn(e0));
        assert!(!world.despawn(e0));
        assert!(!world.is_alive(e0));
        assert!(world.is_alive(e1));
        assert_eq!(world.entity_count(), 1);
    }

    #[test]
    fn ids_are_never_reused() {
        let mut world = World::new();
        let e0 = world.create_entity();
        world.despawn(e0);
        let e1 = world.create_entity();
        assert!(e1.id() > e0.id());
        assert!(world.get::<Transform>(e0).is_none());
    }

    #[test]
    fn add_component_replaces_same_kind() {
        let mut world = World::new();
        let e = world.spawn((RigidBody::new(1.0),));
        let prev = world.insert(e, RigidBody::new(3.0));
        assert_eq!(prev.map(|b| b.mass), Some(1.0));
        assert_eq!(world.get::<RigidBody>(e).unwrap().mass, 3.0);
        assert_eq!(world.components(e).unwrap().len(), 1);
    }

    #[test]
    fn get_component_by_kind() {
        let mut world = World::new();
        let e = world.create_entity();
        assert!(world.get_component(e, ComponentKind::RigidBody).is_none());
        world.add_component(e, Component::RigidBody(RigidBody::new(2.0)));
        assert!(matches!(
            world.get_component(e, ComponentKind::RigidBody),
            Some(Component::RigidBody(b)) if b.mass == 2.0
        ));
        assert!(world.remove_component(e, ComponentKind::RigidBody).is_some());
        assert!(world.remove_component(e, ComponentKind::RigidBody).is_none());
    }

    #[test]
    fn dead_entity_access_is_none() {
        let mut world = World::new();
        let e = world.spawn((Transform::default(),));
        world.despawn(e);
        assert!(world.get::<Transform>(e).is_none());
        assert!(world.get_mut::<Transform>(e).is_none());
        assert!(world.add_component(e, Name::new("ghost").into()).is_none());
        assert!(!world.has::<Name>(e));
    }

    #[test]
    fn entities_are_id_ordered() {
        let mut world = World::new();
        let a = world.spawn((RigidBody::new(1.0),));
        let b = world.create_entity();
        let c = world.spawn((RigidBody::new(1.0),));
        assert_eq!(world.entities().collect::<Vec<_>>(), vec![a, b, c]);
        assert_eq!(world.entities_with(ComponentKind::RigidBody), vec![a, c]);
    }

    #[test]
    fn query_mutates_matching() {
        let mut world = World::new();
        let a = world.spawn((Acceleration(Vec3::ZERO),));
        let _b = world.create_entity();
        let mut visited = 0;
        world.query::<Acceleration>(|_, acc| {
            acc.0 = Vec3::Y;
            visited += 1;
        });
        assert_eq!(visited, 1);
        assert_eq!(world.get::<Acceleration>(a).unwrap().0, Vec3::Y);
    }

    #[test]
    fn despawn_recursive_removes_children() {
        let mut world = World::new();
        let parent = world.spawn((Transform::default(),));
        let child1 = world.spawn_child(parent, (Transform::default(),));
        let grandchild = world.spawn_child(child1, (Transform::default(),));
        let _child2 = world.spawn_child(parent, (Transform::default(),));

        assert_eq!(world.entity_count(), 4);
        world.despawn_recursive(parent);

        assert_eq!(world.entity_count(), 0);
        assert!(!world.is_alive(child1));
        assert!(!world.is_alive(grandchild));
    }

    #[test]
    fn despawn_recursive_cleans_up_parent_children() {
        let mut world = World::new();
        let parent = world.spawn((Transform::default(),));
        let child1 = world.spawn_child(parent, (Transform::default(),));
        let child2 = world.spawn_child(parent, (Transform::default(),));

        world.despawn_recursive(child1);

        assert!(world.is_alive(parent));
        assert_eq!(world.children_of(parent), &[child2]);
    }

    #[test]
    fn despawn_orphans_children_to_roots() {
        let mut world = World::new();
        let parent = world.spawn((Transform::default(),));
        let child = world.spawn_child(parent, (Transform::default(),));

        world.despawn(parent);

        assert!(world.is_alive(child));
        assert_eq!(world.parent_of(child), None);
        assert!(world.get::<Transform>(child).unwrap().is_dirty());
    }

    #[test]
    fn despawn_all_clears_world() {
        let mut world = World::new();
        world.create_entity();
        world.create_entity();
        world.despawn_all();
        assert_eq!(world.entity_count(), 0);
        assert_eq!(world.entities().count(), 0);
    }

    #[test]
    fn set_parent_rejects_cycles() {
        let mut world = World::new();
        let a = world.create_entity();
        let b = world.spawn_child(a, ());
        let c = world.spawn_child(b, ());

        assert!(!world.set_parent(a, Some(c)));
        assert!(!world.set_parent(a, Some(a)));
        assert_eq!(world.parent_of(a), None);
    }

    #[test]
    fn set_parent_moves_between_parents() {
        let mut world = World::new();
        let a = world.create_entity();
        let b = world.create_entity();
        let c = world.spawn_child(a, ());

        assert!(world.set_parent(c, Some(b)));
        assert!(world.children_of(a).is_empty());
        assert!(!world.has::<Children>(a));
        assert_eq!(world.children_of(b), &[c]);

        assert!(world.set_parent(c, None));
        assert_eq!(world.parent_of(c), None);
        assert!(world.children_of(b).is_empty());
    }

    #[test]
    fn spawn_child_on_dead_parent_spawns_root() {
        let mut world = World::new();
        let parent = world.create_entity();
        world.despawn(parent);
        let child = world.spawn_child(parent, ());
        assert!(world.is_alive(child));
        assert_eq!(world.parent_of(child), None);
    }

    #[test]
    fn add_component_parent_links_both_sides() {
        let mut world = World::new();
        let p = world.spawn((Transform::from_xyz(100.0, 0.0, 0.0),));
        let c = world.spawn((Transform::from_xyz(1.0, 0.0, 0.0),));

        assert!(world.add_component(c, Parent(p).into()).is_none());
        assert_eq!(world.children_of(p), &[c]);

        crate::ecs::propagate_transforms(&mut world);
        let t = world.get::<Transform>(c).unwrap();
        assert!(!t.is_dirty());
        assert!((t.world_position() - Vec3::new(101.0, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn insert_and_remove_parent_keep_children_in_sync() {
        let mut world = World::new();
        let a = world.create_entity();
        let b = world.create_entity();
        let c = world.create_entity();

        world.insert(c, Parent(a));
        assert_eq!(world.insert(c, Parent(b)), Some(Parent(a)));
        assert!(!world.has::<Children>(a));
        assert_eq!(world.children_of(b), &[c]);

        assert_eq!(world.remove::<Parent>(c), Some(Parent(b)));
        assert_eq!(world.parent_of(c), None);
        assert!(!world.has::<Children>(b));
    }

    #[test]
    fn children_cannot_be_attached_or_removed_directly() {
        let mut world = World::new();
        let p = world.create_entity();
        let stray = world.create_entity();
        let c = world.spawn_child(p, ());

        assert!(world.add_component(p, Children(vec![stray]).into()).is_none());
        assert_eq!(world.children_of(p), &[c]);
        assert!(world.remove_component(p, ComponentKind::Children).is_none());
        assert_eq!(world.children_of(p), &[c]);
    }

    #[test]
    fn spawn_with_parent_in_bundle_links_child() {
        let mut world = World::new();
        let p = world.create_entity();
        let c = world.spawn((Parent(p), Children(vec![p])));

        assert_eq!(world.parent_of(c), Some(p));
        assert_eq!(world.children_of(p), &[c]);
        assert!(!world.has::<Children>(c));
    }
}
