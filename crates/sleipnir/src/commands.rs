//! Deferred world changes.
//!
//! Systems must not add or remove entities while the pipeline is running,
//! and the editor bridge must not write mid-tick. Both push a [`Command`]
//! onto the world's queue instead; [`apply_commands`] drains it in FIFO
//! order once the tick has finished.
//!
//! Commands are serde-serializable so they can arrive as JSON:
//!
//! ```json
//! { "op": "set_transform", "entity": 3, "position": [0, 1, 0],
//!   "rotation": [0, 0, 0, 1], "scale": [1, 1, 1] }
//! ```

use serde::{Deserialize, Serialize};

use crate::ecs::{Component, ComponentKind, Entity, Parent, World};
use crate::math::{Quat, Transform, Vec3};

/// One deferred change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    /// Spawn a new entity. A `Parent` in the list links it under that
    /// entity; `Children` entries are ignored.
    Spawn { components: Vec<Component> },
    Despawn { entity: Entity },
    DespawnRecursive { entity: Entity },
    /// Overwrite position, rotation and scale, adding a `Transform` if the
    /// entity has none.
    SetTransform {
        entity: Entity,
        position: Vec3,
        rotation: Quat,
        scale: Vec3,
    },
    /// Insert or replace one component.
    SetComponent { entity: Entity, component: Component },
    RemoveComponent { entity: Entity, kind: ComponentKind },
    SetParent {
        child: Entity,
        parent: Option<Entity>,
    },
}

/// FIFO queue of pending [`Command`]s.
#[derive(Debug, Clone, Default)]
pub struct CommandQueue {
    pending: Vec<Command>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: Command) {
        self.pending.push(command);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.pending.iter()
    }
}

impl IntoIterator for CommandQueue {
    type Item = Command;
    type IntoIter = std::vec::IntoIter<Command>;

    fn into_iter(self) -> Self::IntoIter {
        self.pending.into_iter()
    }
}

/// Apply every queued command in order. Returns how many took effect.
///
/// Commands aimed at dead entities are skipped with a warning. Commands
/// queued while applying (there are none today) wait for the next call.
pub fn apply_commands(world: &mut World) -> usize {
    let queue = world.take_commands();
    if queue.is_empty() {
        return 0;
    }
    let total = queue.len();
    let mut applied = 0;
    for command in queue {
        if apply(world, command) {
            applied += 1;
        }
    }
    log::debug!("commands: applied {applied}/{total}");
    applied
}

fn apply(world: &mut World, command: Command) -> bool {
    match command {
        Command::Spawn { components } => {
            world.spawn(components);
            true
        }
        Command::Despawn { entity } => {
            let ok = world.despawn(entity);
            if !ok {
                log::warn!("despawn command: {entity:?} is not alive");
            }
            ok
        }
        Command::DespawnRecursive { entity } => {
            let ok = world.despawn_recursive(entity);
            if !ok {
                log::warn!("despawn_recursive command: {entity:?} is not alive");
            }
            ok
        }
        Command::SetTransform {
            entity,
            position,
            rotation,
            scale,
        } => {
            let Some(components) = world.components_mut(entity) else {
                log::warn!("set_transform command: {entity:?} is not alive");
                return false;
            };
            match components.get_mut::<Transform>() {
                Some(t) => t.set_trs(position, rotation, scale),
                None => {
                    components.insert(Transform::new(position, rotation, scale).into());
                }
            }
            true
        }
        Command::SetComponent { entity, component } => {
            if !world.is_alive(entity) {
                log::warn!("set_component command: {entity:?} is not alive");
                return false;
            }
            match component {
                Component::Parent(Parent(parent)) => world.set_parent(entity, Some(parent)),
                Component::Children(_) => {
                    log::warn!("set_component command: Children is managed by the world, ignored");
                    false
                }
                other => {
                    world.add_component(entity, other);
                    true
                }
            }
        }
        Command::RemoveComponent { entity, kind } => {
            if !world.is_alive(entity) {
                log::warn!("remove_component command: {entity:?} is not alive");
                return false;
            }
            match kind {
                ComponentKind::Parent => world.set_parent(entity, None),
                ComponentKind::Children => {
                    log::warn!(
                        "remove_component command: Children is managed by the world, ignored"
                    );
                    false
                }
                _ => world.remove_component(entity, kind).is_some(),
            }
        }
        Command::SetParent { child, parent } => world.set_parent(child, parent),
    }
}
