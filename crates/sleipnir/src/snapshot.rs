//! Serializable views of the world for the editor bridge.
//!
//! A [`WorldSnapshot`] is a read-only copy: id, name, hierarchy link,
//! local TRS, resolved world position and material of every live entity.
//! Editor edits do not go through snapshots; they come back as
//! [`Command`](crate::commands::Command)s.

use serde::{Deserialize, Serialize};

use crate::ecs::{ComponentKind, Entity, Material, Name, World};
use crate::math::{Transform, Trs, Vec3};

/// One entity as the editor sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub id: Entity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Entity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<Trs>,
    /// World-space position as of the last hierarchy pass.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub world_position: Option<Vec3>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<Material>,
    /// Kinds of every attached component.
    pub components: Vec<ComponentKind>,
}

/// Every live entity at a given tick, in id order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub tick: u64,
    pub entities: Vec<EntitySnapshot>,
}

impl WorldSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn find(&self, id: Entity) -> Option<&EntitySnapshot> {
        self.entities
            .binary_search_by_key(&id, |e| e.id)
            .ok()
            .map(|i| &self.entities[i])
    }
}

/// Snapshot a single entity, or `None` if it is dead.
pub fn snapshot_entity(world: &World, entity: Entity) -> Option<EntitySnapshot> {
    let c = world.components(entity)?;
    let transform = c.get::<Transform>();
    Some(EntitySnapshot {
        id: entity,
        name: c.get::<Name>().map(|n| n.0.clone()),
        parent: world.parent_of(entity),
        transform: transform.map(|t| Trs::from(*t)),
        world_position: transform.map(Transform::world_position),
        material: c.get::<Material>().copied(),
        components: c.kinds().collect(),
    })
}

pub fn snapshot_world(world: &World, tick: u64) -> WorldSnapshot {
    WorldSnapshot {
        tick,
        entities: world
            .entities()
            .filter_map(|e| snapshot_entity(world, e))
            .collect(),
    }
}
