use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use towerfield_common::{EntityId, Transform};

/// An event record produced by every mutation to the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SceneEvent {
    /// Entity was spawned with the given local transform.
    Spawned {
        id: EntityId,
        name: String,
        parent: Option<EntityId>,
        transform: Transform,
    },
    /// Entity was despawned. Carries the data it had so the event can be reversed.
    Despawned {
        id: EntityId,
        name: String,
        parent: Option<EntityId>,
        transform: Transform,
    },
}

/// Errors from scene operations.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("parent entity {0:?} not found")]
    UnknownParent(EntityId),
    #[error("entity {0:?} not found")]
    EntityNotFound(EntityId),
}

/// Per-entity data stored in the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityData {
    pub name: String,
    pub parent: Option<EntityId>,
    /// Transform relative to `parent`, or to world space for roots.
    pub transform: Transform,
}

/// The registry of spawned entities.
///
/// Owns instantiation, destruction and parenting so the simulation never needs
/// a host engine. Uses BTreeMap for deterministic iteration order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scene {
    entities: BTreeMap<EntityId, EntityData>,
    #[serde(skip)]
    event_log: Vec<SceneEvent>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entities in the scene.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[SceneEvent] {
        &self.event_log
    }

    pub fn entities(&self) -> &BTreeMap<EntityId, EntityData> {
        &self.entities
    }

    /// Spawn a root entity. Returns its id.
    pub fn spawn(&mut self, name: impl Into<String>, transform: Transform) -> EntityId {
        let id = EntityId::new();
        self.insert(id, name.into(), None, transform);
        id
    }

    /// Spawn an entity parented to `parent` with a transform local to it.
    pub fn spawn_child(
        &mut self,
        parent: EntityId,
        name: impl Into<String>,
        local: Transform,
    ) -> Result<EntityId, SceneError> {
        if !self.entities.contains_key(&parent) {
            return Err(SceneError::UnknownParent(parent));
        }
        let id = EntityId::new();
        self.insert(id, name.into(), Some(parent), local);
        Ok(id)
    }

    fn insert(&mut self, id: EntityId, name: String, parent: Option<EntityId>, transform: Transform) {
        tracing::trace!(id = %id.short(), %name, "spawn");
        self.entities.insert(
            id,
            EntityData {
                name: name.clone(),
                parent,
                transform,
            },
        );
        self.event_log.push(SceneEvent::Spawned {
            id,
            name,
            parent,
            transform,
        });
    }

    /// Remove an entity and its whole subtree. Returns the entity's own data if it existed.
    ///
    /// Descendants are despawned first so the event log can be replayed in order.
    pub fn despawn(&mut self, id: EntityId) -> Option<EntityData> {
        if !self.entities.contains_key(&id) {
            return None;
        }
        for child in self.children(id) {
            self.despawn(child);
        }
        let data = self.entities.remove(&id)?;
        tracing::trace!(id = %id.short(), name = %data.name, "despawn");
        self.event_log.push(SceneEvent::Despawned {
            id,
            name: data.name.clone(),
            parent: data.parent,
            transform: data.transform,
        });
        Some(data)
    }

    pub fn get(&self, id: EntityId) -> Option<&EntityData> {
        self.entities.get(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Direct children of `id`, in id order.
    pub fn children(&self, id: EntityId) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|(_, data)| data.parent == Some(id))
            .map(|(child, _)| *child)
            .collect()
    }

    /// Compose the parent chain into a world-space transform.
    ///
    /// Parents must exist before their children are spawned, so the chain is
    /// always finite.
    pub fn world_transform(&self, id: EntityId) -> Result<Transform, SceneError> {
        let mut chain = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let data = self
                .entities
                .get(&current)
                .ok_or(SceneError::EntityNotFound(current))?;
            chain.push(data.transform);
            cursor = data.parent;
        }
        Ok(chain
            .iter()
            .rev()
            .fold(Transform::default(), |acc, local| acc.mul_transform(local)))
    }

    /// Reconstruct a scene from a sequence of events. A scene whose log has
    /// never been drained replays to the same [`Self::state_hash`].
    pub fn replay(events: &[SceneEvent]) -> Self {
        let mut scene = Self::new();
        for event in events {
            match event {
                SceneEvent::Spawned {
                    id,
                    name,
                    parent,
                    transform,
                } => {
                    scene.entities.insert(
                        *id,
                        EntityData {
                            name: name.clone(),
                            parent: *parent,
                            transform: *transform,
                        },
                    );
                }
                SceneEvent::Despawned { id, .. } => {
                    scene.entities.remove(id);
                }
            }
        }
        scene
    }

    /// Deterministic FNV-1a hash of the scene contents in canonical (BTreeMap) order.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325;
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        for (id, data) in &self.entities {
            mix(&mut h, id.0.as_bytes());
            mix(&mut h, data.name.as_bytes());
            if let Some(parent) = data.parent {
                mix(&mut h, parent.0.as_bytes());
            }
            let t = data.transform;
            for v in t.position.to_array() {
                mix(&mut h, &v.to_le_bytes());
            }
            for v in t.rotation.to_array() {
                mix(&mut h, &v.to_le_bytes());
            }
            for v in t.scale.to_array() {
                mix(&mut h, &v.to_le_bytes());
            }
        }
        h
    }
}
