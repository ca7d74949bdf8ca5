use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use towerfield_common::{BlueprintId, BuildingTag, Transform};

use crate::BuildError;

/// Side effect a building has on its surroundings once placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Effect {
    #[default]
    None,
    /// Add `amount` ability to every node within `radius`, marking them buffed.
    Empower { radius: u32, amount: i64 },
    /// Mark every node within `radius` as part of a mill zone.
    MillZone { radius: u32 },
}

/// Immutable template for one kind of building.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blueprint {
    pub id: BlueprintId,
    pub tag: BuildingTag,
    pub cost: i64,
    /// Minimum distance, in cells, to another building with the same tag.
    #[serde(default)]
    pub radius_blocker: u32,
    /// Offset of the building relative to its node.
    #[serde(default)]
    pub position: Vec3,
    /// Euler angles in degrees, applied Z, then X, then Y.
    #[serde(default)]
    pub rotation: Vec3,
    #[serde(default)]
    pub effect: Effect,
}

impl Blueprint {
    pub fn new(id: impl Into<String>, tag: impl Into<String>, cost: i64) -> Self {
        Self {
            id: BlueprintId::new(id),
            tag: BuildingTag::new(tag),
            cost,
            radius_blocker: 0,
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            effect: Effect::None,
        }
    }

    pub fn with_radius_blocker(mut self, radius: u32) -> Self {
        self.radius_blocker = radius;
        self
    }

    pub fn with_placement(mut self, position: Vec3, rotation: Vec3) -> Self {
        self.position = position;
        self.rotation = rotation;
        self
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effect = effect;
        self
    }

    /// Placement of a built instance relative to the node it stands on.
    pub fn local_transform(&self) -> Transform {
        Transform {
            position: self.position,
            rotation: Quat::from_euler(
                EulerRot::YXZ,
                self.rotation.y.to_radians(),
                self.rotation.x.to_radians(),
                self.rotation.z.to_radians(),
            ),
            scale: Vec3::ONE,
        }
    }
}

/// Blueprints available to the build manager, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct BlueprintCatalog {
    blueprints: BTreeMap<BlueprintId, Blueprint>,
}

impl BlueprintCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_blueprints(
        blueprints: impl IntoIterator<Item = Blueprint>,
    ) -> Result<Self, BuildError> {
        let mut catalog = Self::new();
        for blueprint in blueprints {
            catalog.insert(blueprint)?;
        }
        Ok(catalog)
    }

    pub fn insert(&mut self, blueprint: Blueprint) -> Result<(), BuildError> {
        if self.blueprints.contains_key(&blueprint.id) {
            return Err(BuildError::DuplicateBlueprint(blueprint.id));
        }
        self.blueprints.insert(blueprint.id.clone(), blueprint);
        Ok(())
    }

    pub fn get(&self, id: &BlueprintId) -> Option<&Blueprint> {
        self.blueprints.get(id)
    }

    pub fn contains(&self, id: &BlueprintId) -> bool {
        self.blueprints.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.blueprints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blueprints.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Blueprint> {
        self.blueprints.values()
    }
}
