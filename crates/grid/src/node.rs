use serde::{Deserialize, Serialize};
use towerfield_common::{BlueprintId, BuildingTag, EntityId};

use crate::GridCoord;

/// A building instance standing on a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedBuilding {
    pub entity: EntityId,
    pub blueprint: BlueprintId,
    pub tag: BuildingTag,
}

/// Highlight a node carries after a neighbouring building's effect touched it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NodeMark {
    #[default]
    Plain,
    Buffed,
    MillZone,
}

/// Logical occupant of one grid cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    index: GridCoord,
    building: Option<PlacedBuilding>,
    ability: u32,
    max_ability: u32,
    has_effect: bool,
    mark: NodeMark,
}

impl Node {
    pub(crate) fn new(index: GridCoord, max_ability: u32) -> Self {
        Self {
            index,
            building: None,
            ability: 0,
            max_ability,
            has_effect: false,
            mark: NodeMark::Plain,
        }
    }

    pub fn index(&self) -> GridCoord {
        self.index
    }

    pub fn building(&self) -> Option<&PlacedBuilding> {
        self.building.as_ref()
    }

    pub fn is_vacant(&self) -> bool {
        self.building.is_none()
    }

    pub fn ability(&self) -> u32 {
        self.ability
    }

    pub fn max_ability(&self) -> u32 {
        self.max_ability
    }

    pub fn has_effect(&self) -> bool {
        self.has_effect
    }

    pub fn mark(&self) -> NodeMark {
        self.mark
    }

    pub(crate) fn set_building(&mut self, building: PlacedBuilding) {
        self.building = Some(building);
    }

    pub(crate) fn take_building(&mut self) -> Option<PlacedBuilding> {
        self.building.take()
    }

    /// Adjust the counter, clamped to `[0, max_ability]`. Returns the new count.
    pub(crate) fn add_ability(&mut self, delta: i64) -> u32 {
        self.has_effect = true;
        let next = (self.ability as i64).saturating_add(delta);
        self.ability = next.clamp(0, self.max_ability as i64) as u32;
        self.ability
    }

    pub(crate) fn disable_effect(&mut self) {
        self.has_effect = false;
    }

    pub(crate) fn set_mark(&mut self, mark: NodeMark) {
        self.mark = mark;
    }
}
