use serde::{Deserialize, Serialize};
use towerfield_common::EntityId;

use crate::GridCoord;

/// Visual occupancy state of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TileState {
    #[default]
    Empty,
    Filled,
    Infected,
}

/// Visual representation of one grid cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tile {
    index: GridCoord,
    state: TileState,
    infected: bool,
    /// Scene entity standing in for this tile, once the session has spawned one.
    entity: Option<EntityId>,
}

impl Tile {
    pub(crate) fn new(index: GridCoord) -> Self {
        Self {
            index,
            state: TileState::Empty,
            infected: false,
            entity: None,
        }
    }

    pub fn index(&self) -> GridCoord {
        self.index
    }

    pub fn state(&self) -> TileState {
        self.state
    }

    pub fn is_infected(&self) -> bool {
        self.infected
    }

    /// State the tile shows when nothing occupies it.
    pub fn resting_state(&self) -> TileState {
        if self.infected {
            TileState::Infected
        } else {
            TileState::Empty
        }
    }

    pub(crate) fn mark_infected(&mut self) {
        self.infected = true;
    }

    pub fn entity(&self) -> Option<EntityId> {
        self.entity
    }

    /// Returns the previous state.
    pub(crate) fn set_state(&mut self, state: TileState) -> TileState {
        std::mem::replace(&mut self.state, state)
    }

    pub(crate) fn bind_entity(&mut self, entity: EntityId) {
        self.entity = Some(entity);
    }
}
