//! Placement surface: a fixed-size grid laid out in world space.
//!
//! # Invariants
//! - Dimensions and cell size are fixed at construction.
//! - Every [`GridCoord`] handed out by a grid is inside its bounds.
//! - A failed occupancy call leaves every cell untouched.

mod coord;
mod node;
mod placement;
mod tile;

pub use coord::GridCoord;
pub use node::{Node, NodeMark, PlacedBuilding};
pub use placement::{GridConfig, GridError, GridEvent, PlacementGrid};
pub use tile::{Tile, TileState};
