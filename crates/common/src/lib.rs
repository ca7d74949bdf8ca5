//! Shared identifiers and spatial types used by every towerfield crate.

mod types;

pub use types::{BlueprintId, BuildingTag, EntityId, Transform};
