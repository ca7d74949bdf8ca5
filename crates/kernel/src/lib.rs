//! Scene kernel: the explicit registry of every entity the simulation has spawned.
//!
//! # Invariants
//! - All entity creation and destruction flows through [`Scene`].
//! - A child never outlives its parent; despawning a parent despawns the subtree.
//! - Every mutation is recorded as a [`SceneEvent`].

pub mod scene;

pub use scene::{EntityData, Scene, SceneError, SceneEvent};
