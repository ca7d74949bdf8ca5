//! Player input: pointer and UI events mapped to engine-independent actions.
//!
//! # Invariants
//! - The simulation consumes actions, never raw pointer events.
//! - A click carries world-space coordinates; snapping to a cell is the grid's job.

pub mod action;

pub use action::{Action, InputError, parse_script};
