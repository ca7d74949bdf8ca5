//! Building: blueprints, the build state machine and the session that wires
//! grid, scene and player economy together.
//!
//! # Invariants
//! - A build either fully succeeds (entity spawned, cell occupied, cost debited)
//!   or changes nothing.
//! - Collaborators are passed in explicitly; there are no global instances.

pub mod blueprint;
pub mod config;
pub mod manager;
pub mod session;

pub use blueprint::{Blueprint, BlueprintCatalog, Effect};
pub use config::{ConfigError, GameConfig};
pub use manager::{
    BuildContext, BuildError, BuildEvent, BuildManager, BuildOutcome, BuildState, Rejection,
};
pub use session::Session;
