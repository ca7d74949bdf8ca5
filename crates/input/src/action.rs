use glam::Vec3;
use serde::{Deserialize, Serialize};
use towerfield_common::BlueprintId;

/// A high-level action produced by whatever front end drives the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Choose the blueprint subsequent clicks will build.
    SelectBlueprint { id: BlueprintId },
    /// Drop the current selection.
    Deselect,
    /// Pointer pressed at a world position.
    Click {
        position: Vec3,
        /// The pointer was over a UI element, so the grid must ignore it.
        #[serde(default)]
        over_ui: bool,
    },
    /// Tear down the building on the cell under `position`.
    Demolish { position: Vec3 },
    /// Mark the cell under `position` as infected.
    Infect { position: Vec3 },
    /// Credit (or debit, when negative) the player's balance.
    GrantMoney { amount: i64 },
    /// No-op (input mapping that hasn't been bound yet).
    Noop,
}

/// Errors from reading action scripts.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("invalid action script: {0}")]
    Script(#[from] serde_yaml::Error),
}

/// Parse a YAML sequence of actions.
///
/// ```yaml
/// - action: select_blueprint
///   id: house
/// - action: click
///   position: [2.5, 0.0, 2.5]
/// ```
pub fn parse_script(yaml: &str) -> Result<Vec<Action>, InputError> {
    let actions: Vec<Action> = serde_yaml::from_str(yaml)?;
    tracing::debug!(count = actions.len(), "action script parsed");
    Ok(actions)
}
