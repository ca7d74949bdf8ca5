//! Session configuration loaded from YAML.
//!
//! Every field has a default, so a partial file (or an empty one) is valid.
//! The defaults describe a 5×5 board with a single `house` blueprint.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use towerfield_economy::DEFAULT_START_MONEY;
use towerfield_grid::GridConfig;

use crate::Blueprint;

/// Ability ceiling for nodes unless configured otherwise.
pub const DEFAULT_MAX_ABILITY: u32 = 4;

/// Errors from loading or validating a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Everything needed to start a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub grid: GridConfig,
    pub start_money: i64,
    pub max_ability: u32,
    pub blueprints: Vec<Blueprint>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            start_money: DEFAULT_START_MONEY,
            max_ability: DEFAULT_MAX_ABILITY,
            blueprints: vec![Blueprint::new("house", "House", 3).with_radius_blocker(1)],
        }
    }
}

impl GameConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml_str(&yaml)?;
        tracing::info!(path = %path.display(), blueprints = config.blueprints.len(), "config loaded");
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let cell_size = self.grid.cell_size;
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "cell_size must be positive, got {cell_size}"
            )));
        }
        let dims = self.grid.dimensions;
        if dims.x == 0 || dims.y == 0 {
            return Err(ConfigError::Invalid(format!(
                "grid dimensions must be non-zero, got {dims}"
            )));
        }

        let mut seen = BTreeSet::new();
        for blueprint in &self.blueprints {
            if blueprint.cost < 0 {
                return Err(ConfigError::Invalid(format!(
                    "blueprint {} has negative cost {}",
                    blueprint.id, blueprint.cost
                )));
            }
            if !seen.insert(&blueprint.id) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate blueprint id {}",
                    blueprint.id
                )));
            }
        }
        Ok(())
    }
}
