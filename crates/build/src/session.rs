use glam::{IVec2, UVec2, Vec3};
use towerfield_common::{BlueprintId, BuildingTag, EntityId, Transform};
use towerfield_economy::PlayerStats;
use towerfield_grid::{GridCoord, PlacedBuilding, PlacementGrid};
use towerfield_input::Action;
use towerfield_kernel::Scene;

use crate::{BlueprintCatalog, BuildContext, BuildError, BuildManager, BuildOutcome, GameConfig};

/// Height tiles are lifted above the grid plane so they do not z-fight with it.
const TILE_LIFT: f32 = 0.01;

/// One running game: grid, scene registry, player economy and build manager.
///
/// Owns every collaborator and lends them to the build manager per call.
pub struct Session {
    grid: PlacementGrid,
    scene: Scene,
    stats: PlayerStats,
    builder: BuildManager,
    root: EntityId,
}

impl Session {
    /// Lay out the grid, spawn one tile entity per cell and fund the player.
    pub fn new(config: &GameConfig) -> Result<Self, BuildError> {
        let mut grid = PlacementGrid::new(config.grid.clone(), config.max_ability)?;
        let catalog = BlueprintCatalog::from_blueprints(config.blueprints.iter().cloned())?;

        let mut scene = Scene::new();
        let root = scene.spawn("PlacementGrid", *grid.origin());
        let container = scene.spawn_child(root, "Container", Transform::default())?;

        let cell_size = grid.cell_size();
        let coords: Vec<GridCoord> = grid.coords().collect();
        for coord in coords {
            let local = Vec3::new(
                (coord.x() as f32 + 0.5) * cell_size,
                TILE_LIFT,
                (coord.y() as f32 + 0.5) * cell_size,
            );
            let tile = scene.spawn_child(
                container,
                format!("Tile {}_{}", coord.x(), coord.y()),
                Transform::from_position(local),
            )?;
            grid.bind_tile_entity(coord, tile);
        }

        tracing::info!(
            width = grid.dimensions().x,
            height = grid.dimensions().y,
            blueprints = catalog.len(),
            start_money = config.start_money,
            "session started"
        );

        Ok(Self {
            grid,
            scene,
            stats: PlayerStats::new(config.start_money),
            builder: BuildManager::new(catalog),
            root,
        })
    }

    pub fn grid(&self) -> &PlacementGrid {
        &self.grid
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn stats(&self) -> &PlayerStats {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut PlayerStats {
        &mut self.stats
    }

    pub fn builder(&self) -> &BuildManager {
        &self.builder
    }

    pub fn builder_mut(&mut self) -> &mut BuildManager {
        &mut self.builder
    }

    /// Root entity of the grid hierarchy.
    pub fn root(&self) -> EntityId {
        self.root
    }

    pub fn select_blueprint(&mut self, id: &BlueprintId) -> Result<(), BuildError> {
        self.builder.select_blueprint(id)
    }

    pub fn deselect(&mut self) {
        self.builder.deselect();
    }

    pub fn can_build(&self) -> bool {
        self.builder.can_build()
    }

    pub fn attempt_build(&mut self, coord: GridCoord) -> Result<BuildOutcome, BuildError> {
        self.builder.attempt_build(
            BuildContext {
                grid: &mut self.grid,
                scene: &mut self.scene,
                stats: &mut self.stats,
            },
            coord,
        )
    }

    /// Build on the cell under `world`. `None` when the point is off the grid.
    pub fn attempt_build_at(&mut self, world: Vec3) -> Result<Option<BuildOutcome>, BuildError> {
        match self.grid.cell_at(world) {
            Some(coord) => self.attempt_build(coord).map(Some),
            None => Ok(None),
        }
    }

    pub fn demolish(&mut self, coord: GridCoord) -> Option<PlacedBuilding> {
        self.builder.demolish(
            BuildContext {
                grid: &mut self.grid,
                scene: &mut self.scene,
                stats: &mut self.stats,
            },
            coord,
        )
    }

    pub fn infect(&mut self, coord: GridCoord) {
        self.grid.infect(coord);
    }

    pub fn world_to_grid(&self, world: Vec3) -> IVec2 {
        self.grid.world_to_grid(world, UVec2::ONE)
    }

    pub fn grid_to_world(&self, coord: GridCoord) -> Vec3 {
        self.grid.cell_center(coord)
    }

    pub fn cell_at(&self, world: Vec3) -> Option<GridCoord> {
        self.grid.cell_at(world)
    }

    pub fn is_radius_blocked(&self, coord: GridCoord, radius: u32, tag: &BuildingTag) -> bool {
        self.grid.is_radius_blocked(coord, radius, tag)
    }

    pub fn money(&self) -> i64 {
        self.stats.money()
    }

    pub fn add_money(&mut self, delta: i64) {
        self.stats.add_money(delta);
    }

    /// Apply one player action. Returns the outcome when the action was a build attempt.
    pub fn apply(&mut self, action: &Action) -> Result<Option<BuildOutcome>, BuildError> {
        match action {
            Action::SelectBlueprint { id } => self.select_blueprint(id)?,
            Action::Deselect => self.deselect(),
            Action::Click { position, over_ui } => {
                if *over_ui {
                    tracing::debug!("click over UI ignored");
                } else if !self.can_build() {
                    tracing::debug!("click ignored, nothing selected");
                } else {
                    let outcome = self.attempt_build_at(*position)?;
                    if outcome.is_none() {
                        tracing::debug!(?position, "click outside the grid");
                    }
                    return Ok(outcome);
                }
            }
            Action::Demolish { position } => {
                if let Some(coord) = self.cell_at(*position) {
                    self.demolish(coord);
                }
            }
            Action::Infect { position } => {
                if let Some(coord) = self.cell_at(*position) {
                    self.infect(coord);
                }
            }
            Action::GrantMoney { amount } => self.add_money(*amount),
            Action::Noop => {}
        }
        Ok(None)
    }
}
