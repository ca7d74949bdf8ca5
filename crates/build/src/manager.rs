use serde::Serialize;
use towerfield_common::{BlueprintId, BuildingTag, EntityId, Transform};
use towerfield_economy::PlayerStats;
use towerfield_grid::{GridCoord, GridError, NodeMark, PlacedBuilding, PlacementGrid};
use towerfield_kernel::{Scene, SceneError};

use crate::{Blueprint, BlueprintCatalog, Effect};

/// Errors from build operations. Player-facing refusals are [`Rejection`]s instead.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("unknown blueprint {0}")]
    UnknownBlueprint(BlueprintId),
    #[error("duplicate blueprint {0}")]
    DuplicateBlueprint(BlueprintId),
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// Why a build attempt was refused. Refusals change nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("no blueprint selected")]
    NoBlueprintSelected,
    #[error("can't build there: cell {0} is occupied")]
    CellOccupied(GridCoord),
    #[error("not enough money: need {cost}, have {balance}")]
    InsufficientFunds { cost: i64, balance: i64 },
    #[error("a {tag} already stands within {radius} cells")]
    RadiusConflict { tag: BuildingTag, radius: u32 },
}

/// Result of a build attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    Placed { entity: EntityId, coord: GridCoord },
    Rejected(Rejection),
}

impl BuildOutcome {
    pub fn is_placed(&self) -> bool {
        matches!(self, Self::Placed { .. })
    }
}

/// Notifications for presentation layers, polled via [`BuildManager::drain_events`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum BuildEvent {
    Placed {
        entity: EntityId,
        blueprint: BlueprintId,
        coord: GridCoord,
    },
    Demolished {
        entity: EntityId,
        blueprint: BlueprintId,
        coord: GridCoord,
    },
}

/// Selection state of the build manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildState {
    Idle,
    Selected(BlueprintId),
}

/// Collaborators a build touches, lent for the duration of one call.
pub struct BuildContext<'a> {
    pub grid: &'a mut PlacementGrid,
    pub scene: &'a mut Scene,
    pub stats: &'a mut PlayerStats,
}

/// Orchestrates blueprint selection, affordability and radius checks, and
/// instantiation of buildings on nodes.
#[derive(Debug, Clone)]
pub struct BuildManager {
    catalog: BlueprintCatalog,
    selected: Option<BlueprintId>,
    events: Vec<BuildEvent>,
}

impl BuildManager {
    pub fn new(catalog: BlueprintCatalog) -> Self {
        Self {
            catalog,
            selected: None,
            events: Vec::new(),
        }
    }

    pub fn catalog(&self) -> &BlueprintCatalog {
        &self.catalog
    }

    /// Choose the blueprint subsequent builds will use.
    pub fn select_blueprint(&mut self, id: &BlueprintId) -> Result<(), BuildError> {
        if !self.catalog.contains(id) {
            return Err(BuildError::UnknownBlueprint(id.clone()));
        }
        tracing::debug!(blueprint = %id, "blueprint selected");
        self.selected = Some(id.clone());
        Ok(())
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }

    pub fn state(&self) -> BuildState {
        match &self.selected {
            Some(id) => BuildState::Selected(id.clone()),
            None => BuildState::Idle,
        }
    }

    pub fn selected(&self) -> Option<&Blueprint> {
        self.selected.as_ref().and_then(|id| self.catalog.get(id))
    }

    /// Whether a blueprint is selected and waiting for a target cell.
    pub fn can_build(&self) -> bool {
        self.selected().is_some()
    }

    /// Try to build the selected blueprint on `coord`.
    ///
    /// Checks run in order: selection, vacancy, funds, radius. The first failing
    /// check is logged and returned as a rejection without touching any state.
    /// The selection stays active after a successful build.
    pub fn attempt_build(
        &mut self,
        ctx: BuildContext<'_>,
        coord: GridCoord,
    ) -> Result<BuildOutcome, BuildError> {
        let _span = tracing::info_span!("attempt_build", %coord).entered();

        let Some(blueprint) = self.selected().cloned() else {
            tracing::debug!("no blueprint selected");
            return Ok(BuildOutcome::Rejected(Rejection::NoBlueprintSelected));
        };

        if let Some(rejection) = check_placement(ctx.grid, ctx.stats, &blueprint, coord) {
            tracing::warn!(blueprint = %blueprint.id, %rejection, "build rejected");
            return Ok(BuildOutcome::Rejected(rejection));
        }

        let entity = spawn_building(ctx.scene, ctx.grid, &blueprint, coord)?;
        let placed = PlacedBuilding {
            entity,
            blueprint: blueprint.id.clone(),
            tag: blueprint.tag.clone(),
        };
        if let Err(err) = ctx.grid.place_building(coord, placed) {
            ctx.scene.despawn(entity);
            return Err(err.into());
        }

        ctx.stats.add_money(-blueprint.cost);
        apply_effect(ctx.grid, blueprint.effect, coord);

        tracing::info!(
            blueprint = %blueprint.id,
            entity = %entity.short(),
            cost = blueprint.cost,
            balance = ctx.stats.money(),
            "building placed"
        );
        self.events.push(BuildEvent::Placed {
            entity,
            blueprint: blueprint.id,
            coord,
        });
        Ok(BuildOutcome::Placed { entity, coord })
    }

    /// Tear down the building on `coord`, if any. No refund is given.
    pub fn demolish(&mut self, ctx: BuildContext<'_>, coord: GridCoord) -> Option<PlacedBuilding> {
        let building = ctx.grid.remove_building(coord)?;
        ctx.scene.despawn(building.entity);
        tracing::info!(blueprint = %building.blueprint, %coord, "building demolished");
        self.events.push(BuildEvent::Demolished {
            entity: building.entity,
            blueprint: building.blueprint.clone(),
            coord,
        });
        Some(building)
    }

    /// Drain and return pending build events.
    pub fn drain_events(&mut self) -> Vec<BuildEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[BuildEvent] {
        &self.events
    }
}

fn check_placement(
    grid: &PlacementGrid,
    stats: &PlayerStats,
    blueprint: &Blueprint,
    coord: GridCoord,
) -> Option<Rejection> {
    if !grid.node(coord).is_vacant() || grid.is_occupied(coord) {
        return Some(Rejection::CellOccupied(coord));
    }
    if !stats.can_afford(blueprint.cost) {
        return Some(Rejection::InsufficientFunds {
            cost: blueprint.cost,
            balance: stats.money(),
        });
    }
    if grid.is_radius_blocked(coord, blueprint.radius_blocker, &blueprint.tag) {
        return Some(Rejection::RadiusConflict {
            tag: blueprint.tag.clone(),
            radius: blueprint.radius_blocker,
        });
    }
    None
}

/// Spawn the building under the node's tile entity, or at the cell centre when
/// the tile has no entity.
fn spawn_building(
    scene: &mut Scene,
    grid: &PlacementGrid,
    blueprint: &Blueprint,
    coord: GridCoord,
) -> Result<EntityId, SceneError> {
    let local = blueprint.local_transform();
    match grid.tile(coord).entity() {
        Some(tile) => scene.spawn_child(tile, blueprint.id.as_str(), local),
        None => {
            let node = Transform::from_position(grid.cell_center(coord));
            Ok(scene.spawn(blueprint.id.as_str(), node.mul_transform(&local)))
        }
    }
}

fn apply_effect(grid: &mut PlacementGrid, effect: Effect, origin: GridCoord) {
    match effect {
        Effect::None => {}
        Effect::Empower { radius, amount } => {
            for coord in grid.neighborhood(origin, radius) {
                grid.add_ability(coord, amount);
                grid.set_mark(coord, NodeMark::Buffed);
            }
        }
        Effect::MillZone { radius } => {
            for coord in grid.neighborhood(origin, radius) {
                grid.set_mark(coord, NodeMark::MillZone);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{IVec2, UVec2, Vec3};
    use towerfield_grid::{GridConfig, TileState};

    struct Fixture {
        grid: PlacementGrid,
        scene: Scene,
        stats: PlayerStats,
        manager: BuildManager,
    }

    impl Fixture {
        fn new(money: i64, blueprints: Vec<Blueprint>) -> Self {
            Self {
                grid: PlacementGrid::new(GridConfig::default(), 4).unwrap(),
                scene: Scene::new(),
                stats: PlayerStats::new(money),
                manager: BuildManager::new(BlueprintCatalog::from_blueprints(blueprints).unwrap()),
            }
        }

        fn build(&mut self, x: i32, y: i32) -> BuildOutcome {
            let coord = self.grid.coord(x, y).unwrap();
            self.manager
                .attempt_build(
                    BuildContext {
                        grid: &mut self.grid,
                        scene: &mut self.scene,
                        stats: &mut self.stats,
                    },
                    coord,
                )
                .unwrap()
        }
    }

    fn house() -> Blueprint {
        Blueprint::new("house", "House", 3).with_radius_blocker(1)
    }

    #[test]
    fn idle_until_selected() {
        let mut f = Fixture::new(10, vec![house()]);
        assert_eq!(f.manager.state(), BuildState::Idle);
        assert!(!f.manager.can_build());
        assert_eq!(
            f.build(0, 0),
            BuildOutcome::Rejected(Rejection::NoBlueprintSelected)
        );

        f.manager.select_blueprint(&"house".into()).unwrap();
        assert_eq!(f.manager.state(), BuildState::Selected("house".into()));
        assert!(f.manager.can_build());

        f.manager.deselect();
        assert_eq!(f.manager.state(), BuildState::Idle);
    }

    #[test]
    fn unknown_blueprint_is_an_error() {
        let mut f = Fixture::new(10, vec![house()]);
        let err = f.manager.select_blueprint(&"castle".into()).unwrap_err();
        assert!(matches!(err, BuildError::UnknownBlueprint(_)));
        assert!(!f.manager.can_build());
    }

    #[test]
    fn successful_build_debits_and_occupies() {
        let mut f = Fixture::new(10, vec![house()]);
        f.manager.select_blueprint(&"house".into()).unwrap();

        let outcome = f.build(2, 2);
        let BuildOutcome::Placed { entity, coord } = outcome else {
            panic!("expected placement, got {outcome:?}");
        };
        assert_eq!(f.stats.money(), 7);
        assert_eq!(f.grid.occupied_count(), 1);
        assert!(f.grid.is_occupied(coord));
        assert_eq!(f.grid.tile(coord).state(), TileState::Filled);
        assert_eq!(f.grid.node(coord).building().unwrap().entity, entity);
        assert!(f.scene.contains(entity));
        assert_eq!(f.manager.events().len(), 1);
        // selection survives a build
        assert!(f.manager.can_build());
    }

    #[test]
    fn insufficient_funds_changes_nothing() {
        let mut f = Fixture::new(2, vec![house()]);
        f.manager.select_blueprint(&"house".into()).unwrap();
        f.stats.drain_events();

        assert_eq!(
            f.build(1, 1),
            BuildOutcome::Rejected(Rejection::InsufficientFunds {
                cost: 3,
                balance: 2
            })
        );
        assert_eq!(f.stats.money(), 2);
        assert!(f.stats.events().is_empty());
        assert_eq!(f.grid.occupied_count(), 0);
        assert_eq!(f.scene.entity_count(), 0);
    }

    #[test]
    fn occupied_cell_is_rejected_before_funds() {
        let mut f = Fixture::new(3, vec![house()]);
        f.manager.select_blueprint(&"house".into()).unwrap();
        assert!(f.build(2, 2).is_placed());
        assert_eq!(
            f.build(2, 2),
            BuildOutcome::Rejected(Rejection::CellOccupied(f.grid.coord(2, 2).unwrap()))
        );
    }

    #[test]
    fn reserved_footprint_counts_as_occupied() {
        let mut f = Fixture::new(10, vec![house()]);
        f.manager.select_blueprint(&"house".into()).unwrap();
        f.grid.occupy(IVec2::new(0, 0), UVec2::new(2, 2)).unwrap();
        assert!(matches!(
            f.build(1, 1),
            BuildOutcome::Rejected(Rejection::CellOccupied(_))
        ));
        assert_eq!(f.stats.money(), 10);
    }

    #[test]
    fn radius_conflict_only_for_same_tag() {
        let mill = Blueprint::new("mill", "Mill", 1);
        let mut f = Fixture::new(10, vec![house(), mill]);
        f.manager.select_blueprint(&"house".into()).unwrap();
        assert!(f.build(2, 2).is_placed());
        assert_eq!(
            f.build(3, 3),
            BuildOutcome::Rejected(Rejection::RadiusConflict {
                tag: "House".into(),
                radius: 1
            })
        );

        f.manager.select_blueprint(&"mill".into()).unwrap();
        assert!(f.build(3, 3).is_placed());
        assert_eq!(f.stats.money(), 6);
    }

    #[test]
    fn building_parents_to_tile_entity() {
        let mut f = Fixture::new(10, vec![house().with_placement(Vec3::new(0.0, 0.5, 0.0), Vec3::ZERO)]);
        let coord = f.grid.coord(1, 3).unwrap();
        let tile = f
            .scene
            .spawn("tile", Transform::from_position(f.grid.cell_center(coord)));
        f.grid.bind_tile_entity(coord, tile);
        f.manager.select_blueprint(&"house".into()).unwrap();

        let BuildOutcome::Placed { entity, .. } = f.build(1, 3) else {
            panic!("expected placement");
        };
        assert_eq!(f.scene.get(entity).unwrap().parent, Some(tile));
        let world = f.scene.world_transform(entity).unwrap();
        assert_eq!(world.position, Vec3::new(1.5, 0.5, 3.5));
    }

    #[test]
    fn unbound_tile_spawns_at_cell_centre() {
        let mut f = Fixture::new(10, vec![house()]);
        f.manager.select_blueprint(&"house".into()).unwrap();
        let BuildOutcome::Placed { entity, .. } = f.build(4, 0) else {
            panic!("expected placement");
        };
        let data = f.scene.get(entity).unwrap();
        assert_eq!(data.parent, None);
        assert_eq!(data.transform.position, Vec3::new(4.5, 0.0, 0.5));
    }

    #[test]
    fn empower_effect_buffs_neighbours() {
        let shrine = Blueprint::new("shrine", "Shrine", 1)
            .with_effect(Effect::Empower { radius: 1, amount: 3 });
        let mut f = Fixture::new(10, vec![shrine]);
        f.manager.select_blueprint(&"shrine".into()).unwrap();
        assert!(f.build(0, 0).is_placed());
        assert!(f.build(1, 0).is_placed());

        let shared = f.grid.node(f.grid.coord(0, 1).unwrap());
        assert_eq!(shared.ability(), 4);
        assert_eq!(shared.mark(), NodeMark::Buffed);
        let far = f.grid.node(f.grid.coord(4, 4).unwrap());
        assert_eq!(far.ability(), 0);
        assert_eq!(far.mark(), NodeMark::Plain);
    }

    #[test]
    fn mill_zone_effect_marks_neighbourhood() {
        let mill = Blueprint::new("mill", "Mill", 1).with_effect(Effect::MillZone { radius: 2 });
        let mut f = Fixture::new(10, vec![mill]);
        f.manager.select_blueprint(&"mill".into()).unwrap();
        assert!(f.build(0, 0).is_placed());
        let marked = f
            .grid
            .nodes()
            .iter()
            .filter(|n| n.mark() == NodeMark::MillZone)
            .count();
        assert_eq!(marked, 9);
    }

    #[test]
    fn demolish_clears_node_and_entity() {
        let mut f = Fixture::new(10, vec![house()]);
        f.manager.select_blueprint(&"house".into()).unwrap();
        let BuildOutcome::Placed { entity, coord } = f.build(2, 2) else {
            panic!("expected placement");
        };

        let removed = f
            .manager
            .demolish(
                BuildContext {
                    grid: &mut f.grid,
                    scene: &mut f.scene,
                    stats: &mut f.stats,
                },
                coord,
            )
            .unwrap();
        assert_eq!(removed.entity, entity);
        assert!(!f.scene.contains(entity));
        assert!(!f.grid.is_occupied(coord));
        assert_eq!(f.stats.money(), 7);
        assert!(matches!(
            f.manager.drain_events().last(),
            Some(BuildEvent::Demolished { .. })
        ));

        // the freed cell accepts a new building
        assert!(f.build(2, 2).is_placed());
    }
}
