use glam::{IVec2, UVec2, Vec3};
use serde::{Deserialize, Serialize};
use towerfield_common::{BuildingTag, EntityId, Transform};

use crate::{GridCoord, Node, NodeMark, PlacedBuilding, Tile, TileState};

/// Layout of the placement surface in world space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Number of cells along local X and local Z.
    pub dimensions: UVec2,
    /// World length of one cell edge.
    pub cell_size: f32,
    /// Transform of the grid's bottom-left corner.
    pub origin: Transform,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            dimensions: UVec2::new(5, 5),
            cell_size: 1.0,
            origin: Transform::default(),
        }
    }
}

/// Errors from grid construction and occupancy calls. All of them indicate a
/// caller bug rather than a runtime condition.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GridError {
    #[error("cell size must be positive and finite, got {0}")]
    InvalidCellSize(f32),
    #[error("grid dimensions must be non-zero with an addressable cell count, got {0}")]
    InvalidDimensions(UVec2),
    #[error("footprint {size} does not fit in a {dimensions} grid")]
    FootprintTooLarge { size: UVec2, dimensions: UVec2 },
    #[error("footprint {size} at {origin} is out of range of a {dimensions} grid")]
    FootprintOutOfRange {
        origin: IVec2,
        size: UVec2,
        dimensions: UVec2,
    },
    #[error("cell {0} already holds a building")]
    CellOccupied(GridCoord),
}

/// Events produced by grid mutations, polled by presentation layers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GridEvent {
    TileChanged {
        coord: GridCoord,
        old: TileState,
        new: TileState,
    },
    AbilityChanged {
        coord: GridCoord,
        ability: u32,
        has_effect: bool,
    },
}

/// Fixed-size grid of tiles and nodes laid out from an origin transform.
///
/// Cells are stored row-major (`y * width + x`). Occupancy is tracked
/// separately from node buildings so multi-cell footprints can be reserved
/// without a building on every covered node.
#[derive(Debug, Clone)]
pub struct PlacementGrid {
    dimensions: UVec2,
    cell_size: f32,
    /// Precomputed to save a division on every world-to-grid conversion.
    inv_cell_size: f32,
    origin: Transform,
    occupied: Vec<bool>,
    tiles: Vec<Tile>,
    nodes: Vec<Node>,
    events: Vec<GridEvent>,
}

impl PlacementGrid {
    /// Build an empty grid. Every tile starts `Empty`, every node vacant.
    pub fn new(config: GridConfig, max_ability: u32) -> Result<Self, GridError> {
        if !(config.cell_size.is_finite() && config.cell_size > 0.0) {
            return Err(GridError::InvalidCellSize(config.cell_size));
        }
        if config.dimensions.x == 0 || config.dimensions.y == 0 {
            return Err(GridError::InvalidDimensions(config.dimensions));
        }

        let len = config
            .dimensions
            .x
            .checked_mul(config.dimensions.y)
            .and_then(|cells| usize::try_from(cells).ok())
            .ok_or(GridError::InvalidDimensions(config.dimensions))?;
        let mut tiles = Vec::with_capacity(len);
        let mut nodes = Vec::with_capacity(len);
        for y in 0..config.dimensions.y {
            for x in 0..config.dimensions.x {
                let index = GridCoord::new(x, y);
                tiles.push(Tile::new(index));
                nodes.push(Node::new(index, max_ability));
            }
        }

        tracing::debug!(
            width = config.dimensions.x,
            height = config.dimensions.y,
            cell_size = config.cell_size,
            "placement grid created"
        );

        Ok(Self {
            dimensions: config.dimensions,
            cell_size: config.cell_size,
            inv_cell_size: 1.0 / config.cell_size,
            origin: config.origin,
            occupied: vec![false; len],
            tiles,
            nodes,
            events: Vec::new(),
        })
    }

    pub fn dimensions(&self) -> UVec2 {
        self.dimensions
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn origin(&self) -> &Transform {
        &self.origin
    }

    /// Validate a raw index against the grid bounds.
    pub fn coord(&self, x: i32, y: i32) -> Option<GridCoord> {
        if x < 0 || y < 0 || x as u32 >= self.dimensions.x || y as u32 >= self.dimensions.y {
            return None;
        }
        Some(GridCoord::new(x as u32, y as u32))
    }

    /// All cells in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = GridCoord> + '_ {
        self.tiles.iter().map(Tile::index)
    }

    fn index(&self, coord: GridCoord) -> usize {
        coord.y() as usize * self.dimensions.x as usize + coord.x() as usize
    }

    /// Convert a world position to a (possibly out-of-range) grid index.
    ///
    /// `size_offset` is the footprint being centred; the result is the index of
    /// its bottom-left cell. Rounds to the nearest cell, ties to even, so the
    /// grid's own corners and edges land on valid cells.
    pub fn world_to_grid(&self, world: Vec3, size_offset: UVec2) -> IVec2 {
        let mut local = self.origin.inverse_transform_point(world) * self.inv_cell_size;
        local -= Vec3::new(
            size_offset.x as f32 * 0.5,
            0.0,
            size_offset.y as f32 * 0.5,
        );
        IVec2::new(
            local.x.round_ties_even() as i32,
            local.z.round_ties_even() as i32,
        )
    }

    /// World position of the centre of a footprint whose bottom-left cell is `index`.
    pub fn grid_to_world(&self, index: IVec2, size_offset: UVec2) -> Vec3 {
        let local = Vec3::new(
            index.x as f32 + size_offset.x as f32 * 0.5,
            0.0,
            index.y as f32 + size_offset.y as f32 * 0.5,
        ) * self.cell_size;
        self.origin.transform_point(local)
    }

    /// Cell containing `world`, if it lies on the grid.
    pub fn cell_at(&self, world: Vec3) -> Option<GridCoord> {
        let index = self.world_to_grid(world, UVec2::ONE);
        self.coord(index.x, index.y)
    }

    /// World position of a cell's centre.
    pub fn cell_center(&self, coord: GridCoord) -> Vec3 {
        self.grid_to_world(coord.as_ivec2(), UVec2::ONE)
    }

    pub fn is_occupied(&self, coord: GridCoord) -> bool {
        self.occupied[self.index(coord)]
    }

    pub fn occupied_count(&self) -> usize {
        self.occupied.iter().filter(|o| **o).count()
    }

    fn check_footprint(&self, origin: IVec2, size: UVec2) -> Result<(), GridError> {
        if size.x > self.dimensions.x || size.y > self.dimensions.y {
            return Err(GridError::FootprintTooLarge {
                size,
                dimensions: self.dimensions,
            });
        }
        let extent_x = origin.x as i64 + size.x as i64;
        let extent_y = origin.y as i64 + size.y as i64;
        if origin.x < 0
            || origin.y < 0
            || extent_x > self.dimensions.x as i64
            || extent_y > self.dimensions.y as i64
        {
            return Err(GridError::FootprintOutOfRange {
                origin,
                size,
                dimensions: self.dimensions,
            });
        }
        Ok(())
    }

    /// Assumes the footprint was validated by `check_footprint`.
    fn footprint(origin: IVec2, size: UVec2) -> impl Iterator<Item = GridCoord> {
        let (x0, y0) = (origin.x as u32, origin.y as u32);
        (y0..y0 + size.y).flat_map(move |y| (x0..x0 + size.x).map(move |x| GridCoord::new(x, y)))
    }

    /// Occupied cells show `Filled`; released cells fall back to their resting
    /// state, which keeps infection.
    fn fill_footprint(&mut self, origin: IVec2, size: UVec2, occupied: bool) {
        for coord in Self::footprint(origin, size) {
            let i = self.index(coord);
            self.occupied[i] = occupied;
            let state = if occupied {
                TileState::Filled
            } else {
                self.tiles[i].resting_state()
            };
            self.set_tile_state(coord, state);
        }
    }

    /// Mark every cell covered by the footprint as occupied and its tile `Filled`.
    pub fn occupy(&mut self, origin: IVec2, size: UVec2) -> Result<(), GridError> {
        self.check_footprint(origin, size)?;
        self.fill_footprint(origin, size, true);
        Ok(())
    }

    /// Release every cell covered by the footprint and reset its tile to its
    /// resting state. Refuses, without touching anything, if a node in the
    /// footprint still holds a building; use [`Self::remove_building`] for those.
    pub fn vacate(&mut self, origin: IVec2, size: UVec2) -> Result<(), GridError> {
        self.check_footprint(origin, size)?;
        if let Some(built) =
            Self::footprint(origin, size).find(|c| !self.nodes[self.index(*c)].is_vacant())
        {
            return Err(GridError::CellOccupied(built));
        }
        self.fill_footprint(origin, size, false);
        Ok(())
    }

    pub fn tile(&self, coord: GridCoord) -> &Tile {
        &self.tiles[self.index(coord)]
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Set a tile's visual state. Emits an event only when the state changes.
    pub fn set_tile_state(&mut self, coord: GridCoord, state: TileState) {
        let i = self.index(coord);
        let old = self.tiles[i].set_state(state);
        if old != state {
            self.events.push(GridEvent::TileChanged {
                coord,
                old,
                new: state,
            });
        }
    }

    /// Mark a cell as infected. Infection outlives any building later placed
    /// on and removed from the cell.
    pub fn infect(&mut self, coord: GridCoord) {
        tracing::debug!(%coord, "tile infected");
        let i = self.index(coord);
        self.tiles[i].mark_infected();
        self.set_tile_state(coord, TileState::Infected);
    }

    /// Record the scene entity that represents a tile.
    pub fn bind_tile_entity(&mut self, coord: GridCoord, entity: EntityId) {
        let i = self.index(coord);
        self.tiles[i].bind_entity(entity);
    }

    pub fn node(&self, coord: GridCoord) -> &Node {
        &self.nodes[self.index(coord)]
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Put a building on a vacant node and occupy its cell.
    pub fn place_building(
        &mut self,
        coord: GridCoord,
        building: PlacedBuilding,
    ) -> Result<(), GridError> {
        let i = self.index(coord);
        if !self.nodes[i].is_vacant() {
            return Err(GridError::CellOccupied(coord));
        }
        self.occupy(coord.as_ivec2(), UVec2::ONE)?;
        self.nodes[i].set_building(building);
        Ok(())
    }

    /// Take the building off a node and release its cell.
    pub fn remove_building(&mut self, coord: GridCoord) -> Option<PlacedBuilding> {
        let i = self.index(coord);
        let building = self.nodes[i].take_building()?;
        self.fill_footprint(coord.as_ivec2(), UVec2::ONE, false);
        Some(building)
    }

    /// Adjust a node's ability counter. Returns the clamped count.
    pub fn add_ability(&mut self, coord: GridCoord, delta: i64) -> u32 {
        let i = self.index(coord);
        let ability = self.nodes[i].add_ability(delta);
        self.events.push(GridEvent::AbilityChanged {
            coord,
            ability,
            has_effect: true,
        });
        ability
    }

    pub fn disable_effect(&mut self, coord: GridCoord) {
        let i = self.index(coord);
        self.nodes[i].disable_effect();
        self.events.push(GridEvent::AbilityChanged {
            coord,
            ability: self.nodes[i].ability(),
            has_effect: false,
        });
    }

    pub fn set_mark(&mut self, coord: GridCoord, mark: NodeMark) {
        let i = self.index(coord);
        self.nodes[i].set_mark(mark);
    }

    /// Cells of the `(2R+1)²` square centred on `origin`, clamped to the grid.
    /// Ordered by x, then y.
    pub fn neighborhood(&self, origin: GridCoord, radius: u32) -> Vec<GridCoord> {
        let r = radius as i64;
        let x0 = (origin.x() as i64 - r).max(0);
        let x1 = (origin.x() as i64 + r).min(self.dimensions.x as i64 - 1);
        let y0 = (origin.y() as i64 - r).max(0);
        let y1 = (origin.y() as i64 + r).min(self.dimensions.y as i64 - 1);

        let mut cells = Vec::new();
        for x in x0..=x1 {
            for y in y0..=y1 {
                cells.push(GridCoord::new(x as u32, y as u32));
            }
        }
        cells
    }

    /// Whether any node within `radius` of `origin` holds a building tagged `tag`.
    pub fn is_radius_blocked(&self, origin: GridCoord, radius: u32, tag: &BuildingTag) -> bool {
        let blocker = self.neighborhood(origin, radius).into_iter().find(|c| {
            self.node(*c)
                .building()
                .is_some_and(|building| &building.tag == tag)
        });
        if let Some(at) = blocker {
            tracing::debug!(%origin, %at, radius, %tag, "radius blocked");
        }
        blocker.is_some()
    }

    /// Drain and return pending grid events.
    pub fn drain_events(&mut self) -> Vec<GridEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[GridEvent] {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    fn grid(w: u32, h: u32) -> PlacementGrid {
        PlacementGrid::new(
            GridConfig {
                dimensions: UVec2::new(w, h),
                ..GridConfig::default()
            },
            4,
        )
        .unwrap()
    }

    fn house() -> PlacedBuilding {
        PlacedBuilding {
            entity: EntityId::new(),
            blueprint: "house".into(),
            tag: "House".into(),
        }
    }

    #[test]
    fn rejects_bad_config() {
        let bad_size = GridConfig {
            cell_size: 0.0,
            ..GridConfig::default()
        };
        assert_eq!(
            PlacementGrid::new(bad_size, 4).unwrap_err(),
            GridError::InvalidCellSize(0.0)
        );

        let bad_dims = GridConfig {
            dimensions: UVec2::new(0, 3),
            ..GridConfig::default()
        };
        assert!(matches!(
            PlacementGrid::new(bad_dims, 4),
            Err(GridError::InvalidDimensions(_))
        ));
    }

    #[test]
    fn rejects_cell_count_overflow() {
        let huge = GridConfig {
            dimensions: UVec2::new(u32::MAX, 2),
            ..GridConfig::default()
        };
        assert_eq!(
            PlacementGrid::new(huge, 4).unwrap_err(),
            GridError::InvalidDimensions(UVec2::new(u32::MAX, 2))
        );
    }

    #[test]
    fn new_grid_is_empty() {
        let g = grid(5, 5);
        assert_eq!(g.coords().count(), 25);
        assert_eq!(g.occupied_count(), 0);
        assert!(g.tiles().iter().all(|t| t.state() == TileState::Empty));
        assert!(g.nodes().iter().all(Node::is_vacant));
    }

    #[test]
    fn coord_rejects_out_of_bounds() {
        let g = grid(5, 3);
        assert!(g.coord(4, 2).is_some());
        assert!(g.coord(5, 0).is_none());
        assert!(g.coord(0, 3).is_none());
        assert!(g.coord(-1, 0).is_none());
    }

    #[test]
    fn coords_from_a_larger_grid_stay_distinct() {
        let big = grid(8, 8);
        let small = grid(5, 5);
        let far = big.coord(7, 0).unwrap();
        assert!(small.coord(far.x() as i32, far.y() as i32).is_none());
        assert_eq!(small.coord(far.x() as i32, far.y() as i32), small.cell_at(big.cell_center(far)));
        assert_eq!(small.coords().collect::<std::collections::BTreeSet<_>>().len(), 25);
    }

    #[test]
    fn world_to_grid_snaps_to_nearest_cell() {
        let g = grid(5, 5);
        assert_eq!(g.world_to_grid(Vec3::new(2.5, 0.0, 2.5), UVec2::ONE), IVec2::new(2, 2));
        assert_eq!(g.world_to_grid(Vec3::new(2.1, 0.0, 2.9), UVec2::ONE), IVec2::new(2, 2));
        assert_eq!(g.world_to_grid(Vec3::new(0.2, 0.0, 4.8), UVec2::ONE), IVec2::new(0, 4));
        assert_eq!(g.cell_at(Vec3::new(-3.0, 0.0, 1.0)), None);
    }

    #[test]
    fn grid_edges_snap_onto_the_grid() {
        let g = grid(5, 5);
        assert_eq!(g.world_to_grid(Vec3::ZERO, UVec2::ONE), IVec2::new(0, 0));
        assert_eq!(g.cell_at(Vec3::ZERO), g.coord(0, 0));
        assert_eq!(g.cell_at(Vec3::new(2.2, 0.0, 0.0)), g.coord(2, 0));
        assert_eq!(g.cell_at(Vec3::new(5.0, 0.0, 2.2)), g.coord(4, 2));
        assert_eq!(g.cell_at(Vec3::new(0.0, 0.0, 5.0)), g.coord(0, 4));
    }

    #[test]
    fn round_trip_lands_on_cell_centre() {
        let g = grid(5, 5);
        for i in 0..50 {
            let p = Vec3::new(i as f32 * 0.099, 0.0, 4.95 - i as f32 * 0.097);
            let coord = g.cell_at(p).unwrap();
            let centre = g.cell_center(coord);
            assert_eq!(centre.x, coord.x() as f32 + 0.5);
            assert_eq!(centre.z, coord.y() as f32 + 0.5);
            assert!((centre.x - p.x).abs() <= 0.5 + 1e-4);
            assert!((centre.z - p.z).abs() <= 0.5 + 1e-4);
        }
    }

    #[test]
    fn conversion_honours_origin_and_cell_size() {
        let g = PlacementGrid::new(
            GridConfig {
                dimensions: UVec2::new(4, 4),
                cell_size: 2.0,
                origin: Transform {
                    position: Vec3::new(10.0, 1.0, -4.0),
                    rotation: Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
                    scale: Vec3::ONE,
                },
            },
            4,
        )
        .unwrap();
        let coord = g.coord(1, 3).unwrap();
        let world = g.cell_center(coord);
        assert_eq!(g.cell_at(world), Some(coord));
        assert!((world.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn footprint_offset_centres_larger_objects() {
        let g = grid(6, 6);
        let size = UVec2::new(2, 2);
        let centre = g.grid_to_world(IVec2::new(1, 3), size);
        assert_eq!(centre, Vec3::new(2.0, 0.0, 4.0));
        assert_eq!(g.world_to_grid(centre, size), IVec2::new(1, 3));
    }

    #[test]
    fn occupy_marks_cells_and_tiles() {
        let mut g = grid(5, 5);
        g.occupy(IVec2::new(1, 2), UVec2::new(2, 3)).unwrap();
        assert_eq!(g.occupied_count(), 6);
        let inside = g.coord(2, 4).unwrap();
        assert!(g.is_occupied(inside));
        assert_eq!(g.tile(inside).state(), TileState::Filled);
        assert!(!g.is_occupied(g.coord(3, 2).unwrap()));
        assert_eq!(g.drain_events().len(), 6);
    }

    #[test]
    fn oversized_footprint_mutates_nothing() {
        let mut g = grid(5, 5);
        let err = g.occupy(IVec2::ZERO, UVec2::new(6, 1)).unwrap_err();
        assert!(matches!(err, GridError::FootprintTooLarge { .. }));
        assert_eq!(g.occupied_count(), 0);
        assert!(g.events().is_empty());
    }

    #[test]
    fn out_of_range_footprint_mutates_nothing() {
        let mut g = grid(5, 5);
        for origin in [IVec2::new(-1, 0), IVec2::new(4, 4), IVec2::new(0, 3)] {
            let err = g.occupy(origin, UVec2::new(2, 3)).unwrap_err();
            assert!(matches!(err, GridError::FootprintOutOfRange { .. }));
        }
        assert_eq!(g.occupied_count(), 0);
    }

    #[test]
    fn vacate_releases_cells() {
        let mut g = grid(5, 5);
        g.occupy(IVec2::new(0, 0), UVec2::new(2, 2)).unwrap();
        g.vacate(IVec2::new(0, 0), UVec2::new(1, 2)).unwrap();
        assert_eq!(g.occupied_count(), 2);
        assert_eq!(g.tile(g.coord(0, 1).unwrap()).state(), TileState::Empty);
    }

    #[test]
    fn vacate_refuses_built_cells() {
        let mut g = grid(4, 4);
        let built = g.coord(1, 1).unwrap();
        g.place_building(built, house()).unwrap();
        g.drain_events();

        assert_eq!(
            g.vacate(IVec2::new(0, 0), UVec2::new(2, 2)),
            Err(GridError::CellOccupied(built))
        );
        assert!(g.is_occupied(built));
        assert_eq!(g.tile(built).state(), TileState::Filled);
        assert!(!g.node(built).is_vacant());
        assert!(g.events().is_empty());
    }

    #[test]
    fn radius_scan_on_empty_grid_is_clear() {
        let g = grid(5, 5);
        let tag = BuildingTag::from("House");
        for radius in 0..8 {
            for coord in g.coords() {
                assert!(!g.is_radius_blocked(coord, radius, &tag));
            }
        }
    }

    #[test]
    fn radius_scan_finds_same_tag_within_radius_only() {
        let mut g = grid(7, 7);
        let tag = BuildingTag::from("House");
        let centre = g.coord(3, 3).unwrap();
        g.place_building(centre, house()).unwrap();

        for coord in g.coords() {
            let distance = (coord.x() as i64 - 3).abs().max((coord.y() as i64 - 3).abs()) as u32;
            assert_eq!(g.is_radius_blocked(coord, 1, &tag), distance <= 1, "at {coord}");
            assert_eq!(g.is_radius_blocked(coord, 2, &tag), distance <= 2, "at {coord}");
        }
    }

    #[test]
    fn radius_scan_ignores_other_tags() {
        let mut g = grid(5, 5);
        g.place_building(g.coord(2, 2).unwrap(), house()).unwrap();
        let origin = g.coord(2, 3).unwrap();
        assert!(!g.is_radius_blocked(origin, 3, &BuildingTag::from("Mill")));
    }

    #[test]
    fn radius_scan_skips_cells_past_the_edge() {
        let mut g = grid(3, 3);
        g.place_building(g.coord(0, 0).unwrap(), house()).unwrap();
        let corner = g.coord(0, 0).unwrap();
        assert_eq!(g.neighborhood(corner, 1).len(), 4);
        assert_eq!(g.neighborhood(corner, 10).len(), 9);
        assert!(g.is_radius_blocked(g.coord(2, 2).unwrap(), 5, &BuildingTag::from("House")));
    }

    #[test]
    fn place_building_refuses_occupied_node() {
        let mut g = grid(3, 3);
        let c = g.coord(1, 1).unwrap();
        g.place_building(c, house()).unwrap();
        assert_eq!(g.place_building(c, house()), Err(GridError::CellOccupied(c)));
        assert!(g.is_occupied(c));
        assert_eq!(g.tile(c).state(), TileState::Filled);
    }

    #[test]
    fn remove_building_vacates_cell() {
        let mut g = grid(3, 3);
        let c = g.coord(1, 1).unwrap();
        g.place_building(c, house()).unwrap();
        let removed = g.remove_building(c).unwrap();
        assert_eq!(removed.blueprint.as_str(), "house");
        assert!(!g.is_occupied(c));
        assert!(g.node(c).is_vacant());
        assert!(g.remove_building(c).is_none());
    }

    #[test]
    fn remove_building_keeps_infection() {
        let mut g = grid(3, 3);
        let c = g.coord(2, 1).unwrap();
        g.infect(c);
        g.place_building(c, house()).unwrap();
        assert_eq!(g.tile(c).state(), TileState::Filled);

        g.remove_building(c).unwrap();
        assert_eq!(g.tile(c).state(), TileState::Infected);
        assert!(g.tile(c).is_infected());

        let clean = g.coord(0, 0).unwrap();
        g.place_building(clean, house()).unwrap();
        g.remove_building(clean).unwrap();
        assert_eq!(g.tile(clean).state(), TileState::Empty);
    }

    #[test]
    fn ability_changes_emit_events() {
        let mut g = grid(3, 3);
        let c = g.coord(0, 2).unwrap();
        assert_eq!(g.add_ability(c, 10), 4);
        g.disable_effect(c);
        let events = g.drain_events();
        assert_eq!(
            events,
            vec![
                GridEvent::AbilityChanged {
                    coord: c,
                    ability: 4,
                    has_effect: true
                },
                GridEvent::AbilityChanged {
                    coord: c,
                    ability: 4,
                    has_effect: false
                },
            ]
        );
    }

    #[test]
    fn infect_only_emits_on_change() {
        let mut g = grid(2, 2);
        let c = g.coord(1, 0).unwrap();
        g.infect(c);
        g.infect(c);
        assert_eq!(g.tile(c).state(), TileState::Infected);
        assert_eq!(g.events().len(), 1);
    }
}
