use glam::UVec2;
use serde::Serialize;
use std::fmt;
use towerfield_build::Session;
use towerfield_common::BlueprintId;
use towerfield_grid::{NodeMark, PlacementGrid, TileState};
use towerfield_kernel::Scene;

/// Session inspector for debugging and CLI output.
pub struct SessionInspector;

impl SessionInspector {
    /// Produce a summary of the session state.
    pub fn summary(session: &Session) -> SessionSummary {
        let grid = session.grid();
        SessionSummary {
            dimensions: grid.dimensions(),
            balance: session.money(),
            selected: session.builder().selected().map(|bp| bp.id.clone()),
            buildings: grid.nodes().iter().filter(|n| !n.is_vacant()).count(),
            occupied_cells: grid.occupied_count(),
            entities: session.scene().entity_count(),
            scene_hash: session.scene().state_hash(),
            replay_consistent: Self::replay_matches(session),
        }
    }

    /// Whether replaying the scene's event log rebuilds the live scene.
    pub fn replay_matches(session: &Session) -> bool {
        let live = session.scene();
        let replayed = Scene::replay(live.events());
        let matches = replayed.state_hash() == live.state_hash();
        if !matches {
            tracing::warn!(
                live = live.entity_count(),
                replayed = replayed.entity_count(),
                "scene replay diverged from live scene"
            );
        }
        matches
    }

    /// Render the grid as text, one row per line with the highest row first.
    ///
    /// `.` empty, `#` filled without a building, first letter of the tag for
    /// built cells, `x` infected, `+` buffed, `~` mill zone.
    pub fn render_map(grid: &PlacementGrid) -> String {
        let dims = grid.dimensions();
        let mut out = String::with_capacity(((dims.x + 1) * dims.y) as usize);
        for y in (0..dims.y as i32).rev() {
            for x in 0..dims.x as i32 {
                let Some(coord) = grid.coord(x, y) else {
                    continue;
                };
                let node = grid.node(coord);
                let glyph = match (node.building(), grid.tile(coord).state(), node.mark()) {
                    (Some(building), _, _) => building.tag.as_str().chars().next().unwrap_or('?'),
                    (None, TileState::Infected, _) => 'x',
                    (None, TileState::Filled, _) => '#',
                    (None, TileState::Empty, NodeMark::Buffed) => '+',
                    (None, TileState::Empty, NodeMark::MillZone) => '~',
                    (None, TileState::Empty, NodeMark::Plain) => '.',
                };
                out.push(glyph);
            }
            out.push('\n');
        }
        out
    }
}

/// Summary of session state for the inspector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub dimensions: UVec2,
    pub balance: i64,
    pub selected: Option<BlueprintId>,
    pub buildings: usize,
    pub occupied_cells: usize,
    pub entities: usize,
    pub scene_hash: u64,
    pub replay_consistent: bool,
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let selected = self
            .selected
            .as_ref()
            .map(BlueprintId::as_str)
            .unwrap_or("none");
        write!(
            f,
            "Session: grid={}x{} money={} selected={} buildings={} occupied={} entities={} scene={:016x}",
            self.dimensions.x,
            self.dimensions.y,
            self.balance,
            selected,
            self.buildings,
            self.occupied_cells,
            self.entities,
            self.scene_hash
        )
    }
}
