use glam::IVec2;
use serde::Serialize;
use std::fmt;

/// A cell index known to be inside the grid that produced it.
///
/// Fields are private so a coordinate can only come from
/// [`crate::PlacementGrid::coord`], [`crate::PlacementGrid::cell_at`] or the
/// grid's own iteration. Not deserializable for the same reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct GridCoord {
    x: u32,
    y: u32,
}

impl GridCoord {
    pub(crate) fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    pub fn x(self) -> u32 {
        self.x
    }

    pub fn y(self) -> u32 {
        self.y
    }

    pub fn as_ivec2(self) -> IVec2 {
        IVec2::new(self.x as i32, self.y as i32)
    }
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
