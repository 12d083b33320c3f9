//! Dense impassable-cell set consumed by the path search.

use snake_pilot_core::{Cell, TileCount};

/// Cells a route may not pass through, stored as a row-major bitmap.
///
/// The map also carries the grid topology, so a search needs nothing beyond
/// the start, the goal and this value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObstacleMap {
    tile_count: TileCount,
    blocked: Vec<bool>,
}

impl ObstacleMap {
    /// Creates an obstacle-free map for the provided grid.
    #[must_use]
    pub fn new(tile_count: TileCount) -> Self {
        Self {
            tile_count,
            blocked: vec![false; tile_count.cell_count()],
        }
    }

    /// Creates a map blocking every provided cell. Cells outside the grid are ignored.
    #[must_use]
    pub fn from_cells<I>(tile_count: TileCount, cells: I) -> Self
    where
        I: IntoIterator<Item = Cell>,
    {
        let mut map = Self::new(tile_count);
        for cell in cells {
            map.block(cell);
        }
        map
    }

    /// Marks the cell as impassable.
    pub fn block(&mut self, cell: Cell) {
        if let Some(slot) = self
            .tile_count
            .key(cell)
            .and_then(|key| self.blocked.get_mut(key))
        {
            *slot = true;
        }
    }

    /// Reports whether the cell is impassable.
    #[must_use]
    pub fn is_blocked(&self, cell: Cell) -> bool {
        self.tile_count
            .key(cell)
            .and_then(|key| self.blocked.get(key).copied())
            .unwrap_or(false)
    }

    /// Grid the map was built for.
    #[must_use]
    pub const fn tile_count(&self) -> TileCount {
        self.tile_count
    }
}
