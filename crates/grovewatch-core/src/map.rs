//! Immutable map data: grid, tiles, and the path enemies walk.

use serde::{Deserialize, Serialize};

use crate::enums::Tile;
use crate::types::{GridCell, Vector2};

/// Built once at game start; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapData {
    pub columns: u32,
    pub rows: u32,
    pub cell_size: f64,
    /// `columns * cell_size`.
    pub world_width: f64,
    /// `rows * cell_size`.
    pub world_height: f64,
    /// Row-major tiles, `columns * rows` entries.
    pub tiles: Vec<Tile>,
    /// Ordered world-space nodes from spawn to goal.
    pub path: Vec<Vector2>,
}

impl MapData {
    pub fn contains(&self, cell: GridCell) -> bool {
        cell.col >= 0
            && cell.row >= 0
            && (cell.col as u32) < self.columns
            && (cell.row as u32) < self.rows
    }

    /// Tile at `cell`, or `None` when the cell is off the map.
    pub fn tile(&self, cell: GridCell) -> Option<Tile> {
        self.index(cell).and_then(|i| self.tiles.get(i).copied())
    }

    /// Row-major index of `cell`, if on the map.
    pub fn index(&self, cell: GridCell) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        Some(cell.row as usize * self.columns as usize + cell.col as usize)
    }

    pub fn path_origin(&self) -> Option<Vector2> {
        self.path.first().copied()
    }
}
