use serde::{Deserialize, Serialize};
use tracing::debug;

/// Occupancy state of one queried position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Free,
    Occupied,
    /// Returned for any query outside the map rectangle, never stored.
    OutOfBounds,
}

/// Occupancy matrix over the cell space.
///
/// Coordinates are world units and must be exact multiples of the cell size;
/// alignment is the caller's contract, not a runtime condition. The grid is
/// created once per world and never resized. Callers that move entities must
/// hold the world's grid lock across the whole clear-source/set-destination
/// sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    rows: u32,
    cols: u32,
    cell_size: f32,
    cells: Vec<u8>,
}

impl Grid {
    pub fn new(rows: u32, cols: u32, cell_size: f32) -> Self {
        debug!(rows, cols, "grid created");
        Self {
            rows,
            cols,
            cell_size,
            cells: vec![0; (rows * cols) as usize],
        }
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn width(&self) -> f32 {
        self.rows as f32 * self.cell_size
    }

    pub fn height(&self) -> f32 {
        self.cols as f32 * self.cell_size
    }

    pub fn get(&self, x: f32, y: f32) -> Cell {
        debug_assert!(
            x % self.cell_size == 0.0 && y % self.cell_size == 0.0,
            "grid query must be cell-aligned: ({x}, {y})"
        );
        if x < 0.0 || x >= self.width() || y < 0.0 || y >= self.height() {
            return Cell::OutOfBounds;
        }
        match self.cells[self.index(x, y)] {
            0 => Cell::Free,
            _ => Cell::Occupied,
        }
    }

    /// Sets one cell; no-op when the position is outside the map.
    pub fn set(&mut self, x: f32, y: f32, value: Cell) {
        debug_assert!(
            x % self.cell_size == 0.0 && y % self.cell_size == 0.0,
            "grid update must be cell-aligned: ({x}, {y})"
        );
        debug_assert!(value != Cell::OutOfBounds, "out-of-bounds is not storable");
        if x < 0.0 || x >= self.width() || y < 0.0 || y >= self.height() {
            return;
        }
        let index = self.index(x, y);
        self.cells[index] = match value {
            Cell::Occupied => 1,
            _ => 0,
        };
    }

    fn index(&self, x: f32, y: f32) -> usize {
        let cx = (x / self.cell_size) as usize;
        let cy = (y / self.cell_size) as usize;
        cx * self.cols as usize + cy
    }
}
