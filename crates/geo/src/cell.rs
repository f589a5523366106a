use crate::{RasterSize, Rows};

/// Represents a point in the raster using row, col coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub row: i32,
    pub col: i32,
}

impl Cell {
    pub const fn from_row_col(row: i32, col: i32) -> Self {
        Cell { row, col }
    }

    pub fn increment(&mut self, cols_in_grid: i32) {
        self.col += 1;
        if self.col >= cols_in_grid {
            self.col = 0;
            self.row += 1;
        }
    }
}

impl PartialOrd for Cell {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cell {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.row.cmp(&other.row).then(self.col.cmp(&other.col))
    }
}

/// Iterator over the cells in a raster
/// Iteration will occur from the top-left cell to the bottom-right cell in row-major order.
pub struct CellIterator {
    rows: Rows,
    cols: i32,
    current: Cell,
}

impl CellIterator {
    pub fn for_raster_with_size(size: RasterSize) -> Self {
        CellIterator {
            rows: size.rows,
            cols: size.cols.count(),
            current: Cell::from_row_col(0, 0),
        }
    }
}

impl Iterator for CellIterator {
    type Item = Cell;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cols <= 0 || self.current.row >= self.rows.count() {
            return None;
        }

        let current = self.current;
        self.current.increment(self.cols);
        Some(current)
    }
}
