//! Grid module - the playing board
//!
//! A `cols x rows` board of cell values stored in a flat, row-major vector.
//! Coordinates are `(x, y)`: x is the column (left to right), y the row (top to bottom).
//! Pieces are placed by their centre cell, so a 3x3 piece anchored at `(x, y)`
//! covers `(x-1..=x+1, y-1..=y+1)`.
//!
//! Line clearing never shifts anything: a full row *or* a full column is
//! simply emptied in place.

use std::collections::BTreeSet;

use crate::pieces::GamePiece;
use crate::types::{CellValue, Coord, EMPTY};

/// Lines found complete after a placement
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LineClear {
    /// Full rows plus full columns, each counted on its own
    pub lines: u32,
    /// Every cell belonging to a full line, deduplicated
    pub cells: BTreeSet<Coord>,
}

impl LineClear {
    /// Number of distinct cells to clear
    pub fn block_count(&self) -> u32 {
        self.cells.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.lines == 0
    }
}

/// The game grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cols: usize,
    rows: usize,
    /// Flat array of cells, row-major order (y * cols + x)
    cells: Vec<CellValue>,
}

impl Grid {
    /// Create an empty grid
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            cells: vec![EMPTY; cols * rows],
        }
    }

    /// Rebuild a grid from a row-major cell list (e.g. a snapshot)
    ///
    /// Returns None when the length does not match the dimensions.
    pub fn from_cells(cols: usize, rows: usize, cells: Vec<CellValue>) -> Option<Self> {
        if cells.len() != cols * rows {
            return None;
        }
        Some(Self { cols, rows, cells })
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.cols || y as usize >= self.rows {
            return None;
        }
        Some(y as usize * self.cols + x as usize)
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<CellValue> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i32, y: i32, value: CellValue) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = value;
                true
            }
            None => false,
        }
    }

    /// Grid cells covered by `piece` anchored at `(x, y)`
    fn targets(piece: &GamePiece, x: i32, y: i32) -> impl Iterator<Item = (i32, i32)> {
        let half = (piece.size() / 2) as i32;
        piece
            .blocks()
            .into_iter()
            .map(move |(bx, by)| (x - half + bx as i32, y - half + by as i32))
    }

    /// Check whether every block of `piece` anchored at `(x, y)` lands on an empty in-bounds cell
    pub fn can_place(&self, piece: &GamePiece, x: i32, y: i32) -> bool {
        for (px, py) in Self::targets(piece, x, y) {
            if self.get(px, py) != Some(EMPTY) {
                log::trace!("{} does not fit at ({}, {}): blocked at ({}, {})", piece, x, y, px, py);
                return false;
            }
        }
        true
    }

    /// Stamp `piece` onto the grid at `(x, y)`
    ///
    /// Callers check `can_place` first; occupied cells are overwritten.
    pub fn place(&mut self, piece: &GamePiece, x: i32, y: i32) {
        debug_assert!(self.can_place(piece, x, y));
        let value = piece.value();
        for (px, py) in Self::targets(piece, x, y) {
            self.set(px, py, value);
        }
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= self.rows {
            return false;
        }
        let start = y * self.cols;
        self.cells[start..start + self.cols]
            .iter()
            .all(|&cell| cell != EMPTY)
    }

    /// Check if a column is completely filled
    pub fn is_column_full(&self, x: usize) -> bool {
        if x >= self.cols {
            return false;
        }
        (0..self.rows).all(|y| self.cells[y * self.cols + x] != EMPTY)
    }

    /// Find every full column and full row
    ///
    /// A row and a column crossing each other count as two lines, while their
    /// shared cell appears once in the cell set.
    pub fn find_completed_lines(&self) -> LineClear {
        let mut clear = LineClear::default();

        for x in 0..self.cols {
            if self.is_column_full(x) {
                clear.lines += 1;
                clear
                    .cells
                    .extend((0..self.rows).map(|y| Coord::new(x as i32, y as i32)));
            }
        }

        for y in 0..self.rows {
            if self.is_row_full(y) {
                clear.lines += 1;
                clear
                    .cells
                    .extend((0..self.cols).map(|x| Coord::new(x as i32, y as i32)));
            }
        }

        clear
    }

    /// Empty every listed cell
    pub fn clear(&mut self, cells: &BTreeSet<Coord>) {
        for c in cells {
            self.set(c.x, c.y, EMPTY);
        }
    }

    /// Get a reference to the internal cells array (row-major)
    pub fn cells(&self) -> &[CellValue] {
        &self.cells
    }

    /// One row of cells, `None` past the bottom edge
    pub fn row(&self, y: usize) -> Option<&[CellValue]> {
        if y >= self.rows {
            return None;
        }
        let start = y * self.cols;
        Some(&self.cells[start..start + self.cols])
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|&c| c == EMPTY)
    }

    /// Clear the entire grid
    pub fn reset(&mut self) {
        self.cells.fill(EMPTY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PieceId;

    fn piece(n: u8) -> GamePiece {
        GamePiece::new(PieceId::new(n).unwrap())
    }

    #[test]
    fn test_grid_index_calculation() {
        let grid = Grid::new(5, 4);
        assert_eq!(grid.index(0, 0), Some(0));
        assert_eq!(grid.index(4, 0), Some(4));
        assert_eq!(grid.index(0, 1), Some(5));
        assert_eq!(grid.index(4, 3), Some(19));
        assert_eq!(grid.index(-1, 0), None);
        assert_eq!(grid.index(5, 0), None);
        assert_eq!(grid.index(0, 4), None);
    }

    #[test]
    fn test_place_uses_centre_anchor() {
        let mut grid = Grid::new(5, 5);
        let dot = piece(3);
        grid.place(&dot, 2, 2);
        assert_eq!(grid.get(2, 2), Some(dot.value()));
        assert_eq!(grid.cells().iter().filter(|&&c| c != EMPTY).count(), 1);
    }

    #[test]
    fn test_crossing_row_and_column_share_one_cell() {
        let mut grid = Grid::new(3, 3);
        for i in 0..3 {
            grid.set(i, 1, 1);
            grid.set(1, i, 1);
        }
        let clear = grid.find_completed_lines();
        assert_eq!(clear.lines, 2);
        assert_eq!(clear.block_count(), 5);
    }

    #[test]
    fn test_from_cells_rejects_wrong_length() {
        assert!(Grid::from_cells(2, 2, vec![0; 3]).is_none());
        let grid = Grid::from_cells(2, 2, vec![0, 1, 2, 3]).unwrap();
        assert_eq!(grid.get(1, 1), Some(3));
        assert_eq!(grid.row(1), Some(&[2, 3][..]));
        assert_eq!(grid.row(2), None);
    }
}
