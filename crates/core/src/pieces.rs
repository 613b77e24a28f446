//! Pieces module - the TetrECS piece catalog
//!
//! Every piece is a 3x3 layout anchored on its centre cell. Layouts are stored
//! row by row (`layout[y][x]`) and rotate clockwise in quarter turns.
//! Pieces are small `Copy` values: rotating returns a new piece.

use std::fmt;

use arrayvec::ArrayVec;

use crate::types::{CellValue, PieceId, Rotation, PIECE_COUNT, PIECE_SIZE};

/// Occupancy flags of a piece, indexed `[y][x]`
pub type Layout = [[bool; PIECE_SIZE]; PIECE_SIZE];

/// Offset `(bx, by)` of an occupied block inside the layout
pub type BlockOffset = (usize, usize);

/// Occupied offsets of one piece (at most every cell of the layout)
pub type Blocks = ArrayVec<BlockOffset, { PIECE_SIZE * PIECE_SIZE }>;

const X: bool = true;
const O: bool = false;

/// Catalog in identity order: (name, North layout)
const CATALOG: [(&str, Layout); PIECE_COUNT as usize] = [
    ("Line", [[O, O, O], [X, X, X], [O, O, O]]),
    ("C", [[O, O, O], [X, X, X], [X, O, X]]),
    ("Plus", [[O, X, O], [X, X, X], [O, X, O]]),
    ("Dot", [[O, O, O], [O, X, O], [O, O, O]]),
    ("Square", [[X, X, O], [X, X, O], [O, O, O]]),
    ("L", [[O, O, O], [X, X, X], [O, O, X]]),
    ("J", [[O, O, X], [X, X, X], [O, O, O]]),
    ("S", [[O, O, O], [O, X, X], [X, X, O]]),
    ("Z", [[X, X, O], [O, X, X], [O, O, O]]),
    ("T", [[X, O, O], [X, X, O], [X, O, O]]),
    ("X", [[X, O, X], [O, X, O], [X, O, X]]),
    ("Corner", [[O, O, O], [X, X, O], [X, O, O]]),
    ("Inverse Corner", [[X, O, O], [X, X, O], [O, O, O]]),
    ("Diagonal", [[X, O, O], [O, X, O], [O, O, X]]),
    ("Double", [[O, X, O], [O, X, O], [O, O, O]]),
];

/// Rotate a layout one quarter turn clockwise
pub fn rotate_cw(layout: &Layout) -> Layout {
    let mut out = [[false; PIECE_SIZE]; PIECE_SIZE];
    for (y, row) in out.iter_mut().enumerate() {
        for (x, cell) in row.iter_mut().enumerate() {
            *cell = layout[PIECE_SIZE - 1 - x][y];
        }
    }
    out
}

/// Get the layout of a piece in the given orientation
pub fn get_layout(id: PieceId, rotation: Rotation) -> Layout {
    let mut layout = CATALOG[id.index() as usize].1;
    for _ in 0..rotation.quarter_turns() {
        layout = rotate_cw(&layout);
    }
    layout
}

/// Catalog name of a piece
pub fn piece_name(id: PieceId) -> &'static str {
    CATALOG[id.index() as usize].0
}

/// A catalog piece in a particular orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GamePiece {
    id: PieceId,
    rotation: Rotation,
    layout: Layout,
}

impl GamePiece {
    /// Create a piece in its catalog orientation
    pub fn new(id: PieceId) -> Self {
        Self::with_rotation(id, Rotation::North)
    }

    pub fn with_rotation(id: PieceId, rotation: Rotation) -> Self {
        Self {
            id,
            rotation,
            layout: get_layout(id, rotation),
        }
    }

    pub fn id(&self) -> PieceId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        piece_name(self.id)
    }

    /// Value written into grid cells when this piece is placed
    pub fn value(&self) -> CellValue {
        self.id.value()
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Side length of the layout
    pub fn size(&self) -> usize {
        PIECE_SIZE
    }

    /// Return this piece turned by `turns` clockwise quarter turns (negative = counter-clockwise)
    pub fn rotated(&self, turns: i32) -> Self {
        let steps = turns.rem_euclid(4);
        let mut layout = self.layout;
        for _ in 0..steps {
            layout = rotate_cw(&layout);
        }
        Self {
            id: self.id,
            rotation: self.rotation.turned(turns),
            layout,
        }
    }

    /// Offsets of all occupied blocks, row by row
    pub fn blocks(&self) -> Blocks {
        let mut out = Blocks::new();
        for (by, row) in self.layout.iter().enumerate() {
            for (bx, &filled) in row.iter().enumerate() {
                if filled {
                    out.push((bx, by));
                }
            }
        }
        out
    }

    pub fn block_count(&self) -> usize {
        self.layout.iter().flatten().filter(|&&b| b).count()
    }
}

impl fmt::Display for GamePiece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.rotation.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u8) -> PieceId {
        PieceId::new(n).unwrap()
    }

    #[test]
    fn test_catalog_names_are_unique() {
        let mut names: Vec<_> = PieceId::all().map(piece_name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), PIECE_COUNT as usize);
    }

    #[test]
    fn test_every_piece_has_blocks() {
        for pid in PieceId::all() {
            let piece = GamePiece::new(pid);
            assert!(piece.block_count() > 0, "{} has no blocks", piece);
            assert_eq!(piece.blocks().len(), piece.block_count());
        }
    }

    #[test]
    fn test_rotate_line_becomes_vertical() {
        let line = GamePiece::new(id(0));
        let turned = line.rotated(1);
        assert_eq!(turned.layout(), &[[O, X, O], [O, X, O], [O, X, O]]);
        assert_eq!(turned.rotation(), Rotation::East);
    }

    #[test]
    fn test_rotate_corner_clockwise() {
        // Corner: middle-left, middle-centre, bottom-left
        let corner = GamePiece::new(id(11));
        let turned = corner.rotated(1);
        assert_eq!(turned.layout(), &[[X, X, O], [O, X, O], [O, O, O]]);
    }

    #[test]
    fn test_rotation_does_not_mutate_original() {
        let piece = GamePiece::new(id(5));
        let before = *piece.layout();
        let _ = piece.rotated(1);
        assert_eq!(piece.layout(), &before);
    }

    #[test]
    fn test_negative_rotation_matches_positive_complement() {
        for pid in PieceId::all() {
            let piece = GamePiece::new(pid);
            assert_eq!(piece.rotated(-1), piece.rotated(3));
        }
    }
}
