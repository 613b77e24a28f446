//! Grid tests - placement, line detection and clearing

use std::collections::BTreeSet;

use tetrecs::core::{GamePiece, Grid};
use tetrecs::types::{Coord, PieceId, Rotation, DEFAULT_COLS, DEFAULT_ROWS};

fn piece(id: u8) -> GamePiece {
    GamePiece::new(PieceId::new(id).unwrap())
}

fn filled(grid: &Grid) -> usize {
    grid.cells().iter().filter(|&&c| c != 0).count()
}

#[test]
fn test_grid_new_empty() {
    let grid = Grid::new(DEFAULT_COLS, DEFAULT_ROWS);
    assert_eq!(grid.cols(), 5);
    assert_eq!(grid.rows(), 5);
    for y in 0..5 {
        for x in 0..5 {
            assert_eq!(grid.get(x, y), Some(0), "cell ({}, {}) should be empty", x, y);
        }
    }
}

#[test]
fn test_grid_get_out_of_bounds() {
    let grid = Grid::new(4, 3);
    assert_eq!(grid.get(-1, 0), None);
    assert_eq!(grid.get(0, -1), None);
    assert_eq!(grid.get(4, 0), None);
    assert_eq!(grid.get(0, 3), None);
    assert_eq!(grid.get(3, 2), Some(0));
}

#[test]
fn test_grid_set_out_of_bounds_is_ignored() {
    let mut grid = Grid::new(3, 3);
    assert!(!grid.set(3, 0, 1));
    assert!(!grid.set(-1, 2, 1));
    assert!(grid.is_empty());
    assert!(grid.set(2, 2, 7));
    assert_eq!(grid.get(2, 2), Some(7));
}

#[test]
fn test_non_square_grid_is_row_major() {
    let mut grid = Grid::new(4, 2);
    grid.set(3, 1, 9);
    assert_eq!(grid.cells()[7], 9);
    assert_eq!(grid.row(1), Some(&[0, 0, 0, 9][..]));
}

#[test]
fn test_place_uses_centre_anchor() {
    let mut grid = Grid::new(5, 5);
    let plus = piece(2);
    assert!(grid.can_place(&plus, 2, 2));
    grid.place(&plus, 2, 2);

    let expected = [(2, 1), (1, 2), (2, 2), (3, 2), (2, 3)];
    for (x, y) in expected {
        assert_eq!(grid.get(x, y), Some(plus.value()));
    }
    assert_eq!(filled(&grid), 5);
}

#[test]
fn test_can_place_rejects_overlap_and_edges() {
    let mut grid = Grid::new(5, 5);
    let plus = piece(2);
    assert!(!grid.can_place(&plus, 0, 2));
    assert!(!grid.can_place(&plus, 4, 2));
    assert!(!grid.can_place(&plus, 2, 0));

    grid.set(2, 3, 1);
    assert!(!grid.can_place(&plus, 2, 2));
    assert!(grid.can_place(&plus, 2, 1));
}

#[test]
fn test_empty_layout_cells_may_hang_off_the_board() {
    // The dot only occupies its centre, so it fits in every corner.
    let grid = Grid::new(5, 5);
    let dot = piece(3);
    for (x, y) in [(0, 0), (4, 0), (0, 4), (4, 4)] {
        assert!(grid.can_place(&dot, x, y));
    }
}

#[test]
fn test_full_row_and_column_count_separately() {
    let mut grid = Grid::new(5, 5);
    for i in 0..5 {
        grid.set(i, 2, 1);
        grid.set(2, i, 1);
    }
    let clear = grid.find_completed_lines();
    assert_eq!(clear.lines, 2);
    assert_eq!(clear.block_count(), 9);

    grid.clear(&clear.cells);
    assert!(grid.is_empty());
}

#[test]
fn test_clear_touches_only_listed_cells() {
    let mut grid = Grid::new(5, 5);
    for x in 0..5 {
        grid.set(x, 0, 2);
    }
    grid.set(1, 3, 5);
    let clear = grid.find_completed_lines();
    assert_eq!(clear.lines, 1);

    grid.clear(&clear.cells);
    assert_eq!(grid.get(1, 3), Some(5));
    assert_eq!(filled(&grid), 1);

    let none: BTreeSet<Coord> = BTreeSet::new();
    grid.clear(&none);
    assert_eq!(filled(&grid), 1);
}

#[test]
fn test_nothing_to_clear() {
    let mut grid = Grid::new(5, 5);
    grid.place(&piece(0), 2, 2);
    let clear = grid.find_completed_lines();
    assert!(clear.is_empty());
    assert_eq!(clear.lines, 0);
}

#[test]
fn test_rotated_piece_placement() {
    let mut grid = Grid::new(5, 5);
    let line = GamePiece::with_rotation(PieceId::new(0).unwrap(), Rotation::East);
    assert!(!grid.can_place(&line, 2, 0));
    assert!(grid.can_place(&line, 0, 1));
    grid.place(&line, 0, 1);
    assert_eq!(grid.get(0, 0), Some(1));
    assert_eq!(grid.get(0, 2), Some(1));
    assert_eq!(grid.get(1, 1), Some(0));
}

#[test]
fn test_from_cells_checks_length() {
    assert!(Grid::from_cells(2, 2, vec![0; 3]).is_none());
    let grid = Grid::from_cells(2, 2, vec![0, 1, 0, 0]).unwrap();
    assert_eq!(grid.get(1, 0), Some(1));
}
