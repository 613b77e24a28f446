//! Greedy autoplayer.
//!
//! Tries every rotation and anchor of the current piece (and of the following
//! piece, as if swapped) on a copy of the board and picks the move that scores
//! the most. Ties go to the placement touching the most filled cells and board
//! edges, which keeps the board compact.

use crate::core::{score_delta, GamePiece, Grid};
use crate::engine::{GameSnapshot, PieceView};

/// A move for the current turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    /// Swap current and following before rotating
    pub swap: bool,
    /// Clockwise quarter turns to apply to the piece
    pub turns: i32,
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Rating {
    points: u32,
    contact: u32,
}

/// Best move for the position, or None if neither piece fits anywhere.
pub fn choose_move(snapshot: &GameSnapshot) -> Option<Move> {
    if !snapshot.playable() {
        return None;
    }
    let grid = Grid::from_cells(snapshot.cols, snapshot.rows, snapshot.cells.clone())?;

    let mut best: Option<(Rating, Move)> = None;
    let candidates = [(false, snapshot.current), (true, snapshot.following)];
    for (swap, view) in candidates {
        let Some(view) = view else {
            continue;
        };
        let piece = piece_from_view(&view);
        for turns in 0..4 {
            let rotated = piece.rotated(turns);
            for y in 0..grid.rows() as i32 {
                for x in 0..grid.cols() as i32 {
                    let Some(rating) = rate(&grid, &rotated, x, y, snapshot.multiplier) else {
                        continue;
                    };
                    // Swapping costs nothing, but prefer the current piece on a tie.
                    if best.map_or(true, |(b, _)| rating > b) {
                        best = Some((rating, Move { swap, turns, x, y }));
                    }
                }
            }
        }
    }
    best.map(|(_, mv)| mv)
}

fn piece_from_view(view: &PieceView) -> GamePiece {
    GamePiece::with_rotation(view.id, view.rotation)
}

fn rate(grid: &Grid, piece: &GamePiece, x: i32, y: i32, multiplier: u32) -> Option<Rating> {
    if !grid.can_place(piece, x, y) {
        return None;
    }
    let mut trial = grid.clone();
    trial.place(piece, x, y);
    let clear = trial.find_completed_lines();
    let points = score_delta(clear.lines, clear.block_count(), multiplier);

    let half = (piece.size() / 2) as i32;
    let mut contact = 0;
    for (bx, by) in piece.blocks() {
        let cx = x + bx as i32 - half;
        let cy = y + by as i32 - half;
        for (dx, dy) in [(-1, 0), (1, 0), (0, -1), (0, 1)] {
            // Edges count as contact, other blocks of this piece do not.
            match grid.get(cx + dx, cy + dy) {
                None => contact += 1,
                Some(v) if v != 0 => contact += 1,
                Some(_) => {}
            }
        }
    }

    Some(Rating { points, contact })
}
