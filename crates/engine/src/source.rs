//! Strategy seams of the engine
//!
//! - [`PieceSource`]: where the next piece identity comes from (local RNG or a remote queue)
//! - [`NetworkSink`]: who hears about board, score and lives changes (nobody, or a peer)

use crate::core::{Grid, SimpleRng};
use crate::types::PieceId;

/// Supplier of piece identities
pub trait PieceSource {
    /// Take the next identity, or None if none is available right now
    fn next_piece(&mut self) -> Option<PieceId>;
}

/// Uniformly random pieces from a seeded RNG
#[derive(Debug, Clone)]
pub struct RandomPieces {
    rng: SimpleRng,
}

impl RandomPieces {
    pub fn new(seed: u32) -> Self {
        Self {
            rng: SimpleRng::new(seed),
        }
    }

    pub fn seed(&self) -> u32 {
        self.rng.seed()
    }
}

impl PieceSource for RandomPieces {
    fn next_piece(&mut self) -> Option<PieceId> {
        Some(self.rng.next_piece())
    }
}

/// Fixed sequence of pieces; runs dry at the end
impl PieceSource for std::collections::VecDeque<PieceId> {
    fn next_piece(&mut self) -> Option<PieceId> {
        self.pop_front()
    }
}

/// Outward mirror of the local game state
///
/// All methods default to doing nothing, which is what single-player uses.
pub trait NetworkSink {
    /// Called after every placement attempt, successful or not
    fn board_changed(&mut self, _grid: &Grid) {}

    /// Called after a turn that cleared at least one line
    fn score_changed(&mut self, _score: u32) {}

    /// Called after a life was lost to the timer
    fn lives_changed(&mut self, _lives: u32) {}

    /// Called once when the game is lost, before the game-ended event
    fn died(&mut self) {}
}

impl NetworkSink for () {}
