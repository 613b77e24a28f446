//! Scoring module - score, level, lives and multiplier rules
//!
//! A clearing turn scores `lines * blocks * 10 * multiplier`, where `blocks` is
//! the number of distinct cleared cells. The multiplier grows by one for each
//! consecutive clearing turn and falls back to 1 on a miss or a lost life.
//! Level is always `score / 1000`.

use crate::types::{DEFAULT_LIVES, POINTS_PER_BLOCK, POINTS_PER_LEVEL};

/// Points earned by one turn
pub fn score_delta(lines: u32, blocks: u32, multiplier: u32) -> u32 {
    lines
        .saturating_mul(blocks)
        .saturating_mul(POINTS_PER_BLOCK)
        .saturating_mul(multiplier)
}

/// Multiplier after a turn that cleared `lines` lines
pub fn next_multiplier(multiplier: u32, lines: u32) -> u32 {
    if lines > 0 {
        multiplier + 1
    } else {
        1
    }
}

/// Level management
/// Level increases every 1000 points
pub fn level_for_score(score: u32) -> u32 {
    score / POINTS_PER_LEVEL
}

/// The four counters of a running game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScoreState {
    score: u32,
    level: u32,
    lives: u32,
    multiplier: u32,
}

impl ScoreState {
    pub fn new(lives: u32) -> Self {
        Self {
            score: 0,
            level: 0,
            lives,
            multiplier: 1,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn multiplier(&self) -> u32 {
        self.multiplier
    }

    /// Add the points for a clear at the current multiplier; returns the points added
    pub fn apply_clear(&mut self, lines: u32, blocks: u32) -> u32 {
        let delta = score_delta(lines, blocks, self.multiplier);
        self.score = self.score.saturating_add(delta);
        delta
    }

    pub fn update_multiplier(&mut self, lines: u32) {
        self.multiplier = next_multiplier(self.multiplier, lines);
    }

    pub fn update_level(&mut self) {
        self.level = level_for_score(self.score);
    }

    /// Full end-of-turn bookkeeping: score, then multiplier, then level
    pub fn record_turn(&mut self, lines: u32, blocks: u32) -> u32 {
        let delta = self.apply_clear(lines, blocks);
        self.update_multiplier(lines);
        self.update_level();
        delta
    }

    /// Spend a life and reset the multiplier
    ///
    /// Returns false (and changes nothing) when no lives are left.
    pub fn lose_life(&mut self) -> bool {
        if self.lives == 0 {
            return false;
        }
        self.lives -= 1;
        self.multiplier = 1;
        true
    }
}

impl Default for ScoreState {
    fn default() -> Self {
        Self::new(DEFAULT_LIVES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_delta() {
        assert_eq!(score_delta(0, 0, 1), 0);
        assert_eq!(score_delta(1, 5, 1), 50);
        assert_eq!(score_delta(2, 9, 1), 180);
        assert_eq!(score_delta(2, 9, 3), 540);
    }

    #[test]
    fn test_multiplier_sequence() {
        assert_eq!(next_multiplier(1, 1), 2);
        assert_eq!(next_multiplier(2, 3), 3);
        assert_eq!(next_multiplier(7, 0), 1);
    }

    #[test]
    fn test_level_calculation() {
        assert_eq!(level_for_score(0), 0);
        assert_eq!(level_for_score(999), 0);
        assert_eq!(level_for_score(1000), 1);
        assert_eq!(level_for_score(25_430), 25);
    }

    #[test]
    fn test_record_turn_uses_multiplier_before_bump() {
        let mut s = ScoreState::new(3);
        assert_eq!(s.record_turn(1, 5), 50);
        assert_eq!(s.multiplier(), 2);
        assert_eq!(s.record_turn(1, 5), 100);
        assert_eq!(s.multiplier(), 3);
        assert_eq!(s.score(), 150);
        assert_eq!(s.record_turn(0, 0), 0);
        assert_eq!(s.multiplier(), 1);
    }

    #[test]
    fn test_level_tracks_score() {
        let mut s = ScoreState::new(3);
        s.record_turn(2, 9);
        s.record_turn(2, 9);
        s.record_turn(2, 9);
        // 180 + 360 + 540
        assert_eq!(s.score(), 1080);
        assert_eq!(s.level(), 1);
    }

    #[test]
    fn test_lose_life_resets_multiplier_and_stops_at_zero() {
        let mut s = ScoreState::new(1);
        s.record_turn(1, 5);
        assert_eq!(s.multiplier(), 2);
        assert!(s.lose_life());
        assert_eq!(s.lives(), 0);
        assert_eq!(s.multiplier(), 1);
        assert!(!s.lose_life());
        assert_eq!(s.lives(), 0);
    }
}
