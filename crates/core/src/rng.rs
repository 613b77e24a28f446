//! RNG module - seeded piece generation
//!
//! Single-player pieces are drawn uniformly from the catalog with a small LCG,
//! so a seed reproduces the whole piece sequence (handy for tests and replays).

use crate::types::{PieceId, PIECE_COUNT};

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Uses the high bits; the low bits of a power-of-two LCG cycle quickly.
    pub fn next_range(&mut self, max: u32) -> u32 {
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Draw a piece identity, every piece equally likely
    pub fn next_piece(&mut self) -> PieceId {
        let n = self.next_range(PIECE_COUNT as u32) as u8;
        // next_range keeps n below PIECE_COUNT
        PieceId::new(n).unwrap_or_else(|| unreachable!("piece index {} out of range", n))
    }

    /// Current RNG state (for restarting a game with the same sequence)
    pub fn seed(&self) -> u32 {
        self.state
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}
