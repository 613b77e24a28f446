//! Game configuration
//!
//! Defaults match the classic 5x5 TetrECS board. Every field can be overridden
//! from the environment:
//!
//! - `TETRECS_COLS` / `TETRECS_ROWS`: board size
//! - `TETRECS_LIVES`: starting lives
//! - `TETRECS_PIECE_BUFFER`: piece requests sent before a multiplayer game starts
//! - `TETRECS_SEED`: RNG seed for single-player piece generation

use serde::{Deserialize, Serialize};

use crate::types::{DEFAULT_COLS, DEFAULT_LIVES, DEFAULT_PIECE_BUFFER, DEFAULT_ROWS};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub cols: usize,
    pub rows: usize,
    pub lives: u32,
    pub piece_buffer: usize,
    pub seed: Option<u32>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            cols: DEFAULT_COLS,
            rows: DEFAULT_ROWS,
            lives: DEFAULT_LIVES,
            piece_buffer: DEFAULT_PIECE_BUFFER,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create from environment variables, falling back to defaults for anything unset or unparsable
    pub fn from_env() -> Self {
        use std::env;

        fn parse<T: std::str::FromStr>(key: &str) -> Option<T> {
            env::var(key).ok().and_then(|s| s.trim().parse().ok())
        }

        let defaults = Self::default();
        Self {
            cols: parse::<usize>("TETRECS_COLS")
                .filter(|&c| c > 0)
                .unwrap_or(defaults.cols),
            rows: parse::<usize>("TETRECS_ROWS")
                .filter(|&r| r > 0)
                .unwrap_or(defaults.rows),
            lives: parse("TETRECS_LIVES").unwrap_or(defaults.lives),
            piece_buffer: parse::<usize>("TETRECS_PIECE_BUFFER")
                .filter(|&n| n >= 2)
                .unwrap_or(defaults.piece_buffer),
            seed: parse("TETRECS_SEED"),
        }
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_lives(mut self, lives: u32) -> Self {
        self.lives = lives;
        self
    }

    pub fn with_size(mut self, cols: usize, rows: usize) -> Self {
        self.cols = cols;
        self.rows = rows;
        self
    }
}
