//! Core game rules - pure, deterministic, and testable
//!
//! Everything needed to judge a TetrECS move, with no networking, timers or I/O:
//!
//! - [`pieces`]: the 15-piece catalog and quarter-turn rotation
//! - [`grid`]: the board, placement checks and row/column clear detection
//! - [`scoring`]: score, level, lives and multiplier rules
//! - [`timer`]: the per-turn countdown state machine and its delay table
//! - [`rng`]: seeded uniform piece generation
//!
//! # Game Rules
//!
//! - A piece is placed by its centre cell anywhere it fits; nothing falls.
//! - After each placement every full row **and** every full column is emptied.
//! - A turn scores `lines * blocks * 10 * multiplier`.
//! - Each turn is timed; letting it run out costs a life and the current piece.
//!
//! # Example
//!
//! ```
//! use tetrecs_core::{GamePiece, Grid};
//! use tetrecs_core::types::PieceId;
//!
//! let mut grid = Grid::new(5, 5);
//! let line = GamePiece::new(PieceId::new(0).unwrap());
//!
//! assert!(grid.can_place(&line, 1, 0));
//! grid.place(&line, 1, 0);
//! assert!(grid.can_place(&line, 3, 0) == false);
//! assert!(grid.can_place(&line, 1, 1));
//! ```

pub mod grid;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod timer;

pub use tetrecs_types as types;

// Re-export commonly used types for convenience
pub use grid::{Grid, LineClear};
pub use pieces::{get_layout, GamePiece, Layout};
pub use rng::SimpleRng;
pub use scoring::{level_for_score, next_multiplier, score_delta, ScoreState};
pub use timer::{turn_delay_ms, TimerState, TimerTick, TurnTimer};
