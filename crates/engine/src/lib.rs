//! TetrECS engine - one game, its turn cycle and its outward seams
//!
//! The engine is generic over three strategies:
//!
//! - [`PieceSource`]: local RNG or a queue fed by the server
//! - [`NetworkSink`]: nothing, or a peer link mirroring board, score and lives
//! - [`EventSink`]: whoever renders, plays sounds or records the game
//!
//! ```
//! use tetrecs_engine::{Game, GameConfig, GameEvent};
//!
//! let mut events: Vec<GameEvent> = Vec::new();
//! let mut game = Game::single_player(GameConfig::default().with_seed(7), &mut events);
//! game.start();
//! assert!(game.current().is_some());
//! ```

pub mod config;
pub mod events;
pub mod game;
pub mod source;

pub use tetrecs_core as core;
pub use tetrecs_types as types;

pub use config::GameConfig;
pub use events::{EventSink, GameEvent, PieceView};
pub use game::{
    Expiry, Game, GameSnapshot, Placement, RejectReason, SinglePlayerGame, TurnReport,
};
pub use source::{NetworkSink, PieceSource, RandomPieces};
