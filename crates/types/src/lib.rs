//! Shared types module - plain data structures and constants
//!
//! Everything in here is pure data: no game rules, no I/O. The core rules, the
//! engine, the network adapter and the binary all speak these types.
//!
//! # Grid Dimensions
//!
//! The default TetrECS board is a 5x5 square:
//!
//! - **Columns**: 5 (indexed 0-4, left to right)
//! - **Rows**: 5 (indexed 0-4, top to bottom)
//!
//! Both are configurable per game; the grid never resizes once created.
//!
//! # Turn Timing
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TIMER_TICK_MS` | 500 | Countdown granularity |
//! | `BASE_TURN_MS` | 12000 | Turn length at level 0 |
//! | `TURN_STEP_MS` | 500 | Turn shortening per level |
//! | `MIN_TURN_MS` | 2500 | Turn length floor (level 20+) |
//!
//! # Examples
//!
//! ```
//! use tetrecs_types::{PieceId, Rotation, PIECE_COUNT};
//!
//! let id = PieceId::new(3).unwrap();
//! assert_eq!(id.value(), 4);
//! assert!(PieceId::new(PIECE_COUNT).is_none());
//!
//! assert_eq!(Rotation::North.turned(5), Rotation::East);
//! assert_eq!(Rotation::North.turned(-1), Rotation::West);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default number of grid columns
pub const DEFAULT_COLS: usize = 5;

/// Default number of grid rows
pub const DEFAULT_ROWS: usize = 5;

/// Lives at the start of a game
pub const DEFAULT_LIVES: u32 = 3;

/// Piece identities requested up front in multiplayer
pub const DEFAULT_PIECE_BUFFER: usize = 6;

/// Countdown tick interval (ms)
pub const TIMER_TICK_MS: u32 = 500;

/// Turn length at level 0 (ms)
pub const BASE_TURN_MS: u32 = 12_000;

/// Turn length lost per level (ms)
pub const TURN_STEP_MS: u32 = 500;

/// Shortest possible turn (ms)
pub const MIN_TURN_MS: u32 = 2_500;

/// Last level that still shortens the turn
pub const LAST_SPEEDUP_LEVEL: u32 = 19;

/// Points per cleared block, before line count and multiplier
pub const POINTS_PER_BLOCK: u32 = 10;

/// Score needed per level
pub const POINTS_PER_LEVEL: u32 = 1_000;

/// Number of distinct pieces in the catalog
pub const PIECE_COUNT: u8 = 15;

/// Side length of every piece layout
pub const PIECE_SIZE: usize = 3;

/// Cell value of an empty grid cell
pub const EMPTY: CellValue = 0;

/// A grid cell: 0 is empty, 1..=PIECE_COUNT is the value of the piece that filled it
pub type CellValue = u8;

/// Identity of a catalog piece, always in `0..PIECE_COUNT`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct PieceId(u8);

impl PieceId {
    /// Returns None for identities outside the catalog
    pub fn new(id: u8) -> Option<Self> {
        (id < PIECE_COUNT).then_some(Self(id))
    }

    pub fn index(self) -> u8 {
        self.0
    }

    /// Value stamped onto the grid by this piece
    pub fn value(self) -> CellValue {
        self.0 + 1
    }

    /// Every identity in catalog order
    pub fn all() -> impl Iterator<Item = PieceId> {
        (0..PIECE_COUNT).map(PieceId)
    }
}

impl TryFrom<u8> for PieceId {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        PieceId::new(value).ok_or_else(|| format!("piece id {} out of range", value))
    }
}

impl From<PieceId> for u8 {
    fn from(id: PieceId) -> Self {
        id.0
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Piece orientation (North = catalog orientation)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rotation {
    #[default]
    North,
    East,
    South,
    West,
}

impl Rotation {
    /// Rotate clockwise
    pub fn rotate_cw(&self) -> Self {
        match self {
            Rotation::North => Rotation::East,
            Rotation::East => Rotation::South,
            Rotation::South => Rotation::West,
            Rotation::West => Rotation::North,
        }
    }

    /// Rotate counter-clockwise
    pub fn rotate_ccw(&self) -> Self {
        match self {
            Rotation::North => Rotation::West,
            Rotation::West => Rotation::South,
            Rotation::South => Rotation::East,
            Rotation::East => Rotation::North,
        }
    }

    /// Clockwise quarter turns away from North (0..=3)
    pub fn quarter_turns(&self) -> u8 {
        match self {
            Rotation::North => 0,
            Rotation::East => 1,
            Rotation::South => 2,
            Rotation::West => 3,
        }
    }

    /// Apply `turns` clockwise quarter turns; negative turns rotate counter-clockwise.
    pub fn turned(&self, turns: i32) -> Self {
        let total = (self.quarter_turns() as i32 + turns.rem_euclid(4)) % 4;
        match total {
            0 => Rotation::North,
            1 => Rotation::East,
            2 => Rotation::South,
            _ => Rotation::West,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Rotation::North => "north",
            Rotation::East => "east",
            Rotation::South => "south",
            Rotation::West => "west",
        }
    }
}

/// Grid coordinate; x is the column, y the row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Engine lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    #[default]
    Initializing,
    Playing,
    GameOver,
}

/// Presentation cues published for whoever plays sounds or animations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    Placed,
    Rejected,
    Rotated,
    Swapped,
    Cleared,
    LifeLost,
    GameOver,
}

impl Cue {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cue::Placed => "place",
            Cue::Rejected => "cannotplace",
            Cue::Rotated => "rotate",
            Cue::Swapped => "swap",
            Cue::Cleared => "clear",
            Cue::LifeLost => "lifelose",
            Cue::GameOver => "explode",
        }
    }
}

/// One remote player on the multiplayer leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: u32,
    /// Remaining lives; a player reported as dead has 0
    pub lives: u32,
}

impl LeaderboardEntry {
    pub fn new(name: impl Into<String>, score: u32, lives: u32) -> Self {
        Self {
            name: name.into(),
            score,
            lives,
        }
    }
}

/// A `name:score` pair from the local score file or the online high score table
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u32,
}

impl ScoreEntry {
    pub fn new(name: impl Into<String>, score: u32) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }
}

impl fmt::Display for ScoreEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.score)
    }
}

/// Chat line relayed by the server
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: String,
    pub body: String,
}

impl fmt::Display for ChatMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.sender, self.body)
    }
}
