//! Game module - the turn cycle
//!
//! [`Game`] ties the grid, the counters, the turn timer and a piece source
//! together:
//!
//! ```text
//! Initializing --start()--> Playing --(timer expires with 0 lives)--> GameOver
//! ```
//!
//! While playing, each turn ends in exactly one of two ways:
//!
//! - **placement**: the current piece fits, is stamped onto the grid, full
//!   lines are scored and cleared, and the timer restarts;
//! - **expiry**: the timer runs out, a life is lost and the current piece is
//!   thrown away.
//!
//! The engine is single-owner and synchronous. Drivers feed it timer ticks with
//! [`Game::tick_timer`] from the same thread (or task) that calls
//! [`Game::place_piece`], so the two paths never overlap.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::config::GameConfig;
use crate::core::{turn_delay_ms, GamePiece, Grid, ScoreState, TimerTick, TurnTimer};
use crate::events::{EventSink, GameEvent, PieceView};
use crate::source::{NetworkSink, PieceSource, RandomPieces};
use crate::types::{Cue, GamePhase};

/// Why a placement attempt changed nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    NotPlaying,
    NoPiece,
    DoesNotFit,
}

impl RejectReason {
    pub fn code(self) -> &'static str {
        match self {
            RejectReason::NotPlaying => "not_playing",
            RejectReason::NoPiece => "no_piece",
            RejectReason::DoesNotFit => "does_not_fit",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            RejectReason::NotPlaying => "game is not in progress",
            RejectReason::NoPiece => "no current piece yet",
            RejectReason::DoesNotFit => "piece is blocked or out of bounds there",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// What a successful placement scored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TurnReport {
    pub lines: u32,
    pub blocks: u32,
    pub points: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Placed(TurnReport),
    Rejected(RejectReason),
}

impl Placement {
    pub fn is_placed(&self) -> bool {
        matches!(self, Placement::Placed(_))
    }
}

/// Outcome of a turn running out of time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    LifeLost { lives: u32 },
    GameOver { score: u32 },
}

/// Serializable picture of the whole game
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    pub phase: GamePhase,
    pub cols: usize,
    pub rows: usize,
    /// Row-major cell values
    pub cells: Vec<u8>,
    pub current: Option<PieceView>,
    pub following: Option<PieceView>,
    pub score: u32,
    pub level: u32,
    pub lives: u32,
    pub multiplier: u32,
    pub time_left_ms: u32,
    pub turn_ms: u32,
}

impl GameSnapshot {
    pub fn playable(&self) -> bool {
        self.phase == GamePhase::Playing
    }
}

/// A game, generic over where pieces come from, who mirrors the board and who hears events
pub struct Game<S, N = (), E = ()> {
    config: GameConfig,
    grid: Grid,
    stats: ScoreState,
    timer: TurnTimer,
    phase: GamePhase,
    current: Option<GamePiece>,
    following: Option<GamePiece>,
    source: S,
    network: N,
    events: E,
}

/// Local game with random pieces and nobody watching over the network
pub type SinglePlayerGame<E = ()> = Game<RandomPieces, (), E>;

impl<E: EventSink> Game<RandomPieces, (), E> {
    /// Single-player game; uses the configured seed or one from the clock
    pub fn single_player(config: GameConfig, events: E) -> Self {
        let seed = config.seed.unwrap_or_else(seed_from_clock);
        Self::new(config, RandomPieces::new(seed), (), events)
    }
}

fn seed_from_clock() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1)
}

impl<S: PieceSource, N: NetworkSink, E: EventSink> Game<S, N, E> {
    pub fn new(config: GameConfig, source: S, network: N, events: E) -> Self {
        Self {
            grid: Grid::new(config.cols, config.rows),
            stats: ScoreState::new(config.lives),
            timer: TurnTimer::new(),
            phase: GamePhase::Initializing,
            current: None,
            following: None,
            config,
            source,
            network,
            events,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn stats(&self) -> &ScoreState {
        &self.stats
    }

    pub fn score(&self) -> u32 {
        self.stats.score()
    }

    pub fn level(&self) -> u32 {
        self.stats.level()
    }

    pub fn lives(&self) -> u32 {
        self.stats.lives()
    }

    pub fn multiplier(&self) -> u32 {
        self.stats.multiplier()
    }

    pub fn current(&self) -> Option<&GamePiece> {
        self.current.as_ref()
    }

    pub fn following(&self) -> Option<&GamePiece> {
        self.following.as_ref()
    }

    pub fn timer(&self) -> &TurnTimer {
        &self.timer
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn network_mut(&mut self) -> &mut N {
        &mut self.network
    }

    pub fn events_mut(&mut self) -> &mut E {
        &mut self.events
    }

    /// Turn length at the current level
    pub fn turn_delay_ms(&self) -> u32 {
        turn_delay_ms(self.stats.level())
    }

    /// Deal the first pieces and start the first turn
    pub fn start(&mut self) {
        if self.phase != GamePhase::Initializing {
            return;
        }
        log::info!(
            "starting {}x{} game with {} lives",
            self.grid.cols(),
            self.grid.rows(),
            self.stats.lives()
        );

        self.following = self.draw();
        self.advance_piece();
        self.phase = GamePhase::Playing;
        self.start_turn();
    }

    /// Try to place the current piece centred on `(x, y)`
    ///
    /// A piece that does not fit changes nothing.
    pub fn place_piece(&mut self, x: i32, y: i32) -> Placement {
        if self.phase != GamePhase::Playing {
            // Peers still see the (empty) board while the first pieces arrive.
            if self.phase == GamePhase::Initializing {
                self.network.board_changed(&self.grid);
            }
            return Placement::Rejected(RejectReason::NotPlaying);
        }

        let Some(piece) = self.current else {
            self.network.board_changed(&self.grid);
            return Placement::Rejected(RejectReason::NoPiece);
        };

        if !self.grid.can_place(&piece, x, y) {
            log::debug!("cannot place {} at ({}, {})", piece, x, y);
            self.events.publish(GameEvent::Cue { cue: Cue::Rejected });
            self.network.board_changed(&self.grid);
            return Placement::Rejected(RejectReason::DoesNotFit);
        }

        log::debug!("placing {} at ({}, {})", piece, x, y);
        self.grid.place(&piece, x, y);

        let delay = self.turn_delay_ms();
        self.timer.restart(delay);
        self.events.publish(GameEvent::TurnStarted { delay_ms: delay });
        self.events.publish(GameEvent::Cue { cue: Cue::Placed });

        let report = self.after_piece();
        self.advance_piece();
        self.network.board_changed(&self.grid);

        Placement::Placed(report)
    }

    /// Score, clear and update counters after a placement
    fn after_piece(&mut self) -> TurnReport {
        let clear = self.grid.find_completed_lines();
        let blocks = clear.block_count();
        log::debug!("{} lines and {} blocks to clear", clear.lines, blocks);

        let points = self.stats.apply_clear(clear.lines, blocks);
        self.grid.clear(&clear.cells);

        if !clear.is_empty() {
            self.events.publish(GameEvent::LinesCleared {
                lines: clear.lines,
                cells: clear.cells.iter().copied().collect(),
            });
            self.events.publish(GameEvent::Cue { cue: Cue::Cleared });
            self.network.score_changed(self.stats.score());
        }

        self.stats.update_multiplier(clear.lines);
        self.stats.update_level();
        self.publish_score();

        TurnReport {
            lines: clear.lines,
            blocks,
            points,
        }
    }

    /// Promote the following piece and draw a new one
    pub fn advance_piece(&mut self) {
        self.current = self.following.take();
        self.following = self.draw();
        if let (Some(current), Some(following)) = (&self.current, &self.following) {
            log::debug!("current piece {}, following {}", current, following);
        }
        self.publish_pieces();
    }

    /// Fill empty piece slots from the source after it ran dry
    ///
    /// Returns true if any slot was filled.
    pub fn resupply(&mut self) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }

        let mut changed = false;
        while self.current.is_none() || self.following.is_none() {
            let Some(id) = self.source.next_piece() else {
                break;
            };
            let piece = GamePiece::new(id);
            if self.current.is_none() {
                self.current = self.following.take();
            }
            if self.current.is_none() {
                self.current = Some(piece);
            } else {
                self.following = Some(piece);
            }
            changed = true;
        }

        if changed {
            self.publish_pieces();
        }
        changed
    }

    /// Rotate the current piece by `turns` clockwise quarter turns
    pub fn rotate_piece(&mut self, turns: i32) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        let Some(piece) = self.current.as_mut() else {
            return false;
        };
        *piece = piece.rotated(turns);
        self.events.publish(GameEvent::Cue { cue: Cue::Rotated });
        self.publish_pieces();
        true
    }

    /// Exchange the current and following pieces
    pub fn swap_pieces(&mut self) -> bool {
        if self.phase != GamePhase::Playing || self.current.is_none() || self.following.is_none() {
            return false;
        }
        std::mem::swap(&mut self.current, &mut self.following);
        self.events.publish(GameEvent::Cue { cue: Cue::Swapped });
        self.publish_pieces();
        true
    }

    /// Advance the turn timer by one tick, handling expiry
    pub fn tick_timer(&mut self) -> Option<Expiry> {
        if self.phase != GamePhase::Playing {
            return None;
        }
        match self.timer.tick() {
            TimerTick::Expired => self.expire_turn(),
            TimerTick::Running { .. } | TimerTick::Idle => None,
        }
    }

    /// The turn ran out: lose a life and the current piece, or end the game
    pub fn expire_turn(&mut self) -> Option<Expiry> {
        if self.phase != GamePhase::Playing {
            return None;
        }

        if self.stats.lives() == 0 {
            let score = self.stats.score();
            log::info!("out of lives, game over with score {}", score);
            self.timer.cancel();
            self.phase = GamePhase::GameOver;
            self.network.died();
            self.events.publish(GameEvent::Cue { cue: Cue::GameOver });
            self.events.publish(GameEvent::GameEnded { score });
            return Some(Expiry::GameOver { score });
        }

        self.stats.lose_life();
        let lives = self.stats.lives();
        log::info!("ran out of time, {} lives left", lives);
        self.events.publish(GameEvent::Cue { cue: Cue::LifeLost });
        self.events.publish(GameEvent::LivesChanged { lives });
        self.publish_score();
        self.network.lives_changed(lives);

        self.advance_piece();
        self.start_turn();
        Some(Expiry::LifeLost { lives })
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            phase: self.phase,
            cols: self.grid.cols(),
            rows: self.grid.rows(),
            cells: self.grid.cells().to_vec(),
            current: self.current.as_ref().map(PieceView::from),
            following: self.following.as_ref().map(PieceView::from),
            score: self.stats.score(),
            level: self.stats.level(),
            lives: self.stats.lives(),
            multiplier: self.stats.multiplier(),
            time_left_ms: self.timer.time_left_ms(),
            turn_ms: self.timer.delay_ms(),
        }
    }

    fn start_turn(&mut self) {
        let delay = self.turn_delay_ms();
        self.timer.start(delay);
        self.events.publish(GameEvent::TurnStarted { delay_ms: delay });
    }

    fn draw(&mut self) -> Option<GamePiece> {
        let piece = self.source.next_piece().map(GamePiece::new);
        if piece.is_none() {
            log::warn!("piece source ran dry; waiting for more pieces");
        }
        piece
    }

    fn publish_pieces(&mut self) {
        self.events.publish(GameEvent::PieceChanged {
            current: self.current.as_ref().map(PieceView::from),
            following: self.following.as_ref().map(PieceView::from),
        });
    }

    fn publish_score(&mut self) {
        self.events.publish(GameEvent::ScoreChanged {
            score: self.stats.score(),
            level: self.stats.level(),
            multiplier: self.stats.multiplier(),
        });
    }
}
