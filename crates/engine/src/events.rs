//! Events published by a running game
//!
//! The engine never draws, plays sounds or talks to widgets. It publishes
//! [`GameEvent`]s to a single [`EventSink`] and lets the outside world react.

use std::sync::mpsc;

use serde::Serialize;

use crate::core::GamePiece;
use crate::types::{ChatMessage, Coord, Cue, LeaderboardEntry, PieceId, Rotation};

/// Serializable view of a piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PieceView {
    pub id: PieceId,
    pub name: &'static str,
    pub value: u8,
    pub rotation: Rotation,
}

impl From<&GamePiece> for PieceView {
    fn from(piece: &GamePiece) -> Self {
        Self {
            id: piece.id(),
            name: piece.name(),
            value: piece.value(),
            rotation: piece.rotation(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    /// Current or following piece changed (spawn, rotate, swap)
    PieceChanged {
        current: Option<PieceView>,
        following: Option<PieceView>,
    },
    /// Cells emptied by completed lines
    LinesCleared { lines: u32, cells: Vec<Coord> },
    /// A new turn countdown began
    TurnStarted { delay_ms: u32 },
    ScoreChanged {
        score: u32,
        level: u32,
        multiplier: u32,
    },
    LivesChanged { lives: u32 },
    /// Lives exhausted; published exactly once per game
    GameEnded { score: u32 },
    /// Something worth a sound or an animation
    Cue { cue: Cue },
    ChatReceived { message: ChatMessage },
    LeaderboardUpdated { entries: Vec<LeaderboardEntry> },
}

/// Receiver of game events
pub trait EventSink {
    fn publish(&mut self, event: GameEvent);
}

/// Discard everything
impl EventSink for () {
    fn publish(&mut self, _event: GameEvent) {}
}

/// Collect events in order (tests, replays)
impl EventSink for Vec<GameEvent> {
    fn publish(&mut self, event: GameEvent) {
        self.push(event);
    }
}

/// Forward to another thread; a hung-up receiver is ignored
impl EventSink for mpsc::Sender<GameEvent> {
    fn publish(&mut self, event: GameEvent) {
        let _ = self.send(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn publish(&mut self, event: GameEvent) {
        (**self).publish(event);
    }
}
