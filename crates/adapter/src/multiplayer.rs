//! Multiplayer game - the engine driven by a server
//!
//! Differences from single-player:
//!
//! - piece identities come from the server, one `PIECE` request per piece
//!   consumed, after an initial buffer of requests;
//! - every placement attempt mirrors the board with `BOARD`, clearing turns
//!   send `SCORE`, expiries send `LIVES` and the last one sends `DIE`;
//! - `SCORES` frames replace the leaderboard, `MSG` frames go to chat.
//!
//! Requests are fire-and-forget and answers are matched in FIFO order. If the
//! queue is empty when a piece is needed, the slot stays empty (and placement
//! is rejected) until the next `PIECE` frame arrives.

use std::collections::VecDeque;

use crate::channel::MessageChannel;
use crate::engine::core::Grid;
use crate::engine::{
    EventSink, Expiry, Game, GameConfig, GameEvent, GameSnapshot, NetworkSink, PieceSource,
    Placement,
};
use crate::protocol::{parse_inbound, InboundMessage, OutboundMessage};
use crate::types::{GamePhase, LeaderboardEntry, PieceId};

/// Piece identities received from the server, consumed front first
#[derive(Debug, Clone)]
pub struct RemotePieces<C> {
    queue: VecDeque<PieceId>,
    channel: C,
    outstanding: usize,
}

impl<C: MessageChannel> RemotePieces<C> {
    pub fn new(channel: C) -> Self {
        Self {
            queue: VecDeque::new(),
            channel,
            outstanding: 0,
        }
    }

    /// Queue an identity that just arrived
    pub fn push(&mut self, id: PieceId) {
        self.queue.push_back(id);
        self.outstanding = self.outstanding.saturating_sub(1);
    }

    /// Send `count` piece requests
    pub fn request(&mut self, count: usize) {
        for _ in 0..count {
            self.channel.send(OutboundMessage::RequestPiece);
        }
        self.outstanding += count;
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Requests sent but not yet answered
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }
}

impl<C: MessageChannel> PieceSource for RemotePieces<C> {
    fn next_piece(&mut self) -> Option<PieceId> {
        let id = self.queue.pop_front()?;
        self.request(1);
        Some(id)
    }
}

/// Mirrors local board, score and lives to the server
#[derive(Debug, Clone)]
pub struct PeerLink<C> {
    channel: C,
}

impl<C: MessageChannel> PeerLink<C> {
    pub fn new(channel: C) -> Self {
        Self { channel }
    }
}

impl<C: MessageChannel> NetworkSink for PeerLink<C> {
    fn board_changed(&mut self, grid: &Grid) {
        self.channel.send(OutboundMessage::Board(grid.cells().to_vec()));
    }

    fn score_changed(&mut self, score: u32) {
        self.channel.send(OutboundMessage::Score(score));
    }

    fn lives_changed(&mut self, lives: u32) {
        self.channel.send(OutboundMessage::Lives(lives));
    }

    fn died(&mut self) {
        self.channel.send(OutboundMessage::Die);
    }
}

/// Latest leaderboard snapshot, in server order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// Replace the whole table
    pub fn replace(&mut self, entries: Vec<LeaderboardEntry>) {
        self.entries = entries;
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Players still alive
    pub fn alive(&self) -> impl Iterator<Item = &LeaderboardEntry> {
        self.entries.iter().filter(|e| e.lives > 0)
    }
}

pub type MultiplayerEngine<C, E> = Game<RemotePieces<C>, PeerLink<C>, E>;

pub struct MultiplayerGame<C, E = ()> {
    game: MultiplayerEngine<C, E>,
    channel: C,
    leaderboard: Leaderboard,
    began: bool,
}

impl<C: MessageChannel + Clone, E: EventSink> MultiplayerGame<C, E> {
    pub fn new(config: GameConfig, channel: C, events: E) -> Self {
        let game = Game::new(
            config,
            RemotePieces::new(channel.clone()),
            PeerLink::new(channel.clone()),
            events,
        );
        Self {
            game,
            channel,
            leaderboard: Leaderboard::default(),
            began: false,
        }
    }

    pub fn game(&self) -> &MultiplayerEngine<C, E> {
        &self.game
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    pub fn phase(&self) -> GamePhase {
        self.game.phase()
    }

    /// Ask for the leaderboard and the initial piece buffer
    ///
    /// Play starts once two identities have arrived.
    pub fn begin(&mut self) {
        if self.began {
            return;
        }
        self.began = true;

        let buffer = self.game.config().piece_buffer;
        log::info!("joining multiplayer game, requesting {} pieces", buffer);
        self.request_scores();
        self.game.source_mut().request(buffer);
        self.start_if_ready();
    }

    /// Decode and apply one frame from the server
    pub fn handle_line(&mut self, line: &str) {
        match parse_inbound(line) {
            Ok(Some(message)) => self.handle_message(message),
            Ok(None) => log::debug!("ignoring frame {:?}", line),
            Err(e) => log::warn!("dropping frame: {}", e),
        }
    }

    pub fn handle_message(&mut self, message: InboundMessage) {
        match message {
            InboundMessage::Piece(id) => {
                self.game.source_mut().push(id);
                log::debug!("queued piece {}, {} waiting", id, self.game.source().len());
                if self.game.phase() == GamePhase::Playing {
                    self.game.resupply();
                } else {
                    self.start_if_ready();
                }
            }
            InboundMessage::Scores(entries) => {
                log::debug!("leaderboard with {} players", entries.len());
                self.leaderboard.replace(entries);
                let entries = self.leaderboard.entries().to_vec();
                self.game
                    .events_mut()
                    .publish(GameEvent::LeaderboardUpdated { entries });
            }
            InboundMessage::Msg(message) => {
                self.game
                    .events_mut()
                    .publish(GameEvent::ChatReceived { message });
            }
            InboundMessage::Error(text) => log::error!("server error: {}", text),
            other => log::debug!("ignoring {} frame during game", other.tag()),
        }
    }

    fn start_if_ready(&mut self) {
        if self.began
            && self.game.phase() == GamePhase::Initializing
            && self.game.source().len() >= 2
        {
            self.game.start();
        }
    }

    pub fn send_chat(&mut self, body: impl Into<String>) {
        self.channel.send(OutboundMessage::Msg(body.into()));
    }

    pub fn request_scores(&mut self) {
        self.channel.send(OutboundMessage::RequestScores);
    }

    pub fn place_piece(&mut self, x: i32, y: i32) -> Placement {
        self.game.place_piece(x, y)
    }

    pub fn rotate_piece(&mut self, turns: i32) -> bool {
        self.game.rotate_piece(turns)
    }

    pub fn swap_pieces(&mut self) -> bool {
        self.game.swap_pieces()
    }

    pub fn tick_timer(&mut self) -> Option<Expiry> {
        self.game.tick_timer()
    }

    pub fn expire_turn(&mut self) -> Option<Expiry> {
        self.game.expire_turn()
    }

    pub fn snapshot(&self) -> GameSnapshot {
        self.game.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    type Wire = Rc<RefCell<Vec<OutboundMessage>>>;

    fn piece(n: u8) -> InboundMessage {
        InboundMessage::Piece(PieceId::new(n).unwrap())
    }

    #[test]
    fn test_begin_requests_scores_then_buffer() {
        let wire: Wire = Rc::default();
        let mut mp = MultiplayerGame::new(GameConfig::default(), wire.clone(), ());
        mp.begin();

        let sent = wire.borrow();
        assert_eq!(sent[0], OutboundMessage::RequestScores);
        assert_eq!(sent.len(), 7);
        assert!(sent[1..].iter().all(|m| *m == OutboundMessage::RequestPiece));
        assert_eq!(mp.game().source().outstanding(), 6);
    }

    #[test]
    fn test_play_starts_after_two_pieces() {
        let wire: Wire = Rc::default();
        let mut mp = MultiplayerGame::new(GameConfig::default(), wire.clone(), ());
        mp.begin();
        mp.handle_message(piece(3));
        assert_eq!(mp.phase(), GamePhase::Initializing);
        mp.handle_message(piece(1));
        assert_eq!(mp.phase(), GamePhase::Playing);
        assert_eq!(mp.game().current().unwrap().id().index(), 3);
        assert_eq!(mp.game().following().unwrap().id().index(), 1);
    }

    #[test]
    fn test_pieces_before_begin_do_not_start() {
        let wire: Wire = Rc::default();
        let mut mp = MultiplayerGame::new(GameConfig::default(), wire, ());
        mp.handle_message(piece(3));
        mp.handle_message(piece(1));
        assert_eq!(mp.phase(), GamePhase::Initializing);
        mp.begin();
        assert_eq!(mp.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_leaderboard_replaced_wholesale() {
        let wire: Wire = Rc::default();
        let mut events: Vec<GameEvent> = Vec::new();
        let mut mp = MultiplayerGame::new(GameConfig::default(), wire, &mut events);
        mp.handle_line("SCORES a:10:3\nb:20:2");
        mp.handle_line("SCORES c:5:DEAD");
        assert_eq!(mp.leaderboard().entries(), &[LeaderboardEntry::new("c", 5, 0)]);
        assert_eq!(mp.leaderboard().alive().count(), 0);
        drop(mp);
        assert_eq!(events.len(), 2);
    }
}
