//! Adapter crate - the TetrECS server protocol and the runtime around a game
//!
//! # Protocol Overview
//!
//! The server speaks a line-oriented text protocol. Each frame is a tag,
//! optionally followed by a space and a payload:
//!
//! ```text
//! Client -> Server: PIECE
//! Server -> Client: PIECE 7
//! Client -> Server: BOARD 0 0 8 8 8 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0
//! Client -> Server: SCORE 150
//! Server -> Client: SCORES alice:150:3\nbob:0:DEAD
//! Server -> Client: MSG bob:gg
//! ```
//!
//! The connection itself (socket framing, reconnects) lives outside this crate.
//! Everything here talks to an already connected [`MessageChannel`] and
//! consumes inbound frames as strings.
//!
//! # Layout
//!
//! - [`protocol`]: frame encoding and decoding
//! - [`channel`]: the outgoing message channel abstraction
//! - [`multiplayer`]: server-fed piece queue, peer link and leaderboard
//! - [`lobby`]: channel, user and host state before a game
//! - [`runtime`]: tokio task owning a game, with a command handle

pub mod channel;
pub mod lobby;
pub mod multiplayer;
pub mod protocol;
pub mod runtime;

pub use tetrecs_engine as engine;
pub use tetrecs_types as types;

pub use channel::MessageChannel;
pub use lobby::{Lobby, LobbyEvent};
pub use multiplayer::{Leaderboard, MultiplayerGame, PeerLink, RemotePieces};
pub use protocol::{parse_inbound, InboundMessage, OutboundMessage, ProtocolError};
pub use runtime::{run_session, EventForwarder, GameCommand, GameHandle, Session};
