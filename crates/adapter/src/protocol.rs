//! Protocol module - text frames exchanged with the game server
//!
//! Every frame is a single string: an upper-case tag, optionally followed by a
//! space and a payload. List payloads (`SCORES`, `HISCORES`, `CHANNELS`,
//! `USERS`) put one item per line.
//!
//! ```text
//! client -> server: PIECE
//! server -> client: PIECE 4
//! client -> server: BOARD 0 0 5 5 5 0 0 0 ...
//! server -> client: SCORES alice:1200:2\nbob:300:DEAD
//! ```

use std::fmt;

use crate::types::{ChatMessage, LeaderboardEntry, PieceId, ScoreEntry};

/// Lives token the server uses for a player who is out
pub const DEAD_TOKEN: &str = "DEAD";

// ============== Server -> Client ==============

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundMessage {
    /// Next piece identity for the queue
    Piece(PieceId),
    /// Full leaderboard snapshot
    Scores(Vec<LeaderboardEntry>),
    Msg(ChatMessage),
    /// Server-side error text
    Error(String),
    HiScores(Vec<ScoreEntry>),
    Channels(Vec<String>),
    Users(Vec<String>),
    /// Nickname confirmed
    Nick(String),
    /// Joined a channel
    Join(String),
    Parted,
    /// The channel host started the game
    Start,
    /// This client is the channel host
    Host,
}

impl InboundMessage {
    pub fn tag(&self) -> &'static str {
        match self {
            InboundMessage::Piece(_) => "PIECE",
            InboundMessage::Scores(_) => "SCORES",
            InboundMessage::Msg(_) => "MSG",
            InboundMessage::Error(_) => "ERROR",
            InboundMessage::HiScores(_) => "HISCORES",
            InboundMessage::Channels(_) => "CHANNELS",
            InboundMessage::Users(_) => "USERS",
            InboundMessage::Nick(_) => "NICK",
            InboundMessage::Join(_) => "JOIN",
            InboundMessage::Parted => "PARTED",
            InboundMessage::Start => "START",
            InboundMessage::Host => "HOST",
        }
    }
}

// ============== Client -> Server ==============

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundMessage {
    /// Ask for one more piece identity
    RequestPiece,
    /// Row-major cell values of the local grid
    Board(Vec<u8>),
    Score(u32),
    Lives(u32),
    Die,
    /// Ask for the leaderboard
    RequestScores,
    Msg(String),
    List,
    Create(String),
    Join(String),
    Part,
    Users,
    Nick(String),
    Start,
    /// Ask for the online high score table
    HiScores,
    HiScore { name: String, score: u32 },
    Quit,
}

impl OutboundMessage {
    /// Encode as a wire frame
    pub fn encode(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for OutboundMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutboundMessage::RequestPiece => f.write_str("PIECE"),
            OutboundMessage::Board(cells) => {
                f.write_str("BOARD")?;
                for cell in cells {
                    write!(f, " {}", cell)?;
                }
                Ok(())
            }
            OutboundMessage::Score(score) => write!(f, "SCORE {}", score),
            OutboundMessage::Lives(lives) => write!(f, "LIVES {}", lives),
            OutboundMessage::Die => f.write_str("DIE"),
            OutboundMessage::RequestScores => f.write_str("SCORES"),
            OutboundMessage::Msg(body) => write!(f, "MSG {}", body),
            OutboundMessage::List => f.write_str("LIST"),
            OutboundMessage::Create(name) => write!(f, "CREATE {}", name),
            OutboundMessage::Join(name) => write!(f, "JOIN {}", name),
            OutboundMessage::Part => f.write_str("PART"),
            OutboundMessage::Users => f.write_str("USERS"),
            OutboundMessage::Nick(name) => write!(f, "NICK {}", name),
            OutboundMessage::Start => f.write_str("START"),
            OutboundMessage::HiScores => f.write_str("HISCORES"),
            OutboundMessage::HiScore { name, score } => write!(f, "HISCORE {}:{}", name, score),
            OutboundMessage::Quit => f.write_str("QUIT"),
        }
    }
}

// ============== Errors ==============

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Tag needs a payload but none was sent
    MissingPayload(&'static str),
    InvalidPiece(String),
    /// `MSG` payload without a `sender:` prefix
    MalformedChat(String),
    MalformedScore(String),
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::MissingPayload(tag) => write!(f, "{} frame without payload", tag),
            ProtocolError::InvalidPiece(raw) => write!(f, "invalid piece identity {:?}", raw),
            ProtocolError::MalformedChat(raw) => write!(f, "malformed chat message {:?}", raw),
            ProtocolError::MalformedScore(raw) => write!(f, "malformed score entry {:?}", raw),
        }
    }
}

impl std::error::Error for ProtocolError {}

// ============== Decoding ==============

/// Decode one inbound frame
///
/// Returns `Ok(None)` for tags this client does not handle.
pub fn parse_inbound(frame: &str) -> Result<Option<InboundMessage>, ProtocolError> {
    let frame = frame.trim_end_matches(['\r', '\n']);
    let (tag, payload) = match frame.split_once(' ') {
        Some((tag, payload)) => (tag, Some(payload)),
        None => (frame, None),
    };

    let require = |tag: &'static str| payload.ok_or(ProtocolError::MissingPayload(tag));

    let message = match tag {
        "PIECE" => {
            let raw = require("PIECE")?.trim();
            let id = raw
                .parse::<u8>()
                .ok()
                .and_then(PieceId::new)
                .ok_or_else(|| ProtocolError::InvalidPiece(raw.to_string()))?;
            InboundMessage::Piece(id)
        }
        "SCORES" => InboundMessage::Scores(parse_leaderboard(payload.unwrap_or(""))),
        "MSG" => {
            let raw = require("MSG")?;
            let (sender, body) = raw
                .split_once(':')
                .ok_or_else(|| ProtocolError::MalformedChat(raw.to_string()))?;
            InboundMessage::Msg(ChatMessage {
                sender: sender.to_string(),
                body: body.to_string(),
            })
        }
        "ERROR" => InboundMessage::Error(payload.unwrap_or("").to_string()),
        "HISCORES" => InboundMessage::HiScores(parse_score_list(payload.unwrap_or(""))),
        "CHANNELS" => InboundMessage::Channels(split_names(payload)),
        "USERS" => InboundMessage::Users(split_names(payload)),
        "NICK" => InboundMessage::Nick(require("NICK")?.trim().to_string()),
        "JOIN" => InboundMessage::Join(require("JOIN")?.trim().to_string()),
        "PARTED" => InboundMessage::Parted,
        "START" => InboundMessage::Start,
        "HOST" => InboundMessage::Host,
        _ => return Ok(None),
    };
    Ok(Some(message))
}

/// Parse a `SCORES` body, skipping lines that do not parse
pub fn parse_leaderboard(body: &str) -> Vec<LeaderboardEntry> {
    body.lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| match parse_leaderboard_entry(line) {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("skipping leaderboard line: {}", e);
                None
            }
        })
        .collect()
}

/// Parse one `name:score:lives` line; lives may be `DEAD`
pub fn parse_leaderboard_entry(line: &str) -> Result<LeaderboardEntry, ProtocolError> {
    let malformed = || ProtocolError::MalformedScore(line.to_string());

    let mut parts = line.trim().splitn(3, ':');
    let (Some(name), Some(score), Some(lives)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(malformed());
    };
    let score = score.trim().parse::<u32>().map_err(|_| malformed())?;
    let lives = match lives.trim() {
        DEAD_TOKEN => 0,
        raw => raw.parse::<u32>().map_err(|_| malformed())?,
    };
    Ok(LeaderboardEntry::new(name, score, lives))
}

/// Parse a list of `name:score` lines, skipping lines that do not parse
pub fn parse_score_list(body: &str) -> Vec<ScoreEntry> {
    body.lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| match parse_score_entry(line) {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("skipping score line: {}", e);
                None
            }
        })
        .collect()
}

/// Parse one `name:score` line
pub fn parse_score_entry(line: &str) -> Result<ScoreEntry, ProtocolError> {
    let (name, score) = line
        .trim()
        .rsplit_once(':')
        .ok_or_else(|| ProtocolError::MalformedScore(line.to_string()))?;
    let score = score
        .parse::<u32>()
        .map_err(|_| ProtocolError::MalformedScore(line.to_string()))?;
    Ok(ScoreEntry::new(name, score))
}

fn split_names(payload: Option<&str>) -> Vec<String> {
    payload
        .unwrap_or("")
        .lines()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_piece() {
        let msg = parse_inbound("PIECE 4").unwrap().unwrap();
        assert_eq!(msg, InboundMessage::Piece(PieceId::new(4).unwrap()));
    }

    #[test]
    fn test_parse_piece_out_of_range() {
        assert_eq!(
            parse_inbound("PIECE 15"),
            Err(ProtocolError::InvalidPiece("15".to_string()))
        );
        assert_eq!(
            parse_inbound("PIECE"),
            Err(ProtocolError::MissingPayload("PIECE"))
        );
    }

    #[test]
    fn test_parse_scores_with_dead_player() {
        let msg = parse_inbound("SCORES alice:1200:2\nbob:300:DEAD").unwrap().unwrap();
        assert_eq!(
            msg,
            InboundMessage::Scores(vec![
                LeaderboardEntry::new("alice", 1200, 2),
                LeaderboardEntry::new("bob", 300, 0),
            ])
        );
    }

    #[test]
    fn test_parse_scores_skips_malformed_lines() {
        let msg = parse_inbound("SCORES alice:1200:2\ngarbage\ncarol:x:1").unwrap().unwrap();
        assert_eq!(
            msg,
            InboundMessage::Scores(vec![LeaderboardEntry::new("alice", 1200, 2)])
        );
    }

    #[test]
    fn test_parse_chat_keeps_colons_in_body() {
        let msg = parse_inbound("MSG alice:see you at 10:30").unwrap().unwrap();
        assert_eq!(
            msg,
            InboundMessage::Msg(ChatMessage {
                sender: "alice".to_string(),
                body: "see you at 10:30".to_string(),
            })
        );
        assert!(matches!(
            parse_inbound("MSG no sender"),
            Err(ProtocolError::MalformedChat(_))
        ));
    }

    #[test]
    fn test_parse_lobby_frames() {
        assert_eq!(
            parse_inbound("CHANNELS lobby\nfast").unwrap(),
            Some(InboundMessage::Channels(vec!["lobby".into(), "fast".into()]))
        );
        assert_eq!(parse_inbound("CHANNELS").unwrap(), Some(InboundMessage::Channels(vec![])));
        assert_eq!(parse_inbound("START").unwrap(), Some(InboundMessage::Start));
        assert_eq!(parse_inbound("HOST\n").unwrap(), Some(InboundMessage::Host));
        assert_eq!(
            parse_inbound("NICK zed").unwrap(),
            Some(InboundMessage::Nick("zed".into()))
        );
    }

    #[test]
    fn test_unknown_tag_is_ignored() {
        assert_eq!(parse_inbound("PING").unwrap(), None);
        assert_eq!(parse_inbound("").unwrap(), None);
    }

    #[test]
    fn test_encode_board_has_no_trailing_space() {
        let frame = OutboundMessage::Board(vec![0, 1, 15, 0]).encode();
        assert_eq!(frame, "BOARD 0 1 15 0");
    }

    #[test]
    fn test_encode_simple_frames() {
        assert_eq!(OutboundMessage::RequestPiece.encode(), "PIECE");
        assert_eq!(OutboundMessage::RequestScores.encode(), "SCORES");
        assert_eq!(OutboundMessage::Score(120).encode(), "SCORE 120");
        assert_eq!(OutboundMessage::Lives(2).encode(), "LIVES 2");
        assert_eq!(OutboundMessage::Die.encode(), "DIE");
        assert_eq!(
            OutboundMessage::HiScore {
                name: "amy".into(),
                score: 900
            }
            .encode(),
            "HISCORE amy:900"
        );
    }

    #[test]
    fn test_parse_score_entry() {
        assert_eq!(parse_score_entry("amy:900"), Ok(ScoreEntry::new("amy", 900)));
        assert!(parse_score_entry("amy").is_err());
        assert!(parse_score_entry("amy:-1").is_err());
    }
}
