//! Multiplayer engine tests - piece queue, peer messages, leaderboard and chat

use std::cell::RefCell;
use std::rc::Rc;

use tetrecs::adapter::{MultiplayerGame, OutboundMessage};
use tetrecs::engine::{Expiry, GameConfig, GameEvent, Placement, RejectReason};
use tetrecs::types::{ChatMessage, GamePhase, LeaderboardEntry};

type Wire = Rc<RefCell<Vec<OutboundMessage>>>;

fn started(pieces: &[u8], lives: u32) -> (MultiplayerGame<Wire, Vec<GameEvent>>, Wire) {
    let wire: Wire = Rc::default();
    let config = GameConfig::default().with_lives(lives);
    let mut mp = MultiplayerGame::new(config, wire.clone(), Vec::new());
    mp.begin();
    for id in pieces {
        mp.handle_line(&format!("PIECE {}", id));
    }
    wire.borrow_mut().clear();
    (mp, wire)
}

fn boards(wire: &Wire) -> usize {
    wire.borrow()
        .iter()
        .filter(|m| matches!(m, OutboundMessage::Board(_)))
        .count()
}

#[test]
fn test_every_placement_attempt_sends_one_board() {
    let (mut mp, wire) = started(&[0, 3, 3, 3], 3);

    assert_eq!(
        mp.place_piece(0, 0),
        Placement::Rejected(RejectReason::DoesNotFit)
    );
    assert_eq!(boards(&wire), 1);

    assert!(mp.place_piece(1, 0).is_placed());
    assert_eq!(boards(&wire), 2);

    let sent = wire.borrow();
    let OutboundMessage::Board(cells) = &sent[sent.len() - 1] else {
        panic!("last frame should be the board, got {:?}", sent.last());
    };
    assert_eq!(cells.len(), 25);
    assert_eq!(&cells[..5], &[1, 1, 1, 0, 0]);
}

#[test]
fn test_score_sent_only_on_clearing_turns() {
    let (mut mp, wire) = started(&[0, 3, 3, 3, 3], 3);
    mp.place_piece(1, 0);
    mp.place_piece(3, 0);
    assert!(!wire
        .borrow()
        .iter()
        .any(|m| matches!(m, OutboundMessage::Score(_))));

    mp.place_piece(4, 0);
    let scores: Vec<OutboundMessage> = wire
        .borrow()
        .iter()
        .filter(|m| matches!(m, OutboundMessage::Score(_)))
        .cloned()
        .collect();
    assert_eq!(scores, vec![OutboundMessage::Score(50)]);
}

#[test]
fn test_each_consumed_piece_requests_another() {
    let (mut mp, wire) = started(&[0, 3, 3, 3], 3);
    assert_eq!(mp.game().source().len(), 2);

    mp.place_piece(1, 0);
    let requests = wire
        .borrow()
        .iter()
        .filter(|m| **m == OutboundMessage::RequestPiece)
        .count();
    assert_eq!(requests, 1);
    assert_eq!(mp.game().source().len(), 1);
}

#[test]
fn test_expiry_sends_new_lives_then_die() {
    let (mut mp, wire) = started(&[3, 3, 3, 3], 1);

    assert_eq!(mp.expire_turn(), Some(Expiry::LifeLost { lives: 0 }));
    assert!(wire.borrow().contains(&OutboundMessage::Lives(0)));

    wire.borrow_mut().clear();
    assert_eq!(mp.expire_turn(), Some(Expiry::GameOver { score: 0 }));
    assert_eq!(*wire.borrow(), vec![OutboundMessage::Die]);
    assert_eq!(mp.phase(), GamePhase::GameOver);
}

#[test]
fn test_timer_ticks_drive_expiry() {
    let (mut mp, wire) = started(&[3, 3, 3, 3], 3);
    for _ in 0..23 {
        assert_eq!(mp.tick_timer(), None);
    }
    assert_eq!(mp.tick_timer(), Some(Expiry::LifeLost { lives: 2 }));
    assert!(wire.borrow().contains(&OutboundMessage::Lives(2)));
}

#[test]
fn test_underrun_waits_for_next_piece() {
    let (mut mp, _wire) = started(&[0, 3], 3);
    assert_eq!(mp.phase(), GamePhase::Playing);

    assert!(mp.place_piece(1, 0).is_placed());
    assert_eq!(mp.game().current().unwrap().name(), "Dot");
    assert!(mp.game().following().is_none());

    assert!(mp.place_piece(4, 4).is_placed());
    assert!(mp.game().current().is_none());
    assert_eq!(
        mp.place_piece(2, 2),
        Placement::Rejected(RejectReason::NoPiece)
    );

    mp.handle_line("PIECE 4");
    assert_eq!(mp.game().current().unwrap().name(), "Square");
    assert!(mp.game().following().is_none());

    mp.handle_line("PIECE 3");
    assert_eq!(mp.game().following().unwrap().name(), "Dot");
}

#[test]
fn test_scores_frame_replaces_leaderboard() {
    let (mut mp, _wire) = started(&[3, 3], 3);
    mp.handle_line("SCORES amy:100:3\nbob:40:1");
    assert_eq!(mp.leaderboard().len(), 2);

    mp.handle_line("SCORES carl:7:DEAD");
    assert_eq!(
        mp.leaderboard().entries(),
        &[LeaderboardEntry::new("carl", 7, 0)]
    );
}

#[test]
fn test_chat_and_errors_do_not_touch_game_state() {
    let (mut mp, _wire) = started(&[3, 3], 3);
    let before = mp.snapshot();

    mp.handle_line("MSG amy:good luck");
    mp.handle_line("ERROR You are not in a channel");
    mp.handle_line("PIECE banana");
    mp.handle_line("WHO knows");
    assert_eq!(mp.snapshot(), before);
    assert!(mp.leaderboard().is_empty());
}

#[test]
fn test_chat_reaches_event_sink() {
    let wire: Wire = Rc::default();
    let mut events: Vec<GameEvent> = Vec::new();
    {
        let mut mp = MultiplayerGame::new(GameConfig::default(), wire.clone(), &mut events);
        mp.handle_line("MSG amy:good luck");
        mp.send_chat("thanks");
    }
    assert_eq!(
        events,
        vec![GameEvent::ChatReceived {
            message: ChatMessage {
                sender: "amy".into(),
                body: "good luck".into()
            }
        }]
    );
    assert_eq!(*wire.borrow(), vec![OutboundMessage::Msg("thanks".into())]);
}

#[test]
fn test_placement_while_waiting_for_pieces_sends_board() {
    let wire: Wire = Rc::default();
    let mut mp = MultiplayerGame::new(GameConfig::default(), wire.clone(), Vec::new());
    mp.begin();
    mp.handle_line("PIECE 3");
    assert_eq!(mp.phase(), GamePhase::Initializing);
    wire.borrow_mut().clear();

    assert_eq!(
        mp.place_piece(2, 2),
        Placement::Rejected(RejectReason::NotPlaying)
    );
    assert_eq!(*wire.borrow(), vec![OutboundMessage::Board(vec![0; 25])]);
}

#[test]
fn test_placement_after_game_over_sends_nothing() {
    let (mut mp, wire) = started(&[3, 3, 3], 0);
    assert_eq!(mp.expire_turn(), Some(Expiry::GameOver { score: 0 }));
    wire.borrow_mut().clear();

    assert_eq!(
        mp.place_piece(2, 2),
        Placement::Rejected(RejectReason::NotPlaying)
    );
    assert!(wire.borrow().is_empty());
}
