//! Runtime integration.
//!
//! One tokio task owns a game and is the only place it is mutated. Commands,
//! server frames and timer ticks are funnelled into that task, so a placement
//! and an expiry can never run at the same time.

use std::time::Duration;

use anyhow::{anyhow, Context};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::channel::MessageChannel;
use crate::engine::core::TurnTimer;
use crate::engine::{
    EventSink, Expiry, Game, GameConfig, GameEvent, GameSnapshot, NetworkSink, PieceSource,
    Placement,
};
use crate::multiplayer::MultiplayerGame;
use crate::types::{GamePhase, TIMER_TICK_MS};

/// Commands buffered before senders wait
pub const COMMAND_BUFFER: usize = 16;

/// Command delivered to the game task.
#[derive(Debug)]
pub enum GameCommand {
    Place { x: i32, y: i32 },
    Rotate(i32),
    Swap,
    Chat(String),
    RequestScores,
    Snapshot(oneshot::Sender<GameSnapshot>),
    Shutdown,
}

/// A game the runtime can drive
pub trait Session {
    fn start(&mut self);
    fn place(&mut self, x: i32, y: i32) -> Placement;
    fn rotate(&mut self, turns: i32) -> bool;
    fn swap(&mut self) -> bool;
    fn tick(&mut self) -> Option<Expiry>;
    fn timer(&self) -> &TurnTimer;
    fn phase(&self) -> GamePhase;
    fn snapshot(&self) -> GameSnapshot;

    /// Frame from the server
    fn handle_line(&mut self, line: &str) {
        log::debug!("no connection; ignoring {:?}", line);
    }

    fn send_chat(&mut self, _body: String) {}

    fn request_scores(&mut self) {}
}

impl<S: PieceSource, N: NetworkSink, E: EventSink> Session for Game<S, N, E> {
    fn start(&mut self) {
        Game::start(self);
    }

    fn place(&mut self, x: i32, y: i32) -> Placement {
        self.place_piece(x, y)
    }

    fn rotate(&mut self, turns: i32) -> bool {
        self.rotate_piece(turns)
    }

    fn swap(&mut self) -> bool {
        self.swap_pieces()
    }

    fn tick(&mut self) -> Option<Expiry> {
        self.tick_timer()
    }

    fn timer(&self) -> &TurnTimer {
        Game::timer(self)
    }

    fn phase(&self) -> GamePhase {
        Game::phase(self)
    }

    fn snapshot(&self) -> GameSnapshot {
        Game::snapshot(self)
    }
}

impl<C: MessageChannel + Clone, E: EventSink> Session for MultiplayerGame<C, E> {
    fn start(&mut self) {
        self.begin();
    }

    fn place(&mut self, x: i32, y: i32) -> Placement {
        self.place_piece(x, y)
    }

    fn rotate(&mut self, turns: i32) -> bool {
        self.rotate_piece(turns)
    }

    fn swap(&mut self) -> bool {
        self.swap_pieces()
    }

    fn tick(&mut self) -> Option<Expiry> {
        self.tick_timer()
    }

    fn timer(&self) -> &TurnTimer {
        self.game().timer()
    }

    fn phase(&self) -> GamePhase {
        MultiplayerGame::phase(self)
    }

    fn snapshot(&self) -> GameSnapshot {
        MultiplayerGame::snapshot(self)
    }

    fn handle_line(&mut self, line: &str) {
        MultiplayerGame::handle_line(self, line);
    }

    fn send_chat(&mut self, body: String) {
        MultiplayerGame::send_chat(self, body);
    }

    fn request_scores(&mut self) {
        MultiplayerGame::request_scores(self);
    }
}

/// Event sink that forwards into the runtime's event channel
#[derive(Debug, Clone)]
pub struct EventForwarder {
    tx: mpsc::UnboundedSender<GameEvent>,
}

impl EventForwarder {
    pub fn new(tx: mpsc::UnboundedSender<GameEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for EventForwarder {
    fn publish(&mut self, event: GameEvent) {
        let _ = self.tx.send(event);
    }
}

fn tick_period() -> Duration {
    Duration::from_millis(TIMER_TICK_MS as u64)
}

/// Drive a session until shutdown, a closed command channel, or game over.
///
/// The ticker restarts whenever the turn timer starts a new countdown, so the
/// first tick of every turn lands one tick period after it began.
pub async fn run_session<S: Session>(
    mut session: S,
    mut commands: mpsc::Receiver<GameCommand>,
    mut inbound: Option<mpsc::UnboundedReceiver<String>>,
) -> anyhow::Result<GameSnapshot> {
    session.start();

    let period = tick_period();
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut epoch = session.timer().epoch();

    while session.phase() != GamePhase::GameOver {
        let running = session.timer().is_running();

        tokio::select! {
            cmd = commands.recv() => match cmd {
                None => {
                    log::info!("command channel closed; stopping game");
                    break;
                }
                Some(GameCommand::Shutdown) => {
                    log::info!("shutdown requested");
                    break;
                }
                Some(cmd) => apply(&mut session, cmd),
            },
            line = recv_line(&mut inbound) => match line {
                Some(line) => session.handle_line(&line),
                None => {
                    log::warn!("server connection closed");
                    inbound = None;
                }
            },
            _ = ticker.tick(), if running => {
                session.tick();
            }
        }

        let current = session.timer().epoch();
        if current != epoch {
            epoch = current;
            ticker.reset();
        }
    }

    Ok(session.snapshot())
}

async fn recv_line(inbound: &mut Option<mpsc::UnboundedReceiver<String>>) -> Option<String> {
    match inbound {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

fn apply<S: Session>(session: &mut S, cmd: GameCommand) {
    match cmd {
        GameCommand::Place { x, y } => {
            if let Placement::Rejected(reason) = session.place(x, y) {
                log::debug!("placement at ({}, {}) rejected: {}", x, y, reason);
            }
        }
        GameCommand::Rotate(turns) => {
            session.rotate(turns);
        }
        GameCommand::Swap => {
            session.swap();
        }
        GameCommand::Chat(body) => session.send_chat(body),
        GameCommand::RequestScores => session.request_scores(),
        GameCommand::Snapshot(reply) => {
            let _ = reply.send(session.snapshot());
        }
        GameCommand::Shutdown => {}
    }
}

/// Caller side of a spawned game task
pub struct GameHandle {
    commands: mpsc::Sender<GameCommand>,
    events: mpsc::UnboundedReceiver<GameEvent>,
    task: JoinHandle<anyhow::Result<GameSnapshot>>,
}

impl GameHandle {
    /// Spawn a single-player game on the current runtime
    pub fn spawn_single_player(config: GameConfig) -> Self {
        let (event_tx, events) = mpsc::unbounded_channel();
        let game = Game::single_player(config, EventForwarder::new(event_tx));
        Self::spawn(game, None, events)
    }

    /// Spawn a multiplayer game over an already connected line channel
    pub fn spawn_multiplayer(
        config: GameConfig,
        outbound: mpsc::UnboundedSender<String>,
        inbound: mpsc::UnboundedReceiver<String>,
    ) -> Self {
        let (event_tx, events) = mpsc::unbounded_channel();
        let game = MultiplayerGame::new(config, outbound, EventForwarder::new(event_tx));
        Self::spawn(game, Some(inbound), events)
    }

    fn spawn<S: Session + Send + 'static>(
        session: S,
        inbound: Option<mpsc::UnboundedReceiver<String>>,
        events: mpsc::UnboundedReceiver<GameEvent>,
    ) -> Self {
        let (commands, cmd_rx) = mpsc::channel(COMMAND_BUFFER);
        let task = tokio::spawn(run_session(session, cmd_rx, inbound));
        Self {
            commands,
            events,
            task,
        }
    }

    pub async fn send(&self, cmd: GameCommand) -> anyhow::Result<()> {
        self.commands
            .send(cmd)
            .await
            .map_err(|_| anyhow!("game task has stopped"))
    }

    pub async fn place(&self, x: i32, y: i32) -> anyhow::Result<()> {
        self.send(GameCommand::Place { x, y }).await
    }

    pub async fn rotate(&self, turns: i32) -> anyhow::Result<()> {
        self.send(GameCommand::Rotate(turns)).await
    }

    pub async fn swap(&self) -> anyhow::Result<()> {
        self.send(GameCommand::Swap).await
    }

    pub async fn chat(&self, body: impl Into<String>) -> anyhow::Result<()> {
        self.send(GameCommand::Chat(body.into())).await
    }

    pub async fn request_scores(&self) -> anyhow::Result<()> {
        self.send(GameCommand::RequestScores).await
    }

    pub async fn snapshot(&self) -> anyhow::Result<GameSnapshot> {
        let (tx, rx) = oneshot::channel();
        self.send(GameCommand::Snapshot(tx)).await?;
        rx.await.context("game task dropped the snapshot request")
    }

    /// Next event, or None once the game task is gone and the backlog is drained
    pub async fn next_event(&mut self) -> Option<GameEvent> {
        self.events.recv().await
    }

    pub fn try_event(&mut self) -> Option<GameEvent> {
        self.events.try_recv().ok()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop the game and return its final state
    pub async fn shutdown(self) -> anyhow::Result<GameSnapshot> {
        // The task may already have ended on game over.
        let _ = self.commands.send(GameCommand::Shutdown).await;
        self.join().await
    }

    /// Wait for the game to end on its own
    pub async fn join(self) -> anyhow::Result<GameSnapshot> {
        self.task.await.context("game task panicked")?
    }
}
