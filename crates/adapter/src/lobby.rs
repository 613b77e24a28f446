//! Lobby state before a multiplayer game
//!
//! Tracks the channel list, the current channel and its users, the nickname and
//! whether this client hosts the channel. Server frames update the state and
//! come back as [`LobbyEvent`]s for whoever draws the lobby.

use crate::channel::MessageChannel;
use crate::protocol::{parse_inbound, InboundMessage, OutboundMessage};
use crate::types::ChatMessage;

/// Chat prefix that changes the nickname instead of sending a message
pub const NICK_COMMAND: &str = "\\nick";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LobbyEvent {
    ChannelsChanged(Vec<String>),
    UsersChanged(Vec<String>),
    Joined(String),
    Parted,
    NickChanged(String),
    /// This client became the host of its channel
    Hosting,
    Chat(ChatMessage),
    Error(String),
    /// The game started; hand the connection to a multiplayer game
    Started,
}

#[derive(Debug, Clone)]
pub struct Lobby<C> {
    channel: C,
    channels: Vec<String>,
    users: Vec<String>,
    current: Option<String>,
    nickname: Option<String>,
    host: bool,
    started: bool,
}

impl<C: MessageChannel> Lobby<C> {
    pub fn new(channel: C) -> Self {
        Self {
            channel,
            channels: Vec::new(),
            users: Vec::new(),
            current: None,
            nickname: None,
            host: false,
            started: false,
        }
    }

    pub fn channels(&self) -> &[String] {
        &self.channels
    }

    pub fn users(&self) -> &[String] {
        &self.users
    }

    pub fn current_channel(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn nickname(&self) -> Option<&str> {
        self.nickname.as_deref()
    }

    pub fn is_host(&self) -> bool {
        self.host
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Ask for the channel list; callers poll this periodically
    pub fn refresh_channels(&self) {
        self.channel.send(OutboundMessage::List);
    }

    pub fn refresh_users(&self) {
        self.channel.send(OutboundMessage::Users);
    }

    /// Create a channel; the creator hosts it
    pub fn create(&mut self, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            return;
        }
        self.channel.send(OutboundMessage::Create(name.to_string()));
        self.host = true;
    }

    pub fn join(&mut self, name: &str) {
        if self.current.as_deref() == Some(name) {
            return;
        }
        self.channel.send(OutboundMessage::Join(name.to_string()));
        self.host = false;
    }

    pub fn part(&mut self) {
        self.channel.send(OutboundMessage::Part);
        self.host = false;
    }

    /// Send a chat line, or change nickname for `\nick <name>`
    pub fn submit_chat(&self, text: &str) {
        match text.strip_prefix(NICK_COMMAND) {
            Some(name) if !name.trim().is_empty() => {
                self.channel.send(OutboundMessage::Nick(name.trim().to_string()));
            }
            _ => self.channel.send(OutboundMessage::Msg(text.to_string())),
        }
    }

    /// Start the game; only the host may
    pub fn start_game(&self) -> bool {
        if !self.host || self.current.is_none() {
            return false;
        }
        self.channel.send(OutboundMessage::Start);
        true
    }

    pub fn quit(&self) {
        self.channel.send(OutboundMessage::Quit);
    }

    pub fn handle_line(&mut self, line: &str) -> Option<LobbyEvent> {
        match parse_inbound(line) {
            Ok(Some(message)) => self.handle_message(message),
            Ok(None) => None,
            Err(e) => {
                log::warn!("dropping lobby frame: {}", e);
                None
            }
        }
    }

    pub fn handle_message(&mut self, message: InboundMessage) -> Option<LobbyEvent> {
        let event = match message {
            InboundMessage::Channels(channels) => {
                self.channels = channels.clone();
                LobbyEvent::ChannelsChanged(channels)
            }
            InboundMessage::Users(users) => {
                self.users = users.clone();
                LobbyEvent::UsersChanged(users)
            }
            InboundMessage::Join(name) => {
                log::info!("joined channel {}", name);
                self.current = Some(name.clone());
                self.users.clear();
                LobbyEvent::Joined(name)
            }
            InboundMessage::Parted => {
                self.current = None;
                self.users.clear();
                self.host = false;
                LobbyEvent::Parted
            }
            InboundMessage::Nick(name) => {
                self.nickname = Some(name.clone());
                LobbyEvent::NickChanged(name)
            }
            InboundMessage::Host => {
                self.host = true;
                LobbyEvent::Hosting
            }
            InboundMessage::Msg(message) => LobbyEvent::Chat(message),
            InboundMessage::Error(text) => {
                log::error!("server error: {}", text);
                LobbyEvent::Error(text)
            }
            InboundMessage::Start => {
                log::info!("game starting");
                self.started = true;
                self.host = false;
                LobbyEvent::Started
            }
            other => {
                log::debug!("ignoring {} frame in lobby", other.tag());
                return None;
            }
        };
        Some(event)
    }
}
