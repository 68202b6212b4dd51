//! Bot Types
//!
//! Core types for the chat-facing layer: adapter configuration, incoming
//! events, parsed commands, selection menu options, and error handling.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::services::control::ServerStatus;

// ---------------------------------------------------------------------------
// Adapter Configuration
// ---------------------------------------------------------------------------

/// Telegram adapter configuration.
///
/// An empty `allowed_chat_ids` list means every chat may drive the bot.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub allowed_chat_ids: Vec<i64>,
    pub max_message_length: usize,
}

impl TelegramConfig {
    pub fn new(bot_token: impl Into<String>, allowed_chat_ids: Vec<i64>) -> Self {
        Self {
            bot_token: bot_token.into(),
            allowed_chat_ids,
            max_message_length: 4000,
        }
    }
}

// ---------------------------------------------------------------------------
// Incoming Events
// ---------------------------------------------------------------------------

/// Event forwarded from a chat adapter into the gateway loop.
#[derive(Debug, Clone)]
pub enum IncomingEvent {
    /// A text message, possibly a command.
    Command(IncomingCommand),
    /// A press on one of our selection menus.
    MenuPick(MenuPick),
}

/// Incoming text message from the chat platform.
#[derive(Debug, Clone)]
pub struct IncomingCommand {
    pub chat_id: i64,
    pub user_id: i64,
    pub username: Option<String>,
    pub text: String,
    pub message_id: i64,
    pub timestamp: DateTime<Utc>,
}

/// A user's pick on a pending selection menu.
#[derive(Debug, Clone)]
pub struct MenuPick {
    pub chat_id: i64,
    pub user_id: i64,
    /// Id of the menu message the pick belongs to.
    pub message_id: i64,
    /// Platform handle used to acknowledge the pick.
    pub callback_id: String,
    /// Opaque option value chosen by the user.
    pub value: String,
}

/// One option in a selection menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuOption {
    /// Value delivered back in the `MenuPick`.
    pub value: String,
    pub label: String,
    pub description: String,
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// Parsed bot command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    /// `/server create <name> <modpack>`
    Create { name: String, modpack: String },
    /// `/server list`
    List,
    /// `/server status <name>`
    Status { name: String },
    /// `/server start` (interactive: pick a stopped server)
    Start,
    /// `/server stop` (interactive: pick a running server)
    Stop,
    /// `/server delete <name>`
    Delete { name: String },
    /// `/health`
    Health,
    /// `/help` or `/start`
    Help,
    /// A known sub-operation missing required arguments.
    Usage(&'static str),
}

/// The two interactive lifecycle actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerAction {
    Start,
    Stop,
}

impl ServerAction {
    /// Status a server must currently have to be a candidate for this action.
    pub fn required_status(self) -> ServerStatus {
        match self {
            ServerAction::Start => ServerStatus::Stopped,
            ServerAction::Stop => ServerStatus::Running,
        }
    }

    /// Operation label used in failure messages ("Failed to start: ...").
    pub fn failure_label(self) -> &'static str {
        match self {
            ServerAction::Start => "start",
            ServerAction::Stop => "stop",
        }
    }

    /// Progress verb for the success message ("Starting **name**...").
    pub fn gerund(self) -> &'static str {
        match self {
            ServerAction::Start => "Starting",
            ServerAction::Stop => "Stopping",
        }
    }

    /// Informational text when no server is in the required status.
    pub fn empty_candidates_text(self) -> &'static str {
        match self {
            ServerAction::Start => "No stopped servers to start.",
            ServerAction::Stop => "No running servers to stop.",
        }
    }
}

// ---------------------------------------------------------------------------
// Error Types
// ---------------------------------------------------------------------------

/// Chat-layer error types.
#[derive(Debug, Clone, Error)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to send message: {0}")]
    SendFailed(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
