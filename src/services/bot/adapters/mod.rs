//! Chat Adapters
//!
//! Trait definition for chat platform adapters. Each adapter receives
//! platform events, forwards them into the gateway's event channel, and
//! carries responses (messages, edits, selection menus) back out.

pub mod telegram;

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::types::{BotError, IncomingEvent, MenuOption};

/// Chat platform boundary.
///
/// Adapters are responsible for:
/// - Receiving messages and menu picks from the platform (long-polling)
/// - Sending and editing text responses
/// - Turning a message into a selection menu and back
/// - Privately acknowledging menu picks
#[async_trait]
pub trait ChatAdapter: Send + Sync {
    /// Start receiving platform events.
    ///
    /// Events are forwarded through the provided mpsc sender. The adapter
    /// spawns its own task for the receive loop.
    async fn start(&self, events_tx: mpsc::Sender<IncomingEvent>) -> Result<(), BotError>;

    /// Stop the adapter gracefully.
    async fn stop(&self) -> Result<(), BotError>;

    /// Send a new message; returns the platform message id so the caller
    /// can edit it in place later.
    ///
    /// Must handle platform-specific length limits by splitting long
    /// messages as needed.
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<i64, BotError>;

    /// Replace a message's text, clearing any menu attached to it.
    async fn edit_message(&self, chat_id: i64, message_id: i64, text: &str)
        -> Result<(), BotError>;

    /// Turn an existing message into a selection menu.
    async fn present_menu(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        options: &[MenuOption],
    ) -> Result<(), BotError>;

    /// Acknowledge a menu pick so the platform clears its pending state.
    /// Visible only to the picking user.
    async fn acknowledge_pick(&self, callback_id: &str) -> Result<(), BotError>;
}
