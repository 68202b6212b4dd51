//! Telegram Adapter
//!
//! Telegram Bot adapter using teloxide for long-polling reception of both
//! text messages and callback queries (menu picks). Implements the
//! `ChatAdapter` trait with chat allow-list checks and message splitting
//! for Telegram's 4096 character limit.

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::services::bot::types::{
    BotError, IncomingCommand, IncomingEvent, MenuOption, MenuPick, TelegramConfig,
};

use super::ChatAdapter;

/// Telegram Bot adapter backed by teloxide long-polling.
pub struct TelegramAdapter {
    pub(crate) config: TelegramConfig,
    pub(crate) bot: teloxide::Bot,
    pub(crate) cancel_token: CancellationToken,
}

impl TelegramAdapter {
    pub fn new(config: TelegramConfig) -> Result<Self, BotError> {
        if config.bot_token.is_empty() {
            return Err(BotError::Config("Bot token is required".to_string()));
        }
        let bot = teloxide::Bot::new(&config.bot_token);
        Ok(Self {
            config,
            bot,
            cancel_token: CancellationToken::new(),
        })
    }
}

/// Allow-list check: an empty list admits every chat.
fn chat_allowed(allowed: &[i64], chat_id: i64) -> bool {
    allowed.is_empty() || allowed.contains(&chat_id)
}

/// Split long messages at line boundaries to respect platform limits.
///
/// Splitting counts characters, not bytes: glyph-heavy server lists must
/// never be cut inside a UTF-8 sequence.
pub fn split_message(text: &str, max_len: usize) -> Vec<String> {
    if text.chars().count() <= max_len {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for line in text.lines() {
        let line_len = line.chars().count();
        if current_len + line_len + 1 > max_len && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if line_len > max_len {
            // A single oversized line gets hard-split on char boundaries.
            let mut piece = String::new();
            let mut piece_len = 0usize;
            for ch in line.chars() {
                if piece_len == max_len {
                    chunks.push(std::mem::take(&mut piece));
                    piece_len = 0;
                }
                piece.push(ch);
                piece_len += 1;
            }
            if !piece.is_empty() {
                chunks.push(piece);
            }
            continue;
        }
        if !current.is_empty() {
            current.push('\n');
            current_len += 1;
        }
        current.push_str(line);
        current_len += line_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

#[async_trait]
impl ChatAdapter for TelegramAdapter {
    async fn start(&self, events_tx: mpsc::Sender<IncomingEvent>) -> Result<(), BotError> {
        use teloxide::dispatching::{Dispatcher, UpdateFilterExt};
        use teloxide::dptree;
        use teloxide::types::{CallbackQuery, Message, Update};

        let bot = self.bot.clone();
        let allowed_for_messages = self.config.allowed_chat_ids.clone();
        let allowed_for_picks = self.config.allowed_chat_ids.clone();
        let message_tx = events_tx.clone();
        let pick_tx = events_tx;
        let cancel = self.cancel_token.clone();

        tokio::spawn(async move {
            let message_branch = Update::filter_message().endpoint(move |msg: Message| {
                let tx = message_tx.clone();
                let allowed = allowed_for_messages.clone();
                async move {
                    let chat_id = msg.chat.id.0;
                    if !chat_allowed(&allowed, chat_id) {
                        return Ok::<(), Box<dyn std::error::Error + Send + Sync>>(());
                    }

                    if let Some(text) = msg.text() {
                        let incoming = IncomingCommand {
                            chat_id,
                            user_id: msg.from.as_ref().map(|u| u.id.0 as i64).unwrap_or(0),
                            username: msg.from.as_ref().and_then(|u| u.username.clone()),
                            text: text.to_string(),
                            message_id: msg.id.0 as i64,
                            timestamp: chrono::Utc::now(),
                        };
                        let _ = tx.send(IncomingEvent::Command(incoming)).await;
                    }
                    Ok(())
                }
            });

            let pick_branch =
                Update::filter_callback_query().endpoint(move |query: CallbackQuery| {
                    let tx = pick_tx.clone();
                    let allowed = allowed_for_picks.clone();
                    async move {
                        let (chat_id, message_id) = match query.message.as_ref() {
                            Some(message) => (message.chat().id.0, message.id().0 as i64),
                            None => {
                                return Ok::<(), Box<dyn std::error::Error + Send + Sync>>(())
                            }
                        };
                        if !chat_allowed(&allowed, chat_id) {
                            return Ok(());
                        }

                        if let Some(value) = query.data.clone() {
                            let pick = MenuPick {
                                chat_id,
                                user_id: query.from.id.0 as i64,
                                message_id,
                                callback_id: query.id.to_string(),
                                value,
                            };
                            let _ = tx.send(IncomingEvent::MenuPick(pick)).await;
                        }
                        Ok(())
                    }
                });

            let handler = dptree::entry().branch(message_branch).branch(pick_branch);

            let mut dispatcher = Dispatcher::builder(bot, handler)
                .enable_ctrlc_handler()
                .build();

            let shutdown_token = dispatcher.shutdown_token();
            let cancel_clone = cancel.clone();
            tokio::spawn(async move {
                cancel_clone.cancelled().await;
                let _ = shutdown_token.shutdown();
            });

            dispatcher.dispatch().await;
        });

        Ok(())
    }

    async fn stop(&self) -> Result<(), BotError> {
        self.cancel_token.cancel();
        Ok(())
    }

    async fn send_message(&self, chat_id: i64, text: &str) -> Result<i64, BotError> {
        use teloxide::prelude::*;
        use teloxide::types::ChatId;

        let mut first_id = None;
        for chunk in split_message(text, self.config.max_message_length) {
            let sent = self
                .bot
                .send_message(ChatId(chat_id), &chunk)
                .await
                .map_err(|e| BotError::SendFailed(e.to_string()))?;
            first_id.get_or_insert(sent.id.0 as i64);
        }
        // split_message never returns an empty set for non-empty input.
        first_id.ok_or_else(|| BotError::SendFailed("empty message".to_string()))
    }

    async fn edit_message(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
    ) -> Result<(), BotError> {
        use teloxide::prelude::*;
        use teloxide::types::{ChatId, MessageId};

        let chunks = split_message(text, self.config.max_message_length);
        let (head, rest) = chunks.split_first().ok_or_else(|| {
            BotError::SendFailed("empty message".to_string())
        })?;

        self.bot
            .edit_message_text(ChatId(chat_id), MessageId(message_id as i32), head)
            .await
            .map_err(|e| BotError::SendFailed(e.to_string()))?;

        // Overflow beyond the edited message goes out as follow-ups.
        for chunk in rest {
            self.bot
                .send_message(ChatId(chat_id), chunk)
                .await
                .map_err(|e| BotError::SendFailed(e.to_string()))?;
        }
        Ok(())
    }

    async fn present_menu(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        options: &[MenuOption],
    ) -> Result<(), BotError> {
        use teloxide::prelude::*;
        use teloxide::types::{ChatId, InlineKeyboardButton, InlineKeyboardMarkup, MessageId};

        let rows: Vec<Vec<InlineKeyboardButton>> = options
            .iter()
            .map(|option| {
                vec![InlineKeyboardButton::callback(
                    format!("{} ({})", option.label, option.description),
                    option.value.clone(),
                )]
            })
            .collect();

        self.bot
            .edit_message_text(ChatId(chat_id), MessageId(message_id as i32), text)
            .reply_markup(InlineKeyboardMarkup::new(rows))
            .await
            .map_err(|e| BotError::SendFailed(e.to_string()))?;
        Ok(())
    }

    async fn acknowledge_pick(&self, callback_id: &str) -> Result<(), BotError> {
        use teloxide::prelude::*;

        self.bot
            .answer_callback_query(teloxide::types::CallbackQueryId(callback_id.to_string()))
            .await
            .map_err(|e| BotError::SendFailed(e.to_string()))?;
        Ok(())
    }
}
