//! Craftops Bot - Library
//!
//! Chat-driven remote control for managed game servers. The bot translates
//! Telegram commands into calls against the homelab control API and renders
//! the outcomes back into the chat, including short-lived interactive
//! selection menus for start/stop targets.

pub mod config;
pub mod services;

pub use config::{AppConfig, ConfigError};
pub use services::bot::adapters::telegram::TelegramAdapter;
pub use services::bot::adapters::ChatAdapter;
pub use services::bot::gateway::BotGateway;
pub use services::bot::types::TelegramConfig;
pub use services::control::{ApiResult, ControlClient, GameServer, ServerStatus};
