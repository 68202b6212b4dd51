//! Command Router
//!
//! Parses incoming text messages into structured `BotCommand` variants.
//! Unknown commands and unknown sub-operations parse to `None` and are
//! silently ignored by the gateway; known sub-operations with missing
//! arguments parse to a usage reply.

use super::types::BotCommand;

const SERVER_USAGE: &str =
    "Usage: /server <create|list|status|start|stop|delete> -- see /help";
const CREATE_USAGE: &str = "Usage: /server create <name> <modpack>";
const STATUS_USAGE: &str = "Usage: /server status <name>";
const DELETE_USAGE: &str = "Usage: /server delete <name>";

/// Stateless command parser for chat messages.
pub struct CommandRouter;

impl CommandRouter {
    /// Parse message text into a `BotCommand`.
    ///
    /// Supported commands:
    /// - `/server create <name> <modpack>` -> Create
    /// - `/server list` -> List
    /// - `/server status <name>` -> Status
    /// - `/server start` -> Start
    /// - `/server stop` -> Stop
    /// - `/server delete <name>` -> Delete
    /// - `/health` -> Health
    /// - `/help`, `/start` -> Help
    ///
    /// Returns `None` for plain text, unknown commands, and unknown
    /// sub-operations.
    pub fn parse(text: &str) -> Option<BotCommand> {
        let mut parts = text.trim().split_whitespace();
        let head = parts.next()?;
        // Group chats address commands as /server@BotName.
        let head = head.split('@').next().unwrap_or(head);

        match head {
            "/health" => Some(BotCommand::Health),
            "/help" | "/start" => Some(BotCommand::Help),
            "/server" => match parts.next() {
                Some("create") => match (parts.next(), parts.next()) {
                    (Some(name), Some(modpack)) => Some(BotCommand::Create {
                        name: name.to_string(),
                        modpack: modpack.to_string(),
                    }),
                    _ => Some(BotCommand::Usage(CREATE_USAGE)),
                },
                Some("list") => Some(BotCommand::List),
                Some("status") => match parts.next() {
                    Some(name) => Some(BotCommand::Status {
                        name: name.to_string(),
                    }),
                    None => Some(BotCommand::Usage(STATUS_USAGE)),
                },
                Some("start") => Some(BotCommand::Start),
                Some("stop") => Some(BotCommand::Stop),
                Some("delete") => match parts.next() {
                    Some(name) => Some(BotCommand::Delete {
                        name: name.to_string(),
                    }),
                    None => Some(BotCommand::Usage(DELETE_USAGE)),
                },
                None => Some(BotCommand::Usage(SERVER_USAGE)),
                // Unknown sub-operation: ignored.
                Some(_) => None,
            },
            _ => None,
        }
    }
}

/// Help text displayed for /help and /start.
pub const HELP_TEXT: &str = r#"Game Server Control

Available commands:
  /server create <name> <modpack>  -- Create a new server
  /server list                     -- List all servers
  /server status <name>            -- Show one server's status
  /server start                    -- Pick a stopped server to start
  /server stop                     -- Pick a running server to stop
  /server delete <name>            -- Delete a server
  /health                          -- Bot and control API health
  /help                            -- Show this help

Examples:
  /server create atm10 all-the-mods-10
  /server status atm10
"#;
