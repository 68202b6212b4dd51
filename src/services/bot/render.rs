//! Response Mapper
//!
//! Converts control API outcomes into chat-friendly text. Holds the status
//! to color and status to glyph mappings and the exact user-facing strings
//! for every terminal rendering.

use crate::services::control::{ApiResult, GameServer, HealthStatus, ServerStatus};

use super::types::ServerAction;

/// Acknowledgment shown while a remote call is pending; always edited in
/// place into the terminal rendering.
pub const WORKING_TEXT: &str = "Working...";

/// Terminal rendering for a selection menu nobody answered in time.
pub const TIMEOUT_TEXT: &str = "Timed out.";

/// Embed color for a server status, for surfaces that can render one.
pub fn status_color(status: ServerStatus) -> u32 {
    match status {
        ServerStatus::Running => 0x57f287,
        ServerStatus::Stopped => 0xed4245,
        ServerStatus::Starting => 0xfee75c,
        ServerStatus::Stopping => 0xe67e22,
        ServerStatus::Error => 0xed4245,
        _ => 0x95a5a6,
    }
}

/// One-glyph indicator for a server status.
pub fn status_glyph(status: ServerStatus) -> &'static str {
    match status {
        ServerStatus::Running => "🟢",
        ServerStatus::Stopped => "🔴",
        ServerStatus::Starting => "🟡",
        ServerStatus::Stopping => "🟠",
        ServerStatus::Error => "❌",
        _ => "⚪",
    }
}

/// Structured summary of a remote call outcome: a title, a color keyed to
/// the relevant status, and labeled fields. Text-only surfaces render it
/// with `render`; richer surfaces may use the parts directly.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusCard {
    pub title: String,
    pub color: u32,
    pub description: Option<String>,
    pub fields: Vec<(&'static str, String)>,
    pub footer: Option<&'static str>,
}

impl StatusCard {
    pub fn render(&self) -> String {
        let mut text = self.title.clone();
        if let Some(ref description) = self.description {
            text.push('\n');
            text.push_str(description);
        }
        for (label, value) in &self.fields {
            text.push('\n');
            text.push_str(label);
            text.push_str(": ");
            text.push_str(value);
        }
        if let Some(footer) = self.footer {
            text.push('\n');
            text.push_str(footer);
        }
        text
    }
}

/// Response formatter for chat display.
pub struct ResponseMapper;

impl ResponseMapper {
    /// Card shown after a server was created.
    pub fn created_card(server: &GameServer) -> StatusCard {
        StatusCard {
            title: "Server Created".to_string(),
            color: status_color(server.status),
            description: Some(format!("{} is being provisioned.", server.name)),
            fields: vec![
                ("Modpack", modpack_label(server)),
                ("Status", server.status.to_string()),
            ],
            footer: Some("Use /server start to bring it online"),
        }
    }

    /// Card shown for /server status.
    pub fn status_card(server: &GameServer) -> StatusCard {
        StatusCard {
            title: server.name.clone(),
            color: status_color(server.status),
            description: None,
            fields: vec![
                (
                    "Status",
                    format!("{} {}", status_glyph(server.status), server.status),
                ),
                ("Modpack", modpack_label(server)),
                (
                    "Port",
                    server
                        .port
                        .map(|port| port.to_string())
                        .unwrap_or_else(|| "N/A".to_string()),
                ),
            ],
            footer: None,
        }
    }

    /// One line per server, glyph first.
    pub fn format_server_list(servers: &[GameServer]) -> String {
        if servers.is_empty() {
            return "No servers found. Create one with /server create".to_string();
        }
        let mut text = "Game Servers".to_string();
        for server in servers {
            text.push_str(&format!(
                "\n{} {} - {} ({})",
                status_glyph(server.status),
                server.name,
                modpack_label(server),
                server.status
            ));
        }
        text
    }

    /// Progress text after a start/stop pick was accepted by the API.
    pub fn format_action_started(action: ServerAction, name: &str) -> String {
        format!("{} {}...", action.gerund(), name)
    }

    /// Confirmation after a delete.
    pub fn format_deleted(name: &str) -> String {
        format!("Deleted {}.", name)
    }

    /// Health card covering the bot itself and the control API.
    pub fn health_card(result: &ApiResult<HealthStatus>, api_url: &str) -> StatusCard {
        let (color, api_line) = match result {
            ApiResult::Success(_) => (0x57f287, "🟢 Connected".to_string()),
            ApiResult::Failure(error) => (0xed4245, format!("🔴 {}", error)),
        };
        StatusCard {
            title: "Health Check".to_string(),
            color,
            description: None,
            fields: vec![
                ("Bot", "🟢 Online".to_string()),
                ("Control API", api_line),
                ("API URL", api_url.to_string()),
            ],
            footer: None,
        }
    }

    /// Plain error naming the attempted operation.
    pub fn format_failure(operation: &str, error: &str) -> String {
        format!("Failed to {}: {}", operation, error)
    }
}

fn modpack_label(server: &GameServer) -> String {
    server
        .modpack
        .clone()
        .unwrap_or_else(|| "vanilla".to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
