//! Bot Gateway
//!
//! Owns the adapter lifecycle and the event loop. Incoming commands are
//! parsed by `CommandRouter` and handled in their own spawned task, so a
//! selection flow awaiting a pick never blocks other users' commands. Each
//! handler acknowledges immediately with a "Working..." message, performs
//! exactly one control API call sequence, and edits the acknowledgment in
//! place into exactly one terminal rendering.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

use crate::services::control::{ApiResult, ControlClient, CreateServerRequest, GameServer};

use super::adapters::ChatAdapter;
use super::commands::{CommandRouter, HELP_TEXT};
use super::render::{ResponseMapper, TIMEOUT_TEXT, WORKING_TEXT};
use super::selection::{
    wait_for_pick, PendingSelection, SelectionOutcome, SelectionRegistry, SelectionSession,
    SELECTION_PROMPT, SELECTION_TIMEOUT,
};
use super::types::{BotCommand, BotError, IncomingCommand, IncomingEvent, MenuOption, MenuPick, ServerAction};

/// Gateway service wiring the chat adapter to the control API client.
pub struct BotGateway {
    context: GatewayContext,
    cancel_token: CancellationToken,
}

/// Shared handler state, cloned into each spawned command task.
#[derive(Clone)]
struct GatewayContext {
    adapter: Arc<dyn ChatAdapter>,
    client: Arc<ControlClient>,
    pending: Arc<SelectionRegistry>,
    selection_timeout: Duration,
}

impl BotGateway {
    pub fn new(adapter: Arc<dyn ChatAdapter>, client: Arc<ControlClient>) -> Self {
        Self::with_selection_timeout(adapter, client, SELECTION_TIMEOUT)
    }

    /// Construction-time override of the selection bound. The bound stays
    /// fixed for the life of the gateway; nothing reconfigures it per call.
    pub fn with_selection_timeout(
        adapter: Arc<dyn ChatAdapter>,
        client: Arc<ControlClient>,
        selection_timeout: Duration,
    ) -> Self {
        Self {
            context: GatewayContext {
                adapter,
                client,
                pending: Arc::new(SelectionRegistry::new()),
                selection_timeout,
            },
            cancel_token: CancellationToken::new(),
        }
    }

    /// Start the adapter and the event processing loop.
    pub async fn start(&self) -> Result<(), BotError> {
        let (tx, mut rx) = mpsc::channel::<IncomingEvent>(100);
        self.context.adapter.start(tx).await?;

        let context = self.context.clone();
        let cancel = self.cancel_token.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    Some(event) = rx.recv() => {
                        let context = context.clone();
                        tokio::spawn(async move {
                            match event {
                                IncomingEvent::Command(command) => {
                                    context.handle_command(command).await;
                                }
                                IncomingEvent::MenuPick(pick) => {
                                    context.handle_pick(pick).await;
                                }
                            }
                        });
                    }
                    _ = cancel.cancelled() => {
                        break;
                    }
                }
            }
        });

        tracing::info!("bot gateway started");
        Ok(())
    }

    /// Stop the gateway gracefully.
    pub async fn stop(&self) -> Result<(), BotError> {
        self.cancel_token.cancel();
        self.context.adapter.stop().await?;
        tracing::info!("bot gateway stopped");
        Ok(())
    }
}

impl GatewayContext {
    async fn handle_command(&self, incoming: IncomingCommand) {
        let Some(command) = CommandRouter::parse(&incoming.text) else {
            tracing::debug!(chat_id = incoming.chat_id, "ignoring unrecognized message");
            return;
        };
        tracing::debug!(
            chat_id = incoming.chat_id,
            user_id = incoming.user_id,
            received_at = %incoming.timestamp,
            command = ?command,
            "dispatching command"
        );

        let chat_id = incoming.chat_id;
        match command {
            BotCommand::Help => {
                self.send(chat_id, HELP_TEXT).await;
            }
            BotCommand::Usage(usage) => {
                self.send(chat_id, usage).await;
            }
            BotCommand::Create { name, modpack } => {
                self.handle_create(chat_id, incoming.user_id, name, modpack).await;
            }
            BotCommand::List => self.handle_list(chat_id).await,
            BotCommand::Status { name } => self.handle_status(chat_id, &name).await,
            BotCommand::Delete { name } => self.handle_delete(chat_id, &name).await,
            BotCommand::Health => self.handle_health(chat_id).await,
            BotCommand::Start => {
                self.handle_interactive(chat_id, ServerAction::Start).await;
            }
            BotCommand::Stop => {
                self.handle_interactive(chat_id, ServerAction::Stop).await;
            }
        }
    }

    async fn handle_create(&self, chat_id: i64, user_id: i64, name: String, modpack: String) {
        let Some(ack_id) = self.acknowledge(chat_id).await else {
            return;
        };
        let request = CreateServerRequest {
            name,
            modpack,
            created_by: user_id.to_string(),
        };
        let text = match self.client.create(&request).await {
            ApiResult::Success(server) => ResponseMapper::created_card(&server).render(),
            ApiResult::Failure(error) => ResponseMapper::format_failure("create server", &error),
        };
        self.finish(chat_id, ack_id, &text).await;
    }

    async fn handle_list(&self, chat_id: i64) {
        let Some(ack_id) = self.acknowledge(chat_id).await else {
            return;
        };
        let text = match self.client.list().await {
            ApiResult::Success(servers) => ResponseMapper::format_server_list(&servers),
            ApiResult::Failure(error) => ResponseMapper::format_failure("list servers", &error),
        };
        self.finish(chat_id, ack_id, &text).await;
    }

    async fn handle_status(&self, chat_id: i64, name: &str) {
        let Some(ack_id) = self.acknowledge(chat_id).await else {
            return;
        };
        let text = match self.client.get(name).await {
            ApiResult::Success(server) => ResponseMapper::status_card(&server).render(),
            ApiResult::Failure(error) => ResponseMapper::format_failure("get status", &error),
        };
        self.finish(chat_id, ack_id, &text).await;
    }

    async fn handle_delete(&self, chat_id: i64, name: &str) {
        let Some(ack_id) = self.acknowledge(chat_id).await else {
            return;
        };
        let text = match self.client.delete(name).await {
            ApiResult::Success(()) => ResponseMapper::format_deleted(name),
            ApiResult::Failure(error) => ResponseMapper::format_failure("delete server", &error),
        };
        self.finish(chat_id, ack_id, &text).await;
    }

    async fn handle_health(&self, chat_id: i64) {
        let Some(ack_id) = self.acknowledge(chat_id).await else {
            return;
        };
        let result = self.client.health().await;
        let text = ResponseMapper::health_card(&result, self.client.base_url()).render();
        self.finish(chat_id, ack_id, &text).await;
    }

    /// Interactive start/stop: list, filter by required status, present a
    /// menu, and race the pick against the bound.
    async fn handle_interactive(&self, chat_id: i64, action: ServerAction) {
        let Some(ack_id) = self.acknowledge(chat_id).await else {
            return;
        };

        let servers = match self.client.list().await {
            ApiResult::Success(servers) => servers,
            ApiResult::Failure(error) => {
                let text = ResponseMapper::format_failure("list servers", &error);
                self.finish(chat_id, ack_id, &text).await;
                return;
            }
        };

        let required = action.required_status();
        let candidates: Vec<GameServer> = servers
            .into_iter()
            .filter(|server| server.status == required)
            .collect();
        if candidates.is_empty() {
            self.finish(chat_id, ack_id, action.empty_candidates_text())
                .await;
            return;
        }

        let options = menu_options(&candidates);
        if let Err(error) = self
            .adapter
            .present_menu(chat_id, ack_id, SELECTION_PROMPT, &options)
            .await
        {
            tracing::warn!(chat_id, %error, "failed to present selection menu");
            return;
        }

        let session = Arc::new(SelectionSession::new(candidates));
        let (pick_tx, pick_rx) = oneshot::channel();
        self.pending.insert(
            (chat_id, ack_id),
            Arc::new(PendingSelection::new(session.clone(), pick_tx)),
        );

        let outcome = wait_for_pick(&session, pick_rx, self.selection_timeout).await;
        // The pick path already removed the entry; this covers the timeout.
        self.pending.remove(&(chat_id, ack_id));

        match outcome {
            SelectionOutcome::Picked(server) => {
                let result = match action {
                    ServerAction::Start => self.client.start(&server.name).await,
                    ServerAction::Stop => self.client.stop(&server.name).await,
                };
                let text = match result {
                    ApiResult::Success(_) => {
                        ResponseMapper::format_action_started(action, &server.name)
                    }
                    ApiResult::Failure(error) => {
                        ResponseMapper::format_failure(action.failure_label(), &error)
                    }
                };
                self.finish(chat_id, ack_id, &text).await;
            }
            SelectionOutcome::TimedOut => {
                self.finish(chat_id, ack_id, TIMEOUT_TEXT).await;
            }
            SelectionOutcome::Superseded => {}
        }
    }

    /// Route a menu pick to its pending flow. Picks with no pending entry
    /// (late after timeout, or duplicates) are acknowledged and dropped.
    async fn handle_pick(&self, pick: MenuPick) {
        if let Err(error) = self.adapter.acknowledge_pick(&pick.callback_id).await {
            tracing::warn!(chat_id = pick.chat_id, %error, "failed to acknowledge pick");
        }

        let Some((_, pending)) = self.pending.remove(&(pick.chat_id, pick.message_id)) else {
            tracing::debug!(
                chat_id = pick.chat_id,
                message_id = pick.message_id,
                "stale menu pick ignored"
            );
            return;
        };

        match pick.value.parse::<usize>() {
            Ok(index) => {
                if !pending.deliver_pick(index) {
                    tracing::debug!(chat_id = pick.chat_id, "pick already delivered");
                }
            }
            Err(_) => {
                tracing::warn!(
                    chat_id = pick.chat_id,
                    value = %pick.value,
                    "malformed pick value"
                );
            }
        }
    }

    /// Send a standalone reply; help and usage texts need no acknowledgment.
    async fn send(&self, chat_id: i64, text: &str) {
        if let Err(error) = self.adapter.send_message(chat_id, text).await {
            tracing::warn!(chat_id, %error, "failed to send reply");
        }
    }

    /// Send the immediate acknowledgment; its message id is the handle every
    /// later edit targets.
    async fn acknowledge(&self, chat_id: i64) -> Option<i64> {
        match self.adapter.send_message(chat_id, WORKING_TEXT).await {
            Ok(message_id) => Some(message_id),
            Err(error) => {
                tracing::warn!(chat_id, %error, "failed to acknowledge command");
                None
            }
        }
    }

    /// Replace the acknowledgment with the terminal rendering.
    async fn finish(&self, chat_id: i64, message_id: i64, text: &str) {
        if let Err(error) = self.adapter.edit_message(chat_id, message_id, text).await {
            tracing::warn!(chat_id, %error, "failed to deliver response");
        }
    }
}

/// One menu option per candidate: label is the server name, subtitle the
/// modpack (or "vanilla"), value the candidate index.
fn menu_options(candidates: &[GameServer]) -> Vec<MenuOption> {
    candidates
        .iter()
        .enumerate()
        .map(|(index, server)| MenuOption {
            value: index.to_string(),
            label: server.name.clone(),
            description: server
                .modpack
                .clone()
                .unwrap_or_else(|| "vanilla".to_string()),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
