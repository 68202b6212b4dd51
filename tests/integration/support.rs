//! Shared test doubles: an in-process control API and a recording chat
//! adapter.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::sync::mpsc;

use craftops_bot::services::bot::adapters::ChatAdapter;
use craftops_bot::services::bot::types::{BotError, IncomingEvent, MenuOption};

// ---------------------------------------------------------------------------
// Mock control API
// ---------------------------------------------------------------------------

/// Handle to a running mock control API.
pub struct MockControlApi {
    pub base_url: String,
    /// Names passed to the start endpoint, percent-decoded.
    pub started: Arc<Mutex<Vec<String>>>,
    /// Names passed to the stop endpoint, percent-decoded.
    pub stopped: Arc<Mutex<Vec<String>>>,
    /// Bodies received by the create endpoint.
    pub created: Arc<Mutex<Vec<Value>>>,
    /// Names passed to the get endpoint, percent-decoded.
    pub fetched: Arc<Mutex<Vec<String>>>,
}

pub fn server_json(name: &str, status: &str, modpack: Option<&str>) -> Value {
    json!({
        "name": name,
        "status": status,
        "modpack": modpack,
        "port": 25565,
        "createdBy": "111222333",
    })
}

/// Spawns a mock control API serving the given fixed server list.
pub async fn spawn_control_api(servers: Vec<Value>) -> MockControlApi {
    let started = Arc::new(Mutex::new(Vec::new()));
    let stopped = Arc::new(Mutex::new(Vec::new()));
    let created = Arc::new(Mutex::new(Vec::new()));
    let fetched = Arc::new(Mutex::new(Vec::new()));

    let list_servers = servers.clone();
    let get_servers = servers.clone();
    let started_rec = started.clone();
    let stopped_rec = stopped.clone();
    let created_rec = created.clone();
    let fetched_rec = fetched.clone();

    let app = Router::new()
        .route(
            "/api/game-servers",
            get(move || {
                let servers = list_servers.clone();
                async move { Json(servers) }
            })
            .post(move |Json(body): Json<Value>| {
                let created = created_rec.clone();
                async move {
                    created.lock().unwrap().push(body.clone());
                    let name = body["name"].as_str().unwrap_or_default().to_string();
                    let modpack = body["modpack"].clone();
                    Json(json!({
                        "name": name,
                        "status": "creating",
                        "modpack": modpack,
                        "createdBy": body["createdBy"].clone(),
                    }))
                }
            }),
        )
        .route(
            "/api/game-servers/:name",
            get(move |Path(name): Path<String>| {
                let servers = get_servers.clone();
                let fetched = fetched_rec.clone();
                async move {
                    fetched.lock().unwrap().push(name.clone());
                    let found = servers
                        .iter()
                        .find(|server| server["name"].as_str() == Some(name.as_str()))
                        .cloned();
                    match found {
                        Some(server) => Ok(Json(server)),
                        // Empty body on purpose: clients must synthesize
                        // "HTTP 404" themselves.
                        None => Err(StatusCode::NOT_FOUND),
                    }
                }
            })
            .delete(move |Path(_name): Path<String>| async move { StatusCode::OK }),
        )
        .route(
            "/api/game-servers/:name/start",
            post(move |Path(name): Path<String>| {
                let started = started_rec.clone();
                async move {
                    started.lock().unwrap().push(name.clone());
                    Json(server_json(&name, "starting", None))
                }
            }),
        )
        .route(
            "/api/game-servers/:name/stop",
            post(move |Path(name): Path<String>| {
                let stopped = stopped_rec.clone();
                async move {
                    stopped.lock().unwrap().push(name.clone());
                    Json(server_json(&name, "stopping", None))
                }
            }),
        )
        .route("/health", get(|| async { Json(json!({"status": "ok"})) }));

    let base_url = serve(app).await;
    MockControlApi {
        base_url,
        started,
        stopped,
        created,
        fetched,
    }
}

/// Binds the router to an ephemeral port and serves it in the background.
pub async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock server");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock server failed");
    });
    format!("http://{}", addr)
}

// ---------------------------------------------------------------------------
// Mock chat adapter
// ---------------------------------------------------------------------------

/// Everything the gateway asked the adapter to do, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum AdapterCall {
    Sent {
        chat_id: i64,
        message_id: i64,
        text: String,
    },
    Edited {
        chat_id: i64,
        message_id: i64,
        text: String,
    },
    Menu {
        chat_id: i64,
        message_id: i64,
        text: String,
        options: Vec<MenuOption>,
    },
    PickAcknowledged {
        callback_id: String,
    },
}

/// Channel-backed `ChatAdapter` that records outgoing calls and lets tests
/// inject incoming events.
pub struct MockAdapter {
    events_tx: Mutex<Option<mpsc::Sender<IncomingEvent>>>,
    calls: Mutex<Vec<AdapterCall>>,
    next_message_id: AtomicI64,
}

impl MockAdapter {
    pub fn new() -> Self {
        Self {
            events_tx: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
            next_message_id: AtomicI64::new(1),
        }
    }

    /// Injects an event as if the platform delivered it.
    pub async fn inject(&self, event: IncomingEvent) {
        let tx = self
            .events_tx
            .lock()
            .unwrap()
            .clone()
            .expect("gateway not started");
        tx.send(event).await.expect("gateway loop gone");
    }

    pub fn calls(&self) -> Vec<AdapterCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Texts of the edits applied to the given message, in order.
    pub fn edits_of(&self, message_id: i64) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                AdapterCall::Edited {
                    message_id: id,
                    text,
                    ..
                } if id == message_id => Some(text),
                _ => None,
            })
            .collect()
    }

    /// Polls until the predicate holds over the recorded calls.
    pub async fn wait_for(
        &self,
        predicate: impl Fn(&[AdapterCall]) -> bool,
        timeout: Duration,
    ) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if predicate(&self.calls()) {
                return true;
            }
            if tokio::time::Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}

#[async_trait]
impl ChatAdapter for MockAdapter {
    async fn start(&self, events_tx: mpsc::Sender<IncomingEvent>) -> Result<(), BotError> {
        *self.events_tx.lock().unwrap() = Some(events_tx);
        Ok(())
    }

    async fn stop(&self) -> Result<(), BotError> {
        Ok(())
    }

    async fn send_message(&self, chat_id: i64, text: &str) -> Result<i64, BotError> {
        let message_id = self.next_message_id.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().unwrap().push(AdapterCall::Sent {
            chat_id,
            message_id,
            text: text.to_string(),
        });
        Ok(message_id)
    }

    async fn edit_message(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
    ) -> Result<(), BotError> {
        self.calls.lock().unwrap().push(AdapterCall::Edited {
            chat_id,
            message_id,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn present_menu(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        options: &[MenuOption],
    ) -> Result<(), BotError> {
        self.calls.lock().unwrap().push(AdapterCall::Menu {
            chat_id,
            message_id,
            text: text.to_string(),
            options: options.to_vec(),
        });
        Ok(())
    }

    async fn acknowledge_pick(&self, callback_id: &str) -> Result<(), BotError> {
        self.calls.lock().unwrap().push(AdapterCall::PickAcknowledged {
            callback_id: callback_id.to_string(),
        });
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Event builders
// ---------------------------------------------------------------------------

pub fn command(chat_id: i64, text: &str) -> IncomingEvent {
    IncomingEvent::Command(craftops_bot::services::bot::types::IncomingCommand {
        chat_id,
        user_id: 111222333,
        username: Some("operator".to_string()),
        text: text.to_string(),
        message_id: 900,
        timestamp: chrono::Utc::now(),
    })
}

pub fn menu_pick(chat_id: i64, message_id: i64, value: &str) -> IncomingEvent {
    IncomingEvent::MenuPick(craftops_bot::services::bot::types::MenuPick {
        chat_id,
        user_id: 111222333,
        message_id,
        callback_id: "cb-1".to_string(),
        value: value.to_string(),
    })
}
