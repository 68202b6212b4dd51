//! Interactive Selection Flow
//!
//! A selection flow shows a menu of eligible servers and waits a bounded
//! time for exactly one pick. The pick arrives from the chat platform's
//! event stream while the timeout fires locally, so the two signals race
//! against the same pending flow. Both paths must pass
//! `SelectionSession::try_resolve` before rendering anything; the
//! compare-and-set guarantees at most one terminal transition even if the
//! losing signal arrives late.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::oneshot;

use crate::services::control::GameServer;

/// Fixed bound on how long a menu waits for a pick.
pub const SELECTION_TIMEOUT: Duration = Duration::from_secs(60);

/// Prompt text shown above a selection menu.
pub const SELECTION_PROMPT: &str = "Which server?";

/// State of one interactive flow, private to its invocation.
///
/// `resolved` transitions false to true exactly once; after that neither
/// signal path may touch the chat again.
#[derive(Debug)]
pub struct SelectionSession {
    candidates: Vec<GameServer>,
    resolved: AtomicBool,
    chosen: Mutex<Option<String>>,
}

impl SelectionSession {
    pub fn new(candidates: Vec<GameServer>) -> Self {
        Self {
            candidates,
            resolved: AtomicBool::new(false),
            chosen: Mutex::new(None),
        }
    }

    pub fn candidates(&self) -> &[GameServer] {
        &self.candidates
    }

    pub fn candidate(&self, index: usize) -> Option<&GameServer> {
        self.candidates.get(index)
    }

    /// First-signal-wins transition. Returns true for the caller that
    /// actually resolved the session; every later call is a no-op.
    pub fn try_resolve(&self, choice: Option<&str>) -> bool {
        if self
            .resolved
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            *self.chosen.lock().expect("selection lock poisoned") =
                choice.map(|name| name.to_string());
            true
        } else {
            false
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved.load(Ordering::SeqCst)
    }

    pub fn chosen_name(&self) -> Option<String> {
        self.chosen.lock().expect("selection lock poisoned").clone()
    }
}

/// A menu waiting for its pick: the session plus the one-shot channel the
/// gateway uses to deliver the winning index.
pub struct PendingSelection {
    pub session: Arc<SelectionSession>,
    pick_tx: Mutex<Option<oneshot::Sender<usize>>>,
}

impl PendingSelection {
    pub fn new(session: Arc<SelectionSession>, pick_tx: oneshot::Sender<usize>) -> Self {
        Self {
            session,
            pick_tx: Mutex::new(Some(pick_tx)),
        }
    }

    /// Deliver a pick to the waiting flow. Only the first call can take the
    /// sender; anything after that reports false and does nothing.
    pub fn deliver_pick(&self, index: usize) -> bool {
        let sender = self.pick_tx.lock().expect("pick lock poisoned").take();
        match sender {
            Some(tx) => tx.send(index).is_ok(),
            None => false,
        }
    }
}

/// Pending menus across all chats, keyed by `(chat_id, message_id)` of the
/// menu message. Entries are removed by whichever race branch fires first.
pub type SelectionRegistry = DashMap<(i64, i64), Arc<PendingSelection>>;

/// Terminal outcome of the bounded wait.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionOutcome {
    /// The user picked this server and the session resolved through it.
    Picked(GameServer),
    /// The bound elapsed (or the pick channel collapsed) first.
    TimedOut,
    /// The session was already resolved by the other branch; render nothing.
    Superseded,
}

/// Race a delivered pick against the timeout bound.
///
/// Whichever branch fires first must still win the `try_resolve`
/// check-and-set before it may render; the loser gets `Superseded`.
pub async fn wait_for_pick(
    session: &Arc<SelectionSession>,
    pick_rx: oneshot::Receiver<usize>,
    bound: Duration,
) -> SelectionOutcome {
    match tokio::time::timeout(bound, pick_rx).await {
        Ok(Ok(index)) => match session.candidate(index) {
            Some(server) if session.try_resolve(Some(&server.name)) => {
                SelectionOutcome::Picked(server.clone())
            }
            Some(_) => SelectionOutcome::Superseded,
            // Out-of-range index never comes from our own menus; close the
            // flow as a timeout rather than leave the menu dangling.
            None => {
                if session.try_resolve(None) {
                    SelectionOutcome::TimedOut
                } else {
                    SelectionOutcome::Superseded
                }
            }
        },
        _ => {
            if session.try_resolve(None) {
                SelectionOutcome::TimedOut
            } else {
                SelectionOutcome::Superseded
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
