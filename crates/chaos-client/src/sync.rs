//! Configuration sync between the editor state and the engine.

use crate::client::AdminClient;
use crate::error::ClientError;
use chaos_types::models::{ConnectionState, EditState, PullOutcome, PushOutcome};
use chaos_types::EditorState;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

/// Drives the pull/push protocol for a shared [`EditorState`].
///
/// The state lock is held only to hand out and return tickets, never across
/// a request, so edits stay possible while a call is in flight.
#[derive(Debug, Clone)]
pub struct SyncClient {
    admin: AdminClient,
    state: Arc<Mutex<EditorState>>,
}

impl SyncClient {
    pub fn new(admin: AdminClient) -> Self {
        Self { admin, state: Arc::new(Mutex::new(EditorState::new())) }
    }

    pub fn admin(&self) -> &AdminClient {
        &self.admin
    }

    /// Lock the editor for reading or editing.
    pub async fn editor(&self) -> MutexGuard<'_, EditorState> {
        self.state.lock().await
    }

    /// Fetch the engine's configuration and merge it into the editor.
    pub async fn pull(&self) -> ConnectionState {
        let ticket = self.state.lock().await.begin_pull();

        let outcome = match self.admin.fetch_config().await {
            Ok(raw) => PullOutcome::Loaded(raw),
            Err(e) => {
                log_failure("pull", &e);
                pull_failure(&e)
            },
        };

        let mut state = self.state.lock().await;
        state.finish_pull(ticket, outcome);
        tracing::info!("Config pull finished: {:?}", state.connection());
        state.connection()
    }

    /// Send the complete current configuration to the engine.
    pub async fn push(&self) -> EditState {
        let ticket = self.state.lock().await.begin_push();

        let outcome = match self.admin.push_config(ticket.payload()).await {
            Ok(()) => PushOutcome::Accepted,
            Err(e) => {
                log_failure("push", &e);
                match e.status() {
                    Some(status) => PushOutcome::Rejected { status },
                    None => PushOutcome::Unreachable,
                }
            },
        };

        let mut state = self.state.lock().await;
        state.finish_push(&ticket, outcome, now());
        state.edit_state()
    }

    /// Current status indicator text.
    pub async fn status_text(&self) -> &'static str {
        self.state.lock().await.status_text(now())
    }
}

fn log_failure(op: &str, e: &ClientError) {
    if e.is_transport() {
        tracing::warn!("Config {} failed, engine unreachable: {}", op, e);
    } else {
        tracing::warn!("Config {} failed: {}", op, e);
    }
}

fn pull_failure(e: &ClientError) -> PullOutcome {
    match e.status() {
        Some(status) => PullOutcome::ServerError { status },
        None => PullOutcome::Offline,
    }
}

/// Wall clock that follows tokio's clock, so paused-time tests see the
/// confirmation expire.
fn now() -> std::time::Instant {
    tokio::time::Instant::now().into_std()
}
