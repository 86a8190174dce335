use crate::history::HistoryLoader;
use crate::send::{SendController, TurnHandle};

use murmur_core::{BusySignal, Config, MessageStore, PlaybackScheduler, RevealOutcome};
use murmur_transport::ChatService;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

/// One conversation with the chat service
///
/// Owns the message store, the busy signal and the cancellation token shared
/// by history replay and live turns. While history is loading, input is
/// held so the history batch always lands ahead of the first turn.
/// Dropping the session cancels any pending reveal.
pub struct ChatSession {
    session_id: String,
    store: MessageStore,
    busy: BusySignal,
    cancel: CancellationToken,
    history: HistoryLoader,
    sender: SendController,
    started: AtomicBool,
    history_pending: watch::Sender<bool>,
}

impl ChatSession {
    pub fn new(config: &Config, service: Arc<dyn ChatService>) -> Self {
        let store = MessageStore::new();
        let busy = BusySignal::new();
        let cancel = CancellationToken::new();
        let scheduler = PlaybackScheduler::new(store.clone(), busy.clone(), config.playback.pacing())
            .with_sentinel(config.playback.sentinel)
            .with_cancel_token(cancel.clone());

        let messages = &config.messages;
        let history = HistoryLoader::new(
            Arc::clone(&service),
            scheduler.clone(),
            config.playback.history_order,
            messages.network_error.clone(),
        );
        let sender = SendController::new(service, scheduler, messages.no_response.clone(), messages.network_error.clone());

        Self {
            session_id: config.session_id.clone(),
            store,
            busy,
            cancel,
            history,
            sender,
            started: AtomicBool::new(false),
            history_pending: watch::Sender::new(false),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn store(&self) -> &MessageStore {
        &self.store
    }

    pub fn busy(&self) -> &BusySignal {
        &self.busy
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    pub fn is_shut_down(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Whether a history replay has started and not yet finished
    pub fn is_loading_history(&self) -> bool {
        *self.history_pending.borrow()
    }

    pub fn subscribe_history(&self) -> watch::Receiver<bool> {
        self.history_pending.subscribe()
    }

    /// Replay the session history. Runs once; later calls return `None`.
    pub async fn start(&self) -> Option<RevealOutcome> {
        if !self.begin_history() {
            return None;
        }
        Some(self.replay_history().await)
    }

    /// Like [`ChatSession::start`], but on a spawned task. Input is held from
    /// the moment this returns, before the task is first polled.
    pub fn spawn_start(self: &Arc<Self>) -> Option<JoinHandle<RevealOutcome>> {
        if !self.begin_history() {
            return None;
        }
        let session = Arc::clone(self);
        Some(tokio::spawn(async move { session.replay_history().await }))
    }

    fn begin_history(&self) -> bool {
        if self.started.swap(true, Ordering::AcqRel) {
            tracing::debug!(session_id = %self.session_id, "history already replayed");
            return false;
        }
        self.history_pending.send_replace(true);
        true
    }

    async fn replay_history(&self) -> RevealOutcome {
        let span = tracing::info_span!("history", session_id = %self.session_id);
        let outcome = self.history.replay(&self.session_id).instrument(span).await;
        self.history_pending.send_replace(false);
        outcome
    }

    /// Forward composer input to the send path. See [`SendController::submit`].
    ///
    /// Returns `None` with `buffer` untouched while history is loading.
    pub fn submit(&self, buffer: &mut String) -> Option<TurnHandle> {
        let _guard = tracing::info_span!("session", session_id = %self.session_id).entered();
        if self.is_loading_history() {
            tracing::info!("history still loading, input held");
            return None;
        }
        self.sender.submit(buffer)
    }

    /// Cancel in-flight work and stop accepting appends.
    pub fn shutdown(&self) {
        if self.cancel.is_cancelled() {
            return;
        }
        tracing::info!(session_id = %self.session_id, messages = self.store.len(), "chat session shutting down");
        self.cancel.cancel();
        self.store.close();
    }
}

impl Drop for ChatSession {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
