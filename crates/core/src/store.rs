use crate::message::Utterance;

use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::watch;

/// Append-only conversation log
///
/// The log is the single source of truth for what the view displays.
/// Positions are permanent: nothing is ever reordered, replaced or removed.
/// After [`MessageStore::close`] every append is refused, which keeps late
/// timers from writing into a torn-down session.
#[derive(Debug, Clone)]
pub struct MessageStore {
    inner: Arc<RwLock<StoreInner>>,
    len_tx: Arc<watch::Sender<usize>>,
}

#[derive(Debug, Default)]
struct StoreInner {
    log: Vec<Utterance>,
    closed: bool,
}

impl MessageStore {
    pub fn new() -> Self {
        let (len_tx, _rx) = watch::channel(0);
        Self { inner: Arc::new(RwLock::new(StoreInner::default())), len_tx: Arc::new(len_tx) }
    }

    /// Append an utterance; returns `false` if the store was already closed.
    pub fn append(&self, utterance: Utterance) -> bool {
        let len = {
            let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
            if inner.closed {
                tracing::debug!(role = %utterance.role(), "dropping append to closed store");
                return false;
            }
            inner.log.push(utterance);
            inner.log.len()
        };
        self.len_tx.send_replace(len);
        true
    }

    /// Copy of the log in display order
    pub fn snapshot(&self) -> Vec<Utterance> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).log.clone()
    }

    /// Utterances appended at or after `from`, for incremental views
    pub fn since(&self, from: usize) -> Vec<Utterance> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.log.get(from..).map(<[Utterance]>::to_vec).unwrap_or_default()
    }

    pub fn last(&self) -> Option<Utterance> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).log.last().cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Refuse all further appends.
    pub fn close(&self) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).closed
    }

    /// Receiver that yields the log length after every append
    pub fn subscribe(&self) -> watch::Receiver<usize> {
        self.len_tx.subscribe()
    }
}

impl Default for MessageStore {
    fn default() -> Self {
        Self::new()
    }
}
