use crate::service::ChatService;
use crate::types::HistoryRecord;

use murmur_core::{Error, Result};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// Canned `/chat` outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedReply {
    Text { content: String },
    Empty,
    Error { message: String },
}

impl ScriptedReply {
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text { content: content.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error { message: message.into() }
    }
}

/// In-memory chat service for deterministic runs without a server
///
/// Replies are consumed in order; once the queue is exhausted every call
/// answers [`ScriptedReply::Empty`]. An optional latency is applied with
/// `tokio::time::sleep`, so paused-clock tests see it as virtual time.
#[derive(Clone, Default)]
pub struct ScriptedChatService {
    history: Arc<Mutex<Option<std::result::Result<Vec<HistoryRecord>, String>>>>,
    replies: Arc<Mutex<VecDeque<ScriptedReply>>>,
    sent: Arc<Mutex<Vec<String>>>,
    history_calls: Arc<AtomicUsize>,
    latency: Duration,
}

impl ScriptedChatService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history(self, records: Vec<HistoryRecord>) -> Self {
        *self.history.lock().unwrap_or_else(PoisonError::into_inner) = Some(Ok(records));
        self
    }

    pub fn with_history_error(self, message: impl Into<String>) -> Self {
        *self.history.lock().unwrap_or_else(PoisonError::into_inner) = Some(Err(message.into()));
        self
    }

    pub fn with_reply(self, reply: ScriptedReply) -> Self {
        self.push_reply(reply);
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn push_reply(&self, reply: ScriptedReply) {
        self.replies.lock().unwrap_or_else(PoisonError::into_inner).push_back(reply);
    }

    /// Inputs received by `send_chat`, oldest first
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn chat_calls(&self) -> usize {
        self.sent.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn history_calls(&self) -> usize {
        self.history_calls.load(Ordering::SeqCst)
    }

    async fn wait(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[async_trait::async_trait]
impl ChatService for ScriptedChatService {
    async fn fetch_history(&self, user_id: &str) -> Result<Vec<HistoryRecord>> {
        self.history_calls.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(user_id, "scripted history request");
        self.wait().await;

        let scripted = self.history.lock().unwrap_or_else(PoisonError::into_inner).clone();
        match scripted {
            Some(Ok(records)) => Ok(records),
            Some(Err(message)) => Err(Error::Transport(message)),
            None => Ok(Vec::new()),
        }
    }

    async fn send_chat(&self, user_input: &str) -> Result<Option<String>> {
        self.sent.lock().unwrap_or_else(PoisonError::into_inner).push(user_input.to_string());
        self.wait().await;

        let next = self.replies.lock().unwrap_or_else(PoisonError::into_inner).pop_front();
        match next.unwrap_or(ScriptedReply::Empty) {
            ScriptedReply::Text { content } if content.is_empty() => Ok(None),
            ScriptedReply::Text { content } => Ok(Some(content)),
            ScriptedReply::Empty => Ok(None),
            ScriptedReply::Error { message } => Err(Error::Transport(message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replies_in_order_then_empty() {
        let service = ScriptedChatService::new()
            .with_reply(ScriptedReply::text("first"))
            .with_reply(ScriptedReply::error("boom"));

        assert_eq!(service.send_chat("a").await.unwrap().as_deref(), Some("first"));
        assert!(matches!(service.send_chat("b").await, Err(Error::Transport(_))));
        assert_eq!(service.send_chat("c").await.unwrap(), None);
        assert_eq!(service.sent(), vec!["a", "b", "c"]);
        assert_eq!(service.chat_calls(), 3);
    }

    #[tokio::test]
    async fn test_empty_text_is_no_reply() {
        let service = ScriptedChatService::new().with_reply(ScriptedReply::text(""));
        assert_eq!(service.send_chat("x").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_history_variants() {
        let none = ScriptedChatService::new();
        assert!(none.fetch_history("u").await.unwrap().is_empty());
        assert_eq!(none.history_calls(), 1);

        let some = ScriptedChatService::new().with_history(vec![HistoryRecord::new("user", "hi")]);
        assert_eq!(some.fetch_history("u").await.unwrap().len(), 1);

        let failing = ScriptedChatService::new().with_history_error("offline");
        assert!(matches!(failing.fetch_history("u").await, Err(Error::Transport(msg)) if msg == "offline"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_uses_tokio_clock() {
        let service = ScriptedChatService::new()
            .with_latency(Duration::from_millis(250))
            .with_reply(ScriptedReply::text("late"));

        let start = tokio::time::Instant::now();
        let reply = service.send_chat("x").await.unwrap();
        assert_eq!(reply.as_deref(), Some("late"));
        assert!(start.elapsed() >= Duration::from_millis(250));
    }
}
