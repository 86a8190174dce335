use crate::types::HistoryRecord;
use murmur_core::Result;

/// Remote chat service seen by the conversation layer
///
/// Every failure (connect, status, timeout, undecodable body) surfaces as
/// [`murmur_core::Error::Transport`]; callers do not distinguish them.
#[async_trait::async_trait]
pub trait ChatService: Send + Sync {
    /// Past turns for `user_id`, in the order the service returns them
    async fn fetch_history(&self, user_id: &str) -> Result<Vec<HistoryRecord>>;

    /// Send one user input; `None` when the service replied without data
    async fn send_chat(&self, user_input: &str) -> Result<Option<String>>;
}
