pub mod http;
pub mod scripted;
pub mod service;
pub mod types;

pub use http::HttpChatService;
pub use scripted::{ScriptedChatService, ScriptedReply};
pub use service::ChatService;
pub use types::{ChatRequest, ChatResponse, HistoryRecord, HistoryRequest, HistoryResponse};
