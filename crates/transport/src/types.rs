use murmur_core::{RawPayload, Role};
use serde::{Deserialize, Serialize};

/// `POST /get_history` request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRequest {
    pub user_id: String,
}

impl HistoryRequest {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self { user_id: user_id.into() }
    }
}

/// `POST /get_history` response body
///
/// A missing or null `data` field means "no history".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryResponse {
    #[serde(default)]
    pub data: Option<Vec<HistoryRecord>>,
}

impl HistoryResponse {
    pub fn into_records(self) -> Vec<HistoryRecord> {
        self.data.unwrap_or_default()
    }
}

/// One past turn as stored by the chat service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl HistoryRecord {
    pub fn new(role: impl Into<String>, message: impl Into<String>) -> Self {
        Self { role: Some(role.into()), message: Some(message.into()) }
    }

    pub fn role(&self) -> Role {
        self.role.as_deref().map(Role::from_wire).unwrap_or_default()
    }

    pub fn into_payload(self) -> RawPayload {
        let role = self.role();
        RawPayload::new(role, self.message.unwrap_or_default())
    }
}

/// `POST /chat` request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub user_input: String,
}

impl ChatRequest {
    pub fn new(user_input: impl Into<String>) -> Self {
        Self { user_input: user_input.into() }
    }
}

/// `POST /chat` response body
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub data: Option<String>,
}

impl ChatResponse {
    /// Reply text, or `None` when the service answered without usable data.
    pub fn into_reply(self) -> Option<String> {
        self.data.filter(|reply| !reply.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let json = serde_json::to_string(&HistoryRequest::new("0d00")).unwrap();
        assert_eq!(json, r#"{"user_id":"0d00"}"#);

        let json = serde_json::to_string(&ChatRequest::new("你好")).unwrap();
        assert_eq!(json, r#"{"user_input":"你好"}"#);
    }

    #[test]
    fn test_history_response_shapes() {
        let full: HistoryResponse =
            serde_json::from_str(r#"{"data":[{"role":"user","message":"hi"},{"role":"system","message":"a$b"}]}"#)
                .unwrap();
        let records = full.into_records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].role(), Role::User);
        assert_eq!(records[1].clone().into_payload(), RawPayload::system("a$b"));

        let empty: HistoryResponse = serde_json::from_str(r#"{"data":[]}"#).unwrap();
        assert!(empty.into_records().is_empty());

        let missing: HistoryResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(missing.into_records().is_empty());

        let null: HistoryResponse = serde_json::from_str(r#"{"data":null,"extra":1}"#).unwrap();
        assert!(null.into_records().is_empty());
    }

    #[test]
    fn test_history_record_defaults() {
        let record: HistoryRecord = serde_json::from_str(r#"{"message":"orphan"}"#).unwrap();
        assert_eq!(record.role(), Role::System);

        let payload: RawPayload = serde_json::from_str::<HistoryRecord>(r#"{"role":"user"}"#)
            .unwrap()
            .into_payload();
        assert_eq!(payload, RawPayload::user(""));
    }

    #[test]
    fn test_chat_response_reply() {
        let reply: ChatResponse = serde_json::from_str(r#"{"data":"你好$在吗"}"#).unwrap();
        assert_eq!(reply.into_reply().as_deref(), Some("你好$在吗"));

        let missing: ChatResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(missing.into_reply(), None);

        let empty: ChatResponse = serde_json::from_str(r#"{"data":""}"#).unwrap();
        assert_eq!(empty.into_reply(), None);
    }
}
