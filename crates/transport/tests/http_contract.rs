use murmur_core::{Error, Role};
use murmur_transport::{ChatService, HttpChatService};
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn service_for(server: &MockServer) -> HttpChatService {
    HttpChatService::new(server.uri(), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_fetch_history_posts_user_id() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/get_history"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(serde_json::json!({ "user_id": "0d00" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [
                { "role": "system", "message": "newer" },
                { "role": "USER", "message": "older" }
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let records = service_for(&mock_server).fetch_history("0d00").await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].role(), Role::System);
    assert_eq!(records[1].role(), Role::User);
    assert_eq!(records[1].message.as_deref(), Some("older"));
}

#[tokio::test]
async fn test_fetch_history_without_data() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/get_history"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"status":"ok"}"#))
        .mount(&mock_server)
        .await;

    let records = service_for(&mock_server).fetch_history("0d00").await.unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_send_chat_posts_user_input() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_json(serde_json::json!({ "user_input": "你好" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "data": "你好$在吗" })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let reply = service_for(&mock_server).send_chat("你好").await.unwrap();
    assert_eq!(reply.as_deref(), Some("你好$在吗"));
}

#[tokio::test]
async fn test_send_chat_missing_or_empty_data() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_json(serde_json::json!({ "user_input": "missing" })))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_json(serde_json::json!({ "user_input": "empty" })))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"data":""}"#))
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server);
    assert_eq!(service.send_chat("missing").await.unwrap(), None);
    assert_eq!(service.send_chat("empty").await.unwrap(), None);
}

#[tokio::test]
async fn test_server_error_is_transport_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .mount(&mock_server)
        .await;

    let result = service_for(&mock_server).send_chat("hi").await;
    assert!(matches!(result, Err(Error::Transport(msg)) if msg.contains("500")));
}

#[tokio::test]
async fn test_invalid_json_is_transport_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/get_history"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let result = service_for(&mock_server).fetch_history("0d00").await;
    assert!(matches!(result, Err(Error::Transport(_))));
}

#[tokio::test]
async fn test_timeout_is_transport_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"data":"late"}"#)
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&mock_server)
        .await;

    let service = HttpChatService::new(mock_server.uri(), Duration::from_millis(50)).unwrap();
    let result = service.send_chat("hi").await;
    assert!(matches!(result, Err(Error::Transport(_))));
}

#[tokio::test]
async fn test_unreachable_server_is_transport_failure() {
    let service = HttpChatService::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
    let result = service.send_chat("hi").await;
    assert!(matches!(result, Err(Error::Transport(_))));
}
