//! Integration tests for the chat completions client against a local mock
//! server.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use persona_chat::chat::{ChatConfig, ChatSession};
use persona_chat::{ApiSettings, ChatBackend, ChatClient, Error, JsonLinesLogger, Message};

const COMPLETIONS_PATH: &str = "/api/chat/completions";

fn client_for(server: &MockServer) -> ChatClient {
    let settings = ApiSettings::new(
        Some("test-key".to_string()),
        Some(format!("{}/", server.uri())),
        Some("gemma3:4b".to_string()),
    )
    .expect("settings");
    ChatClient::new(&settings).expect("client")
}

fn completion(content: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "model": "gemma3:4b",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 10, "completion_tokens": 2, "total_tokens": 12}
    })
}

async fn request_bodies(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .expect("request recording enabled")
        .iter()
        .map(|request| serde_json::from_slice(&request.body).expect("json body"))
        .collect()
}

#[tokio::test]
async fn posts_conversation_with_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .and(header("authorization", "Bearer test-key"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("Ahoy!")))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let messages = vec![Message::system("S"), Message::user("hello")];
    let reply = client
        .complete("gemma3:4b", &messages, 0.5, Duration::from_secs(5))
        .await
        .expect("reply");

    assert_eq!(reply, "Ahoy!");
    let bodies = request_bodies(&server).await;
    assert_eq!(
        bodies[0],
        json!({
            "model": "gemma3:4b",
            "messages": [
                {"role": "system", "content": "S"},
                {"role": "user", "content": "hello"}
            ],
            "temperature": 0.5
        })
    );
}

#[tokio::test]
async fn structured_error_message_is_extracted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"message": "Invalid API key", "type": "auth_error"}
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .complete("gemma3:4b", &[Message::system("S")], 0.5, Duration::from_secs(5))
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(401));
    assert_eq!(err.to_string(), "API error 401: Invalid API key");
}

#[tokio::test]
async fn unstructured_error_falls_back_to_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(502).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .complete("gemma3:4b", &[Message::system("S")], 0.5, Duration::from_secs(5))
        .await
        .unwrap_err();

    match err {
        Error::Api {
            status_code,
            message,
        } => {
            assert_eq!(status_code, 502);
            assert_eq!(message, "upstream unavailable");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn success_without_choices_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"object": "chat.completion"})),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .complete("gemma3:4b", &[Message::system("S")], 0.5, Duration::from_secs(5))
        .await
        .unwrap_err();

    match err {
        Error::MalformedResponse { payload, .. } => {
            assert!(payload.contains("\"object\": \"chat.completion\""));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion("too late"))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .complete(
            "gemma3:4b",
            &[Message::system("S")],
            0.5,
            Duration::from_millis(100),
        )
        .await
        .unwrap_err();

    assert!(err.is_network());
    assert!(err.is_timeout());
}

#[tokio::test]
async fn connection_refused_is_network_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("addr").port()
    };
    let settings = ApiSettings::new(
        Some("test-key".to_string()),
        Some(format!("http://127.0.0.1:{port}")),
        None,
    )
    .expect("settings");
    let client = ChatClient::new(&settings).expect("client");

    let err = client
        .complete("gemma3:4b", &[Message::system("S")], 0.5, Duration::from_secs(5))
        .await
        .unwrap_err();

    assert!(err.is_network());
    assert!(err.to_string().starts_with("Network error: "));
}

#[tokio::test]
async fn session_retries_with_failed_message_in_context() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("I'm ready!")))
        .mount(&server)
        .await;

    let config = ChatConfig::new()
        .with_system_prompt("S")
        .with_temperature(0.5)
        .with_max_pairs(6);
    let mut session = ChatSession::new(client_for(&server), config);

    let err = session.send("are you ready kids?").await.unwrap_err();
    assert_eq!(err.status_code(), Some(500));

    let reply = session.send("aye aye captain").await.expect("reply");
    assert_eq!(reply, "I'm ready!");

    let bodies = request_bodies(&server).await;
    assert_eq!(bodies.len(), 2);
    assert_eq!(
        bodies[1]["messages"],
        json!([
            {"role": "system", "content": "S"},
            {"role": "user", "content": "are you ready kids?"},
            {"role": "user", "content": "aye aye captain"}
        ])
    );
}

#[tokio::test]
async fn request_log_records_each_exchange() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("Ahoy!")))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let log_path = dir.path().join("requests.jsonl");
    let logger = JsonLinesLogger::create(&log_path).expect("logger");
    let client = client_for(&server).with_logger(Arc::new(logger));

    client
        .complete("gemma3:4b", &[Message::user("hi")], 0.5, Duration::from_secs(5))
        .await
        .expect("reply");

    let events: Vec<Value> = std::fs::read_to_string(&log_path)
        .expect("log")
        .lines()
        .map(|line| serde_json::from_str(line).expect("json line"))
        .collect();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0]["event"], "request");
    assert_eq!(events[1]["event"], "response");
    assert_eq!(events[1]["body"]["choices"][0]["message"]["content"], "Ahoy!");
    assert!(!events[0].to_string().contains("test-key"));
}

#[tokio::test]
async fn logged_request_matches_wire_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("Ahoy!")))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let log_path = dir.path().join("requests.jsonl");
    let logger = JsonLinesLogger::create(&log_path).expect("logger");
    let client = client_for(&server).with_logger(Arc::new(logger));

    client
        .complete(
            "gemma3:4b",
            &[Message::system("S"), Message::user("hi")],
            0.6,
            Duration::from_secs(5),
        )
        .await
        .expect("reply");

    let wire = request_bodies(&server).await.remove(0);
    let logged: Value = serde_json::from_str(
        std::fs::read_to_string(&log_path)
            .expect("log")
            .lines()
            .next()
            .expect("request line"),
    )
    .expect("json line");

    assert_eq!(logged["event"], "request");
    assert_eq!(logged["body"], wire);
    assert_eq!(wire["temperature"], json!(0.6));
}
