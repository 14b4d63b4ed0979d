mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use ragchat::domain::ports::{ChatClient, ChatMessage};
use ragchat::infrastructure::llm::{OpenAiChatClient, OpenAiChatConfig};
use ragchat::ChatApiError;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use wiremock::matchers::{bearer_token, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::chat_response;

fn config(base_url: String) -> OpenAiChatConfig {
    OpenAiChatConfig {
        api_key: Some("sk-test-key".to_string()),
        base_url,
        model: "gpt-4o-mini".to_string(),
        temperature: 0.7,
        max_tokens: None,
        timeout: Duration::from_secs(5),
        max_attempts: 3,
        base_delay: Duration::from_secs(1),
    }
}

fn messages() -> Vec<ChatMessage> {
    vec![
        ChatMessage::system("You are a helpful assistant."),
        ChatMessage::user("hello"),
    ]
}

#[tokio::test]
async fn test_successful_completion() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(bearer_token("sk-test-key"))
        .and(body_partial_json(serde_json::json!({
            "model": "gpt-4o-mini",
            "messages": [
                {"role": "system", "content": "You are a helpful assistant."},
                {"role": "user", "content": "hello"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_response("Hello! How can I help?")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = OpenAiChatClient::new(config(mock_server.uri())).unwrap();
    let completion = client.complete(&messages()).await.unwrap();

    assert_eq!(completion.content, "Hello! How can I help?");
    assert_eq!(completion.model, "gpt-4o-mini");
    assert_eq!(completion.attempts, 1);
}

#[tokio::test]
async fn test_rate_limit_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
            "error": {"message": "Rate limit reached for gpt-4o-mini", "type": "requests"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = OpenAiChatClient::new(config(mock_server.uri())).unwrap();
    let started = Instant::now();
    let err = client.complete(&messages()).await.unwrap_err();

    match err {
        ChatApiError::Status { status, message } => {
            assert_eq!(status, 429);
            assert_eq!(message, "Rate limit reached for gpt-4o-mini");
        }
        other => panic!("expected status error, got {other:?}"),
    }
    // No backoff sleep happened
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[tokio::test]
async fn test_server_error_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = OpenAiChatClient::new(config(mock_server.uri())).unwrap();
    let err = client.complete(&messages()).await.unwrap_err();

    assert!(matches!(err, ChatApiError::Status { status: 500, .. }));
    assert!(err.to_string().contains("Internal Server Error"));
}

#[tokio::test]
async fn test_error_status_with_stalled_body_is_not_retried() {
    // Sends the status line and headers, then never finishes the body
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let connections = Arc::new(AtomicUsize::new(0));

    let accepted = connections.clone();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            accepted.fetch_add(1, Ordering::SeqCst);
            tokio::spawn(async move {
                let mut buf = [0_u8; 4096];
                let _ = socket.read(&mut buf).await;
                let _ = socket
                    .write_all(
                        b"HTTP/1.1 500 Internal Server Error\r\n\
                          Content-Type: application/json\r\n\
                          Content-Length: 200\r\n\r\n{\"error\"",
                    )
                    .await;
                tokio::time::sleep(Duration::from_secs(10)).await;
            });
        }
    });

    let client = OpenAiChatClient::new(OpenAiChatConfig {
        timeout: Duration::from_millis(300),
        ..config(format!("http://{addr}"))
    })
    .unwrap();

    let started = Instant::now();
    let err = client.complete(&messages()).await.unwrap_err();

    assert!(
        matches!(err, ChatApiError::Status { status: 500, .. }),
        "expected status error, got {err:?}"
    );
    assert_eq!(connections.load(Ordering::SeqCst), 1);
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[tokio::test]
async fn test_upstream_message_is_scrubbed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": {"message": "Incorrect API key provided: sk-proj-abcdefghijklmnopqrstuvwxyz"}
        })))
        .mount(&mock_server)
        .await;

    let client = OpenAiChatClient::new(config(mock_server.uri())).unwrap();
    let err = client.complete(&messages()).await.unwrap_err();

    let text = err.to_string();
    assert!(text.contains("401"));
    assert!(!text.contains("sk-proj-abcdefghijklmnopqrstuvwxyz"));
}

#[tokio::test]
async fn test_timeouts_exhaust_three_attempts_with_backoff() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(chat_response("too late"))
                .set_delay(Duration::from_secs(2)),
        )
        .expect(3)
        .mount(&mock_server)
        .await;

    let client = OpenAiChatClient::new(OpenAiChatConfig {
        timeout: Duration::from_millis(100),
        ..config(mock_server.uri())
    })
    .unwrap();

    let started = Instant::now();
    let err = client.complete(&messages()).await.unwrap_err();
    let elapsed = started.elapsed();

    match err {
        ChatApiError::RetriesExhausted { attempts, last } => {
            assert_eq!(attempts, 3);
            assert!(matches!(*last, ChatApiError::Timeout));
        }
        other => panic!("expected exhausted retries, got {other:?}"),
    }
    // 1s + 2s of backoff between the three attempts
    assert!(elapsed >= Duration::from_secs(3), "elapsed {elapsed:?}");
}

#[tokio::test]
async fn test_recovers_after_transient_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(chat_response("slow"))
                .set_delay(Duration::from_secs(2)),
        )
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_response("Second time lucky")))
        .mount(&mock_server)
        .await;

    let client = OpenAiChatClient::new(OpenAiChatConfig {
        timeout: Duration::from_millis(200),
        base_delay: Duration::from_millis(10),
        ..config(mock_server.uri())
    })
    .unwrap();

    let completion = client.complete(&messages()).await.unwrap();
    assert_eq!(completion.content, "Second time lucky");
    assert_eq!(completion.attempts, 2);
}

#[tokio::test]
async fn test_connection_failures_are_retried() {
    // Port 9 (discard) is not listening on test machines
    let client = OpenAiChatClient::new(OpenAiChatConfig {
        base_delay: Duration::from_millis(10),
        ..config("http://127.0.0.1:9".to_string())
    })
    .unwrap();

    let err = client.complete(&messages()).await.unwrap_err();
    match err {
        ChatApiError::RetriesExhausted { attempts, last } => {
            assert_eq!(attempts, 3);
            assert!(matches!(*last, ChatApiError::Connection(_)));
        }
        other => panic!("expected exhausted retries, got {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_choices_is_invalid_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = OpenAiChatClient::new(config(mock_server.uri())).unwrap();
    let err = client.complete(&messages()).await.unwrap_err();

    assert!(matches!(err, ChatApiError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_missing_key_sends_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_response("unused")))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = OpenAiChatClient::new(OpenAiChatConfig {
        api_key: None,
        ..config(mock_server.uri())
    })
    .unwrap();

    let err = client.complete(&messages()).await.unwrap_err();
    assert!(matches!(err, ChatApiError::MissingApiKey));
}
