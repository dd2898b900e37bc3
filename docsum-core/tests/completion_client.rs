// Integration tests for the chat-completion client against a stubbed endpoint.

use docsum_core::completion::CompletionClient;
use docsum_core::config::{CompletionConfig, DEFAULT_MODEL};
use docsum_core::contract::{Completer, CompletionError};
use docsum_core::conversation::Conversation;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ROUTE: &str = "/v1/chat/completions";

fn client_for(server: &MockServer) -> CompletionClient {
    let config = CompletionConfig {
        endpoint: format!("{}{}", server.uri(), ROUTE),
        ..CompletionConfig::new("test-key")
    };
    CompletionClient::new(config).expect("client builds")
}

#[tokio::test]
async fn returns_first_choice_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ROUTE))
        .and(header("authorization", "Bearer test-key"))
        .and(header("accept", "application/json"))
        .and(body_partial_json(json!({
            "model": DEFAULT_MODEL,
            "messages": [
                {"role": "system"},
                {"role": "user", "content": "Summarize the following documentation:\n\nuseEffect runs after render."}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "Effects run after render."}}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let conversation = Conversation::summary_template().with_appended("useEffect runs after render.");
    let summary = client_for(&server)
        .complete(&conversation)
        .await
        .expect("completion succeeds");

    assert_eq!(summary, "Effects run after render.");
}

#[tokio::test]
async fn server_error_carries_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ROUTE))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .complete(&Conversation::summary_template())
        .await
        .unwrap_err();

    match err {
        CompletionError::Http { status, ref body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "upstream exploded");
        }
        other => panic!("expected Http error, got {other:?}"),
    }
}

#[tokio::test]
async fn rate_limit_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ROUTE))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .complete(&Conversation::summary_template())
        .await
        .unwrap_err();

    assert!(matches!(err, CompletionError::Http { status: 429, .. }));
    assert!(err.to_string().contains("slow down"));
}

#[tokio::test]
async fn unexpected_shape_is_a_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ROUTE))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": "no choices here"})))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .complete(&Conversation::summary_template())
        .await
        .unwrap_err();

    assert!(matches!(err, CompletionError::Parse(_)), "got {err:?}");
}

#[tokio::test]
async fn refused_connection_is_a_transport_error() {
    // Bind then drop a listener so the port is known to be closed.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let config = CompletionConfig {
        endpoint: format!("http://127.0.0.1:{port}{ROUTE}"),
        ..CompletionConfig::new("test-key")
    };
    let client = CompletionClient::new(config).unwrap();

    let err = client
        .complete(&Conversation::summary_template())
        .await
        .unwrap_err();

    assert!(matches!(err, CompletionError::Transport(_)), "got {err:?}");
}
