use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use propassist_core::config::BackendConfig;
use propassist_core::error::ChatTurnError;
use propassist_core::knowledge_source::KnowledgeSource;
use propassist_core::message::ChatMessage;
use propassist_core::state::{ChatSettings, ResponseReadModel, ResponseState, SettingsHandle};
use propassist_interaction::{ChatModelAdapter, HttpChatBackend, PropertyChatAdapter};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// A request as the mock backend received it.
#[derive(Debug, Clone)]
struct Received {
    property_id: String,
    body: Value,
}

#[derive(Clone)]
struct MockBackend {
    status: StatusCode,
    body: String,
    delay: Duration,
    received: Arc<Mutex<Vec<Received>>>,
}

impl MockBackend {
    fn replying(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            delay: Duration::ZERO,
            received: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn received(&self) -> Vec<Received> {
        self.received.lock().unwrap().clone()
    }

    /// Serves on an ephemeral port and returns the base URL.
    async fn start(&self) -> String {
        let app = Router::new()
            .route("/chat/property/{property_id}/message", post(handle_message))
            .with_state(self.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }
}

async fn handle_message(
    State(backend): State<MockBackend>,
    Path(property_id): Path<String>,
    Json(body): Json<Value>,
) -> (StatusCode, String) {
    backend
        .received
        .lock()
        .unwrap()
        .push(Received { property_id, body });
    if !backend.delay.is_zero() {
        tokio::time::sleep(backend.delay).await;
    }
    (backend.status, backend.body.clone())
}

fn backend_config(base_url: String) -> BackendConfig {
    BackendConfig {
        api_base_url: base_url,
        property_id: "prop-42".to_string(),
        request_timeout: Duration::from_secs(10),
    }
}

fn adapter_for(config: &BackendConfig, settings: SettingsHandle) -> (PropertyChatAdapter, ResponseState) {
    let backend = Arc::new(HttpChatBackend::new(config).unwrap());
    let state = ResponseState::new();
    (PropertyChatAdapter::new(backend, settings, state.clone()), state)
}

fn previous_turn() -> ResponseReadModel {
    ResponseReadModel {
        chat_thinking: Some("previous".into()),
        search_prompt: Some("previous prompt".into()),
        ..ResponseReadModel::default()
    }
}

fn conversation() -> Vec<ChatMessage> {
    vec![
        ChatMessage::user("Tell me about 12 Main St"),
        ChatMessage::assistant("It is a 24-unit multifamily building."),
        ChatMessage::user("What does the rent roll show?"),
    ]
}

#[tokio::test]
async fn test_full_exchange_populates_read_models() {
    let mock = MockBackend::replying(
        StatusCode::OK,
        json!({
            "message": "Average in-place rent is $1,850.",
            "knowledge_source_details": [
                { "source_enum": "rent_roll", "display_name": "Rent Roll", "text": "24 units, 96% occupied" },
                { "source_enum": "web_search", "display_name": "Web Search",
                  "text": "<think>compare to market</think>Market rent is $1,975." }
            ],
            "chat_thinking": "Average the unit rents.",
            "bias_evaluation": {
                "bias_likelihood": "low",
                "explanation": "No protected characteristics referenced.",
                "biases_detected": []
            },
            "guardrails_evaluation": { "should_proceed": true, "reason": "Allowed" },
            "refined_search_query": "12 Main St market rent",
            "search_prompt": "Find market rents near 12 Main St"
        })
        .to_string(),
    );
    let base_url = mock.start().await;
    let (adapter, state) = adapter_for(&backend_config(base_url), SettingsHandle::default());

    let reply = adapter
        .run(&conversation(), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(reply, ChatMessage::assistant("Average in-place rent is $1,850."));

    let model = state.snapshot();
    assert_eq!(model.sources().len(), 2);
    assert_eq!(model.sources()[1].text, "Market rent is $1,975.");
    assert_eq!(model.search_thinking.as_deref(), Some("compare to market"));
    assert_eq!(model.chat_thinking.as_deref(), Some("Average the unit rents."));
    assert!(model.bias_evaluation.is_some());
    assert_eq!(model.refined_search_query.as_deref(), Some("12 Main St market rent"));
    assert_eq!(
        model.search_prompt.as_deref(),
        Some("Find market rents near 12 Main St")
    );
}

#[tokio::test]
async fn test_request_shape_on_the_wire() {
    let mock = MockBackend::replying(StatusCode::OK, r#"{"message":"ok"}"#);
    let base_url = mock.start().await;

    let mut settings = ChatSettings::default();
    settings
        .knowledge_sources
        .set([KnowledgeSource::RentRoll, KnowledgeSource::Zillow])
        .unwrap();
    settings.web_search.set_include_web_search(true);
    let (adapter, _state) = adapter_for(&backend_config(base_url), SettingsHandle::new(settings));

    adapter
        .run(&conversation(), &CancellationToken::new())
        .await
        .unwrap();

    let received = mock.received();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].property_id, "prop-42");

    let body = &received[0].body;
    assert_eq!(body["message"], json!("What does the rent roll show?"));
    assert_eq!(
        body["history"],
        json!([
            { "content": "Tell me about 12 Main St", "is_user": true },
            { "content": "It is a 24-unit multifamily building.", "is_user": false }
        ])
    );
    assert_eq!(body["knowledge_sources"], json!(["rent_roll", "zillow"]));
    assert_eq!(body["exclude_web"], json!(false));
    assert_eq!(body["chat_model"], json!("groq:deepseek-r1-distill-llama-70b"));
    assert_eq!(body["bias_evaluation_model"], json!("groq:llama3-70b-8192"));
    assert!(body.get("use_full_text").is_none());
}

#[tokio::test]
async fn test_message_only_response_overwrites_previous_turn() {
    let mock = MockBackend::replying(StatusCode::OK, r#"{ "message": "Hello" }"#);
    let base_url = mock.start().await;
    let (adapter, state) = adapter_for(&backend_config(base_url), SettingsHandle::default());
    state.replace(previous_turn());

    let reply = adapter
        .run(&[ChatMessage::user("Hi")], &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(reply.text(), "Hello");
    assert_eq!(state.snapshot(), ResponseReadModel::default());
}

#[tokio::test]
async fn test_server_error_carries_status_and_body() {
    let mock = MockBackend::replying(StatusCode::INTERNAL_SERVER_ERROR, "internal error");
    let base_url = mock.start().await;
    let (adapter, state) = adapter_for(&backend_config(base_url), SettingsHandle::default());
    state.replace(previous_turn());

    let err = adapter
        .run(&[ChatMessage::user("Hi")], &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ChatTurnError::BackendRequestFailed {
            status: Some(500),
            body: "internal error".to_string()
        }
    );
    assert_eq!(state.snapshot(), previous_turn());
}

#[tokio::test]
async fn test_non_json_success_body_is_a_decode_error() {
    let mock = MockBackend::replying(StatusCode::OK, "<html>gateway</html>");
    let base_url = mock.start().await;
    let (adapter, state) = adapter_for(&backend_config(base_url), SettingsHandle::default());
    state.replace(previous_turn());

    let err = adapter
        .run(&[ChatMessage::user("Hi")], &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ChatTurnError::ResponseDecodeError(_)));
    assert_eq!(state.snapshot(), previous_turn());
}

#[tokio::test]
async fn test_cancellation_aborts_in_flight_request() {
    let mock = MockBackend::replying(StatusCode::OK, r#"{ "message": "too late" }"#)
        .with_delay(Duration::from_secs(10));
    let base_url = mock.start().await;
    let (adapter, state) = adapter_for(&backend_config(base_url), SettingsHandle::default());
    state.replace(previous_turn());

    let cancel = CancellationToken::new();
    let canceller = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        canceller.cancel();
    });

    let started = Instant::now();
    let err = adapter
        .run(&[ChatMessage::user("Hi")], &cancel)
        .await
        .unwrap_err();

    assert_eq!(err, ChatTurnError::Cancelled);
    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(state.snapshot(), previous_turn());
}

#[tokio::test]
async fn test_timeout_is_a_transport_failure() {
    let mock = MockBackend::replying(StatusCode::OK, r#"{ "message": "slow" }"#)
        .with_delay(Duration::from_secs(5));
    let base_url = mock.start().await;
    let config = BackendConfig {
        request_timeout: Duration::from_millis(200),
        ..backend_config(base_url)
    };
    let (adapter, _state) = adapter_for(&config, SettingsHandle::default());

    let err = adapter
        .run(&[ChatMessage::user("Hi")], &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ChatTurnError::BackendRequestFailed { status: None, .. }
    ));
}

#[tokio::test]
async fn test_unreachable_backend_is_a_transport_failure() {
    // Bind then drop to get a port nobody listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let (adapter, state) = adapter_for(&backend_config(format!("http://{addr}")), SettingsHandle::default());
    let err = adapter
        .run(&[ChatMessage::user("Hi")], &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.status(), None);
    assert!(!err.is_cancelled());
    assert!(state.snapshot().is_empty());
}
