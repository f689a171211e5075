use async_trait::async_trait;
use propassist_application::{ChatThread, PropertyAssistant, ThreadEntry, ThreadError, TurnOutcome};
use propassist_core::chat_api::ChatRequest;
use propassist_core::config::ClientConfig;
use propassist_core::error::ChatTurnError;
use propassist_core::message::ChatMessage;
use propassist_interaction::{ChatBackend, ChatModelAdapter};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

// Mock adapter replaying scripted results
struct ScriptedAdapter {
    replies: Mutex<VecDeque<Result<ChatMessage, ChatTurnError>>>,
    seen: Mutex<Vec<Vec<ChatMessage>>>,
    wait_for_cancel: bool,
    gate: Option<tokio::sync::Notify>,
}

impl ScriptedAdapter {
    fn new(replies: Vec<Result<ChatMessage, ChatTurnError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            seen: Mutex::new(Vec::new()),
            wait_for_cancel: false,
            gate: None,
        }
    }

    /// Holds the first reply until `open` is called.
    fn gated(replies: Vec<Result<ChatMessage, ChatTurnError>>) -> Self {
        Self {
            gate: Some(tokio::sync::Notify::new()),
            ..Self::new(replies)
        }
    }

    fn open(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    fn hanging() -> Self {
        Self {
            wait_for_cancel: true,
            ..Self::new(Vec::new())
        }
    }

    fn seen(&self) -> Vec<Vec<ChatMessage>> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModelAdapter for ScriptedAdapter {
    async fn run(
        &self,
        messages: &[ChatMessage],
        cancel: &CancellationToken,
    ) -> Result<ChatMessage, ChatTurnError> {
        let first = {
            let mut seen = self.seen.lock().unwrap();
            seen.push(messages.to_vec());
            seen.len() == 1
        };
        if let (true, Some(gate)) = (first, &self.gate) {
            gate.notified().await;
        }
        if self.wait_for_cancel {
            cancel.cancelled().await;
            return Err(ChatTurnError::Cancelled);
        }
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ChatTurnError::decode("script exhausted")))
    }
}

async fn wait_until_running(thread: &ChatThread) {
    for _ in 0..200 {
        if thread.is_running().await {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("turn never started");
}

#[tokio::test]
async fn test_completed_turn_appends_reply() {
    let adapter = Arc::new(ScriptedAdapter::new(vec![Ok(ChatMessage::assistant("Cap rate is 6.1%."))]));
    let thread = ChatThread::new(adapter.clone());

    let outcome = thread.submit("What is the cap rate?").await.unwrap();

    assert_eq!(outcome, TurnOutcome::Completed(ChatMessage::assistant("Cap rate is 6.1%.")));
    assert_eq!(
        thread.entries().await,
        vec![
            ThreadEntry::User(ChatMessage::user("What is the cap rate?")),
            ThreadEntry::Assistant(ChatMessage::assistant("Cap rate is 6.1%.")),
        ]
    );
    assert!(!thread.is_running().await);
}

#[tokio::test]
async fn test_blank_message_is_rejected() {
    let adapter = Arc::new(ScriptedAdapter::new(Vec::new()));
    let thread = ChatThread::new(adapter.clone());

    assert_eq!(thread.submit("   ").await.unwrap_err(), ThreadError::EmptyMessage);
    assert!(thread.entries().await.is_empty());
    assert!(adapter.seen().is_empty());
}

#[tokio::test]
async fn test_failed_turn_records_error_entry_not_sent_later() {
    let adapter = Arc::new(ScriptedAdapter::new(vec![
        Err(ChatTurnError::backend(500, "internal error")),
        Ok(ChatMessage::assistant("Second try worked.")),
    ]));
    let thread = ChatThread::new(adapter.clone());

    let outcome = thread.submit("First").await.unwrap();
    assert_eq!(
        outcome,
        TurnOutcome::Failed(ChatTurnError::backend(500, "internal error"))
    );
    let entries = thread.entries().await;
    assert_eq!(entries.len(), 2);
    assert!(matches!(&entries[1], ThreadEntry::Error(msg) if msg.contains("500") && msg.contains("internal error")));

    thread.submit("Second").await.unwrap();
    let seen = adapter.seen();
    assert_eq!(
        seen[1],
        vec![ChatMessage::user("First"), ChatMessage::user("Second")]
    );
}

#[tokio::test]
async fn test_history_grows_in_order() {
    let adapter = Arc::new(ScriptedAdapter::new(vec![
        Ok(ChatMessage::assistant("A1")),
        Ok(ChatMessage::assistant("A2")),
    ]));
    let thread = ChatThread::new(adapter.clone());

    thread.submit("Q1").await.unwrap();
    thread.submit("Q2").await.unwrap();

    let seen = adapter.seen();
    assert_eq!(seen[0], vec![ChatMessage::user("Q1")]);
    assert_eq!(
        seen[1],
        vec![
            ChatMessage::user("Q1"),
            ChatMessage::assistant("A1"),
            ChatMessage::user("Q2"),
        ]
    );
    assert_eq!(thread.messages().await.len(), 4);
}

#[tokio::test]
async fn test_second_submit_while_running_is_refused_and_cancel_ends_turn() {
    let adapter = Arc::new(ScriptedAdapter::hanging());
    let thread = Arc::new(ChatThread::new(adapter.clone()));

    let running = {
        let thread = thread.clone();
        tokio::spawn(async move { thread.submit("Long question").await })
    };
    wait_until_running(&thread).await;

    assert_eq!(
        thread.submit("Impatient").await.unwrap_err(),
        ThreadError::TurnInProgress
    );
    assert_eq!(thread.clear().await.unwrap_err(), ThreadError::TurnInProgress);

    thread.cancel().await;
    let outcome = running.await.unwrap().unwrap();

    assert_eq!(outcome, TurnOutcome::Cancelled);
    assert_eq!(
        thread.entries().await,
        vec![ThreadEntry::User(ChatMessage::user("Long question"))]
    );
    assert_eq!(adapter.seen().len(), 1);
    assert!(!thread.is_running().await);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_outcome_is_recorded_before_thread_frees() {
    let scripts = [
        Ok(ChatMessage::assistant("A1")),
        Err(ChatTurnError::backend(500, "internal error")),
    ];
    for first in scripts {
        let expect_reply = first.is_ok();
        let adapter = Arc::new(ScriptedAdapter::gated(vec![
            first,
            Ok(ChatMessage::assistant("A2")),
        ]));
        let thread = Arc::new(ChatThread::new(adapter.clone()));

        let running = {
            let thread = thread.clone();
            tokio::spawn(async move { thread.submit("Q1").await })
        };
        wait_until_running(&thread).await;

        let watcher = {
            let thread = thread.clone();
            tokio::spawn(async move {
                while thread.is_running().await {
                    tokio::task::yield_now().await;
                }
                let entries = thread.entries().await;
                let follow_up = thread.submit("Q2").await;
                (entries, follow_up)
            })
        };
        adapter.open();

        running.await.unwrap().unwrap();
        let (entries, follow_up) = watcher.await.unwrap();

        assert_eq!(entries.len(), 2, "entries seen once the thread was free: {entries:?}");
        if expect_reply {
            assert_eq!(entries[1], ThreadEntry::Assistant(ChatMessage::assistant("A1")));
            assert_eq!(
                adapter.seen()[1],
                vec![
                    ChatMessage::user("Q1"),
                    ChatMessage::assistant("A1"),
                    ChatMessage::user("Q2"),
                ]
            );
        } else {
            assert!(matches!(&entries[1], ThreadEntry::Error(msg) if msg.contains("500")));
        }
        assert!(matches!(follow_up, Ok(TurnOutcome::Completed(_))));
        assert_eq!(thread.entries().await.len(), 4);
    }
}

#[tokio::test]
async fn test_cancel_when_idle_is_noop() {
    let adapter = Arc::new(ScriptedAdapter::new(vec![Ok(ChatMessage::assistant("ok"))]));
    let thread = ChatThread::new(adapter);

    thread.cancel().await;
    let outcome = thread.submit("Hi").await.unwrap();
    assert!(matches!(outcome, TurnOutcome::Completed(_)));
}

// Mock backend for wiring tests through the real adapter
struct CannedBackend {
    body: String,
    requests: Mutex<Vec<ChatRequest>>,
}

#[async_trait]
impl ChatBackend for CannedBackend {
    async fn post_message(&self, request: &ChatRequest) -> Result<String, ChatTurnError> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(self.body.clone())
    }
}

#[tokio::test]
async fn test_assistant_wires_thread_adapter_and_state() {
    let backend = Arc::new(CannedBackend {
        body: r#"{"message":"NOI is $412k.","refined_search_query":"12 Main St NOI"}"#.to_string(),
        requests: Mutex::new(Vec::new()),
    });
    let assistant = PropertyAssistant::with_backend(ClientConfig::default(), backend.clone());

    assistant
        .settings()
        .update(|s| s.web_search.set_include_web_search(true))
        .await;
    let outcome = assistant.thread().submit("What is the NOI?").await.unwrap();

    assert_eq!(outcome, TurnOutcome::Completed(ChatMessage::assistant("NOI is $412k.")));
    assert_eq!(
        assistant.response_state().snapshot().refined_search_query.as_deref(),
        Some("12 Main St NOI")
    );
    assert!(!backend.requests.lock().unwrap()[0].exclude_web);

    assistant.clear().await.unwrap();
    assert!(assistant.thread().entries().await.is_empty());
    assert!(assistant.response_state().snapshot().is_empty());
}
