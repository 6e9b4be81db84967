use async_trait::async_trait;
use atelier_application::{SessionError, SessionEvent, TurnOutcome, Workbench};
use atelier_core::config::AtelierConfig;
use atelier_core::{
    CancellationToken, Completion, CompletionClient, CompletionError, CompletionOutcome,
    ErrorKind, Message, ToolCallDirective,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

enum Step {
    Reply(Result<CompletionOutcome, CompletionError>),
    /// Blocks until `release` fires, then replies.
    Gate(Arc<Notify>, Result<CompletionOutcome, CompletionError>),
    /// Blocks until the turn is cancelled.
    UntilCancelled,
}

struct FakeClient {
    steps: Mutex<VecDeque<Step>>,
    entered: Arc<Notify>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeClient {
    fn new(steps: Vec<Step>) -> Arc<Self> {
        Arc::new(Self {
            steps: Mutex::new(steps.into()),
            entered: Arc::new(Notify::new()),
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl CompletionClient for FakeClient {
    async fn complete(
        &self,
        _history: &[Message],
        cancel: CancellationToken,
    ) -> Result<CompletionOutcome, CompletionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let step = self
            .steps
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected completion call");
        self.entered.notify_one();

        let result = match step {
            Step::Reply(result) => result,
            Step::Gate(release, result) => {
                release.notified().await;
                result
            }
            Step::UntilCancelled => {
                cancel.cancelled().await;
                Ok(CompletionOutcome::Cancelled)
            }
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }

    fn provider_name(&self) -> &str {
        "fake"
    }
}

fn text_reply(text: &str) -> Result<CompletionOutcome, CompletionError> {
    Ok(CompletionOutcome::Completed(Completion {
        text: text.into(),
        tool_calls: Vec::new(),
    }))
}

fn workbench(client: Arc<FakeClient>) -> Workbench {
    Workbench::with_client(AtelierConfig::default(), client, None)
}

#[tokio::test]
async fn test_design_directive_without_image_credential_uses_placeholder() {
    let client = FakeClient::new(vec![Step::Reply(Ok(CompletionOutcome::Completed(
        Completion {
            text: "Here is a clean login page.".into(),
            tool_calls: vec![ToolCallDirective::GenerateDesignImage {
                prompt: "minimal login page with centered form".into(),
                title: "Login Page".into(),
                description: "Centered form on a soft gradient".into(),
            }],
        },
    )))]);
    let bench = workbench(client);
    let session = bench.session();

    let outcome = session.submit("design a login page").await.unwrap();
    let TurnOutcome::Committed { message, artifact } = outcome else {
        panic!("turn should commit");
    };

    assert!(!message.content.is_empty());
    let artifact = artifact.expect("directive should produce an artifact");
    assert_eq!(message.artifact_ref.as_deref(), Some(artifact.id.as_str()));
    assert!(
        artifact
            .image_ref
            .starts_with("https://via.placeholder.com/")
    );

    let gallery = bench.gallery();
    let gallery = gallery.read().await;
    assert_eq!(gallery.get(&artifact.id), Some(&artifact));

    let snapshot = session.snapshot();
    assert_eq!(snapshot.messages.len(), 2);
    assert!(snapshot.messages[0].is_user());
    assert!(!snapshot.pending);
    assert_eq!(snapshot.last_error, None);
}

#[tokio::test]
async fn test_small_talk_produces_no_artifact() {
    let client = FakeClient::new(vec![Step::Reply(text_reply(
        "I'm doing well, thanks for asking!",
    ))]);
    let bench = workbench(client);
    let session = bench.session();

    let outcome = session.submit("hello, how are you?").await.unwrap();
    let TurnOutcome::Committed { message, artifact } = outcome else {
        panic!("turn should commit");
    };
    assert!(artifact.is_none());
    assert_eq!(message.artifact_ref, None);
    assert!(bench.gallery().read().await.is_empty());
}

#[tokio::test]
async fn test_submit_while_pending_is_rejected() {
    let release = Arc::new(Notify::new());
    let client = FakeClient::new(vec![
        Step::Gate(release.clone(), text_reply("first")),
        Step::Reply(text_reply("third")),
    ]);
    let bench = workbench(client.clone());
    let session = bench.session();

    let first = tokio::spawn({
        let session = session.clone();
        async move { session.submit("first question").await }
    });
    client.entered.notified().await;
    assert!(session.is_pending());

    assert_eq!(
        session.submit("second question").await,
        Err(SessionError::Busy)
    );

    release.notify_one();
    let outcome = first.await.unwrap().unwrap();
    assert!(matches!(outcome, TurnOutcome::Committed { .. }));
    assert_eq!(client.calls.load(Ordering::SeqCst), 1);

    session.submit("third question").await.unwrap();
    assert_eq!(client.calls.load(Ordering::SeqCst), 2);
    assert_eq!(client.max_in_flight.load(Ordering::SeqCst), 1);

    let contents: Vec<String> = session
        .messages()
        .into_iter()
        .map(|m| m.content)
        .collect();
    assert_eq!(
        contents,
        vec!["first question", "first", "third question", "third"]
    );
}

#[tokio::test]
async fn test_network_failure_records_last_error() {
    let client = FakeClient::new(vec![Step::Reply(Err(CompletionError::Network(
        "connection refused".into(),
    )))]);
    let bench = workbench(client);
    let session = bench.session();

    let outcome = session.submit("design a card").await.unwrap();
    let TurnOutcome::Failed(descriptor) = outcome else {
        panic!("turn should fail");
    };
    assert_eq!(descriptor.kind, ErrorKind::Network);

    let snapshot = session.snapshot();
    assert_eq!(snapshot.last_error.map(|e| e.kind), Some(ErrorKind::Network));
    assert_eq!(snapshot.messages.len(), 1);
    assert_eq!(snapshot.messages[0].content, "design a card");
    assert!(!snapshot.pending);
}

#[tokio::test]
async fn test_cancel_leaves_last_error_and_appends_nothing() {
    let client = FakeClient::new(vec![
        Step::Reply(Err(CompletionError::upstream(Some(429), "Rate limited"))),
        Step::UntilCancelled,
    ]);
    let bench = workbench(client.clone());
    let session = bench.session();

    session.submit("first").await.unwrap();
    let error_before = session.last_error();
    assert_eq!(error_before.as_ref().map(|e| e.kind), Some(ErrorKind::Upstream));

    let turn = tokio::spawn({
        let session = session.clone();
        async move { session.submit("design a dashboard").await }
    });
    // The first call already left a permit; wait for the second entry.
    client.entered.notified().await;
    while client.calls.load(Ordering::SeqCst) < 2 {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    assert!(session.cancel());
    let outcome = turn.await.unwrap().unwrap();
    assert_eq!(outcome, TurnOutcome::Cancelled);

    let snapshot = session.snapshot();
    assert!(!snapshot.pending);
    assert_eq!(snapshot.last_error, error_before);
    assert!(snapshot.messages.iter().all(|m| m.is_user()));
    assert!(bench.gallery().read().await.is_empty());
    assert!(!session.cancel());
}

#[tokio::test]
async fn test_success_clears_previous_error() {
    let client = FakeClient::new(vec![
        Step::Reply(Err(CompletionError::Auth("missing key".into()))),
        Step::Reply(text_reply("Welcome back")),
    ]);
    let bench = workbench(client);
    let session = bench.session();

    session.submit("hi").await.unwrap();
    assert!(session.last_error().is_some());

    session.submit("hi").await.unwrap();
    assert_eq!(session.last_error(), None);
    assert_eq!(session.messages().len(), 3);
}

#[tokio::test]
async fn test_clear_keeps_gallery() {
    let client = FakeClient::new(vec![Step::Reply(text_reply("Sure, a layout idea"))]);
    let bench = workbench(client);
    let session = bench.session();

    session.submit("create a page layout").await.unwrap();
    assert_eq!(bench.gallery().read().await.len(), 1);

    session.clear().unwrap();
    assert!(session.messages().is_empty());
    assert_eq!(bench.gallery().read().await.len(), 1);
}

#[tokio::test]
async fn test_clear_while_pending_is_rejected() {
    let client = FakeClient::new(vec![Step::UntilCancelled]);
    let bench = workbench(client.clone());
    let session = bench.session();

    let turn = tokio::spawn({
        let session = session.clone();
        async move { session.submit("hello").await }
    });
    client.entered.notified().await;

    assert_eq!(session.clear(), Err(SessionError::Busy));
    session.cancel();
    assert_eq!(turn.await.unwrap(), Ok(TurnOutcome::Cancelled));
    assert_eq!(session.messages().len(), 1);
}

#[tokio::test]
async fn test_blank_submit_is_rejected() {
    let client = FakeClient::new(Vec::new());
    let bench = workbench(client.clone());
    assert_eq!(
        bench.session().submit("   ").await,
        Err(SessionError::EmptyMessage)
    );
    assert_eq!(client.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_events_follow_turn_lifecycle() {
    let client = FakeClient::new(vec![Step::Reply(text_reply("Fine, thanks"))]);
    let bench = workbench(client);
    let session = bench.session();
    let mut events = session.subscribe();

    session.submit("hello, how are you?").await.unwrap();

    assert!(matches!(
        events.recv().await.unwrap(),
        SessionEvent::MessageAppended(m) if m.content == "hello, how are you?"
    ));
    assert!(matches!(
        events.recv().await.unwrap(),
        SessionEvent::TurnStarted { .. }
    ));
    assert!(matches!(
        events.recv().await.unwrap(),
        SessionEvent::TurnCommitted { artifact: None, .. }
    ));
}

#[tokio::test]
async fn test_restore_and_export_round_trip() {
    let client = FakeClient::new(vec![Step::Reply(text_reply("A button design"))]);
    let bench = workbench(client);
    bench.session().submit("design a button").await.unwrap();
    let (messages, artifacts) = bench.export().await;
    assert_eq!(artifacts.len(), 1);

    let restored = workbench(FakeClient::new(Vec::new()));
    restored
        .restore(messages.clone(), artifacts.clone())
        .await
        .unwrap();
    let (restored_messages, restored_artifacts) = restored.export().await;
    assert_eq!(restored_messages, messages);
    assert_eq!(restored_artifacts, artifacts);
}

#[tokio::test]
async fn test_committed_artifact_is_indexed_before_observers_see_it() {
    let release = Arc::new(Notify::new());
    let client = FakeClient::new(vec![Step::Gate(
        release.clone(),
        text_reply("Here is a layout for your dashboard"),
    )]);
    let bench = workbench(client.clone());
    let session = bench.session();
    let gallery = bench.gallery();
    let mut events = session.subscribe();

    let observer = tokio::spawn({
        let gallery = gallery.clone();
        async move {
            loop {
                match events.recv().await.unwrap() {
                    SessionEvent::TurnCommitted { message, artifact } => {
                        let artifact_ref = message.artifact_ref.expect("message should reference");
                        assert_eq!(artifact.map(|a| a.id), Some(artifact_ref.clone()));
                        return gallery.read().await.contains(&artifact_ref);
                    }
                    _ => continue,
                }
            }
        }
    });

    let turn = tokio::spawn({
        let session = session.clone();
        async move { session.submit("design a dashboard").await }
    });
    client.entered.notified().await;
    release.notify_one();

    // Every snapshot taken while the turn settles must be consistent.
    while session.is_pending() {
        let snapshot = session.snapshot();
        let index = gallery.read().await;
        for message in &snapshot.messages {
            if let Some(artifact_ref) = &message.artifact_ref {
                assert!(index.contains(artifact_ref));
            }
        }
        drop(index);
        tokio::task::yield_now().await;
    }

    assert!(matches!(
        turn.await.unwrap().unwrap(),
        TurnOutcome::Committed { artifact: Some(_), .. }
    ));
    assert!(observer.await.unwrap());
}

#[tokio::test]
async fn test_restore_drops_duplicate_artifacts() {
    let client = FakeClient::new(vec![Step::Reply(text_reply("A card design"))]);
    let bench = workbench(client);
    bench.session().submit("design a card").await.unwrap();
    let (messages, artifacts) = bench.export().await;

    let mut doubled = artifacts.clone();
    doubled.extend(artifacts.clone());

    let restored = workbench(FakeClient::new(Vec::new()));
    restored.restore(messages, doubled).await.unwrap();
    assert_eq!(restored.gallery().read().await.len(), artifacts.len());
}
