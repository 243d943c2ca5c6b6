// tests/chat_flow_test.rs — Integration test: stream -> transcript -> disk
//
// Drives the accumulator with a fake backend, commits the turn the way the
// REPL does, and checks what ends up in the session store.

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use quill::infra::errors::QuillError;
use quill::provider::{ChatBackend, ChatChunk, ChatRequest, ChunkStream};
use quill::session::{accumulate, estimate_tokens, Message, SessionStore, StreamOutcome, Transcript};
use tempfile::TempDir;

/// Backend that replays a scripted fragment sequence.
struct ScriptedBackend {
    items: std::sync::Mutex<Option<Vec<Result<ChatChunk, QuillError>>>>,
}

impl ScriptedBackend {
    fn new(items: Vec<Result<ChatChunk, QuillError>>) -> Self {
        Self {
            items: std::sync::Mutex::new(Some(items)),
        }
    }

    fn fragments(fragments: &[&str]) -> Self {
        Self::new(
            fragments
                .iter()
                .map(|f| {
                    Ok(ChatChunk {
                        delta: f.to_string(),
                    })
                })
                .collect(),
        )
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn chat_stream(&self, _request: ChatRequest) -> Result<ChunkStream, QuillError> {
        let items = self
            .items
            .lock()
            .unwrap()
            .take()
            .expect("stream is not restartable");
        Ok(Box::pin(futures::stream::iter(items)))
    }
}

fn request(prompt: &str) -> ChatRequest {
    ChatRequest {
        model: "openai/gpt-4-turbo".into(),
        messages: vec![Message::user(prompt)],
        system: None,
        max_tokens: None,
        temperature: None,
    }
}

#[tokio::test]
async fn test_completed_turn_commits_and_persists() {
    let dir = TempDir::new().unwrap();
    let store = SessionStore::new(dir.path());
    let backend = ScriptedBackend::fragments(&["Hel", "lo", " world"]);

    let prompt = "say hello";
    let stream = backend.chat_stream(request(prompt)).await.unwrap();

    let mut transcript = Transcript::new();
    let outcome = accumulate(stream, |_| {}).await.unwrap();

    let reply = match outcome {
        StreamOutcome::Complete(reply) => reply,
        other => panic!("expected Complete, got {other:?}"),
    };
    assert_eq!(reply, "Hello world");

    let tokens = estimate_tokens(prompt) + estimate_tokens(&reply);
    transcript.push(Message::user(prompt));
    transcript.push(Message::assistant(reply));
    let id = store
        .save(&transcript, "openai/gpt-4-turbo", tokens)
        .unwrap()
        .unwrap();

    let record = store.load(&id).unwrap();
    assert_eq!(record.messages.len(), 2);
    assert_eq!(record.messages[1].content, "Hello world");
    assert_eq!(record.metadata.token_count, 4);
}

#[tokio::test]
async fn test_empty_stream_commits_nothing() {
    let dir = TempDir::new().unwrap();
    let store = SessionStore::new(dir.path());
    let backend = ScriptedBackend::fragments(&[]);

    let stream = backend.chat_stream(request("hello?")).await.unwrap();
    let transcript = Transcript::new();
    let outcome = accumulate(stream, |_| {}).await.unwrap();

    assert_eq!(outcome, StreamOutcome::Empty);
    // No assistant message, so nothing reaches the store either.
    assert_eq!(store.save(&transcript, "m", 0).unwrap(), None);
    assert!(store.list().unwrap().is_empty());
}

#[tokio::test]
async fn test_interrupted_stream_discards_partial() {
    let backend = ScriptedBackend::new(vec![
        Ok(ChatChunk {
            delta: "The answer is".into(),
        }),
        Err(QuillError::Backend {
            message: "connection reset".into(),
        }),
    ]);

    let stream = backend.chat_stream(request("q")).await.unwrap();
    let transcript = Transcript::new();

    match accumulate(stream, |_| {}).await {
        Err(QuillError::StreamInterrupted { partial, .. }) => {
            assert_eq!(partial, "The answer is");
        }
        other => panic!("expected StreamInterrupted, got {other:?}"),
    }

    // The turn never commits, matching the REPL's failure path.
    assert!(transcript.is_empty());
}
