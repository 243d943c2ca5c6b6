// src/provider/mod.rs — Completion backend layer

pub mod openai_compat;

use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;

use crate::infra::errors::QuillError;
use crate::session::transcript::Message;

/// Models the default backend is known to serve; used for `/model`
/// suggestions. Any `provider/model` string is accepted, this list is not
/// a whitelist.
pub const KNOWN_MODELS: &[&str] = &[
    "openai/gpt-4-turbo",
    "openai/gpt-3.5-turbo",
    "anthropic/claude-3-opus",
    "mistralai/mixtral-8x7b-instruct",
    "openchat/openchat-3.5",
];

/// Incremental fragment stream from a completion backend. Finite and not
/// restartable; dropping it abandons the underlying connection.
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<ChatChunk, QuillError>> + Send>>;

/// One incremental fragment of generated text.
#[derive(Debug, Clone)]
pub struct ChatChunk {
    pub delta: String,
}

#[derive(Debug, Clone, Default)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub system: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

/// A streaming completion backend.
///
/// An `Err` from `chat_stream` means the call failed before any output;
/// errors yielded inside the stream mean it died mid-response. The
/// accumulator maps the two cases to distinct user-facing outcomes.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    fn name(&self) -> &str;

    async fn chat_stream(&self, request: ChatRequest) -> Result<ChunkStream, QuillError>;
}
