// src/provider/openai_compat.rs — OpenAI-compatible streaming backend
//
// Speaks the `/chat/completions` SSE protocol. Used with OpenRouter by
// default, but any endpoint exposing the same contract works.

use async_trait::async_trait;
use futures::StreamExt;
use reqwest_eventsource::{Event, RequestBuilderExt};
use std::time::Duration;

use super::{ChatBackend, ChatChunk, ChatRequest, ChunkStream};
use crate::infra::errors::QuillError;
use crate::session::transcript::Role;

pub struct OpenAICompatBackend {
    name_str: String,
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl OpenAICompatBackend {
    pub fn new(
        name: impl Into<String>,
        api_key: String,
        base_url: String,
        timeout: Duration,
    ) -> Result<Self, QuillError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| QuillError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            name_str: name.into(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn build_body(&self, request: &ChatRequest) -> serde_json::Value {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        if let Some(system) = &request.system {
            messages.push(serde_json::json!({"role": "system", "content": system}));
        }
        for m in &request.messages {
            messages.push(serde_json::json!({
                "role": match m.role {
                    Role::System => "system",
                    Role::User => "user",
                    Role::Assistant => "assistant",
                },
                "content": m.content,
            }));
        }

        let mut body = serde_json::json!({
            "model": request.model,
            "messages": messages,
            "stream": true,
        });
        if let Some(max_tokens) = request.max_tokens {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }
        if let Some(temp) = request.temperature {
            body["temperature"] = serde_json::json!(temp);
        }
        body
    }
}

#[async_trait]
impl ChatBackend for OpenAICompatBackend {
    fn name(&self) -> &str {
        &self.name_str
    }

    async fn chat_stream(&self, request: ChatRequest) -> Result<ChunkStream, QuillError> {
        let body = self.build_body(&request);

        let request_builder = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header(
                "User-Agent",
                format!("quill/{}", env!("CARGO_PKG_VERSION")),
            )
            .json(&body);

        let mut es = request_builder
            .eventsource()
            .map_err(|e| QuillError::BackendUnavailable {
                message: format!("failed to open event stream: {e}"),
            })?;

        let backend = self.name_str.clone();

        let stream = async_stream::stream! {
            while let Some(event) = es.next().await {
                match event {
                    Ok(Event::Open) => {}
                    Ok(Event::Message(msg)) => {
                        if msg.data == "[DONE]" {
                            break;
                        }
                        let parsed: serde_json::Value = match serde_json::from_str(&msg.data) {
                            Ok(v) => v,
                            Err(e) => {
                                yield Err(QuillError::Backend {
                                    message: format!("{backend}: unparseable SSE data: {e}"),
                                });
                                break;
                            }
                        };

                        let delta = parsed["choices"][0]["delta"]["content"]
                            .as_str()
                            .unwrap_or("")
                            .to_string();

                        // Empty deltas (role announcements, finish chunks)
                        // carry no text; the accumulator skips them anyway,
                        // don't bother yielding.
                        if !delta.is_empty() {
                            yield Ok(ChatChunk { delta });
                        }
                    }
                    Err(reqwest_eventsource::Error::StreamEnded) => break,
                    Err(reqwest_eventsource::Error::InvalidStatusCode(status, response)) => {
                        let detail = response.text().await.unwrap_or_default();
                        yield Err(QuillError::Backend {
                            message: format!("{backend}: HTTP {status}: {detail}"),
                        });
                        break;
                    }
                    Err(e) => {
                        yield Err(QuillError::Backend {
                            message: format!("{backend}: stream error: {e}"),
                        });
                        break;
                    }
                }
            }
        };

        Ok(Box::pin(stream))
    }
}
