// src/session/accumulator.rs — Streaming response accumulation
//
// Folds the fragment stream from a completion backend into one string,
// invoking a display callback after every non-empty fragment so the caller
// can render the response as it arrives.

use futures::StreamExt;

use crate::infra::errors::QuillError;
use crate::provider::{ChatChunk, ChunkStream};

/// Result of draining a fragment stream to completion.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamOutcome {
    /// The stream ended without producing any text. The caller must not
    /// append an assistant message for this turn.
    Empty,
    /// Ordered concatenation of every non-empty fragment.
    Complete(String),
}

/// Drain `stream`, calling `on_update` with the accumulation so far after
/// each non-empty fragment, in exact delivery order.
///
/// Empty fragments are skipped: no callback, no append. A failure before the
/// first fragment surfaces as [`QuillError::BackendUnavailable`]; a failure
/// after partial output surfaces as [`QuillError::StreamInterrupted`]
/// carrying the partial text. In either case nothing is committed anywhere —
/// committing to a transcript is the caller's decision, made only on `Ok`.
pub async fn accumulate<F>(
    mut stream: ChunkStream,
    mut on_update: F,
) -> Result<StreamOutcome, QuillError>
where
    F: FnMut(&str),
{
    let mut text = String::new();

    while let Some(item) = stream.next().await {
        match item {
            Ok(ChatChunk { delta }) => {
                if delta.is_empty() {
                    continue;
                }
                text.push_str(&delta);
                on_update(&text);
            }
            Err(e) => {
                return Err(if text.is_empty() {
                    QuillError::BackendUnavailable {
                        message: e.to_string(),
                    }
                } else {
                    QuillError::StreamInterrupted {
                        partial: text,
                        message: e.to_string(),
                    }
                });
            }
        }
    }

    if text.is_empty() {
        Ok(StreamOutcome::Empty)
    } else {
        Ok(StreamOutcome::Complete(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn chunks(fragments: &[&str]) -> ChunkStream {
        let items: Vec<Result<ChatChunk, QuillError>> = fragments
            .iter()
            .map(|f| {
                Ok(ChatChunk {
                    delta: f.to_string(),
                })
            })
            .collect();
        Box::pin(futures::stream::iter(items))
    }

    #[tokio::test]
    async fn test_display_states_match_delivery_order() {
        let mut states = Vec::new();
        let outcome = accumulate(chunks(&["Hel", "lo", " world"]), |acc| {
            states.push(acc.to_string())
        })
        .await
        .unwrap();

        assert_eq!(states, vec!["Hel", "Hello", "Hello world"]);
        assert_eq!(outcome, StreamOutcome::Complete("Hello world".into()));
    }

    #[tokio::test]
    async fn test_empty_fragments_skipped() {
        let mut updates = 0;
        let outcome = accumulate(chunks(&["", "a", "", "b", ""]), |_| updates += 1)
            .await
            .unwrap();

        assert_eq!(outcome, StreamOutcome::Complete("ab".into()));
        assert_eq!(updates, 2);
    }

    #[tokio::test]
    async fn test_zero_fragments_is_empty_outcome() {
        let outcome = accumulate(chunks(&[]), |_| panic!("no update expected"))
            .await
            .unwrap();
        assert_eq!(outcome, StreamOutcome::Empty);
    }

    #[tokio::test]
    async fn test_all_empty_fragments_is_empty_outcome() {
        let outcome = accumulate(chunks(&["", "", ""]), |_| panic!("no update expected"))
            .await
            .unwrap();
        assert_eq!(outcome, StreamOutcome::Empty);
    }

    #[tokio::test]
    async fn test_error_before_first_fragment() {
        let items: Vec<Result<ChatChunk, QuillError>> = vec![Err(QuillError::Backend {
            message: "connection reset".into(),
        })];
        let err = accumulate(Box::pin(futures::stream::iter(items)), |_| {})
            .await
            .unwrap_err();

        assert!(matches!(err, QuillError::BackendUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_error_mid_stream_carries_partial() {
        let items: Vec<Result<ChatChunk, QuillError>> = vec![
            Ok(ChatChunk {
                delta: "Hel".into(),
            }),
            Err(QuillError::Backend {
                message: "connection reset".into(),
            }),
            Ok(ChatChunk {
                delta: "never seen".into(),
            }),
        ];
        let err = accumulate(Box::pin(futures::stream::iter(items)), |_| {})
            .await
            .unwrap_err();

        match err {
            QuillError::StreamInterrupted { partial, .. } => assert_eq!(partial, "Hel"),
            other => panic!("expected StreamInterrupted, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_final_output_is_concat_of_nonempty_fragments() {
        let fragments = ["", "one ", "", "two ", "three", ""];
        let outcome = accumulate(chunks(&fragments), |_| {}).await.unwrap();
        let expected: String = fragments.iter().filter(|f| !f.is_empty()).copied().collect();
        assert_eq!(outcome, StreamOutcome::Complete(expected));
    }
}
