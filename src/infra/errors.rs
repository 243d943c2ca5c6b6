// src/infra/errors.rs — Error types for Quill

use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuillError {
    /// The completion backend failed before producing any output.
    #[error("backend unavailable: {message}")]
    BackendUnavailable { message: String },

    /// Transport or protocol failure on an open stream.
    #[error("backend error: {message}")]
    Backend { message: String },

    /// The stream died after partial output. Carries the partial text so the
    /// boundary can tell the user how much was lost; it is never committed
    /// to the transcript.
    #[error("response interrupted after {} chars: {message}", partial.len())]
    StreamInterrupted { partial: String, message: String },

    // Session library errors
    #[error("no saved chat with id '{0}'")]
    RecordNotFound(String),

    #[error("saved chat '{id}' could not be read: {message}")]
    RecordCorrupt { id: String, message: String },

    // Infra
    #[error("configuration error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
