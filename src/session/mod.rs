// src/session/mod.rs — Chat session core: transcript, streaming accumulator,
// and the saved-session store.

pub mod accumulator;
pub mod store;
pub mod transcript;

pub use accumulator::{accumulate, StreamOutcome};
pub use store::{RecordMetadata, SessionRecord, SessionStore};
pub use transcript::{Message, Role, Transcript};

/// Best-effort token estimate: whitespace-separated word count.
///
/// Deliberately crude; it feeds the per-session running total shown to the
/// user and stored in record metadata, nothing else.
pub fn estimate_tokens(text: &str) -> u32 {
    text.split_whitespace().count() as u32
}
