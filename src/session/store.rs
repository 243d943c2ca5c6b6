// src/session/store.rs — Saved-session persistence and lookup
//
// One JSON file per completed session, `chat_<id>.json`, where the id is a
// wall-clock timestamp at second granularity. Two saves inside the same
// second collide and the later one wins; acceptable for an interactive chat
// tool where a turn takes far longer than a second.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::infra::errors::QuillError;
use crate::infra::paths;
use crate::session::transcript::{Message, Transcript};

const RECORD_PREFIX: &str = "chat_";
const RECORD_SUFFIX: &str = ".json";

/// Immutable snapshot of a completed session. Field names and nesting are
/// the on-disk contract; existing record files must keep loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub metadata: RecordMetadata,
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordMetadata {
    pub created_at: String,
    pub model: String,
    pub token_count: u32,
}

/// Persists sessions to a flat directory and lists/loads them back.
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store rooted at the default chats directory.
    pub fn open_default() -> Self {
        Self::new(paths::chats_dir())
    }

    /// Persist a snapshot of `transcript`. An empty transcript is a no-op
    /// and returns `None`; otherwise returns the new record id.
    pub fn save(
        &self,
        transcript: &Transcript,
        model: &str,
        token_count: u32,
    ) -> Result<Option<String>, QuillError> {
        let id = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();
        self.save_as(&id, transcript, model, token_count)
    }

    /// Persist under an explicit id. `save` derives the id from the clock;
    /// this entry point exists so callers and tests can pin one.
    pub fn save_as(
        &self,
        id: &str,
        transcript: &Transcript,
        model: &str,
        token_count: u32,
    ) -> Result<Option<String>, QuillError> {
        if transcript.is_empty() {
            return Ok(None);
        }

        std::fs::create_dir_all(&self.dir)?;

        let record = SessionRecord {
            metadata: RecordMetadata {
                created_at: id.to_string(),
                model: model.to_string(),
                token_count,
            },
            messages: transcript.messages().to_vec(),
        };

        // Atomic from the reader's perspective: write to a temp file in the
        // same directory, then rename over the target.
        let path = self.record_path(id);
        let tmp_path = path.with_extension("json.tmp");
        std::fs::write(&tmp_path, serde_json::to_string_pretty(&record)?)?;
        std::fs::rename(&tmp_path, &path)?;

        tracing::debug!("saved session {id} ({} messages)", record.messages.len());
        Ok(Some(id.to_string()))
    }

    /// Record ids, newest first. A missing or empty directory is an empty
    /// list, never an error. Files that don't match the record naming
    /// pattern are ignored.
    pub fn list(&self) -> Result<Vec<String>, QuillError> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut ids: Vec<String> = entries
            .filter_map(|entry| {
                let name = entry.ok()?.file_name().into_string().ok()?;
                let id = name
                    .strip_prefix(RECORD_PREFIX)?
                    .strip_suffix(RECORD_SUFFIX)?;
                Some(id.to_string())
            })
            .collect();

        // Ids are time-ordered strings, so lexicographic descending is
        // newest first.
        ids.sort_unstable_by(|a, b| b.cmp(a));
        Ok(ids)
    }

    pub fn load(&self, id: &str) -> Result<SessionRecord, QuillError> {
        let path = self.record_path(id);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(QuillError::RecordNotFound(id.to_string()))
            }
            Err(e) => return Err(e.into()),
        };

        serde_json::from_str(&content).map_err(|e| QuillError::RecordCorrupt {
            id: id.to_string(),
            message: e.to_string(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{RECORD_PREFIX}{id}{RECORD_SUFFIX}"))
    }
}
