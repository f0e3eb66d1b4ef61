//! File-backed session store.
//!
//! Implements the `SessionStore` trait from `quill-core` with one JSON
//! array file per chat id under a configured root directory:
//!
//! ```text
//! {root}/
//!   work
//!   temp
//!   rust-help
//! ```
//!
//! The root is created on first write. Reads never fail on record
//! content: a missing file, unreadable file, or non-array payload all
//! degrade to an empty history with a warning. Writes overwrite the
//! whole record with the truncated form and surface any failure.

use std::path::PathBuf;

use chrono::{DateTime, Utc};

use quill_core::session::store::{truncate_history, SessionStore};
use quill_types::chat::{ChatHandle, Message};
use quill_types::error::StorageError;

/// Per-conversation JSON file storage with a bounded truncation window.
pub struct FileSessionStore {
    root: PathBuf,
    window: usize,
}

impl FileSessionStore {
    /// Create a store rooted at `root`, keeping at most `window`
    /// messages per record (system message included; floor of 1).
    pub fn new(root: PathBuf, window: usize) -> Self {
        Self {
            root,
            window: window.max(1),
        }
    }

    fn record_path(&self, chat_id: &str) -> PathBuf {
        self.root.join(chat_id)
    }
}

impl SessionStore for FileSessionStore {
    async fn read(&self, chat_id: &str) -> Result<Vec<Message>, StorageError> {
        let path = self.record_path(chat_id);
        let raw = match tokio::fs::read(&path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                tracing::warn!("failed to read {}: {err}, treating as empty", path.display());
                return Ok(Vec::new());
            }
        };

        match serde_json::from_slice::<Vec<Message>>(&raw) {
            Ok(messages) => Ok(messages),
            Err(err) => {
                tracing::warn!(
                    "malformed record {}: {err}, treating as empty",
                    path.display()
                );
                Ok(Vec::new())
            }
        }
    }

    async fn write(&self, messages: &[Message], chat_id: &str) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.root).await?;
        let truncated = truncate_history(messages, self.window);
        let raw = serde_json::to_vec(&truncated)?;
        tokio::fs::write(self.record_path(chat_id), raw).await?;
        Ok(())
    }

    async fn exists(&self, chat_id: &str) -> bool {
        !chat_id.is_empty() && !self.read(chat_id).await.unwrap_or_default().is_empty()
    }

    async fn invalidate(&self, chat_id: &str) -> Result<(), StorageError> {
        match tokio::fs::remove_file(self.record_path(chat_id)).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    async fn list(&self) -> Result<Vec<ChatHandle>, StorageError> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut handles = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }
            let Some(id) = entry.file_name().to_str().map(String::from) else {
                continue;
            };
            let modified_at = DateTime::<Utc>::from(metadata.modified()?);
            handles.push(ChatHandle { id, modified_at });
        }

        // Ascending by modification time; id as a deterministic tie-break.
        handles.sort_by(|a, b| a.modified_at.cmp(&b.modified_at).then(a.id.cmp(&b.id)));
        Ok(handles)
    }
}
