//! In-memory SessionStore used by cache and handler tests.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};

use quill_types::chat::{ChatHandle, Message};
use quill_types::error::StorageError;

use crate::session::store::{truncate_history, SessionStore};

#[derive(Debug)]
pub(crate) struct MemoryStore {
    records: Mutex<HashMap<String, (Vec<Message>, DateTime<Utc>)>>,
    window: usize,
}

impl MemoryStore {
    pub(crate) fn new(window: usize) -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            window,
        }
    }

    pub(crate) fn ids(&self) -> Vec<String> {
        self.records.lock().unwrap().keys().cloned().collect()
    }
}

impl SessionStore for MemoryStore {
    async fn read(&self, chat_id: &str) -> Result<Vec<Message>, StorageError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .get(chat_id)
            .map(|(messages, _)| messages.clone())
            .unwrap_or_default())
    }

    async fn write(&self, messages: &[Message], chat_id: &str) -> Result<(), StorageError> {
        let truncated = truncate_history(messages, self.window);
        self.records
            .lock()
            .unwrap()
            .insert(chat_id.to_string(), (truncated, Utc::now()));
        Ok(())
    }

    async fn exists(&self, chat_id: &str) -> bool {
        !chat_id.is_empty() && !self.read(chat_id).await.unwrap_or_default().is_empty()
    }

    async fn invalidate(&self, chat_id: &str) -> Result<(), StorageError> {
        self.records.lock().unwrap().remove(chat_id);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<ChatHandle>, StorageError> {
        let mut handles: Vec<ChatHandle> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .map(|(id, (_, modified_at))| ChatHandle {
                id: id.clone(),
                modified_at: *modified_at,
            })
            .collect();
        handles.sort_by(|a, b| a.modified_at.cmp(&b.modified_at).then(a.id.cmp(&b.id)));
        Ok(handles)
    }
}
