//! SessionStore trait definition and the truncation policy.
//!
//! Provides read/write/exists/invalidate/list over per-conversation
//! message records. Uses native async fn in traits (RPITIT, Rust 2024
//! edition). Implementations live in quill-infra (e.g.,
//! `FileSessionStore`).

use quill_types::chat::{ChatHandle, Message};
use quill_types::error::StorageError;

/// Repository trait for durable, append-bounded conversation storage.
///
/// One record per chat id. Concurrent processes targeting the same id
/// are not guarded against; the discipline is read-modify-overwrite,
/// last writer wins.
pub trait SessionStore: Send + Sync {
    /// Read the stored record for a chat id.
    ///
    /// A missing or malformed record yields an empty history, not an
    /// error; only unexpected I/O failures surface.
    fn read(
        &self,
        chat_id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<Message>, StorageError>> + Send;

    /// Persist the truncated form of `messages`, fully overwriting any
    /// prior record for the id. Write failures are fatal.
    fn write(
        &self,
        messages: &[Message],
        chat_id: &str,
    ) -> impl std::future::Future<Output = Result<(), StorageError>> + Send;

    /// Whether a non-empty record exists for a non-empty chat id.
    fn exists(&self, chat_id: &str) -> impl std::future::Future<Output = bool> + Send;

    /// Delete the record for a chat id. A missing record is not an error.
    fn invalidate(
        &self,
        chat_id: &str,
    ) -> impl std::future::Future<Output = Result<(), StorageError>> + Send;

    /// All stored chat ids, ordered by last-modified time ascending.
    fn list(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<ChatHandle>, StorageError>> + Send;
}

/// Apply the truncation policy: keep the first message unconditionally,
/// then the most recent `window - 1` of the rest.
///
/// The stored length is always `min(messages.len(), window)` and the
/// first element survives whenever the input is non-empty.
pub fn truncate_history(messages: &[Message], window: usize) -> Vec<Message> {
    let window = window.max(1);
    if messages.len() <= window {
        return messages.to_vec();
    }
    let tail_from = 1 + (messages.len() - window);
    let mut kept = Vec::with_capacity(window);
    kept.extend_from_slice(&messages[..1]);
    kept.extend_from_slice(&messages[tail_from..]);
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_types::chat::Message;

    fn history(len: usize) -> Vec<Message> {
        (0..len)
            .map(|i| {
                if i == 0 {
                    Message::system("persona")
                } else if i % 2 == 1 {
                    Message::user(format!("u{i}"))
                } else {
                    Message::assistant(format!("a{i}"))
                }
            })
            .collect()
    }

    #[test]
    fn test_truncation_length_is_min_of_len_and_window() {
        for len in 0..12 {
            for window in 1..8 {
                let kept = truncate_history(&history(len), window);
                assert_eq!(kept.len(), len.min(window), "len={len} window={window}");
            }
        }
    }

    #[test]
    fn test_truncation_preserves_system_message() {
        for len in 1..12 {
            for window in 1..8 {
                let original = history(len);
                let kept = truncate_history(&original, window);
                assert_eq!(kept[0], original[0], "len={len} window={window}");
            }
        }
    }

    #[test]
    fn test_truncation_keeps_most_recent_tail() {
        let original = history(7);
        let kept = truncate_history(&original, 4);
        assert_eq!(kept[0], original[0]);
        assert_eq!(kept[1..], original[4..]);
    }

    #[test]
    fn test_truncation_short_history_untouched() {
        let original = history(3);
        assert_eq!(truncate_history(&original, 5), original);
    }

    #[test]
    fn test_truncation_window_floor() {
        let original = history(4);
        let kept = truncate_history(&original, 0);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0], original[0]);
    }

    #[test]
    fn test_truncation_empty_input() {
        assert!(truncate_history(&[], 3).is_empty());
    }
}
