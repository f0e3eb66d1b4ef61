//! SessionCache: the streaming decorator around a completion call.
//!
//! Wraps a fragment-producing closure with transparent history loading
//! and persistence. The caller observes the identical fragment stream
//! the closure would have produced; persistence is a side effect that
//! only affects future reads for the same chat id.

use std::sync::Arc;

use async_stream::stream;
use futures_util::StreamExt;

use quill_types::chat::Message;
use quill_types::error::CompletionError;

use crate::llm::FragmentStream;
use crate::session::store::SessionStore;

/// Higher-order composition replacing a decorator: `wrap` takes the
/// underlying completion closure and returns a new stream performing
/// pre-load, delegation, and post-persist.
pub struct SessionCache<S> {
    store: Arc<S>,
}

impl<S: SessionStore + 'static> SessionCache<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Wrap a completion call with session caching.
    ///
    /// With no chat id or no new messages the call is delegated
    /// untouched and nothing is cached. Otherwise the prior record is
    /// loaded, the caller's messages are appended to it, the combined
    /// history is handed to `complete`, every fragment is re-yielded
    /// unchanged and in order, and once the underlying stream is
    /// exhausted the accumulated assistant response is appended and the
    /// whole history persisted.
    ///
    /// A mid-stream failure aborts without persisting. A persistence
    /// failure after exhaustion surfaces as a trailing error item.
    pub fn wrap<F>(
        &self,
        chat_id: Option<String>,
        messages: Vec<Message>,
        complete: F,
    ) -> FragmentStream
    where
        F: FnOnce(Vec<Message>) -> FragmentStream + Send + 'static,
    {
        let Some(chat_id) = chat_id else {
            return complete(messages);
        };
        if messages.is_empty() {
            return complete(messages);
        }

        let store = Arc::clone(&self.store);
        Box::pin(stream! {
            let mut history = match store.read(&chat_id).await {
                Ok(history) => history,
                Err(err) => {
                    yield Err(CompletionError::from(err));
                    return;
                }
            };
            history.extend(messages);

            let mut inner = complete(history.clone());
            let mut response = String::new();
            while let Some(fragment) = inner.next().await {
                match fragment {
                    Ok(fragment) => {
                        response.push_str(&fragment);
                        yield Ok(fragment);
                    }
                    Err(err) => {
                        yield Err(err);
                        return;
                    }
                }
            }

            history.push(Message::assistant(response));
            tracing::debug!(chat_id = %chat_id, messages = history.len(), "persisting session");
            if let Err(err) = store.write(&history, &chat_id).await {
                yield Err(CompletionError::from(err));
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::testing::MemoryStore;
    use quill_types::chat::MessageRole;

    fn fragments(parts: &[&str]) -> FragmentStream {
        let parts: Vec<String> = parts.iter().map(|s| s.to_string()).collect();
        Box::pin(futures_util::stream::iter(parts.into_iter().map(Ok)))
    }

    async fn collect(mut stream: FragmentStream) -> Vec<Result<String, CompletionError>> {
        let mut items = Vec::new();
        while let Some(item) = stream.next().await {
            items.push(item);
        }
        items
    }

    #[tokio::test]
    async fn test_no_chat_id_is_byte_identical_pass_through() {
        let store = Arc::new(MemoryStore::new(10));
        let cache = SessionCache::new(Arc::clone(&store));

        let stream = cache.wrap(None, vec![Message::user("hi")], |_| {
            fragments(&["Hel", "lo", "!"])
        });
        let items = collect(stream).await;
        let text: String = items.into_iter().map(|r| r.unwrap()).collect();
        assert_eq!(text, "Hello!");
        assert!(store.ids().is_empty());
    }

    #[tokio::test]
    async fn test_empty_messages_pass_through_without_caching() {
        let store = Arc::new(MemoryStore::new(10));
        let cache = SessionCache::new(Arc::clone(&store));

        let stream = cache.wrap(Some("work".to_string()), Vec::new(), |messages| {
            assert!(messages.is_empty());
            fragments(&["ok"])
        });
        let items = collect(stream).await;
        assert_eq!(items.len(), 1);
        assert!(store.ids().is_empty());
    }

    #[tokio::test]
    async fn test_caching_persists_combined_history_with_assistant() {
        let store = Arc::new(MemoryStore::new(10));
        let cache = SessionCache::new(Arc::clone(&store));

        let new_messages = vec![Message::system("You are Quill"), Message::user("hi")];
        let stream = cache.wrap(Some("work".to_string()), new_messages, |messages| {
            // The closure sees the combined history (empty prior + new).
            assert_eq!(messages.len(), 2);
            fragments(&["Hel", "lo"])
        });
        let items = collect(stream).await;
        assert!(items.iter().all(|r| r.is_ok()));

        let stored = store.read("work").await.unwrap();
        assert_eq!(stored.len(), 3);
        assert_eq!(stored[2].role, MessageRole::Assistant);
        assert_eq!(stored[2].content, "Hello");
    }

    #[tokio::test]
    async fn test_second_turn_loads_prior_history() {
        let store = Arc::new(MemoryStore::new(10));
        store
            .write(
                &[
                    Message::system("You are Quill"),
                    Message::user("hi"),
                    Message::assistant("Hello"),
                ],
                "work",
            )
            .await
            .unwrap();
        let cache = SessionCache::new(Arc::clone(&store));

        let stream = cache.wrap(
            Some("work".to_string()),
            vec![Message::user("again")],
            |messages| {
                assert_eq!(messages.len(), 4);
                assert_eq!(messages[3].content, "again");
                fragments(&["Hi"])
            },
        );
        collect(stream).await;

        let stored = store.read("work").await.unwrap();
        assert_eq!(stored.len(), 5);
        assert_eq!(stored[4].content, "Hi");
    }

    #[tokio::test]
    async fn test_mid_stream_error_aborts_without_persisting() {
        let store = Arc::new(MemoryStore::new(10));
        let cache = SessionCache::new(Arc::clone(&store));

        let stream = cache.wrap(Some("work".to_string()), vec![Message::user("hi")], |_| {
            Box::pin(futures_util::stream::iter(vec![
                Ok("partial".to_string()),
                Err(CompletionError::Stream("connection reset".to_string())),
            ]))
        });
        let items = collect(stream).await;
        assert_eq!(items.len(), 2);
        assert!(items[0].is_ok());
        assert!(items[1].is_err());
        assert!(store.ids().is_empty());
    }

    #[tokio::test]
    async fn test_fragment_order_preserved() {
        let store = Arc::new(MemoryStore::new(10));
        let cache = SessionCache::new(Arc::clone(&store));

        let parts = ["a", "b", "c", "d", "e"];
        let stream = cache.wrap(Some("work".to_string()), vec![Message::user("x")], move |_| {
            fragments(&parts)
        });
        let items = collect(stream).await;
        let observed: Vec<String> = items.into_iter().map(|r| r.unwrap()).collect();
        assert_eq!(observed, ["a", "b", "c", "d", "e"]);
    }
}
