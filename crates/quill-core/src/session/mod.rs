//! Conversation persistence: the store trait and the streaming cache.

pub mod cache;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use cache::SessionCache;
pub use store::{truncate_history, SessionStore};
