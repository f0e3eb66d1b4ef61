//! CompletionProvider trait definition.
//!
//! The provider is an external collaborator: the core only requires a
//! finite, in-order sequence of text fragments, or an error on transport
//! failure. Streams are boxed so they stay object-friendly across the
//! session cache and printer boundaries.

use std::pin::Pin;

use futures_util::Stream;

use quill_types::chat::CompletionRequest;
use quill_types::error::CompletionError;

/// A lazy, finite, non-restartable sequence of text fragments.
pub type FragmentStream =
    Pin<Box<dyn Stream<Item = Result<String, CompletionError>> + Send + 'static>>;

/// Trait for LLM completion backends.
///
/// Implementations live in quill-infra (e.g., `OpenAiCompatProvider`).
pub trait CompletionProvider: Send + Sync {
    /// Human-readable provider name (e.g., "openai").
    fn name(&self) -> &str;

    /// Send a streaming completion request. Fragments arrive in order;
    /// the first failure terminates the stream.
    fn stream(&self, request: CompletionRequest) -> FragmentStream;
}
