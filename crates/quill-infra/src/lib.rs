//! Infrastructure adapters for Quill.
//!
//! Implements the traits defined in `quill-core` against real backends:
//! file-backed session storage, an OpenAI-compatible completion client,
//! and the global config loader.

pub mod config;
pub mod llm;
pub mod storage;
