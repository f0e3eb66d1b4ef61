//! Shared domain types for Quill.
//!
//! This crate contains the types used across the Quill terminal assistant:
//! chat messages, completion requests, configuration, and error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
