//! Core logic for the Quill terminal assistant.
//!
//! Contains the session store trait and truncation policy, the session
//! cache (the streaming decorator that persists conversations), the chat
//! handler with persona validation, the role registry, and the printer
//! and completion provider traits. Infrastructure implementations live
//! in `quill-infra`; terminal printers live in `quill-cli`.

pub mod chat;
pub mod llm;
pub mod printer;
pub mod role;
pub mod session;
