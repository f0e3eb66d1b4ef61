//! Chat handling: persona validation and message assembly.

pub mod handler;

pub use handler::{ChatError, ChatHandler};
