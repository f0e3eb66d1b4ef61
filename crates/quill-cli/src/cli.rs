//! CLI argument definitions for the `quill` binary.
//!
//! Uses clap derive macros. A single flat command: positional prompt plus
//! flags for session, persona, and rendering control.

use clap::Parser;

/// Ask an LLM from your terminal, with optional persistent conversations.
#[derive(Parser)]
#[command(name = "quill", version, about, long_about = None)]
pub struct Cli {
    /// Prompt to send.
    pub prompt: Option<String>,

    /// Continue or start the named conversation ("temp" is wiped each use).
    #[arg(long, value_name = "ID")]
    pub chat: Option<String>,

    /// Persona: default, shell, describe-shell, code.
    #[arg(long, default_value = "default")]
    pub role: String,

    /// Render the response as markdown (default for conversational personas).
    #[arg(long = "md", overrides_with = "no_md")]
    pub md: bool,

    /// Render the response as plain text.
    #[arg(long = "no-md")]
    pub no_md: bool,

    /// Drain the whole response behind a spinner and print it once.
    #[arg(long = "no-stream")]
    pub no_stream: bool,

    /// Model override (defaults to the configured model).
    #[arg(long)]
    pub model: Option<String>,

    /// List stored conversation ids, oldest first.
    #[arg(long = "list-chats")]
    pub list_chats: bool,

    /// Print a stored conversation.
    #[arg(long = "show-chat", value_name = "ID")]
    pub show_chat: Option<String>,

    /// Suppress all output except errors.
    #[arg(short, long)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Whether markdown rendering is allowed (persona willing).
    pub fn markdown(&self) -> bool {
        !self.no_md
    }
}
