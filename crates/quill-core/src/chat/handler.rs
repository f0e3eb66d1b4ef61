//! ChatHandler: persona-consistency validation and completion dispatch.
//!
//! Validation runs once at construction, before any network call, so a
//! known-invalid conversation state never wastes a completion request.
//! A conversation keeps the persona it was initiated with: repeated
//! invocations may omit the role (the stored persona is adopted) but may
//! not change it.

use std::sync::Arc;

use thiserror::Error;

use quill_types::chat::{CompletionRequest, Message, TEMP_CHAT_ID};
use quill_types::error::{CompletionError, StorageError, UsageError};

use crate::llm::CompletionProvider;
use crate::printer::Printer;
use crate::role::{RoleRegistry, SystemRole};
use crate::session::{SessionCache, SessionStore};

/// Errors surfaced by chat handling.
///
/// `Usage` keeps the inner error as `source` so a binary can find it in
/// an error chain and map it to an exit code.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("{0}")]
    Usage(#[from] UsageError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Completion(#[from] CompletionError),
}

/// Handles one conversation: validates the persona against any stored
/// record, assembles outgoing messages, and routes the completion
/// stream through the session cache and printer.
#[derive(Debug)]
pub struct ChatHandler<S> {
    chat_id: Option<String>,
    role: SystemRole,
    markdown: bool,
    store: Arc<S>,
}

impl<S: SessionStore + 'static> ChatHandler<S> {
    /// Construct a handler, running persona validation against the
    /// stored record for `chat_id` (when one exists).
    ///
    /// `markdown` is the caller's request; it only sticks when the
    /// resolved persona supports markdown output.
    ///
    /// The `temp` sentinel id is invalidated first, guaranteeing a clean
    /// slate on every use.
    pub async fn new(
        store: Arc<S>,
        registry: &RoleRegistry,
        chat_id: Option<String>,
        role: SystemRole,
        markdown: bool,
    ) -> Result<Self, ChatError> {
        let mut role = role;

        if let Some(id) = &chat_id {
            if id == TEMP_CHAT_ID {
                store.invalidate(id).await?;
            }

            let history = store.read(id).await?;
            if let Some(first) = history.first() {
                let stored_name = registry.name_from_message(&first.content).ok_or_else(|| {
                    UsageError::UnknownChatRole {
                        chat_id: id.clone(),
                    }
                })?;

                if role.is_default() {
                    // The caller omitted the role flag; adopt the persona
                    // the conversation was initiated with.
                    role = registry
                        .get(&stored_name)
                        .cloned()
                        .ok_or(UsageError::RoleNotFound { name: stored_name })?;
                } else if !role.matches(&first.content) {
                    return Err(UsageError::RoleMismatch {
                        requested: role.name.clone(),
                        existing: stored_name,
                    }
                    .into());
                }
            }
        }

        Ok(Self {
            chat_id,
            markdown: markdown && role.wants_markdown(),
            role,
            store,
        })
    }

    /// The persona this handler resolved to (possibly adopted from the
    /// stored record).
    pub fn role(&self) -> &SystemRole {
        &self.role
    }

    /// Whether responses should be rendered as markdown: requested by
    /// the caller and supported by the resolved persona.
    pub fn markdown(&self) -> bool {
        self.markdown
    }

    pub fn chat_id(&self) -> Option<&str> {
        self.chat_id.as_deref()
    }

    /// Whether a stored record exists for this conversation.
    pub async fn initiated(&self) -> bool {
        match &self.chat_id {
            Some(id) => self.store.exists(id).await,
            None => false,
        }
    }

    /// Build the new messages for this turn: a system message carrying
    /// the persona definition when the conversation has no record yet,
    /// then the user prompt.
    pub async fn make_messages(&self, prompt: &str) -> Vec<Message> {
        let mut messages = Vec::new();
        if !self.initiated().await {
            messages.push(Message::system(self.role.definition.clone()));
        }
        messages.push(Message::user(prompt));
        messages
    }

    /// Run one turn: assemble messages, stream the completion through
    /// the session cache, render via the printer, and return the full
    /// response text.
    pub async fn handle<P, W>(
        &self,
        prompt: &str,
        provider: Arc<P>,
        printer: &mut W,
        model: &str,
        temperature: Option<f64>,
        live: bool,
    ) -> Result<String, ChatError>
    where
        P: CompletionProvider + 'static,
        W: Printer,
    {
        let messages = self.make_messages(prompt).await;
        let cache = SessionCache::new(Arc::clone(&self.store));
        let model = model.to_string();
        let stream = cache.wrap(self.chat_id.clone(), messages, move |messages| {
            provider.stream(CompletionRequest {
                model,
                messages,
                temperature,
                max_tokens: None,
            })
        });
        Ok(printer.print(stream, live).await?)
    }
}
