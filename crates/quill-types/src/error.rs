use thiserror::Error;

/// User-facing validation errors raised before any completion request.
#[derive(Debug, Error)]
pub enum UsageError {
    #[error("cannot change chat role to '{requested}' since it was initiated as '{existing}' chat")]
    RoleMismatch { requested: String, existing: String },

    #[error("could not determine chat role of '{chat_id}'")]
    UnknownChatRole { chat_id: String },

    #[error("role '{name}' not found")]
    RoleNotFound { name: String },
}

/// Errors from session store operations.
///
/// Malformed persisted records are never surfaced as errors; the store
/// recovers them as an empty history. These variants cover the fatal
/// side: unwritable directories, failed deletes, failed serialization.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors from the completion pipeline.
///
/// Transport failures propagate unmodified from the provider and are not
/// retried. `Storage` carries a persistence failure that occurs after the
/// fragment stream has been fully re-yielded.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("provider error: {message}")]
    Provider { message: String },

    #[error("stream error: {0}")]
    Stream(String),

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}
