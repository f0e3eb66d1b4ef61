//! OpenAI-compatible completion provider.
//!
//! One [`OpenAiCompatProvider`] serves OpenAI and any endpoint that speaks
//! the same chat-completions protocol, via a configurable base URL.
//!
//! Uses [`async_openai`] for type-safe request handling and built-in SSE
//! streaming.

use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionRequestAssistantMessage, ChatCompletionRequestAssistantMessageContent,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
    ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessage,
    ChatCompletionRequestUserMessageContent, CreateChatCompletionRequest,
};
use async_openai::Client;
use futures_util::StreamExt;
use secrecy::{ExposeSecret, SecretString};

use quill_core::llm::{CompletionProvider, FragmentStream};
use quill_types::chat::{CompletionRequest, MessageRole};
use quill_types::error::CompletionError;

/// Provider for any OpenAI-compatible chat-completions API.
///
/// # API Key Security
///
/// Does NOT derive Debug to prevent accidental exposure of the API key
/// stored inside the `async_openai::Client`.
pub struct OpenAiCompatProvider {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiCompatProvider {
    /// Create a provider from an API key, optional base-url override, and
    /// default model. `base_url` of `None` targets `api.openai.com`.
    pub fn new(api_key: &SecretString, base_url: Option<&str>, model: &str) -> Self {
        let mut config = OpenAIConfig::new().with_api_key(api_key.expose_secret());
        if let Some(base) = base_url {
            config = config.with_api_base(base);
        }

        Self {
            client: Client::with_config(config),
            model: model.to_string(),
        }
    }

    /// Build a [`CreateChatCompletionRequest`] from a generic [`CompletionRequest`].
    fn build_request(&self, request: &CompletionRequest) -> CreateChatCompletionRequest {
        let mut messages: Vec<ChatCompletionRequestMessage> = Vec::new();

        for msg in &request.messages {
            let oai_msg = match msg.role {
                MessageRole::System => {
                    ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage {
                        content: ChatCompletionRequestSystemMessageContent::Text(
                            msg.content.clone(),
                        ),
                        name: None,
                    })
                }
                MessageRole::User => {
                    ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
                        content: ChatCompletionRequestUserMessageContent::Text(msg.content.clone()),
                        name: None,
                    })
                }
                MessageRole::Assistant => {
                    #[allow(deprecated)]
                    ChatCompletionRequestMessage::Assistant(ChatCompletionRequestAssistantMessage {
                        content: Some(ChatCompletionRequestAssistantMessageContent::Text(
                            msg.content.clone(),
                        )),
                        refusal: None,
                        name: None,
                        audio: None,
                        tool_calls: None,
                        function_call: None,
                    })
                }
            };
            messages.push(oai_msg);
        }

        // Model from the request wins; empty falls back to the configured default.
        let model = if request.model.is_empty() {
            self.model.clone()
        } else {
            request.model.clone()
        };

        CreateChatCompletionRequest {
            model,
            messages,
            max_completion_tokens: request.max_tokens,
            temperature: request.temperature.map(|t| t as f32),
            stream: Some(true),
            ..Default::default()
        }
    }
}

impl CompletionProvider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        "openai_compat"
    }

    fn stream(&self, request: CompletionRequest) -> FragmentStream {
        let oai_request = self.build_request(&request);

        // Clone the client for the 'static stream closure.
        let client = self.client.clone();

        Box::pin(async_stream::try_stream! {
            let mut oai_stream = client
                .chat()
                .create_stream(oai_request)
                .await
                .map_err(map_openai_error)?;

            while let Some(chunk) = oai_stream.next().await {
                let chunk = chunk.map_err(map_openai_error)?;
                for choice in chunk.choices {
                    if let Some(content) = choice.delta.content {
                        if !content.is_empty() {
                            yield content;
                        }
                    }
                }
            }
        })
    }
}

/// Map an `async_openai::error::OpenAIError` to a [`CompletionError`].
fn map_openai_error(err: async_openai::error::OpenAIError) -> CompletionError {
    use async_openai::error::OpenAIError;

    match &err {
        OpenAIError::ApiError(api_err) => {
            let code = api_err.code.as_deref().unwrap_or("");
            let error_type = api_err.r#type.as_deref().unwrap_or("");

            if code == "authentication_error"
                || error_type == "authentication_error"
                || api_err.message.contains("Incorrect API key")
                || api_err.message.contains("Invalid API key")
            {
                CompletionError::AuthenticationFailed
            } else if code == "rate_limit_exceeded" || error_type == "rate_limit_error" {
                CompletionError::RateLimited {
                    retry_after_ms: None,
                }
            } else {
                CompletionError::Provider {
                    message: err.to_string(),
                }
            }
        }
        OpenAIError::Reqwest(reqwest_err) => {
            if let Some(status) = reqwest_err.status() {
                match status.as_u16() {
                    401 => CompletionError::AuthenticationFailed,
                    429 => CompletionError::RateLimited {
                        retry_after_ms: None,
                    },
                    _ => CompletionError::Provider {
                        message: err.to_string(),
                    },
                }
            } else {
                CompletionError::Provider {
                    message: err.to_string(),
                }
            }
        }
        OpenAIError::JSONDeserialize(_, content) => {
            CompletionError::Deserialization(format!("failed to parse response: {content}"))
        }
        OpenAIError::StreamError(stream_err) => CompletionError::Stream(stream_err.to_string()),
        OpenAIError::InvalidArgument(msg) => CompletionError::InvalidRequest(msg.clone()),
        _ => CompletionError::Provider {
            message: err.to_string(),
        },
    }
}
