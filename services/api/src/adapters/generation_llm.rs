//! services/api/src/adapters/generation_llm.rs
//!
//! This module contains the adapter for the content-generating LLM.
//! It implements the `ChatCompletionService` port from the `core` crate.
//! The same adapter serves OpenAI and Groq; Groq exposes an OpenAI-compatible
//! endpoint selected through the client's API base.

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs, ResponseFormat,
    },
    Client,
};
use async_trait::async_trait;
use devlearn_core::{
    domain::PromptSpec,
    ports::{ChatCompletionService, PortError, PortResult},
};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `ChatCompletionService` using an
/// OpenAI-compatible LLM. Constructed once at startup and injected into the
/// shared state; never a module-level global.
#[derive(Clone)]
pub struct OpenAiGenerationAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiGenerationAdapter {
    /// Creates a new `OpenAiGenerationAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }
}

//=========================================================================================
// `ChatCompletionService` Trait Implementation
//=========================================================================================

#[async_trait]
impl ChatCompletionService for OpenAiGenerationAdapter {
    /// Performs one chat-completion call for the given prompt. No retries:
    /// the caller owns fallback policy.
    async fn generate(&self, prompt: &PromptSpec) -> PortResult<String> {
        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(prompt.system_instruction.as_str())
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt.user_content.as_str())
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
        ];

        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(&self.model).messages(messages).n(1);
        if prompt.response_format_is_json {
            // Ask the provider for JSON-object mode; the payload is still
            // parsed and validated caller-side.
            args.response_format(ResponseFormat::JsonObject);
        }
        let request = args
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        // Call the API and manually map the error if it occurs, which respects the orphan rule.
        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e: OpenAIError| PortError::UpstreamUnavailable(e.to_string()))?;

        // Extract the text content from the first choice in the response.
        if let Some(choice) = response.choices.into_iter().next() {
            if let Some(content) = choice.message.content {
                Ok(content)
            } else {
                Err(PortError::MalformedResponse(
                    "chat completion contained no text content".to_string(),
                ))
            }
        } else {
            Err(PortError::MalformedResponse(
                "chat completion returned no choices".to_string(),
            ))
        }
    }
}
