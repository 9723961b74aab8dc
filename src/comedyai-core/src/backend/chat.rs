//! OpenAI-compatible chat completions.

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessage, CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use tracing::debug;

use super::ChatBackend;
use crate::error::ContestError;

pub struct OpenAIChatBackend {
    client: Client<OpenAIConfig>,
}

impl OpenAIChatBackend {
    pub fn new(api_key: &str, api_base: &str, http: reqwest::Client) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(api_base);

        Self {
            client: Client::with_config(config).with_http_client(http),
        }
    }
}

#[async_trait]
impl ChatBackend for OpenAIChatBackend {
    async fn complete(
        &self,
        model: &str,
        prompt: &str,
        max_tokens: u32,
    ) -> Result<String, ContestError> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(model)
            .max_completion_tokens(max_tokens)
            .messages(vec![ChatCompletionRequestMessage::User(
                ChatCompletionRequestUserMessage {
                    content: prompt.to_string().into(),
                    name: None,
                },
            )])
            .build()?;

        debug!(model, max_tokens, "Chat completion request");
        let response = self.client.chat().create(request).await?;

        Ok(response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default())
    }
}
