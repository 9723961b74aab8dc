//! Generation backend adapters.
//!
//! Each backend family sits behind its own trait so the persona engine can be
//! driven by the real services or by in-memory doubles.

mod chat;
mod message;
mod text;

pub use chat::OpenAIChatBackend;
pub use message::AnthropicMessageBackend;
pub use text::HuggingFaceTextBackend;

use async_trait::async_trait;

use crate::config::{BackendConfig, CONNECT_TIMEOUT, REQUEST_TIMEOUT};
use crate::error::ContestError;
use crate::persona::SamplingParams;

/// Chat-style completion service.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn complete(&self, model: &str, prompt: &str, max_tokens: u32)
    -> Result<String, ContestError>;
}

/// Message-style completion service.
#[async_trait]
pub trait MessageBackend: Send + Sync {
    async fn complete(&self, model: &str, prompt: &str, max_tokens: u32)
    -> Result<String, ContestError>;
}

/// Raw text-completion service.
#[async_trait]
pub trait TextBackend: Send + Sync {
    async fn complete(&self, prompt: &str, params: &SamplingParams) -> Result<String, ContestError>;
}

/// One adapter per backend family, owned by the persona engine.
pub struct Backends {
    pub chat: Box<dyn ChatBackend>,
    pub message: Box<dyn MessageBackend>,
    pub text: Box<dyn TextBackend>,
}

impl Backends {
    pub fn new(
        chat: impl ChatBackend + 'static,
        message: impl MessageBackend + 'static,
        text: impl TextBackend + 'static,
    ) -> Self {
        Self {
            chat: Box::new(chat),
            message: Box::new(message),
            text: Box::new(text),
        }
    }

    /// Build the real service adapters sharing one HTTP client.
    pub fn from_config(config: &BackendConfig) -> Result<Self, ContestError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| ContestError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self::new(
            OpenAIChatBackend::new(&config.openai_api_key, &config.openai_api_base, http.clone()),
            AnthropicMessageBackend::new(&config.anthropic_api_key, &config.anthropic_api_base, http.clone()),
            HuggingFaceTextBackend::new(&config.hf_api_token, &config.hf_api_base, &config.hf_model, http),
        ))
    }
}

/// Turn a non-success response into an [`ContestError::ApiError`].
async fn check_status(
    service: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response, ContestError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ContestError::ApiError {
        service,
        status: status.as_u16(),
        body,
    })
}
