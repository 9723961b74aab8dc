//! Hugging Face text-generation inference.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{TextBackend, check_status};
use crate::error::ContestError;
use crate::persona::SamplingParams;

#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    inputs: &'a str,
    parameters: GenerationParameters,
}

#[derive(Debug, Serialize)]
struct GenerationParameters {
    max_new_tokens: u32,
    temperature: f32,
    top_k: u32,
    top_p: f32,
    return_full_text: bool,
}

#[derive(Debug, Deserialize)]
struct Generation {
    generated_text: String,
}

pub struct HuggingFaceTextBackend {
    api_token: String,
    base_url: String,
    model: String,
    http: reqwest::Client,
}

impl HuggingFaceTextBackend {
    pub fn new(api_token: &str, base_url: &str, model: &str, http: reqwest::Client) -> Self {
        Self {
            api_token: api_token.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            http,
        }
    }
}

#[async_trait]
impl TextBackend for HuggingFaceTextBackend {
    async fn complete(&self, prompt: &str, params: &SamplingParams) -> Result<String, ContestError> {
        let request = GenerationRequest {
            inputs: prompt,
            parameters: GenerationParameters {
                max_new_tokens: params.max_new_tokens,
                temperature: params.temperature,
                top_k: params.top_k,
                top_p: params.top_p,
                return_full_text: false,
            },
        };

        debug!(model = %self.model, max_new_tokens = params.max_new_tokens, "Text generation request");
        let response = self
            .http
            .post(format!("{}/models/{}", self.base_url, self.model))
            .bearer_auth(&self.api_token)
            .json(&request)
            .send()
            .await?;

        let generations: Vec<Generation> =
            check_status("Hugging Face", response).await?.json().await?;
        Ok(generations
            .into_iter()
            .next()
            .map(|g| g.generated_text)
            .unwrap_or_default())
    }
}
