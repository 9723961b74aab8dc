//! Backend configuration read from the environment.

use std::env;
use std::time::Duration;

pub const DEFAULT_OPENAI_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_ANTHROPIC_API_BASE: &str = "https://api.anthropic.com/v1";
pub const DEFAULT_HF_API_BASE: &str = "https://api-inference.huggingface.co";
pub const DEFAULT_HF_MODEL: &str = "HuggingFaceH4/zephyr-7b-beta";

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Credentials and endpoints for the three generation backends.
///
/// Missing credentials are kept as empty strings; calls made with them fail
/// at request time like any other backend error.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub openai_api_key: String,
    pub openai_api_base: String,
    pub anthropic_api_key: String,
    pub anthropic_api_base: String,
    pub hf_api_token: String,
    pub hf_api_base: String,
    pub hf_model: String,
}

impl BackendConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let first = |keys: &[&str]| keys.iter().find_map(|k| lookup(*k).filter(|v| !v.is_empty()));

        Self {
            openai_api_key: first(&["OPENAI_API_KEY"]).unwrap_or_default(),
            openai_api_base: first(&["OPENAI_API_BASE", "OPENAI_BASE_URL"])
                .unwrap_or_else(|| DEFAULT_OPENAI_API_BASE.to_string()),
            anthropic_api_key: first(&["ANTHROPIC_API_KEY"]).unwrap_or_default(),
            anthropic_api_base: first(&["ANTHROPIC_BASE_URL"])
                .unwrap_or_else(|| DEFAULT_ANTHROPIC_API_BASE.to_string()),
            hf_api_token: first(&["HF_API_TOKEN", "HUGGINGFACE_API_TOKEN"]).unwrap_or_default(),
            hf_api_base: first(&["HF_API_BASE"]).unwrap_or_else(|| DEFAULT_HF_API_BASE.to_string()),
            hf_model: first(&["HF_MODEL"]).unwrap_or_else(|| DEFAULT_HF_MODEL.to_string()),
        }
    }

    /// Names of credential variables that are unset.
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.openai_api_key.is_empty() {
            missing.push("OPENAI_API_KEY");
        }
        if self.anthropic_api_key.is_empty() {
            missing.push("ANTHROPIC_API_KEY");
        }
        if self.hf_api_token.is_empty() {
            missing.push("HF_API_TOKEN");
        }
        missing
    }
}
