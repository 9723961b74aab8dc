//! Persona definitions.
//!
//! A persona is a named role (host or contestant) with a fixed biography and
//! the generation backend that speaks for it.

use serde::{Deserialize, Serialize};

/// Sampling parameters for the raw text-completion backend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingParams {
    pub max_new_tokens: u32,
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            max_new_tokens: 250,
            temperature: 0.9,
            top_k: 50,
            top_p: 0.95,
        }
    }
}

/// Which generation backend a persona speaks through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Backend {
    /// Chat-completion service (OpenAI-compatible).
    Chat { model: String },
    /// Message-completion service (Anthropic Messages API).
    Message { model: String },
    /// Raw text-completion service (Hugging Face inference).
    Text(SamplingParams),
}

impl Backend {
    pub fn chat(model: impl Into<String>) -> Self {
        Backend::Chat {
            model: model.into(),
        }
    }

    pub fn message(model: impl Into<String>) -> Self {
        Backend::Message {
            model: model.into(),
        }
    }

    /// Service name used in error strings.
    pub fn service_name(&self) -> &'static str {
        match self {
            Backend::Chat { .. } => "OpenAI",
            Backend::Message { .. } => "Anthropic",
            Backend::Text(_) => "Hugging Face",
        }
    }

    /// Short label for introductions, e.g. "gpt-4".
    pub fn label(&self) -> &str {
        match self {
            Backend::Chat { model } | Backend::Message { model } => model,
            Backend::Text(_) => "open-weights text model",
        }
    }
}

/// A host or contestant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Persona {
    /// Display name.
    pub name: String,
    /// One-line description used when the host introduces this persona.
    pub billing: String,
    /// Biography and style instructions embedded in every prompt.
    pub role: String,
    pub backend: Backend,
}

impl Persona {
    pub fn new(name: impl Into<String>, role: impl Into<String>, backend: Backend) -> Self {
        let role = role.into();
        Self {
            name: name.into(),
            billing: role.clone(),
            role,
            backend,
        }
    }

    /// Set a shorter billing line than the full role text.
    pub fn with_billing(mut self, billing: impl Into<String>) -> Self {
        self.billing = billing.into();
        self
    }
}

/// A persona competing in the contest, with its running score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contestant {
    pub persona: Persona,
    pub score: u32,
}

impl Contestant {
    pub fn new(persona: Persona) -> Self {
        Self { persona, score: 0 }
    }

    pub fn name(&self) -> &str {
        &self.persona.name
    }
}

/// The contestant with the highest score, first in order on ties.
pub fn leader(contestants: &[Contestant]) -> Option<&Contestant> {
    contestants.iter().fold(None, |best, c| match best {
        Some(b) if b.score >= c.score => Some(b),
        _ => Some(c),
    })
}
