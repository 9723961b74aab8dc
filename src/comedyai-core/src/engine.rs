//! Persona engine: prompt construction and backend dispatch.
//!
//! Backend failures stop here. Every call returns text, with failures
//! rendered as `Error generating <service> response: <message>`.

use tracing::{debug, warn};

use crate::backend::Backends;
use crate::persona::{Backend, Contestant, Persona};

/// What a persona is asked to do.
#[derive(Debug, Clone, Copy)]
pub enum Instruction<'a> {
    /// Introduce the contest and the contestants.
    Introduce { contestants: &'a [Contestant] },
    /// Suggest a theme for the next round.
    SuggestTheme,
    /// Tell a joke on a theme.
    TellJoke { theme: &'a str },
    /// Judge a joke against its theme.
    Judge { joke: &'a str, theme: &'a str },
    /// Announce the winner and close the show.
    DeclareWinner { winner: &'a str },
}

impl Instruction<'_> {
    /// Token budget for chat and message backends.
    pub fn max_tokens(&self) -> u32 {
        match self {
            Instruction::Introduce { .. } => 400,
            Instruction::SuggestTheme => 20,
            Instruction::TellJoke { .. } => 300,
            Instruction::Judge { .. } => 200,
            Instruction::DeclareWinner { .. } => 300,
        }
    }

    fn text(&self) -> String {
        match self {
            Instruction::Introduce { contestants } => {
                let lineup = contestants
                    .iter()
                    .enumerate()
                    .map(|(i, c)| {
                        format!(
                            "{}. {} ({}): {}",
                            i + 1,
                            c.persona.name,
                            c.persona.backend.label(),
                            c.persona.billing
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n");

                format!(
                    "Briefly introduce the AI comedy contest.\n\
                     Include a brief introduction of yourself and the following contestants:\n\
                     {}\n\
                     Keep it short, concise and entertaining.",
                    lineup
                )
            }
            Instruction::SuggestTheme => "Suggest a random theme for a comedy contest joke. \
                 Be creative and diverse. Respond with just the theme, one to three words maximum."
                .to_string(),
            Instruction::TellJoke { theme } => format!("Tell a joke about {}.", theme),
            Instruction::Judge { joke, theme } => format!(
                r#"Judge this joke on the theme '{theme}' using the following criteria:
1. Overall (1-10)
2. Humor (1-10)
3. Relevance to theme (1-10)
4. Creativity (1-10)

Provide a very short comment after the scores.

Joke: {joke}

Respond in this format:
Overall: [score]
Humor: [score]
Relevance: [score]
Creativity: [score]
Comment: [Your brief comment]"#
            ),
            Instruction::DeclareWinner { winner } => format!(
                "Declare {} as the winner of the comedy contest and give a short outro.",
                winner
            ),
        }
    }
}

/// Build the full prompt for a persona.
pub fn build_prompt(persona: &Persona, instruction: &Instruction<'_>) -> String {
    format!("You are {}. {} {}", persona.name, persona.role, instruction.text())
}

/// Speaks for personas through the configured backends.
pub struct PersonaEngine {
    backends: Backends,
}

impl PersonaEngine {
    pub fn new(backends: Backends) -> Self {
        Self { backends }
    }

    /// Ask a persona to follow an instruction. Always returns text.
    pub async fn speak(&self, persona: &Persona, instruction: Instruction<'_>) -> String {
        let prompt = build_prompt(persona, &instruction);
        debug!(persona = %persona.name, service = persona.backend.service_name(), "Speaking");

        let result = match &persona.backend {
            Backend::Chat { model } => {
                self.backends
                    .chat
                    .complete(model, &prompt, instruction.max_tokens())
                    .await
            }
            Backend::Message { model } => {
                self.backends
                    .message
                    .complete(model, &prompt, instruction.max_tokens())
                    .await
            }
            Backend::Text(params) => self.backends.text.complete(&prompt, params).await,
        };

        match result {
            Ok(response) => {
                let cleaned = sanitize_response(&response);
                if cleaned.is_empty() {
                    warn!(persona = %persona.name, "Empty response");
                    format!("{} couldn't generate a response.", persona.name)
                } else {
                    cleaned
                }
            }
            Err(e) => {
                let service = persona.backend.service_name();
                warn!(persona = %persona.name, service, error = %e, "Backend call failed");
                format!("Error generating {} response: {}", service, e)
            }
        }
    }
}

/// Strip reasoning tags and surrounding whitespace from generated text.
///
/// Removes blocks like `<think>...</think>` and any orphaned tags, but keeps
/// line breaks so judgments stay line-oriented.
fn sanitize_response(response: &str) -> String {
    let tags_to_strip = [
        "thinking",
        "think",
        "reflection",
        "reasoning",
        "thought",
        "scratchpad",
    ];

    let mut result = response.to_string();

    for tag in &tags_to_strip {
        let pattern = format!(r"(?is)<{tag}[^>]*>.*?</{tag}>", tag = tag);
        if let Ok(re) = regex::Regex::new(&pattern) {
            result = re.replace_all(&result, "").to_string();
        }
    }

    let orphan_pattern = format!(r"(?i)</?(?:{})[^>]*>", tags_to_strip.join("|"));
    if let Ok(orphan_re) = regex::Regex::new(&orphan_pattern) {
        result = orphan_re.replace_all(&result, "").to_string();
    }

    result.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{ChatBackend, MessageBackend, TextBackend};
    use crate::error::ContestError;
    use crate::persona::SamplingParams;
    use async_trait::async_trait;

    struct Echo;

    #[async_trait]
    impl ChatBackend for Echo {
        async fn complete(&self, model: &str, _: &str, max_tokens: u32) -> Result<String, ContestError> {
            Ok(format!("chat {} {}", model, max_tokens))
        }
    }

    #[async_trait]
    impl MessageBackend for Echo {
        async fn complete(&self, model: &str, _: &str, max_tokens: u32) -> Result<String, ContestError> {
            Ok(format!("message {} {}", model, max_tokens))
        }
    }

    #[async_trait]
    impl TextBackend for Echo {
        async fn complete(&self, _: &str, params: &SamplingParams) -> Result<String, ContestError> {
            Ok(format!("text {}", params.max_new_tokens))
        }
    }

    struct Broken;

    #[async_trait]
    impl ChatBackend for Broken {
        async fn complete(&self, _: &str, _: &str, _: u32) -> Result<String, ContestError> {
            Err(ContestError::ApiError {
                service: "OpenAI",
                status: 429,
                body: "rate limited".to_string(),
            })
        }
    }

    #[async_trait]
    impl MessageBackend for Broken {
        async fn complete(&self, _: &str, _: &str, _: u32) -> Result<String, ContestError> {
            Ok("   ".to_string())
        }
    }

    #[async_trait]
    impl TextBackend for Broken {
        async fn complete(&self, _: &str, _: &SamplingParams) -> Result<String, ContestError> {
            Err(ContestError::ConfigError("no token".to_string()))
        }
    }

    fn persona(backend: Backend) -> Persona {
        Persona::new("Gepetto", "A 1990's stand-up comedian.", backend)
    }

    #[test]
    fn test_build_prompt_joke() {
        let prompt = build_prompt(
            &persona(Backend::chat("gpt-4")),
            &Instruction::TellJoke { theme: "Space travel" },
        );
        assert_eq!(
            prompt,
            "You are Gepetto. A 1990's stand-up comedian. Tell a joke about Space travel."
        );
    }

    #[test]
    fn test_build_prompt_judge_includes_format() {
        let prompt = build_prompt(
            &persona(Backend::chat("gpt-4")),
            &Instruction::Judge {
                joke: "Why did the rocket break up?",
                theme: "Space travel",
            },
        );
        assert!(prompt.contains("on the theme 'Space travel'"));
        assert!(prompt.contains("Joke: Why did the rocket break up?"));
        assert!(prompt.contains("Comment: [Your brief comment]"));
    }

    #[test]
    fn test_build_prompt_introduction_lists_contestants() {
        let contestants = vec![
            Contestant::new(persona(Backend::chat("gpt-4")).with_billing("A 1990's stand-up comedian")),
            Contestant::new(
                Persona::new("Claude", "A french sarcastic comedian.", Backend::message("claude-3-sonnet"))
                    .with_billing("A French sarcastic comedian"),
            ),
        ];
        let prompt = build_prompt(
            &persona(Backend::chat("gpt-4")),
            &Instruction::Introduce {
                contestants: &contestants,
            },
        );
        assert!(prompt.contains("1. Gepetto (gpt-4): A 1990's stand-up comedian"));
        assert!(prompt.contains("2. Claude (claude-3-sonnet): A French sarcastic comedian"));
    }

    #[tokio::test]
    async fn test_dispatch_by_backend() {
        let engine = PersonaEngine::new(Backends::new(Echo, Echo, Echo));
        let joke = Instruction::TellJoke { theme: "Cats" };

        assert_eq!(engine.speak(&persona(Backend::chat("gpt-4")), joke).await, "chat gpt-4 300");
        assert_eq!(
            engine.speak(&persona(Backend::message("claude-3")), joke).await,
            "message claude-3 300"
        );
        assert_eq!(
            engine
                .speak(&persona(Backend::Text(SamplingParams::default())), joke)
                .await,
            "text 250"
        );
        assert_eq!(
            engine
                .speak(&persona(Backend::chat("gpt-4")), Instruction::SuggestTheme)
                .await,
            "chat gpt-4 20"
        );
    }

    #[tokio::test]
    async fn test_backend_errors_become_text() {
        let engine = PersonaEngine::new(Backends::new(Broken, Broken, Broken));
        let joke = Instruction::TellJoke { theme: "Cats" };

        assert_eq!(
            engine.speak(&persona(Backend::chat("gpt-4")), joke).await,
            "Error generating OpenAI response: OpenAI API returned 429: rate limited"
        );
        assert_eq!(
            engine
                .speak(&persona(Backend::Text(SamplingParams::default())), joke)
                .await,
            "Error generating Hugging Face response: Configuration error: no token"
        );
    }

    #[tokio::test]
    async fn test_empty_response_placeholder() {
        let engine = PersonaEngine::new(Backends::new(Broken, Broken, Broken));
        let reply = engine
            .speak(&persona(Backend::message("claude-3")), Instruction::TellJoke { theme: "Cats" })
            .await;
        assert_eq!(reply, "Gepetto couldn't generate a response.");
    }

    #[test]
    fn test_sanitize_response_thinking_tags() {
        let input = "<thinking>Let me think about this...</thinking>The answer is 42.";
        assert_eq!(sanitize_response(input), "The answer is 42.");
    }

    #[test]
    fn test_sanitize_response_multiline_tags() {
        let input = "<think>\nMultiple\nlines\n</think>\nOverall: 8\nComment: Nice.";
        assert_eq!(sanitize_response(input), "Overall: 8\nComment: Nice.");
    }

    #[test]
    fn test_sanitize_response_keeps_line_breaks() {
        let input = "  Pourquoi le chat...\n\nLiteral translation: Why did the cat...  ";
        assert_eq!(
            sanitize_response(input),
            "Pourquoi le chat...\n\nLiteral translation: Why did the cat..."
        );
    }

    #[test]
    fn test_sanitize_response_orphan_tag() {
        assert_eq!(sanitize_response("</think>Knock knock."), "Knock knock.");
    }
}
