//! The fixed cast of the show.

use crate::persona::{Backend, Persona, SamplingParams};

pub const HOST_MODEL: &str = "gpt-4";
pub const CLAUDE_MODEL: &str = "claude-3-sonnet-20240229";

/// The game show host, who introduces, picks themes, judges and closes.
pub fn host() -> Persona {
    Persona::new(
        "AIexA Trebek",
        "A 1980's game show host with zingy one-liners.",
        Backend::chat(HOST_MODEL),
    )
}

/// Contestants in the order they perform each round.
pub fn contestants() -> Vec<Persona> {
    vec![
        Persona::new(
            "Gepetto",
            "A 1990's stand-up comedian that tells short funny observational jokes on the theme. \
             No more than four sentences per joke. Make it sound like spoken language with \
             occasional filler-words.",
            Backend::chat("gpt-4"),
        )
        .with_billing("A 1990's stand-up comedian"),
        Persona::new(
            "Chattie",
            "A 1980's comedian telling funny innuendo-filled one-liners on the theme.",
            Backend::chat("gpt-3.5-turbo"),
        )
        .with_billing("A 1980's comedian known for innuendo-filled one-liners"),
        Persona::new(
            "Claude",
            "A french sarcastic comedian telling funny jokes on the theme in french. Start a new \
             paragraph and put an english literal translation of the joke and format it as a \
             separate paragraph.",
            Backend::message(CLAUDE_MODEL),
        )
        .with_billing("A French sarcastic comedian"),
        Persona::new(
            "Hugo",
            "A deadpan British comedian telling dry, understated jokes on the theme. \
             Answer with the joke only, in two or three sentences.",
            Backend::Text(SamplingParams::default()),
        )
        .with_billing("A deadpan British comedian"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_order_and_backends() {
        let names: Vec<String> = contestants().into_iter().map(|p| p.name).collect();
        assert_eq!(names, ["Gepetto", "Chattie", "Claude", "Hugo"]);

        let cast = contestants();
        assert!(matches!(cast[2].backend, Backend::Message { .. }));
        assert!(matches!(cast[3].backend, Backend::Text(_)));
    }

    #[test]
    fn test_host_uses_chat() {
        assert_eq!(host().backend, Backend::chat(HOST_MODEL));
    }
}
