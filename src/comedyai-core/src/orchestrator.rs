//! Contest orchestration.
//!
//! Runs the show in a fixed order: host introduction, three themed rounds in
//! which every contestant tells a joke and the host judges it, then the
//! winner declaration.

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::engine::{Instruction, PersonaEngine};
use crate::error::ContestError;
use crate::judgment::{Judgment, parse_judgment};
use crate::persona::{Contestant, Persona, leader};
use crate::theme::ThemeSelector;

/// Number of rounds in a contest.
pub const ROUNDS: usize = 3;

/// One contestant's turn within a round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JokeRecord {
    pub contestant: String,
    pub joke: String,
    pub judgment: Judgment,
}

/// A completed round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundRecord {
    /// 1-based round number.
    pub number: usize,
    pub theme: String,
    /// Turns in roster order.
    pub jokes: Vec<JokeRecord>,
}

/// Everything needed to render the contest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContestTranscript {
    pub host: String,
    pub introduction: String,
    pub rounds: Vec<RoundRecord>,
    /// Final cumulative scores in roster order.
    pub standings: Vec<(String, u32)>,
    pub winner: String,
    pub winner_announcement: String,
}

/// Callback for contest events.
pub type ContestCallback = Box<dyn Fn(ContestEvent) + Send + Sync>;

/// Events emitted while the contest runs.
#[derive(Debug, Clone)]
pub enum ContestEvent {
    /// The host has introduced the show.
    Introduction { host: String, text: String },
    /// A round is starting.
    RoundStart { number: usize, theme: String },
    /// A contestant has told a joke.
    JokeTold { contestant: String, joke: String },
    /// The host has judged a joke.
    JokeJudged { contestant: String, judgment: Judgment, total: u32 },
    /// The host has declared the winner.
    WinnerDeclared { winner: String, score: u32, text: String },
}

/// Drives a contest between a host and a fixed roster of contestants.
pub struct ContestOrchestrator {
    engine: PersonaEngine,
    host: Persona,
    contestants: Vec<Contestant>,
    themes: ThemeSelector,
    rounds: Vec<RoundRecord>,
    rng: StdRng,
    callback: Option<ContestCallback>,
}

impl ContestOrchestrator {
    pub fn new(
        engine: PersonaEngine,
        host: Persona,
        contestants: Vec<Persona>,
    ) -> Result<Self, ContestError> {
        if contestants.is_empty() {
            return Err(ContestError::ConfigError(
                "A contest needs at least one contestant".to_string(),
            ));
        }

        Ok(Self {
            engine,
            host,
            contestants: contestants.into_iter().map(Contestant::new).collect(),
            themes: ThemeSelector::default(),
            rounds: Vec::new(),
            rng: StdRng::from_os_rng(),
            callback: None,
        })
    }

    /// Set a callback for contest events.
    pub fn with_callback(mut self, callback: ContestCallback) -> Self {
        self.callback = Some(callback);
        self
    }

    /// Use a fixed seed for the theme fallback choice.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Replace the theme selector, e.g. to carry themes across contests.
    pub fn with_theme_selector(mut self, themes: ThemeSelector) -> Self {
        self.themes = themes;
        self
    }

    /// Run the full contest.
    pub async fn run(&mut self) -> Result<ContestTranscript, ContestError> {
        info!(host = %self.host.name, contestants = self.contestants.len(), "Starting contest");

        let introduction = self
            .engine
            .speak(
                &self.host,
                Instruction::Introduce {
                    contestants: &self.contestants,
                },
            )
            .await;
        self.emit_event(ContestEvent::Introduction {
            host: self.host.name.clone(),
            text: introduction.clone(),
        });

        for number in 1..=ROUNDS {
            self.run_round(number).await?;
        }

        let (winner, score) = leader(&self.contestants)
            .map(|c| (c.name().to_string(), c.score))
            .ok_or_else(|| ContestError::ConfigError("No contestants".to_string()))?;
        info!(winner = %winner, score, "Declaring winner");

        let winner_announcement = self
            .engine
            .speak(&self.host, Instruction::DeclareWinner { winner: &winner })
            .await;
        self.emit_event(ContestEvent::WinnerDeclared {
            winner: winner.clone(),
            score,
            text: winner_announcement.clone(),
        });

        Ok(ContestTranscript {
            host: self.host.name.clone(),
            introduction,
            rounds: self.rounds.clone(),
            standings: self.standings(),
            winner,
            winner_announcement,
        })
    }

    /// Run a single round.
    async fn run_round(&mut self, number: usize) -> Result<(), ContestError> {
        let engine = &self.engine;
        let host = &self.host;
        let theme = self
            .themes
            .select(move || engine.speak(host, Instruction::SuggestTheme), &mut self.rng)
            .await?;

        info!(round = number, theme = %theme, "Round started");
        self.emit_event(ContestEvent::RoundStart {
            number,
            theme: theme.clone(),
        });

        let mut jokes = Vec::with_capacity(self.contestants.len());

        for idx in 0..self.contestants.len() {
            let joke = self
                .engine
                .speak(
                    &self.contestants[idx].persona,
                    Instruction::TellJoke { theme: &theme },
                )
                .await;
            let name = self.contestants[idx].name().to_string();
            self.emit_event(ContestEvent::JokeTold {
                contestant: name.clone(),
                joke: joke.clone(),
            });

            let raw = self
                .engine
                .speak(
                    &self.host,
                    Instruction::Judge {
                        joke: &joke,
                        theme: &theme,
                    },
                )
                .await;
            let judgment = parse_judgment(&raw);

            let contestant = &mut self.contestants[idx];
            // Judge scores are unbounded; the running total saturates.
            contestant.score = contestant.score.saturating_add(judgment.overall);
            let total = contestant.score;

            self.emit_event(ContestEvent::JokeJudged {
                contestant: name.clone(),
                judgment: judgment.clone(),
                total,
            });

            jokes.push(JokeRecord {
                contestant: name,
                joke,
                judgment,
            });
        }

        self.rounds.push(RoundRecord {
            number,
            theme,
            jokes,
        });
        Ok(())
    }

    /// Emit an event if a callback is registered.
    fn emit_event(&self, event: ContestEvent) {
        if let Some(ref callback) = self.callback {
            callback(event);
        }
    }

    fn standings(&self) -> Vec<(String, u32)> {
        self.contestants
            .iter()
            .map(|c| (c.name().to_string(), c.score))
            .collect()
    }

    /// Contestants with their current scores.
    pub fn contestants(&self) -> &[Contestant] {
        &self.contestants
    }

    /// Rounds completed so far.
    pub fn rounds(&self) -> &[RoundRecord] {
        &self.rounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Backends, ChatBackend, MessageBackend, TextBackend};
    use crate::persona::{Backend, SamplingParams};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// Replies with scripted responses in call order and records prompts.
    #[derive(Clone, Default)]
    struct Script {
        replies: Arc<Mutex<VecDeque<String>>>,
        prompts: Arc<Mutex<Vec<String>>>,
    }

    impl Script {
        fn new(replies: &[&str]) -> Self {
            Self {
                replies: Arc::new(Mutex::new(replies.iter().map(|r| r.to_string()).collect())),
                prompts: Arc::default(),
            }
        }

        fn next(&self, prompt: &str) -> Result<String, ContestError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| ContestError::ConfigError("script exhausted".to_string()))
        }
    }

    #[async_trait]
    impl ChatBackend for Script {
        async fn complete(&self, _: &str, prompt: &str, _: u32) -> Result<String, ContestError> {
            self.next(prompt)
        }
    }

    struct Offline;

    #[async_trait]
    impl MessageBackend for Offline {
        async fn complete(&self, _: &str, _: &str, _: u32) -> Result<String, ContestError> {
            Err(ContestError::ApiError {
                service: "Anthropic",
                status: 401,
                body: "invalid x-api-key".to_string(),
            })
        }
    }

    #[async_trait]
    impl TextBackend for Offline {
        async fn complete(&self, _: &str, _: &SamplingParams) -> Result<String, ContestError> {
            Err(ContestError::ConfigError("offline".to_string()))
        }
    }

    fn host() -> Persona {
        Persona::new("Host", "A game show host.", Backend::chat("gpt-4"))
    }

    fn judgment(overall: u32) -> String {
        format!(
            "Overall: {}\nHumor: 6\nRelevance: 7\nCreativity: 8\nComment: Score {}.",
            overall, overall
        )
    }

    /// Two chat contestants scoring A=[6,7,8], B=[9,5,5].
    fn two_contestant_script() -> Script {
        let mut replies = vec!["Welcome!".to_string()];
        let themes = ["space travel", "cooking disasters", "office life"];
        let scores = [(6, 9), (7, 5), (8, 5)];
        for (round, (theme, (a, b))) in themes.iter().zip(scores).enumerate() {
            replies.push(theme.to_string());
            replies.push(format!("Alpha joke {}", round + 1));
            replies.push(judgment(a));
            replies.push(format!("Beta joke {}", round + 1));
            replies.push(judgment(b));
        }
        replies.push("Alpha wins, goodnight!".to_string());

        let refs: Vec<&str> = replies.iter().map(String::as_str).collect();
        Script::new(&refs)
    }

    fn two_contestants() -> Vec<Persona> {
        vec![
            Persona::new("Alpha", "A comedian.", Backend::chat("gpt-4")),
            Persona::new("Beta", "Another comedian.", Backend::chat("gpt-3.5-turbo")),
        ]
    }

    #[tokio::test]
    async fn test_scores_accumulate_and_winner_declared() {
        let script = two_contestant_script();
        let engine = PersonaEngine::new(Backends::new(script.clone(), Offline, Offline));
        let mut contest = ContestOrchestrator::new(engine, host(), two_contestants())
            .unwrap()
            .with_seed(1);

        let transcript = contest.run().await.unwrap();

        assert_eq!(contest.contestants()[0].score, 21);
        assert_eq!(contest.contestants()[1].score, 19);
        assert_eq!(transcript.winner, "Alpha");
        assert_eq!(
            transcript.standings,
            vec![("Alpha".to_string(), 21), ("Beta".to_string(), 19)]
        );
        assert_eq!(transcript.introduction, "Welcome!");
        assert_eq!(transcript.winner_announcement, "Alpha wins, goodnight!");

        let prompts = script.prompts.lock().unwrap();
        assert!(prompts.last().unwrap().contains("Declare Alpha as the winner"));
    }

    #[tokio::test]
    async fn test_rounds_keep_generation_and_roster_order() {
        let script = two_contestant_script();
        let engine = PersonaEngine::new(Backends::new(script, Offline, Offline));
        let mut contest = ContestOrchestrator::new(engine, host(), two_contestants())
            .unwrap()
            .with_seed(1);

        let transcript = contest.run().await.unwrap();

        let themes: Vec<&str> = transcript.rounds.iter().map(|r| r.theme.as_str()).collect();
        assert_eq!(themes, ["Space travel", "Cooking disasters", "Office life"]);

        for (i, round) in transcript.rounds.iter().enumerate() {
            assert_eq!(round.number, i + 1);
            let names: Vec<&str> = round.jokes.iter().map(|j| j.contestant.as_str()).collect();
            // Beta outscores Alpha in round 1 but still follows it.
            assert_eq!(names, ["Alpha", "Beta"]);
            assert_eq!(round.jokes[0].joke, format!("Alpha joke {}", i + 1));
        }
        assert_eq!(transcript.rounds[0].jokes[1].judgment.overall, 9);
        assert_eq!(transcript.rounds[0].jokes[1].judgment.comment, "Score 9.");
    }

    #[tokio::test]
    async fn test_judge_sees_joke_and_theme() {
        let script = two_contestant_script();
        let engine = PersonaEngine::new(Backends::new(script.clone(), Offline, Offline));
        let mut contest = ContestOrchestrator::new(engine, host(), two_contestants())
            .unwrap()
            .with_seed(1);

        contest.run().await.unwrap();

        let prompts = script.prompts.lock().unwrap();
        // intro, theme, joke, judge...
        assert!(prompts[2].contains("Tell a joke about Space travel."));
        assert!(prompts[3].contains("on the theme 'Space travel'"));
        assert!(prompts[3].contains("Joke: Alpha joke 1"));
    }

    #[tokio::test]
    async fn test_backend_failure_does_not_abort_contest() {
        let mut replies = vec!["Welcome!".to_string()];
        for theme in ["pirates", "dentists", "airports"] {
            replies.push(theme.to_string());
            replies.push(judgment(4));
        }
        replies.push("Claude wins by default.".to_string());
        let refs: Vec<&str> = replies.iter().map(String::as_str).collect();
        let script = Script::new(&refs);

        let engine = PersonaEngine::new(Backends::new(script, Offline, Offline));
        let contestants = vec![Persona::new(
            "Claude",
            "A french sarcastic comedian.",
            Backend::message("claude-3-sonnet-20240229"),
        )];
        let mut contest = ContestOrchestrator::new(engine, host(), contestants)
            .unwrap()
            .with_seed(1);

        let transcript = contest.run().await.unwrap();

        assert_eq!(transcript.rounds.len(), ROUNDS);
        assert_eq!(
            transcript.rounds[0].jokes[0].joke,
            "Error generating Anthropic response: Anthropic API returned 401: invalid x-api-key"
        );
        assert_eq!(transcript.standings, vec![("Claude".to_string(), 12)]);
    }

    #[tokio::test]
    async fn test_repeated_theme_falls_back_to_used() {
        let mut replies = vec!["Welcome!".to_string(), "pirates".to_string(), judgment(5)];
        // Round 2 only ever suggests near-duplicates.
        for _ in 0..5 {
            replies.push("Pirate".to_string());
        }
        replies.push(judgment(5));
        replies.push("airports".to_string());
        replies.push(judgment(5));
        replies.push("Solo wins.".to_string());
        let refs: Vec<&str> = replies.iter().map(String::as_str).collect();
        let script = Script::new(&refs);

        let engine = PersonaEngine::new(Backends::new(script, Offline, Offline));
        let contestants = vec![Persona::new(
            "Solo",
            "A comedian.",
            Backend::Text(SamplingParams::default()),
        )];
        let mut contest = ContestOrchestrator::new(engine, host(), contestants)
            .unwrap()
            .with_seed(9);

        let transcript = contest.run().await.unwrap();

        let themes: Vec<&str> = transcript.rounds.iter().map(|r| r.theme.as_str()).collect();
        assert_eq!(themes, ["Pirates", "Pirates", "Airports"]);
    }

    #[tokio::test]
    async fn test_events_emitted_in_order() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();

        let engine = PersonaEngine::new(Backends::new(two_contestant_script(), Offline, Offline));
        let mut contest = ContestOrchestrator::new(engine, host(), two_contestants())
            .unwrap()
            .with_seed(1)
            .with_callback(Box::new(move |event| {
                let tag = match event {
                    ContestEvent::Introduction { .. } => "intro".to_string(),
                    ContestEvent::RoundStart { number, .. } => format!("round{}", number),
                    ContestEvent::JokeTold { contestant, .. } => format!("joke:{}", contestant),
                    ContestEvent::JokeJudged { contestant, total, .. } => {
                        format!("judged:{}:{}", contestant, total)
                    }
                    ContestEvent::WinnerDeclared { winner, .. } => format!("winner:{}", winner),
                };
                sink.lock().unwrap().push(tag);
            }));

        contest.run().await.unwrap();

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 1 + ROUNDS * 5 + 1);
        assert_eq!(&events[..6], ["intro", "round1", "joke:Alpha", "judged:Alpha:6", "joke:Beta", "judged:Beta:9"]);
        assert_eq!(events.last().unwrap(), "winner:Alpha");
    }

    #[tokio::test]
    async fn test_huge_scores_saturate_instead_of_overflowing() {
        let huge = "Overall: 4294967295\nComment: Off the charts.";
        let script = Script::new(&[
            "Welcome!",
            "pirates",
            "Solo joke 1",
            huge,
            "dentists",
            "Solo joke 2",
            huge,
            "airports",
            "Solo joke 3",
            huge,
            "Solo wins.",
        ]);

        let engine = PersonaEngine::new(Backends::new(script, Offline, Offline));
        let contestants = vec![Persona::new("Solo", "A comedian.", Backend::chat("gpt-4"))];
        let mut contest = ContestOrchestrator::new(engine, host(), contestants)
            .unwrap()
            .with_seed(1);

        let transcript = contest.run().await.unwrap();

        assert_eq!(transcript.rounds.len(), ROUNDS);
        assert_eq!(transcript.standings, vec![("Solo".to_string(), u32::MAX)]);
        assert_eq!(transcript.winner, "Solo");
    }

    #[test]
    fn test_requires_contestants() {
        let engine = PersonaEngine::new(Backends::new(Script::default(), Offline, Offline));
        assert!(ContestOrchestrator::new(engine, host(), Vec::new()).is_err());
    }
}
