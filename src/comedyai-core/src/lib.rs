//! ComedyAI Core Library
//!
//! Provides the comedy contest orchestration, theme selection, judgment
//! parsing, persona prompting and transcript rendering.

pub mod backend;
pub mod config;
pub mod engine;
pub mod error;
pub mod judgment;
pub mod orchestrator;
pub mod persona;
pub mod roster;
pub mod similarity;
pub mod theme;
pub mod transcript;

pub use backend::Backends;
pub use config::BackendConfig;
pub use engine::{Instruction, PersonaEngine};
pub use error::ContestError;
pub use judgment::{Judgment, parse_judgment};
pub use orchestrator::{ContestEvent, ContestOrchestrator, ContestTranscript, JokeRecord, RoundRecord};
pub use persona::{Backend, Contestant, Persona, SamplingParams};
pub use similarity::similarity;
pub use theme::ThemeSelector;
pub use transcript::{OUTPUT_FILE, open_in_viewer, render_html, write_transcript};
