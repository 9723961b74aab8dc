//! ComedyAI CLI - AI Comedy Contest
//!
//! Runs a scripted comedy contest between AI personas and opens the
//! transcript in the default browser.

use clap::Parser;
use colored::Colorize;
use comedyai_core::{
    BackendConfig, Backends, ContestEvent, ContestOrchestrator, OUTPUT_FILE, PersonaEngine,
    open_in_viewer, render_html, roster, write_transcript,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "comedyai",
    version,
    about = "AI Comedy Contest - Watch AIs compete for laughs",
    long_about = "Runs a three-round comedy contest between AI personas, judged by an AI game show host, \
                  and writes the transcript to comedy_contest.html."
)]
struct Cli {}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file if present
    dotenvy::dotenv().ok();

    let _cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .init();

    let config = BackendConfig::from_env();
    let missing = config.missing_credentials();
    if !missing.is_empty() {
        eprintln!(
            "{}",
            format!("Warning: {} not set. API calls may fail.", missing.join(", ")).yellow()
        );
    }

    let engine = PersonaEngine::new(Backends::from_config(&config)?);
    let host = roster::host();
    let contestants = roster::contestants();

    // Print header
    println!();
    println!("{}", "═".repeat(70).bright_blue());
    println!("{}", format!("  {}", "AI Comedy Contest".bold()).bright_blue().bold());
    println!("{}", "═".repeat(70).bright_blue());
    println!();
    println!("{} {}", "Host:".bold(), host.name.bright_magenta());
    println!();
    println!("{}", "Contestants:".bold());
    for (i, p) in contestants.iter().enumerate() {
        println!(
            "  {}. {} - using {}",
            i + 1,
            p.name.bright_cyan(),
            p.backend.label().dimmed()
        );
    }
    println!();
    println!("{}", "─".repeat(70).dimmed());

    let mut orchestrator =
        ContestOrchestrator::new(engine, host, contestants)?.with_callback(create_console_callback());

    let transcript = orchestrator.run().await?;

    let html = render_html(&transcript);
    let path = write_transcript(OUTPUT_FILE, &html)?;

    println!();
    println!("{}", "═".repeat(70).bright_blue());
    println!(
        "{}",
        format!("  Contest concluded. Transcript: {}", path.display())
            .bright_green()
            .bold()
    );
    println!("{}", "═".repeat(70).bright_blue());
    println!();

    open_in_viewer(&path)?;

    Ok(())
}

/// Create a callback that prints contest events to the console.
fn create_console_callback() -> Box<dyn Fn(ContestEvent) + Send + Sync> {
    Box::new(move |event| match event {
        ContestEvent::Introduction { host, text } => {
            println!("{} {}", "▶".bright_magenta(), host.bright_magenta().bold());
            print_wrapped(&text);
        }
        ContestEvent::RoundStart { number, theme } => {
            println!();
            println!("{}", "═".repeat(70).bright_magenta());
            println!(
                "{}",
                format!("  ROUND {}: {}", number, theme).bright_magenta().bold()
            );
            println!("{}", "═".repeat(70).bright_magenta());
            println!();
        }
        ContestEvent::JokeTold { contestant, joke } => {
            println!("{} {}", "▶".bright_cyan(), contestant.bright_cyan().bold());
            print_wrapped(&joke);
        }
        ContestEvent::JokeJudged {
            contestant: _,
            judgment,
            total,
        } => {
            println!(
                "  {} {}  {} {}  {} {}  {} {}  {}",
                "Overall".yellow(),
                judgment.overall,
                "Humor".yellow(),
                judgment.humor,
                "Relevance".yellow(),
                judgment.relevance,
                "Creativity".yellow(),
                judgment.creativity,
                format!("(total {})", total).dimmed()
            );
            println!("  {}", judgment.comment.italic());
            println!();
        }
        ContestEvent::WinnerDeclared {
            winner,
            score,
            text,
        } => {
            println!();
            println!(
                "{}",
                format!("  WINNER: {} with {} points", winner, score)
                    .bright_green()
                    .bold()
            );
            print_wrapped(&text);
        }
    })
}

/// Word-wrap each paragraph and indent it.
fn print_wrapped(text: &str) {
    for paragraph in text.lines() {
        for line in wrap_lines(paragraph, 66) {
            println!("  {}", line);
        }
    }
    println!();
}

/// Break a paragraph into lines of at most `width` characters.
///
/// Width counts characters, not bytes, so accented French text wraps like
/// English. A single word longer than `width` gets a line to itself.
fn wrap_lines(text: &str, width: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut line = String::new();
    let mut line_chars = 0;

    for word in text.split_whitespace() {
        let word_chars = word.chars().count();
        if line_chars > 0 && line_chars + 1 + word_chars > width {
            lines.push(std::mem::take(&mut line));
            line_chars = 0;
        }
        if line_chars > 0 {
            line.push(' ');
            line_chars += 1;
        }
        line.push_str(word);
        line_chars += word_chars;
    }

    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_lines_respects_width() {
        let lines = wrap_lines("Why did the astronaut break up with the moon? It needed space.", 20);
        assert_eq!(
            lines,
            ["Why did the", "astronaut break up", "with the moon? It", "needed space."]
        );
        assert!(lines.iter().all(|l| l.chars().count() <= 20));
    }

    #[test]
    fn test_wrap_lines_counts_characters_not_bytes() {
        // 10 characters but 14 bytes.
        assert_eq!(wrap_lines("été à côté", 10), ["été à côté"]);
    }

    #[test]
    fn test_wrap_lines_long_word_and_empty() {
        assert_eq!(wrap_lines("supercalifragilistic ok", 10), ["supercalifragilistic", "ok"]);
        assert!(wrap_lines("   ", 10).is_empty());
    }
}
