//! HTML rendering and delivery of the contest transcript.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::info;

use crate::error::ContestError;
use crate::orchestrator::ContestTranscript;

/// File the transcript is written to, in the working directory.
pub const OUTPUT_FILE: &str = "comedy_contest.html";

const TITLE: &str = "AI Comedy Contest";

const STYLE: &str = r#"body { font-family: Arial, sans-serif; max-width: 800px; margin: 0 auto; padding: 20px; }
h1, h2, h3 { color: #333; }
.joke { background-color: #f0f0f0; padding: 10px; margin-bottom: 10px; border-radius: 5px; }
.host { font-style: italic; color: #0066cc; }
.host-name { font-weight: bold; color: #0066cc; }
.scores { margin-bottom: 10px; }
.scores p { margin: 5px 0; }
.standings { border-collapse: collapse; margin: 10px 0 20px; }
.standings th, .standings td { border-bottom: 1px solid #ddd; padding: 6px 16px; text-align: left; }"#;

/// Render a self-contained HTML page for the contest.
pub fn render_html(transcript: &ContestTranscript) -> String {
    let mut body = String::new();

    body.push_str(&format!("<h1>{}</h1>\n", TITLE));
    body.push_str(&host_line(&transcript.host, &transcript.introduction));

    for round in &transcript.rounds {
        body.push_str(&format!(
            "<h2>Round {}: {}</h2>\n",
            round.number,
            html_escape(&round.theme)
        ));
        body.push_str(&host_line(
            &transcript.host,
            &format!("Our theme for this round is: {}", round.theme),
        ));

        for turn in &round.jokes {
            let j = &turn.judgment;
            body.push_str(&format!(
                r#"<h3>{name}</h3>
<div class="joke">{joke}</div>
<div class="scores">
<p>Overall: {overall}</p>
<p>Humor: {humor}</p>
<p>Relevance: {relevance}</p>
<p>Creativity: {creativity}</p>
</div>
"#,
                name = html_escape(&turn.contestant),
                joke = html_text(&turn.joke),
                overall = j.overall,
                humor = j.humor,
                relevance = j.relevance,
                creativity = j.creativity,
            ));
            body.push_str(&host_line(&transcript.host, &j.comment));
        }
    }

    body.push_str("<h2>Final Scores</h2>\n<table class=\"standings\">\n<tr><th>Contestant</th><th>Score</th></tr>\n");
    for (name, score) in &transcript.standings {
        body.push_str(&format!(
            "<tr><td>{}</td><td>{}</td></tr>\n",
            html_escape(name),
            score
        ));
    }
    body.push_str("</table>\n");
    body.push_str(&host_line(&transcript.host, &transcript.winner_announcement));

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
<style>
{style}
</style>
</head>
<body>
{body}</body>
</html>
"#,
        title = TITLE,
        style = STYLE,
        body = body,
    )
}

fn host_line(host: &str, text: &str) -> String {
    format!(
        "<p class=\"host\"><span class=\"host-name\">{}:</span> {}</p>\n",
        html_escape(host),
        html_text(text)
    )
}

/// Escape text and keep its line breaks.
fn html_text(s: &str) -> String {
    html_escape(s.trim()).replace('\n', "<br>\n")
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Write the transcript and return its absolute path.
pub fn write_transcript<P: AsRef<Path>>(path: P, html: &str) -> Result<PathBuf, ContestError> {
    fs::write(path.as_ref(), html)?;
    let absolute = fs::canonicalize(path.as_ref())?;
    info!(path = %absolute.display(), "Transcript written");
    Ok(absolute)
}

/// Open a file in the platform's default viewer.
pub fn open_in_viewer(path: &Path) -> Result<(), ContestError> {
    let mut command = viewer_command(path);
    let status = command
        .status()
        .map_err(|e| ContestError::ViewerError(format!("{}: {}", path.display(), e)))?;

    if !status.success() {
        return Err(ContestError::ViewerError(format!(
            "viewer exited with {} for {}",
            status,
            path.display()
        )));
    }
    Ok(())
}

fn viewer_command(path: &Path) -> Command {
    if cfg!(target_os = "windows") {
        let mut command = Command::new("cmd");
        command.args(["/C", "start", ""]).arg(path);
        command
    } else if cfg!(target_os = "macos") {
        let mut command = Command::new("open");
        command.arg(path);
        command
    } else {
        let mut command = Command::new("xdg-open");
        command.arg(path);
        command
    }
}
