//! Parsing of the host's free-text judgment into scores and a comment.

use serde::{Deserialize, Serialize};

/// Score used for any category the judge left out.
pub const DEFAULT_SCORE: u32 = 5;

/// Comment used when the judge gave none.
pub const DEFAULT_COMMENT: &str = "No comment provided.";

/// Scores and comment for a single joke.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Judgment {
    pub overall: u32,
    pub humor: u32,
    pub relevance: u32,
    pub creativity: u32,
    pub comment: String,
}

/// Parse a judgment in the `Overall: 8` / `Comment: ...` format.
///
/// Never fails: missing or unreadable scores become [`DEFAULT_SCORE`] and a
/// missing comment becomes [`DEFAULT_COMMENT`]. Scores are taken as given,
/// without clamping to 1-10.
pub fn parse_judgment(raw: &str) -> Judgment {
    Judgment {
        overall: extract_score(raw, "Overall"),
        humor: extract_score(raw, "Humor"),
        relevance: extract_score(raw, "Relevance"),
        creativity: extract_score(raw, "Creativity"),
        comment: extract_comment(raw).unwrap_or_else(|| DEFAULT_COMMENT.to_string()),
    }
}

/// First `<label>: <digits>` occurrence, case-sensitive.
fn extract_score(raw: &str, label: &str) -> u32 {
    let pattern = format!(r"{}: ([0-9]+)", regex::escape(label));
    regex::Regex::new(&pattern)
        .ok()
        .and_then(|re| re.captures(raw))
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or(DEFAULT_SCORE)
}

/// Rest of the line after the first `Comment: `, trailing whitespace removed.
///
/// A comment that is blank after trimming counts as missing.
fn extract_comment(raw: &str) -> Option<String> {
    let re = regex::Regex::new(r"(?m)Comment: (.+)$").ok()?;
    let comment = re.captures(raw)?[1].trim_end().to_string();
    if comment.is_empty() {
        return None;
    }
    Some(comment)
}
