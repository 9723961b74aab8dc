//! Round theme selection with fuzzy de-duplication.

use std::future::Future;

use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::{debug, warn};

use crate::error::ContestError;
use crate::similarity::similarity;

/// Candidates scoring above this against any used theme are rejected.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.6;

/// Generation attempts per round before falling back to a used theme.
pub const DEFAULT_MAX_ATTEMPTS: usize = 5;

/// Picks round themes, remembering every theme accepted so far.
///
/// The used-theme list only grows. A fresh candidate is accepted when it is
/// no more than `threshold` similar to every used theme; when all attempts
/// are rejected a used theme is drawn at random instead.
#[derive(Debug, Clone)]
pub struct ThemeSelector {
    used: Vec<String>,
    threshold: f64,
    max_attempts: usize,
}

impl ThemeSelector {
    pub fn new(threshold: f64, max_attempts: usize) -> Self {
        Self {
            used: Vec::new(),
            threshold,
            max_attempts,
        }
    }

    /// Seed the selector with themes from an earlier contest.
    pub fn with_used_themes(mut self, themes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        for theme in themes {
            let theme: String = theme.into();
            self.used.push(normalize_theme(&theme));
        }
        self
    }

    /// Themes accepted so far, normalized, in insertion order.
    pub fn used_themes(&self) -> &[String] {
        &self.used
    }

    /// Select the next theme.
    ///
    /// `generate` is called once per attempt. With an empty used list the
    /// first candidate is always accepted, so `NoThemeAvailable` can only
    /// surface when `max_attempts` is zero.
    pub async fn select<F, Fut, R>(
        &mut self,
        mut generate: F,
        rng: &mut R,
    ) -> Result<String, ContestError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = String>,
        R: Rng + ?Sized,
    {
        for attempt in 1..=self.max_attempts {
            let candidate = normalize_theme(&generate().await);

            if self.is_novel(&candidate) {
                debug!(attempt, theme = %candidate, "Accepted theme");
                let theme = capitalize(&candidate);
                self.used.push(candidate);
                return Ok(theme);
            }

            debug!(attempt, theme = %candidate, "Rejected theme as too similar");
        }

        let fallback = self
            .used
            .choose(rng)
            .ok_or(ContestError::NoThemeAvailable)?;
        warn!(
            attempts = self.max_attempts,
            theme = %fallback,
            "No novel theme found, reusing a previous one"
        );
        Ok(capitalize(fallback))
    }

    fn is_novel(&self, candidate: &str) -> bool {
        self.used
            .iter()
            .all(|used| similarity(candidate, used) <= self.threshold)
    }
}

impl Default for ThemeSelector {
    fn default() -> Self {
        Self::new(DEFAULT_SIMILARITY_THRESHOLD, DEFAULT_MAX_ATTEMPTS)
    }
}

fn normalize_theme(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Upper-case the first character and lower-case the rest.
fn capitalize(theme: &str) -> String {
    let mut chars = theme.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
