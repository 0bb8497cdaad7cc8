//! Text Normalizer — turns raw résumé/JD text into a comparable keyword set.
//!
//! Lowercases, strips punctuation, drops digits-only noise, stop-words and
//! too-short tokens, then dedups preserving first-seen order. The stop-word
//! list and minimum token length live in `NormalizerConfig`, constructed once
//! at startup and read-only afterwards.

use std::collections::HashSet;

use serde::Serialize;
use thiserror::Error;

/// Default minimum token length. Single letters ("a", "c") carry no signal.
pub const DEFAULT_MIN_TOKEN_LEN: usize = 2;

/// Common English function words excluded from keyword extraction.
const DEFAULT_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "all", "am", "an", "and", "any",
    "are", "as", "at", "be", "because", "been", "before", "being", "below",
    "between", "both", "but", "by", "can", "could", "did", "do", "does",
    "doing", "down", "during", "each", "few", "for", "from", "further", "had",
    "has", "have", "having", "he", "her", "here", "hers", "him", "his", "how",
    "i", "if", "in", "into", "is", "it", "its", "just", "may", "me", "might",
    "more", "most", "must", "my", "no", "nor", "not", "now", "of", "off",
    "on", "once", "only", "or", "other", "our", "ours", "out", "over", "own",
    "same", "shall", "she", "should", "so", "some", "such", "than", "that",
    "the", "their", "theirs", "them", "then", "there", "these", "they",
    "this", "those", "through", "to", "too", "under", "until", "up", "very",
    "was", "we", "were", "what", "when", "where", "which", "while", "who",
    "whom", "why", "will", "with", "would", "you", "your", "yours",
];

#[derive(Debug, Error)]
pub enum NormalizeError {
    /// Input was empty or every token was filtered out.
    /// Callers treat this as "no keywords", not as a hard failure.
    #[error("no tokens remain after filtering")]
    EmptyInput,
}

/// Read-only normalization settings shared by all analyses.
#[derive(Debug, Clone)]
pub struct NormalizerConfig {
    stop_words: HashSet<String>,
    min_token_len: usize,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            stop_words: DEFAULT_STOP_WORDS.iter().map(|s| s.to_string()).collect(),
            min_token_len: DEFAULT_MIN_TOKEN_LEN,
        }
    }
}

impl NormalizerConfig {
    pub fn new(stop_words: impl IntoIterator<Item = String>, min_token_len: usize) -> Self {
        Self {
            stop_words: stop_words.into_iter().map(|s| s.to_lowercase()).collect(),
            min_token_len,
        }
    }

    /// Returns a copy with a different minimum token length.
    /// Used when a caller overrides the default per request.
    pub fn with_min_token_len(&self, min_token_len: usize) -> Self {
        Self {
            stop_words: self.stop_words.clone(),
            min_token_len,
        }
    }

    pub fn min_token_len(&self) -> usize {
        self.min_token_len
    }

    fn is_stop_word(&self, token: &str) -> bool {
        self.stop_words.contains(token)
    }
}

/// Ordered, deduplicated sequence of normalized keywords.
///
/// Invariant: tokens are lowercase, contain at least one letter, meet the
/// configured minimum length, and are not stop-words. First-seen order is
/// preserved so downstream output is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TokenSet {
    tokens: Vec<String>,
}

impl TokenSet {
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Normalizes raw text into a `TokenSet`.
///
/// Splits on every non-alphanumeric character, lowercases, then filters:
/// digits-only tokens, tokens below `config.min_token_len`, and stop-words.
pub fn normalize(text: &str, config: &NormalizerConfig) -> Result<TokenSet, NormalizeError> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut tokens = Vec::new();

    for raw in text.split(|c: char| !c.is_alphanumeric()) {
        if raw.is_empty() {
            continue;
        }
        let token = raw.to_lowercase();
        if token.chars().count() < config.min_token_len {
            continue;
        }
        // Digits-only tokens are noise (years, phone fragments).
        if !token.chars().any(|c| c.is_alphabetic()) {
            continue;
        }
        if config.is_stop_word(&token) {
            continue;
        }
        if seen.insert(token.clone()) {
            tokens.push(token);
        }
    }

    if tokens.is_empty() {
        return Err(NormalizeError::EmptyInput);
    }

    Ok(TokenSet { tokens })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> NormalizerConfig {
        NormalizerConfig::default()
    }

    #[test]
    fn test_lowercases_and_strips_punctuation() {
        let tokens = normalize("Python, Docker! (Kubernetes)", &config()).unwrap();
        assert_eq!(tokens.tokens(), ["python", "docker", "kubernetes"]);
    }

    #[test]
    fn test_removes_stop_words() {
        let tokens = normalize("looking for a developer with experience", &config()).unwrap();
        assert_eq!(tokens.tokens(), ["looking", "developer", "experience"]);
    }

    #[test]
    fn test_dedup_preserves_first_seen_order() {
        let tokens = normalize("rust python rust docker python", &config()).unwrap();
        assert_eq!(tokens.tokens(), ["rust", "python", "docker"]);
    }

    #[test]
    fn test_drops_digits_only_tokens() {
        let tokens = normalize("5 years 2019 aws s3", &config()).unwrap();
        assert_eq!(tokens.tokens(), ["years", "aws", "s3"]);
    }

    #[test]
    fn test_drops_tokens_below_min_length() {
        let tokens = normalize("c go rust", &config()).unwrap();
        assert_eq!(tokens.tokens(), ["go", "rust"]);
    }

    #[test]
    fn test_empty_input_is_error() {
        assert!(matches!(
            normalize("", &config()),
            Err(NormalizeError::EmptyInput)
        ));
    }

    #[test]
    fn test_all_stop_words_is_error() {
        assert!(matches!(
            normalize("the and of with", &config()),
            Err(NormalizeError::EmptyInput)
        ));
    }

    #[test]
    fn test_punctuation_only_is_error() {
        assert!(matches!(
            normalize("... !!! ---", &config()),
            Err(NormalizeError::EmptyInput)
        ));
    }

    #[test]
    fn test_min_token_len_override() {
        let cfg = config().with_min_token_len(5);
        let tokens = normalize("rust python kubernetes", &cfg).unwrap();
        assert_eq!(tokens.tokens(), ["python", "kubernetes"]);
    }

    #[test]
    fn test_custom_stop_words() {
        let cfg = NormalizerConfig::new(["developer".to_string()], 2);
        let tokens = normalize("senior developer role", &cfg).unwrap();
        assert_eq!(tokens.tokens(), ["senior", "role"]);
    }
}
