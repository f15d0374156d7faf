//! Tokenizing and normalizing raw text.
//!
//! Text is split on whitespace. Each raw token is checked for sentence-ending
//! punctuation, then reduced to its ASCII letters in lowercase. Tokens with no
//! letters left are not words and never reach the syllable estimator.

use std::fmt;

use crate::syllables;

/// Returns `true` for `.`, `!` and `?`.
const fn is_sentence_terminator(ch: char) -> bool {
    matches!(ch, '.' | '!' | '?')
}

/// Whether a raw token closes a sentence.
///
/// The terminator may appear anywhere in the token, so `"end."`, `"\"Stop!\""`
/// and `"e.g."` all count.
pub fn ends_sentence(raw: &str) -> bool {
    raw.chars().any(is_sentence_terminator)
}

/// Strip everything except ASCII letters and lowercase the rest.
///
/// Idempotent. May return an empty string.
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// A normalized word: one or more lowercase ASCII letters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Word(String);

impl Word {
    /// Normalize a raw token, returning `None` if no letters remain.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = normalize(raw);
        if normalized.is_empty() {
            None
        } else {
            Some(Self(normalized))
        }
    }

    /// The normalized letters.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the word, returning the normalized letters.
    pub fn into_string(self) -> String {
        self.0
    }

    /// Estimated syllable count (always at least 1).
    pub fn syllables(&self) -> usize {
        syllables::estimate(&self.0)
    }
}

impl AsRef<str> for Word {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One whitespace-delimited token of input text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    /// The token exactly as it appeared in the input.
    pub raw: &'a str,
    /// Whether the raw token contains `.`, `!` or `?`.
    pub ends_sentence: bool,
    /// The normalized word, if the token has any letters.
    pub word: Option<Word>,
}

impl<'a> Token<'a> {
    /// Classify a single raw token.
    pub fn new(raw: &'a str) -> Self {
        Self {
            raw,
            ends_sentence: ends_sentence(raw),
            word: Word::parse(raw),
        }
    }
}

/// Split text on whitespace into classified tokens, in input order.
pub fn split_tokens(text: &str) -> impl Iterator<Item = Token<'_>> {
    text.split_whitespace().map(Token::new)
}

/// Extract the normalized words of a text, skipping letterless tokens.
pub fn extract_words(text: &str) -> Vec<Word> {
    split_tokens(text).filter_map(|t| t.word).collect()
}
