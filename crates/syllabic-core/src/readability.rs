//! Readability scoring: Flesch reading ease and Flesch-Kincaid grade level.
//!
//! Reading ease: `206.835 - 1.015 * (words/sentences) - 84.6 * (syllables/words)`
//!
//! Grade level: `-15.59 + 0.39 * (words/sentences) + 11.8 * (syllables/words)`
//!
//! Higher ease = more readable; lower grade = more readable.
//!
//! Sentences are counted from terminal punctuation inside whitespace tokens
//! (see [`text::ends_sentence`]) and syllables come from the spelling-based
//! estimator in [`crate::syllables`].

use std::ops::AddAssign;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, AnalysisResult};
use crate::markdown;
use crate::text::{self, Token, Word};

/// Running totals over a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TextStats {
    /// Tokens containing `.`, `!` or `?`.
    pub sentences: usize,
    /// Tokens with at least one letter.
    pub words: usize,
    /// Sum of per-word syllable estimates.
    pub syllables: usize,
}

impl TextStats {
    /// Tally sentences, words and syllables in `text`.
    #[tracing::instrument(skip_all, fields(text_len = text.len()))]
    pub fn tally(text: &str) -> Self {
        let mut stats = Self::default();
        for token in text::split_tokens(text) {
            stats.record(&token);
        }
        tracing::debug!(
            sentences = stats.sentences,
            words = stats.words,
            syllables = stats.syllables,
            "text tallied"
        );
        stats
    }

    /// Add one token to the totals.
    ///
    /// The sentence check runs on the raw token, so punctuation-only tokens
    /// still close a sentence even though they are not words.
    pub fn record(&mut self, token: &Token<'_>) {
        if token.ends_sentence {
            self.sentences += 1;
        }
        if let Some(ref word) = token.word {
            self.words += 1;
            self.syllables += word.syllables();
        }
    }

    /// Average words per sentence, or `None` with no sentences.
    pub fn words_per_sentence(&self) -> Option<f64> {
        (self.sentences > 0).then(|| self.words as f64 / self.sentences as f64)
    }

    /// Average syllables per word, or `None` with no words.
    pub fn syllables_per_word(&self) -> Option<f64> {
        (self.words > 0).then(|| self.syllables as f64 / self.words as f64)
    }

    /// Both averages, or the reason they cannot be computed.
    fn ratios(&self) -> AnalysisResult<(f64, f64)> {
        let spw = self.syllables_per_word().ok_or(AnalysisError::NoWords)?;
        let wps = self.words_per_sentence().ok_or(AnalysisError::NoSentences)?;
        Ok((wps, spw))
    }

    /// Flesch reading ease score.
    pub fn reading_ease(&self) -> AnalysisResult<f64> {
        let (wps, spw) = self.ratios()?;
        Ok(flesch_reading_ease(wps, spw))
    }

    /// Flesch-Kincaid grade level.
    pub fn grade(&self) -> AnalysisResult<f64> {
        let (wps, spw) = self.ratios()?;
        Ok(flesch_kincaid_grade(wps, spw))
    }
}

impl AddAssign for TextStats {
    fn add_assign(&mut self, rhs: Self) {
        self.sentences += rhs.sentences;
        self.words += rhs.words;
        self.syllables += rhs.syllables;
    }
}

/// Flesch reading ease from the two averages.
pub fn flesch_reading_ease(words_per_sentence: f64, syllables_per_word: f64) -> f64 {
    1.015f64.mul_add(-words_per_sentence, 84.6f64.mul_add(-syllables_per_word, 206.835))
}

/// Flesch-Kincaid grade level from the two averages.
pub fn flesch_kincaid_grade(words_per_sentence: f64, syllables_per_word: f64) -> f64 {
    0.39f64.mul_add(words_per_sentence, 11.8 * syllables_per_word) - 15.59
}

/// Pass/fail limits applied to a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Thresholds {
    /// Fail when the grade level is above this.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_grade: Option<f64>,
    /// Fail when the reading ease is below this.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_reading_ease: Option<f64>,
}

impl Thresholds {
    /// Thresholds with only a grade ceiling.
    pub const fn max_grade(max: f64) -> Self {
        Self {
            max_grade: Some(max),
            min_reading_ease: None,
        }
    }

    /// Fill unset limits from `defaults`.
    #[must_use]
    pub fn or(self, defaults: Self) -> Self {
        Self {
            max_grade: self.max_grade.or(defaults.max_grade),
            min_reading_ease: self.min_reading_ease.or(defaults.min_reading_ease),
        }
    }
}

/// Result of readability analysis.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ReadabilityReport {
    /// Flesch reading ease score.
    pub reading_ease: f64,
    /// Flesch-Kincaid grade level.
    pub grade: f64,
    /// Number of sentences detected.
    pub sentences: usize,
    /// Number of words detected.
    pub words: usize,
    /// Total syllable count.
    pub syllables: usize,
    /// Limits the scores were checked against.
    #[serde(flatten)]
    pub thresholds: Thresholds,
    /// Whether the grade exceeds `max_grade`.
    pub over_max: bool,
    /// Whether the reading ease is below `min_reading_ease`.
    pub under_min: bool,
}

impl ReadabilityReport {
    /// Score a tally and check it against `thresholds`.
    pub fn from_stats(stats: TextStats, thresholds: Thresholds) -> AnalysisResult<Self> {
        let reading_ease = stats.reading_ease()?;
        let grade = stats.grade()?;

        let over_max = thresholds.max_grade.is_some_and(|max| grade > max);
        let under_min = thresholds
            .min_reading_ease
            .is_some_and(|min| reading_ease < min);

        Ok(Self {
            reading_ease,
            grade,
            sentences: stats.sentences,
            words: stats.words,
            syllables: stats.syllables,
            thresholds,
            over_max,
            under_min,
        })
    }

    /// The counts this report was computed from.
    pub const fn stats(&self) -> TextStats {
        TextStats {
            sentences: self.sentences,
            words: self.words,
            syllables: self.syllables,
        }
    }

    /// `true` when no threshold was violated.
    pub const fn pass(&self) -> bool {
        !self.over_max && !self.under_min
    }
}

/// Check readability of text.
///
/// # Arguments
///
/// * `text` - The text to analyze.
/// * `strip_md` - If `true`, strip markdown formatting before analysis.
/// * `thresholds` - Limits to gate on.
///
/// # Errors
///
/// [`AnalysisError::NoWords`] or [`AnalysisError::NoSentences`] when a ratio
/// in the formulas would divide by zero.
#[tracing::instrument(skip(text), fields(text_len = text.len(), strip_md))]
pub fn check_readability(
    text: &str,
    strip_md: bool,
    thresholds: Thresholds,
) -> AnalysisResult<ReadabilityReport> {
    let stats = if strip_md {
        TextStats::tally(&markdown::strip_to_prose(text))
    } else {
        TextStats::tally(text)
    };
    ReadabilityReport::from_stats(stats, thresholds)
}

/// A counted word and its syllable estimate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct WordSyllables {
    /// The normalized word.
    pub word: String,
    /// Estimated syllables.
    pub syllables: usize,
}

impl From<Word> for WordSyllables {
    fn from(word: Word) -> Self {
        let syllables = word.syllables();
        Self {
            word: word.into_string(),
            syllables,
        }
    }
}

/// Per-word syllable estimates, in input order, skipping letterless tokens.
pub fn word_breakdown(text: &str) -> Vec<WordSyllables> {
    text::extract_words(text)
        .into_iter()
        .map(WordSyllables::from)
        .collect()
}
