//! Core library for syllabic.
//!
//! Counts sentences, words and syllables in English text and turns the counts
//! into Flesch reading ease and Flesch-Kincaid grade level scores. Syllables
//! are estimated from spelling alone by the rule chain in [`syllables`].
//!
//! # Modules
//!
//! - [`syllables`] - Spelling-based syllable estimation
//! - [`text`] - Tokenizing and normalizing raw text
//! - [`readability`] - Aggregate counts, formulas and thresholds
//! - [`markdown`] - Markdown-to-prose conversion
//! - [`config`] - Configuration loading and management
//! - [`error`] - Error types and result aliases
//!
//! # Quick Start
//!
//! ```
//! use syllabic_core::readability::{Thresholds, check_readability};
//!
//! let report = check_readability("The cat sat. It was happy!", false, Thresholds::default())
//!     .expect("text has words and sentences");
//!
//! assert_eq!(report.sentences, 2);
//! assert_eq!(report.words, 6);
//! assert_eq!(report.syllables, 7);
//! ```
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod markdown;
pub mod readability;
pub mod syllables;
pub mod text;

pub use config::{Config, ConfigLoader, ConfigSources, DEFAULT_MAX_INPUT_BYTES, LogLevel};
pub use error::{AnalysisError, AnalysisResult, ConfigError, ConfigResult};
pub use readability::{ReadabilityReport, TextStats, Thresholds};
pub use text::Word;
