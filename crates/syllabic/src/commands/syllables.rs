//! Syllables command: per-word syllable estimates.

use anyhow::bail;
use camino::Utf8PathBuf;
use clap::Args;
use tracing::{debug, instrument, warn};

use syllabic_core::markdown;
use syllabic_core::readability::{WordSyllables, word_breakdown};
use syllabic_core::text::Word;

use super::{is_markdown, read_input_file};

/// Arguments for the `syllables` subcommand.
#[derive(Args, Debug)]
pub struct SyllablesArgs {
    /// Words to estimate (punctuation and digits are ignored).
    #[arg(required_unless_present = "file", conflicts_with = "file")]
    pub words: Vec<String>,

    /// Estimate every word in a file instead.
    #[arg(short, long, value_name = "FILE")]
    pub file: Option<Utf8PathBuf>,
}

/// Print the syllable estimate for each word.
#[instrument(name = "cmd_syllables", skip_all, fields(file = ?args.file, words = args.words.len()))]
pub fn cmd_syllables(
    args: SyllablesArgs,
    global_json: bool,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    let estimates = match args.file {
        Some(ref file) => {
            let content = read_input_file(file, max_input_bytes)?;
            if is_markdown(file) {
                word_breakdown(&markdown::strip_to_prose(&content))
            } else {
                word_breakdown(&content)
            }
        }
        None => estimate_args(&args.words),
    };
    debug!(count = estimates.len(), "syllables estimated");

    if estimates.is_empty() {
        bail!("no words to estimate");
    }

    if global_json {
        println!("{}", serde_json::to_string_pretty(&estimates)?);
    } else {
        for estimate in &estimates {
            println!("{}: {}", estimate.word, estimate.syllables);
        }
    }

    Ok(())
}

/// Normalize each argument; arguments without letters are skipped.
fn estimate_args(raw_words: &[String]) -> Vec<WordSyllables> {
    raw_words
        .iter()
        .filter_map(|raw| {
            let word = Word::parse(raw);
            if word.is_none() {
                warn!(token = %raw, "skipping token with no letters");
            }
            word
        })
        .map(WordSyllables::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimates_normalized_arguments() {
        let words = vec!["Wanted,".to_string(), "42".to_string(), "IDEA!".to_string()];
        let estimates = estimate_args(&words);
        assert_eq!(
            estimates,
            vec![
                WordSyllables {
                    word: "wanted".to_string(),
                    syllables: 2,
                },
                WordSyllables {
                    word: "idea".to_string(),
                    syllables: 3,
                },
            ]
        );
    }

    #[test]
    fn letterless_arguments_only_is_an_error() {
        let args = SyllablesArgs {
            words: vec!["123".to_string(), "--".to_string()],
            file: None,
        };
        assert!(cmd_syllables(args, false, None).is_err());
    }

    #[test]
    fn file_mode_reads_every_word() {
        let tmp = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        std::fs::write(tmp.path(), "The cat sat. It was happy!").unwrap();
        let args = SyllablesArgs {
            words: Vec::new(),
            file: Some(Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap()),
        };
        assert!(cmd_syllables(args, true, None).is_ok());
    }
}
