//! Score command: sentence, word and syllable counts with Flesch-Kincaid scores.

use anyhow::{Context, bail};
use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use syllabic_core::readability::{self, ReadabilityReport, TextStats, Thresholds};

use super::{is_markdown, read_input_file};

/// Arguments for the `score` subcommand.
#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// Files to score (`.md` files are stripped to prose first).
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<Utf8PathBuf>,

    /// Maximum acceptable Flesch-Kincaid grade level.
    #[arg(long)]
    pub max_grade: Option<f64>,

    /// Minimum acceptable Flesch reading ease.
    #[arg(long)]
    pub min_ease: Option<f64>,

    /// Also report combined counts across all files.
    #[arg(long)]
    pub total: bool,
}

#[derive(Debug, Serialize)]
struct FileScore {
    file: Utf8PathBuf,
    #[serde(flatten)]
    report: ReadabilityReport,
}

#[derive(Debug, Serialize)]
struct FileError {
    file: Utf8PathBuf,
    error: String,
}

#[derive(Debug, Serialize)]
struct ScoreOutput {
    files: Vec<FileScore>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<FileError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    total: Option<ReadabilityReport>,
    pass: bool,
}

/// Score each file and gate on the configured thresholds.
///
/// Every file is reported before the command fails, whether on a threshold
/// violation or on a file that could not be read or scored.
#[instrument(name = "cmd_score", skip_all, fields(files = args.files.len()))]
pub fn cmd_score(
    args: ScoreArgs,
    global_json: bool,
    config_thresholds: Thresholds,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    let thresholds = Thresholds {
        max_grade: args.max_grade,
        min_reading_ease: args.min_ease,
    }
    .or(config_thresholds);
    debug!(?thresholds, total = args.total, "executing score command");

    let file_count = args.files.len();
    let progress = progress_bar(file_count, global_json);
    let mut scores = Vec::with_capacity(file_count);
    let mut errors: Vec<(Utf8PathBuf, anyhow::Error)> = Vec::new();
    let mut combined = TextStats::default();

    for file in args.files {
        progress.set_message(file.to_string());
        match score_file(&file, thresholds, max_input_bytes) {
            Ok(report) => {
                debug!(%file, grade = report.grade, reading_ease = report.reading_ease, "file scored");
                combined += report.stats();
                scores.push(FileScore { file, report });
            }
            Err(err) => {
                warn!(%file, error = %err, "file could not be scored");
                errors.push((file, err));
            }
        }
        progress.inc(1);
    }
    progress.finish_and_clear();

    // A single unreadable file fails with its own error chain.
    if file_count == 1
        && let Some((_, err)) = errors.pop()
    {
        return Err(err);
    }

    let total = if args.total && !scores.is_empty() {
        Some(ReadabilityReport::from_stats(combined, Thresholds::default())?)
    } else {
        None
    };

    let failed: Vec<&FileScore> = scores.iter().filter(|s| !s.report.pass()).collect();
    let failed_count = failed.len() + errors.len();
    info!(
        files = file_count,
        failed = failed.len(),
        errors = errors.len(),
        "scoring complete"
    );

    if global_json {
        let output = ScoreOutput {
            pass: failed_count == 0,
            files: scores,
            errors: errors
                .iter()
                .map(|(file, err)| FileError {
                    file: file.clone(),
                    error: format!("{err:#}"),
                })
                .collect(),
            total,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        if !output.pass {
            bail!("{failed_count} of {file_count} files failed");
        }
        return Ok(());
    }

    let show_names = file_count > 1 || total.is_some();
    for score in &scores {
        if show_names {
            println!("{}", score.file.bold());
        }
        print_report(&score.report);
        print_verdict(&score.report);
        if show_names {
            println!();
        }
    }
    for (file, err) in &errors {
        println!("{}", file.bold());
        println!("{} {err:#}", "ERROR:".red());
        println!();
    }
    if let Some(ref total) = total {
        println!("{}", "Total".bold());
        print_report(total);
    }

    match failed.as_slice() {
        [] if errors.is_empty() => Ok(()),
        [single] if file_count == 1 => bail!(
            "{} {}. Simplify sentences or use shorter words.",
            single.file,
            violation(&single.report),
        ),
        _ if errors.is_empty() => bail!(
            "{failed_count} of {file_count} files failed readability thresholds"
        ),
        _ => bail!(
            "{failed_count} of {file_count} files failed ({} could not be scored)",
            errors.len()
        ),
    }
}

/// Read and score one file.
fn score_file(
    file: &Utf8Path,
    thresholds: Thresholds,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<ReadabilityReport> {
    let content = read_input_file(file, max_input_bytes)?;
    readability::check_readability(&content, is_markdown(file), thresholds)
        .with_context(|| format!("failed to score {file}"))
}

/// Counts and scores, one `Label: value` line each.
fn print_report(report: &ReadabilityReport) {
    println!("Sentences: {}", report.sentences);
    println!("Words: {}", report.words);
    println!("Syllables: {}", report.syllables);
    println!("Flesch-Kincaid score: {:.2}", report.reading_ease);
    println!("Grade level: {:.2}", report.grade);
}

fn print_verdict(report: &ReadabilityReport) {
    let t = report.thresholds;
    if t.max_grade.is_none() && t.min_reading_ease.is_none() {
        return;
    }
    if report.pass() {
        println!("{} within thresholds", "PASS:".green());
    } else {
        println!("{} {}", "FAIL:".red(), violation(report));
    }
}

/// Describe which thresholds a report violates.
fn violation(report: &ReadabilityReport) -> String {
    let mut parts = Vec::new();
    if let (true, Some(max)) = (report.over_max, report.thresholds.max_grade) {
        parts.push(format!("grade {:.1} exceeds max {max:.1}", report.grade));
    }
    if let (true, Some(min)) = (report.under_min, report.thresholds.min_reading_ease) {
        parts.push(format!(
            "reading ease {:.1} is below min {min:.1}",
            report.reading_ease
        ));
    }
    parts.join(", ")
}

fn progress_bar(len: usize, hidden: bool) -> ProgressBar {
    if hidden || len < 2 {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::with_template("{bar:30} {pos}/{len} {wide_msg}") {
        bar.set_style(style);
    }
    bar
}
