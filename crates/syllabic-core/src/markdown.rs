//! Markdown-to-prose conversion for scoring `.md` inputs.
//!
//! Uses pulldown-cmark for CommonMark parsing. Only running prose is kept;
//! code, headings, tables and raw HTML would otherwise inflate word counts
//! with tokens that carry no sentence punctuation.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

/// Strip markdown formatting, returning plain prose text.
///
/// Removes:
/// - YAML frontmatter
/// - Code blocks (fenced and indented) and inline code
/// - Headings
/// - Tables
/// - HTML blocks and inline HTML
///
/// Keeps paragraph, list item, blockquote, link and emphasis text. Every block
/// boundary and line break becomes a space, so words from adjacent blocks
/// never fuse into one token.
#[tracing::instrument(skip_all, fields(input_len = text.len()))]
pub fn strip_to_prose(text: &str) -> String {
    let body = strip_frontmatter(text);

    let options =
        Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_FOOTNOTES;

    let mut prose = String::with_capacity(body.len());
    let mut skip_depth: usize = 0;

    for event in Parser::new_ext(body, options) {
        match event {
            Event::Start(Tag::CodeBlock(_) | Tag::Heading { .. } | Tag::Table(_)) => {
                skip_depth += 1;
            }
            Event::End(TagEnd::CodeBlock | TagEnd::Heading(_) | TagEnd::Table) => {
                skip_depth = skip_depth.saturating_sub(1);
            }

            Event::Text(t) if skip_depth == 0 => prose.push_str(&t),

            Event::SoftBreak | Event::HardBreak if skip_depth == 0 => prose.push(' '),
            Event::End(TagEnd::Paragraph | TagEnd::Item | TagEnd::BlockQuote(_))
                if skip_depth == 0 =>
            {
                prose.push(' ');
            }

            _ => {}
        }
    }

    tracing::debug!(prose_len = prose.len(), "markdown stripped");
    prose
}

/// Skip a leading `---` ... `---` block.
fn strip_frontmatter(text: &str) -> &str {
    let Some(after_open) = text.trim_start().strip_prefix("---") else {
        return text;
    };
    let Some(close) = after_open.find("\n---") else {
        return text;
    };
    let rest = &after_open[close + 4..];
    rest.strip_prefix('\n').unwrap_or(rest)
}
