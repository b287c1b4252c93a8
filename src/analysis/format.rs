//! Markdown-like analysis text to display markup.
//!
//! This is line-oriented substitution, not a parser: each line is classified
//! by its leading marker, then `**bold**` and `*italic*` runs are split out.
//! Nothing nests and nothing is escaped.

use once_cell::sync::Lazy;
use regex::Regex;

static HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(#{1,6})\s+(.*)$").expect("valid regex"));
static BULLET_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-*•]\s+(.*)$").expect("valid regex"));
static NUMBERED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)\.\s+(.*)$").expect("valid regex"));
static BOLD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("valid regex"));
static ITALIC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*(.*?)\*").expect("valid regex"));

/// A styled run of text within a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Bold(String),
    Italic(String),
}

impl Inline {
    /// The run's text without markers.
    pub fn text(&self) -> &str {
        match self {
            Self::Text(s) | Self::Bold(s) | Self::Italic(s) => s,
        }
    }
}

/// How a line should be laid out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// `#` .. `######`, level 1 to 6.
    Heading(u8),
    Bullet,
    /// `N. item`, keeping the original number.
    Numbered(String),
    Paragraph,
    Blank,
}

/// One formatted line of analysis text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupLine {
    pub kind: LineKind,
    pub spans: Vec<Inline>,
}

impl MarkupLine {
    /// Plain text of the line, markers removed.
    pub fn plain(&self) -> String {
        self.spans.iter().map(Inline::text).collect()
    }
}

/// Split `**bold**` and `*italic*` runs out of a line body.
pub fn parse_inline(body: &str) -> Vec<Inline> {
    let mut spans = Vec::new();
    let mut last = 0;

    for caps in BOLD_RE.captures_iter(body) {
        let whole = caps.get(0).expect("group 0 always matches");
        push_italics(&body[last..whole.start()], &mut spans);
        spans.push(Inline::Bold(caps[1].to_string()));
        last = whole.end();
    }
    push_italics(&body[last..], &mut spans);
    spans
}

fn push_italics(segment: &str, spans: &mut Vec<Inline>) {
    let mut last = 0;
    for caps in ITALIC_RE.captures_iter(segment) {
        let whole = caps.get(0).expect("group 0 always matches");
        push_text(&segment[last..whole.start()], spans);
        spans.push(Inline::Italic(caps[1].to_string()));
        last = whole.end();
    }
    push_text(&segment[last..], spans);
}

fn push_text(text: &str, spans: &mut Vec<Inline>) {
    if !text.is_empty() {
        spans.push(Inline::Text(text.to_string()));
    }
}

/// Classify and format a single line.
pub fn format_line(line: &str) -> MarkupLine {
    let trimmed = line.trim_end();

    if trimmed.trim().is_empty() {
        return MarkupLine {
            kind: LineKind::Blank,
            spans: Vec::new(),
        };
    }

    if let Some(caps) = HEADING_RE.captures(trimmed) {
        return MarkupLine {
            kind: LineKind::Heading(caps[1].len() as u8),
            spans: parse_inline(&caps[2]),
        };
    }

    let indented = trimmed.trim_start();
    if let Some(caps) = BULLET_RE.captures(indented) {
        return MarkupLine {
            kind: LineKind::Bullet,
            spans: parse_inline(&caps[1]),
        };
    }
    if let Some(caps) = NUMBERED_RE.captures(indented) {
        return MarkupLine {
            kind: LineKind::Numbered(caps[1].to_string()),
            spans: parse_inline(&caps[2]),
        };
    }

    MarkupLine {
        kind: LineKind::Paragraph,
        spans: parse_inline(trimmed),
    }
}

/// Format a whole analysis into structured lines for the terminal.
pub fn to_markup(text: &str) -> Vec<MarkupLine> {
    text.lines().map(format_line).collect()
}

/// Format a whole analysis into HTML-ish markup, lines joined by `<br />`.
///
/// Plain lines pass through untouched; numbered items keep their number.
pub fn to_html(text: &str) -> String {
    text.split('\n')
        .map(|line| {
            let line = line.strip_suffix('\r').unwrap_or(line);
            let formatted = format_line(line);
            match &formatted.kind {
                LineKind::Blank => line.to_string(),
                LineKind::Heading(level) => {
                    format!("<h{level}>{}</h{level}>", inline_html(&formatted.spans))
                }
                LineKind::Bullet => format!("<li>{}</li>", inline_html(&formatted.spans)),
                LineKind::Numbered(_) | LineKind::Paragraph => inline_substitute(line),
            }
        })
        .collect::<Vec<_>>()
        .join("<br />")
}

fn inline_html(spans: &[Inline]) -> String {
    spans
        .iter()
        .map(|span| match span {
            Inline::Text(s) => s.clone(),
            Inline::Bold(s) => format!("<strong>{s}</strong>"),
            Inline::Italic(s) => format!("<em>{s}</em>"),
        })
        .collect()
}

/// Inline substitution on an unclassified line, leaving its other bytes alone.
fn inline_substitute(line: &str) -> String {
    let bolded = BOLD_RE.replace_all(line, "<strong>$1</strong>");
    ITALIC_RE.replace_all(&bolded, "<em>$1</em>").into_owned()
}

/// Cut `text` to `max_chars` characters, appending `...` when shortened.
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

/// Whether `text` would be shortened by [`preview`].
pub fn is_truncated(text: &str, max_chars: usize) -> bool {
    text.chars().nth(max_chars).is_some()
}
