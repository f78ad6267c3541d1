use std::sync::LazyLock;

use regex::Regex;

// Two or more line breaks, tolerating whitespace-only lines in between.
static PARAGRAPH_BREAK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n[ \t]*\n\s*").unwrap());
static BULLET_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(?:[-*•–·]|\d{1,2}[.)])\s+").unwrap());

/// Unify line endings so every downstream pattern only has to care about `\n`.
pub fn normalize_newlines(raw: &str) -> String {
    raw.replace("\r\n", "\n").replace('\r', "\n")
}

/// Split text on blank-line boundaries. Paragraphs are trimmed and empty ones dropped.
pub fn split_paragraphs(text: &str) -> Vec<&str> {
    PARAGRAPH_BREAK_RE
        .split(text)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

/// Non-empty, trimmed lines of a paragraph.
pub fn content_lines(paragraph: &str) -> impl Iterator<Item = &str> {
    paragraph.lines().map(str::trim).filter(|l| !l.is_empty())
}

/// "- سبانخ 100غ" → "سبانخ 100غ". Lines without a marker come back trimmed.
pub fn strip_bullet(line: &str) -> &str {
    let line = line.trim();
    match BULLET_RE.find(line) {
        Some(m) => line[m.end()..].trim(),
        None => line,
    }
}

/// Heading line → section title: trailing colon (ASCII or full-width) and whitespace removed.
pub fn clean_title(line: &str) -> &str {
    line.trim().trim_end_matches([':', '：']).trim_end()
}
