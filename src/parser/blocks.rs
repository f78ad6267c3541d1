use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::text::{normalize_newlines, split_paragraphs};
use crate::model::{
    TestResult, NO_ADVICE, UNKNOWN_NAME, UNKNOWN_RANGE, UNKNOWN_STATUS, UNKNOWN_VALUE,
};

static NAME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^[ \t]*Test Name:(.*)$").unwrap());
static VALUE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^[ \t]*Value:(.*)$").unwrap());
static RANGE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^[ \t]*Reference Range:(.*)$").unwrap());
static STATUS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^[ \t]*Status:(.*)$").unwrap());
// Only the label; advice runs from here to the end of the paragraph.
static ADVICE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^[ \t]*Advice:").unwrap());

/// Fields as found in one paragraph, before placeholders are applied.
/// `None` means the label was absent; `Some("")` means it was present but empty.
#[derive(Debug, Clone, Default, PartialEq)]
struct RawFields {
    name: Option<String>,
    value: Option<String>,
    range: Option<String>,
    status: Option<String>,
    advice: Option<String>,
}

impl RawFields {
    /// Returns `None` when the paragraph carries no field label at all.
    fn parse(paragraph: &str) -> Option<Self> {
        let fields = RawFields {
            name: capture_line(&NAME_RE, paragraph),
            value: capture_line(&VALUE_RE, paragraph),
            range: capture_line(&RANGE_RE, paragraph),
            status: capture_line(&STATUS_RE, paragraph),
            advice: ADVICE_RE
                .find(paragraph)
                .map(|m| paragraph[m.end()..].trim().to_string()),
        };
        if fields == RawFields::default() {
            None
        } else {
            Some(fields)
        }
    }

    fn continue_advice(&mut self, paragraph: &str) {
        if let Some(advice) = self.advice.as_mut() {
            if !advice.is_empty() {
                advice.push_str("\n\n");
            }
            advice.push_str(paragraph);
        }
    }

    fn into_result(self) -> TestResult {
        TestResult {
            name: or_placeholder(self.name, UNKNOWN_NAME),
            value: or_placeholder(self.value, UNKNOWN_VALUE),
            range: or_placeholder(self.range, UNKNOWN_RANGE),
            status: or_placeholder(self.status, UNKNOWN_STATUS),
            advice: or_placeholder(self.advice, NO_ADVICE),
        }
    }
}

/// Split a raw model report into test records.
///
/// Paragraphs carrying at least one field label start a new record. A paragraph
/// without labels continues the previous record's advice when that record had
/// an `Advice:` label; otherwise it is dropped. Never fails: `extract("")` is empty.
///
/// Labels are recognized at the start of any line, so an advice paragraph
/// containing a line such as `Value: ...` starts a new, mostly-placeholder
/// record instead of continuing the previous advice.
pub fn extract(raw: &str) -> Vec<TestResult> {
    let text = normalize_newlines(raw);
    let mut drafts: Vec<RawFields> = Vec::new();

    for (idx, paragraph) in split_paragraphs(&text).into_iter().enumerate() {
        if let Some(fields) = RawFields::parse(paragraph) {
            drafts.push(fields);
            continue;
        }
        match drafts.last_mut() {
            Some(prev) if prev.advice.is_some() => {
                debug!(paragraph = idx, "appending unlabeled paragraph to advice");
                prev.continue_advice(paragraph);
            }
            _ => debug!(paragraph = idx, "dropping paragraph without field labels"),
        }
    }

    drafts.into_iter().map(RawFields::into_result).collect()
}

fn capture_line(re: &Regex, paragraph: &str) -> Option<String> {
    re.captures(paragraph).map(|caps| caps[1].trim().to_string())
}

fn or_placeholder(field: Option<String>, placeholder: &str) -> String {
    field
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| placeholder.to_string())
}
