pub mod blocks;
pub mod sections;
pub mod status;
pub mod text;

use serde::Serialize;

use crate::config::WhoRanges;
use crate::model::{AdviceSection, TestResult, RANGE_NOT_AVAILABLE};
use sections::AdviceClassifier;
use status::Severity;

/// A test record together with everything derived from it for display.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzedEntry {
    #[serde(flatten)]
    pub result: TestResult,
    pub severity: Severity,
    pub display_range: String,
    pub who_reference: bool,
    pub sections: Vec<AdviceSection>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyzedReport {
    pub entries: Vec<AnalyzedEntry>,
}

impl AnalyzedReport {
    pub fn results(&self) -> impl Iterator<Item = &TestResult> {
        self.entries.iter().map(|e| &e.result)
    }
}

/// Two-stage pipeline: raw text → records → per-record advice sections.
pub fn analyze(raw: &str, classifier: &AdviceClassifier, who: &WhoRanges) -> AnalyzedReport {
    let entries = blocks::extract(raw)
        .into_iter()
        .map(|result| analyze_entry(result, classifier, who))
        .collect();
    AnalyzedReport { entries }
}

fn analyze_entry(result: TestResult, classifier: &AdviceClassifier, who: &WhoRanges) -> AnalyzedEntry {
    let (display_range, who_reference) = display_range(&result, who);
    AnalyzedEntry {
        severity: Severity::from_status(&result.status),
        sections: classifier.classify(&result.advice),
        display_range,
        who_reference,
        result,
    }
}

/// Reported range, else the WHO range for the test, else "not available".
/// The flag is set when the WHO table supplied the value.
pub fn display_range(result: &TestResult, who: &WhoRanges) -> (String, bool) {
    if result.has_range() {
        return (result.range.clone(), false);
    }
    match who.lookup(&result.name) {
        Some(range) => (range.to_string(), true),
        None => (RANGE_NOT_AVAILABLE.to_string(), false),
    }
}
