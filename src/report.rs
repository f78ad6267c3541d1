use std::fmt;

use serde::Serialize;

use crate::model::{AdviceSection, TestResult};
use crate::parser::sections::AdviceClassifier;
use crate::parser::AnalyzedReport;

/// A record with its advice sections, as emitted by `labscan advice`.
#[derive(Debug, Serialize)]
pub struct AdviceView<'a> {
    pub name: &'a str,
    pub sections: Vec<AdviceSection>,
}

pub fn advice_views<'a>(results: &'a [TestResult], classifier: &AdviceClassifier) -> Vec<AdviceView<'a>> {
    results
        .iter()
        .map(|r| AdviceView {
            name: &r.name,
            sections: classifier.classify(&r.advice),
        })
        .collect()
}

/// Compact fixed-width table, one row per test, shown at most `limit` rows.
pub struct OverviewTable<'a> {
    report: &'a AnalyzedReport,
    limit: usize,
}

pub fn overview_table(report: &AnalyzedReport, limit: usize) -> OverviewTable<'_> {
    OverviewTable { report, limit }
}

impl fmt::Display for OverviewTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = &self.report.entries;
        writeln!(
            f,
            "{:>3} | {:<22} | {:<14} | {:<22} | {:<8} | {:<30}",
            "#", "Test", "Value", "Range", "Severity", "Status"
        )?;
        writeln!(f, "{}", "-".repeat(114))?;

        for (i, entry) in entries.iter().take(self.limit).enumerate() {
            let range = if entry.who_reference {
                format!("{} (WHO)", entry.display_range)
            } else {
                entry.display_range.clone()
            };
            writeln!(
                f,
                "{:>3} | {:<22} | {:<14} | {:<22} | {:<8} | {:<30}",
                i + 1,
                truncate(&entry.result.name, 22),
                truncate(&entry.result.value, 14),
                truncate(&range, 22),
                entry.severity.label(),
                truncate(&entry.result.status, 30),
            )?;
        }

        if entries.len() > self.limit {
            writeln!(f, "... {} more", entries.len() - self.limit)?;
        }
        write!(f, "\n{} tests", entries.len())
    }
}

/// Cut to `max` chars. Widths here (and in the table's `{:<N}` padding) count
/// chars, not display columns, so Arabic and other RTL text will not line up
/// visually with the Latin columns.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}
