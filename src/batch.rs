use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::WhoRanges;
use crate::parser::sections::AdviceClassifier;
use crate::parser::{analyze, AnalyzedReport};

const CHUNK_SIZE: usize = 500;

#[derive(Debug, Serialize)]
pub struct FileReport {
    pub file: String,
    #[serde(flatten)]
    pub report: AnalyzedReport,
}

#[derive(Debug, Serialize)]
pub struct BatchSummary {
    pub generated_at: DateTime<Utc>,
    pub files: usize,
    pub records: usize,
    pub unreadable: Vec<String>,
    pub reports: Vec<FileReport>,
}

/// Report text files in `dir`, sorted by name.
pub fn list_reports(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("reading directory {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "txt"))
        .collect();
    paths.sort();
    Ok(paths)
}

/// Analyze every report in `dir`. Files are independent, so chunks are
/// processed in parallel with one shared classifier.
pub fn analyze_dir(dir: &Path, classifier: &AdviceClassifier, who: &WhoRanges) -> Result<BatchSummary> {
    let paths = list_reports(dir)?;
    info!(files = paths.len(), dir = %dir.display(), "starting batch");

    let pb = ProgressBar::new(paths.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")?
            .progress_chars("#>-"),
    );

    let mut summary = BatchSummary {
        generated_at: Utc::now(),
        files: 0,
        records: 0,
        unreadable: Vec::new(),
        reports: Vec::new(),
    };

    for chunk in paths.chunks(CHUNK_SIZE) {
        let results: Vec<_> = chunk
            .par_iter()
            .map(|path| (path, std::fs::read_to_string(path).map(|raw| analyze(&raw, classifier, who))))
            .collect();

        for (path, outcome) in results {
            let name = file_label(path);
            match outcome {
                Ok(report) => {
                    summary.records += report.entries.len();
                    summary.reports.push(FileReport { file: name, report });
                }
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "skipping unreadable report");
                    summary.unreadable.push(name);
                }
            }
            summary.files += 1;
        }
        pb.inc(chunk.len() as u64);
    }

    pb.finish_and_clear();
    info!(
        files = summary.files,
        records = summary.records,
        unreadable = summary.unreadable.len(),
        "batch finished"
    );
    Ok(summary)
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, body: &[u8]) {
        std::fs::write(dir.join(name), body).unwrap();
    }

    #[test]
    fn batch_over_directory() {
        let dir = tempfile::tempdir().unwrap();
        let cbc = std::fs::read_to_string("tests/fixtures/cbc_report.txt").unwrap();
        write(dir.path(), "b.txt", cbc.as_bytes());
        write(dir.path(), "a.txt", b"Test Name: TSH\nValue: 2.1 mIU/L");
        write(dir.path(), "empty.txt", b"");
        write(dir.path(), "notes.md", b"Test Name: ignored");

        let summary = analyze_dir(dir.path(), AdviceClassifier::default_table(), &WhoRanges::default()).unwrap();
        assert_eq!(summary.files, 3);
        assert_eq!(summary.records, 4);
        assert!(summary.unreadable.is_empty());
        let files: Vec<&str> = summary.reports.iter().map(|r| r.file.as_str()).collect();
        assert_eq!(files, vec!["a.txt", "b.txt", "empty.txt"]);
        assert!(summary.reports[2].report.entries.is_empty());
    }

    #[test]
    fn invalid_utf8_is_counted_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "bad.txt", &[0xff, 0xfe, 0x00]);
        write(dir.path(), "good.txt", b"Test Name: A\nValue: 1");

        let summary = analyze_dir(dir.path(), AdviceClassifier::default_table(), &WhoRanges::default()).unwrap();
        assert_eq!(summary.files, 2);
        assert_eq!(summary.unreadable, vec!["bad.txt"]);
        assert_eq!(summary.records, 1);
    }

    #[test]
    fn missing_directory_errors() {
        let result = analyze_dir(
            Path::new("tests/fixtures/no-such-dir"),
            AdviceClassifier::default_table(),
            &WhoRanges::default(),
        );
        assert!(result.is_err());
    }
}
