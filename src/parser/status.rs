use serde::Serialize;

use crate::model::UNKNOWN_STATUS;

const NORMAL_MARKER: &str = "ضمن المعدل الطبيعي";
const MILD_MARKERS: &[&str] = &["طفيف", "متوسط"];

/// How far a result sits from its reference range, read off the status phrase.
/// The status string itself is never rewritten; this is a display aid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Normal,
    Mild,
    Marked,
    Unknown,
}

impl Severity {
    /// Anything that is neither normal nor mild counts as marked.
    pub fn from_status(status: &str) -> Self {
        let status = status.trim();
        if status.is_empty() || status == UNKNOWN_STATUS {
            Severity::Unknown
        } else if status.contains(NORMAL_MARKER) {
            Severity::Normal
        } else if MILD_MARKERS.iter().any(|m| status.contains(m)) {
            Severity::Mild
        } else {
            Severity::Marked
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Severity::Normal => "normal",
            Severity::Mild => "mild",
            Severity::Marked => "marked",
            Severity::Unknown => "unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_phrases() {
        assert_eq!(Severity::from_status("ضمن المعدل الطبيعي"), Severity::Normal);
        assert_eq!(Severity::from_status("خارج المعدل الطبيعي - بشكل طفيف"), Severity::Mild);
        assert_eq!(Severity::from_status("خارج المعدل الطبيعي - بشكل متوسط"), Severity::Mild);
        assert_eq!(Severity::from_status("خارج المعدل الطبيعي - بشكل كبير"), Severity::Marked);
    }

    #[test]
    fn fallbacks() {
        assert_eq!(Severity::from_status(UNKNOWN_STATUS), Severity::Unknown);
        assert_eq!(Severity::from_status("  "), Severity::Unknown);
        assert_eq!(Severity::from_status("High"), Severity::Marked);
    }
}
