use std::fmt;

use serde::{Deserialize, Serialize};

pub const UNKNOWN_NAME: &str = "Unknown Name";
pub const UNKNOWN_VALUE: &str = "Unknown Value";
pub const UNKNOWN_RANGE: &str = "Unknown Range";
pub const UNKNOWN_STATUS: &str = "Unknown Status";
pub const NO_ADVICE: &str = "No advice provided";

/// Shown in place of advice sections when the advice text is blank.
pub const NO_ADVICE_AVAILABLE: &str = "No advice available";
/// Title of the catch-all advice section ("overview").
pub const OVERVIEW_TITLE: &str = "نظرة عامة";
/// Display string when neither the report nor the WHO table has a range ("not available").
pub const RANGE_NOT_AVAILABLE: &str = "غير متوفر";

/// One lab test as reported by the model. Every field is always populated;
/// missing source data is replaced by the `UNKNOWN_*` / `NO_ADVICE` placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResult {
    pub name: String,
    pub value: String,
    pub range: String,
    pub status: String,
    pub advice: String,
}

impl TestResult {
    pub fn has_range(&self) -> bool {
        self.range != UNKNOWN_RANGE
    }

    pub fn has_advice(&self) -> bool {
        self.advice != NO_ADVICE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AdviceCategory {
    DietRecommended,
    DietAvoid,
    Lifestyle,
    Supplements,
    Timing,
    Overview,
}

impl AdviceCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            AdviceCategory::DietRecommended => "diet-recommended",
            AdviceCategory::DietAvoid => "diet-avoid",
            AdviceCategory::Lifestyle => "lifestyle",
            AdviceCategory::Supplements => "supplements",
            AdviceCategory::Timing => "timing",
            AdviceCategory::Overview => "overview",
        }
    }
}

impl fmt::Display for AdviceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A titled slice of advice text. Derived from `TestResult::advice` on demand, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdviceSection {
    pub title: String,
    pub category: AdviceCategory,
    pub icon: String,
    pub style: String,
    pub items: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_serializes_kebab_case() {
        let json = serde_json::to_string(&AdviceCategory::DietRecommended).unwrap();
        assert_eq!(json, "\"diet-recommended\"");
        let back: AdviceCategory = serde_json::from_str("\"diet-avoid\"").unwrap();
        assert_eq!(back, AdviceCategory::DietAvoid);
        assert_eq!(AdviceCategory::Timing.to_string(), "timing");
    }

    #[test]
    fn test_result_json_has_five_string_fields() {
        let r = TestResult {
            name: "A".into(),
            value: "1".into(),
            range: UNKNOWN_RANGE.into(),
            status: UNKNOWN_STATUS.into(),
            advice: NO_ADVICE.into(),
        };
        let v = serde_json::to_value(&r).unwrap();
        let obj = v.as_object().unwrap();
        assert_eq!(obj.len(), 5);
        assert!(obj.values().all(|f| f.is_string()));
        assert!(!r.has_range());
        assert!(!r.has_advice());
    }
}
