use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::AdviceCategory;
use crate::parser::sections::AdviceClassifier;

/// One row of the advice category table: a case-insensitive pattern plus the
/// category and presentation hints attached to paragraphs it matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub pattern: String,
    pub category: AdviceCategory,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub style: String,
}

impl CategoryRule {
    pub fn new(pattern: &str, category: AdviceCategory, icon: &str, style: &str) -> Self {
        CategoryRule {
            pattern: pattern.to_string(),
            category,
            icon: icon.to_string(),
            style: style.to_string(),
        }
    }
}

/// Built-in table, in match order. The headings are the ones the analysis
/// prompt asks the model to write.
pub fn default_rules() -> Vec<CategoryRule> {
    vec![
        CategoryRule::new("الأطعمة الموصى بها", AdviceCategory::DietRecommended, "utensils", "bg-green-50/80"),
        CategoryRule::new("الأطعمة التي يجب تجنبها", AdviceCategory::DietAvoid, "x-circle", "bg-red-50/80"),
        CategoryRule::new("توصيات نمط الحياة", AdviceCategory::Lifestyle, "activity", "bg-blue-50/80"),
        CategoryRule::new("المكملات الغذائية", AdviceCategory::Supplements, "pill", "bg-purple-50/80"),
        CategoryRule::new("التوقيت|متى", AdviceCategory::Timing, "timer", "bg-orange-50/80"),
    ]
}

/// Load an ordered category table from a JSON array and compile it.
pub fn load_classifier(path: &Path) -> Result<AdviceClassifier> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading category table {}", path.display()))?;
    let rules: Vec<CategoryRule> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing category table {}", path.display()))?;
    let classifier = AdviceClassifier::new(rules)
        .with_context(|| format!("compiling category table {}", path.display()))?;
    Ok(classifier)
}

/// WHO reference ranges keyed by test name, used when a report omits its own range.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "BTreeMap<String, String>")]
pub struct WhoRanges {
    exact: BTreeMap<String, String>,
    // lowercased name -> range; on case-only collisions the smallest key wins
    folded: HashMap<String, String>,
}

impl From<BTreeMap<String, String>> for WhoRanges {
    fn from(exact: BTreeMap<String, String>) -> Self {
        let mut folded = HashMap::with_capacity(exact.len());
        for (name, range) in &exact {
            folded
                .entry(name.trim().to_lowercase())
                .or_insert_with(|| range.clone());
        }
        WhoRanges { exact, folded }
    }
}

impl WhoRanges {
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading WHO ranges {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("parsing WHO ranges {}", path.display()))
    }

    /// Exact name first, then a case-insensitive match.
    pub fn lookup(&self, test_name: &str) -> Option<&str> {
        if let Some(range) = self.exact.get(test_name) {
            return Some(range.as_str());
        }
        self.folded
            .get(&test_name.trim().to_lowercase())
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.exact.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty()
    }
}
