use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

use super::text::{clean_title, content_lines, normalize_newlines, split_paragraphs, strip_bullet};
use crate::config::{default_rules, CategoryRule};
use crate::error::ConfigError;
use crate::model::{AdviceCategory, AdviceSection, NO_ADVICE_AVAILABLE, OVERVIEW_TITLE};

const OVERVIEW_ICON: &str = "info";
const OVERVIEW_STYLE: &str = "bg-gray-50/80";

static DEFAULT_CLASSIFIER: LazyLock<AdviceClassifier> = LazyLock::new(|| {
    AdviceClassifier::new(default_rules()).expect("built-in category patterns compile")
});

#[derive(Debug, Clone)]
struct CompiledRule {
    rule: CategoryRule,
    regex: Regex,
}

/// Ordered category table with patterns compiled up front.
///
/// Classification is first-match-wins in table order and never fails; bad
/// patterns are rejected by [`AdviceClassifier::new`].
#[derive(Debug, Clone)]
pub struct AdviceClassifier {
    rules: Vec<CompiledRule>,
}

impl AdviceClassifier {
    pub fn new(rules: Vec<CategoryRule>) -> Result<Self, ConfigError> {
        if rules.is_empty() {
            return Err(ConfigError::EmptyTable);
        }
        let rules = rules
            .into_iter()
            .map(|rule| {
                let regex = RegexBuilder::new(&rule.pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|source| ConfigError::InvalidPattern {
                        pattern: rule.pattern.clone(),
                        source,
                    })?;
                Ok(CompiledRule { rule, regex })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;
        Ok(AdviceClassifier { rules })
    }

    /// The process-wide built-in table. Callers wanting different rules build
    /// their own classifier; this one cannot be changed.
    pub fn default_table() -> &'static AdviceClassifier {
        &DEFAULT_CLASSIFIER
    }

    pub fn rules(&self) -> Vec<&CategoryRule> {
        self.rules.iter().map(|r| &r.rule).collect()
    }

    /// Partition advice text into sections, one per non-blank paragraph, in order.
    pub fn classify(&self, advice: &str) -> Vec<AdviceSection> {
        let advice = normalize_newlines(advice);
        let paragraphs = split_paragraphs(&advice);
        if paragraphs.is_empty() {
            return vec![overview_section(NO_ADVICE_AVAILABLE)];
        }
        paragraphs.into_iter().map(|p| self.classify_paragraph(p)).collect()
    }

    fn classify_paragraph(&self, paragraph: &str) -> AdviceSection {
        let Some(matched) = self.rules.iter().find(|r| r.regex.is_match(paragraph)) else {
            return overview_section(paragraph);
        };

        let mut lines = content_lines(paragraph);
        let title = lines.next().map(clean_title).unwrap_or_default().to_string();
        let items = lines
            .map(strip_bullet)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();

        AdviceSection {
            title,
            category: matched.rule.category,
            icon: matched.rule.icon.clone(),
            style: matched.rule.style.clone(),
            items,
        }
    }
}

/// Classify with the caller's table, or the built-in one when `None`.
pub fn classify(advice: &str, categories: Option<&AdviceClassifier>) -> Vec<AdviceSection> {
    categories
        .unwrap_or_else(|| AdviceClassifier::default_table())
        .classify(advice)
}

fn overview_section(text: &str) -> AdviceSection {
    AdviceSection {
        title: OVERVIEW_TITLE.to_string(),
        category: AdviceCategory::Overview,
        icon: OVERVIEW_ICON.to_string(),
        style: OVERVIEW_STYLE.to_string(),
        items: vec![text.trim().to_string()],
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::blocks::extract;

    fn rule(pattern: &str, category: AdviceCategory) -> CategoryRule {
        CategoryRule::new(pattern, category, "", "")
    }

    #[test]
    fn hemoglobin_scenario() {
        let text = "Test Name: Hemoglobin\nValue: 11.2 g/dL\nReference Range: 13.0-17.0 g/dL\nStatus: خارج المعدل الطبيعي - بشكل طفيف\nAdvice: شرح عام.\n\nالأطعمة الموصى بها:\n- سبانخ 100غ";
        let results = extract(text);
        assert_eq!(results.len(), 1);

        let sections = classify(&results[0].advice, None);
        assert_eq!(sections.len(), 2);

        assert_eq!(sections[0].category, AdviceCategory::Overview);
        assert_eq!(sections[0].title, OVERVIEW_TITLE);
        assert_eq!(sections[0].items, vec!["شرح عام."]);

        assert_eq!(sections[1].category, AdviceCategory::DietRecommended);
        assert_eq!(sections[1].title, "الأطعمة الموصى بها");
        assert_eq!(sections[1].items, vec!["سبانخ 100غ"]);
        assert_eq!(sections[1].icon, "utensils");
    }

    #[test]
    fn unmatched_text_is_single_overview() {
        let advice = "  Drink more water.\nSleep eight hours.  ";
        let sections = classify(advice, None);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].category, AdviceCategory::Overview);
        assert_eq!(sections[0].items, vec![advice.trim()]);
    }

    #[test]
    fn unmatched_paragraphs_are_not_merged() {
        let sections = classify("First note.\n\nSecond note.", None);
        assert_eq!(sections.len(), 2);
        assert!(sections.iter().all(|s| s.category == AdviceCategory::Overview));
        assert_eq!(sections[1].items, vec!["Second note."]);
    }

    #[test]
    fn crlf_advice_splits() {
        let sections = classify("شرح عام.\r\n\r\nالأطعمة الموصى بها:\r\n- سبانخ 100غ", None);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].category, AdviceCategory::Overview);
        assert_eq!(sections[0].items, vec!["شرح عام."]);
        assert_eq!(sections[1].category, AdviceCategory::DietRecommended);
        assert_eq!(sections[1].title, "الأطعمة الموصى بها");
        assert_eq!(sections[1].items, vec!["سبانخ 100غ"]);
    }

    #[test]
    fn empty_advice() {
        for advice in ["", "   \n\n  "] {
            let sections = classify(advice, None);
            assert_eq!(sections.len(), 1);
            assert_eq!(sections[0].category, AdviceCategory::Overview);
            assert_eq!(sections[0].items, vec![NO_ADVICE_AVAILABLE]);
        }
    }

    #[test]
    fn first_match_wins() {
        let paragraph = "Timing and lifestyle:\n- walk after dinner";
        let a = AdviceClassifier::new(vec![
            rule("lifestyle", AdviceCategory::Lifestyle),
            rule("timing|when", AdviceCategory::Timing),
        ])
        .unwrap();
        let b = AdviceClassifier::new(vec![
            rule("timing|when", AdviceCategory::Timing),
            rule("lifestyle", AdviceCategory::Lifestyle),
        ])
        .unwrap();
        for _ in 0..3 {
            assert_eq!(a.classify(paragraph)[0].category, AdviceCategory::Lifestyle);
            assert_eq!(b.classify(paragraph)[0].category, AdviceCategory::Timing);
        }
    }

    #[test]
    fn pattern_matches_body_and_ignores_case() {
        let classifier = AdviceClassifier::new(vec![rule("timing|when", AdviceCategory::Timing)]).unwrap();
        let sections = classifier.classify("Notes:\nTake it WHEN you wake up");
        assert_eq!(sections[0].category, AdviceCategory::Timing);
        assert_eq!(sections[0].title, "Notes");
        assert_eq!(sections[0].items, vec!["Take it WHEN you wake up"]);
    }

    #[test]
    fn heading_only_section_has_no_items() {
        let sections = classify("المكملات الغذائية:", None);
        assert_eq!(sections[0].category, AdviceCategory::Supplements);
        assert_eq!(sections[0].title, "المكملات الغذائية");
        assert!(sections[0].items.is_empty());
    }

    #[test]
    fn default_timing_alternation() {
        let sections = classify("ملاحظة:\nمتى تتناول الحديد: صباحاً", None);
        assert_eq!(sections[0].category, AdviceCategory::Timing);
    }

    #[test]
    fn classify_is_repeatable() {
        let advice = std::fs::read_to_string("tests/fixtures/advice_sections.txt").unwrap();
        let first = classify(&advice, None);
        let second = classify(&advice, None);
        assert_eq!(first, second);
        assert_eq!(AdviceClassifier::default_table().rules().len(), 5);
    }

    #[test]
    fn advice_fixture_categories() {
        let advice = std::fs::read_to_string("tests/fixtures/advice_sections.txt").unwrap();
        let cats: Vec<AdviceCategory> = classify(&advice, None).iter().map(|s| s.category).collect();
        assert_eq!(
            cats,
            vec![
                AdviceCategory::Overview,
                AdviceCategory::DietRecommended,
                AdviceCategory::DietAvoid,
                AdviceCategory::Lifestyle,
                AdviceCategory::Supplements,
            ]
        );
    }

    #[test]
    fn invalid_pattern_rejected_at_construction() {
        let err = AdviceClassifier::new(vec![rule("([", AdviceCategory::Timing)]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPattern { ref pattern, .. } if pattern == "(["));
    }

    #[test]
    fn empty_table_rejected() {
        assert!(matches!(AdviceClassifier::new(vec![]), Err(ConfigError::EmptyTable)));
    }
}
