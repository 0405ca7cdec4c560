// SPDX-License-Identifier: PMPL-1.0-or-later
//! Violation aggregation across component audits.
//!
//! Counts violations by impact, groups them into categories with an ordered
//! list of keyword rules, and ranks the most frequent rule ids. Everything is
//! a single fold over the audit results; output order follows first
//! encounter so the same input always yields the same analysis.

use crate::audit::{AuditResult, Impact, ImpactCounts, Violation};
use crate::score::round_hundredths;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Category for violations no rule matches
pub const FALLBACK_CATEGORY: &str = "Other";

/// Maps rule ids containing any keyword to a category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub category: String,
    pub keywords: Vec<String>,
}

impl CategoryRule {
    pub fn new(category: &str, keywords: &[&str]) -> Self {
        Self {
            category: category.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    pub fn matches(&self, rule_id: &str) -> bool {
        self.keywords.iter().any(|k| rule_id.contains(k.as_str()))
    }

    /// Rules keyed to axe-core rule id naming, in priority order
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new("Color & Contrast", &["color", "contrast"]),
            Self::new("Keyboard Navigation", &["keyboard", "focus"]),
            Self::new("Screen Reader Support", &["aria", "label", "name"]),
            Self::new("Document Structure", &["heading", "landmark"]),
            Self::new("Form Controls", &["form", "input"]),
        ]
    }
}

/// Ordered category rules; the first matching rule wins
#[derive(Debug, Clone)]
pub struct Categorizer {
    rules: Vec<CategoryRule>,
}

impl Default for Categorizer {
    fn default() -> Self {
        Self::new(CategoryRule::defaults())
    }
}

impl Categorizer {
    pub fn new(rules: Vec<CategoryRule>) -> Self {
        Self { rules }
    }

    pub fn categorize(&self, rule_id: &str) -> &str {
        self.rules
            .iter()
            .find(|r| r.matches(rule_id))
            .map(|r| r.category.as_str())
            .unwrap_or(FALLBACK_CATEGORY)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViolationCategoryAnalysis {
    pub category: String,
    pub count: usize,
    /// Share of all violations, rounded to two decimals
    pub percentage: f64,
    pub examples: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonViolation {
    pub violation_id: String,
    pub description: String,
    pub occurrences: usize,
    pub affected_components: Vec<String>,
    pub wcag_reference: String,
    pub severity: Impact,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViolationAnalysis {
    pub by_impact: ImpactCounts,
    pub by_category: Vec<ViolationCategoryAnalysis>,
    pub most_common_violations: Vec<CommonViolation>,
}

#[derive(Debug, Clone, Copy)]
pub struct AggregateOptions {
    pub top_violations: usize,
    pub category_examples: usize,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            top_violations: 5,
            category_examples: 3,
        }
    }
}

struct CategoryBucket {
    category: String,
    count: usize,
    /// Distinct rule ids in first-seen order
    ids: Vec<String>,
}

#[derive(Default)]
struct Accumulator {
    total: usize,
    by_impact: ImpactCounts,
    categories: Vec<CategoryBucket>,
    category_index: HashMap<String, usize>,
    tracked: Vec<CommonViolation>,
    tracked_index: HashMap<String, usize>,
}

impl Accumulator {
    fn record(mut self, categorizer: &Categorizer, component: &str, violation: &Violation) -> Self {
        self.total += 1;
        self.by_impact = self.by_impact.record(violation.impact);

        let category = categorizer.categorize(&violation.id);
        let slot = match self.category_index.get(category) {
            Some(&i) => i,
            None => {
                self.categories.push(CategoryBucket {
                    category: category.to_string(),
                    count: 0,
                    ids: Vec::new(),
                });
                self.category_index.insert(category.to_string(), self.categories.len() - 1);
                self.categories.len() - 1
            }
        };
        let bucket = &mut self.categories[slot];
        bucket.count += 1;
        if !bucket.ids.contains(&violation.id) {
            bucket.ids.push(violation.id.clone());
        }

        let slot = match self.tracked_index.get(&violation.id) {
            Some(&i) => i,
            None => {
                self.tracked.push(CommonViolation {
                    violation_id: violation.id.clone(),
                    description: violation.description.clone(),
                    occurrences: 0,
                    affected_components: Vec::new(),
                    wcag_reference: violation.help_url.clone(),
                    severity: violation.impact,
                });
                self.tracked_index.insert(violation.id.clone(), self.tracked.len() - 1);
                self.tracked.len() - 1
            }
        };
        let entry = &mut self.tracked[slot];
        entry.occurrences += 1;
        if !entry.affected_components.iter().any(|c| c == component) {
            entry.affected_components.push(component.to_string());
        }

        self
    }

    fn finish(self, options: AggregateOptions) -> ViolationAnalysis {
        let total = self.total as u64;
        let by_category = self
            .categories
            .into_iter()
            .map(|b| ViolationCategoryAnalysis {
                percentage: round_hundredths(b.count as f64 / total as f64 * 100.0),
                category: b.category,
                count: b.count,
                examples: b.ids.into_iter().take(options.category_examples).collect(),
            })
            .collect();

        // stable: equal counts keep first-encounter order
        let mut most_common = self.tracked;
        most_common.sort_by(|a, b| b.occurrences.cmp(&a.occurrences));
        most_common.truncate(options.top_violations);

        ViolationAnalysis {
            by_impact: self.by_impact,
            by_category,
            most_common_violations: most_common,
        }
    }
}

/// Aggregate all violations across the audit results, in order
pub fn aggregate_violations(
    results: &[AuditResult],
    categorizer: &Categorizer,
    options: AggregateOptions,
) -> ViolationAnalysis {
    results
        .iter()
        .flat_map(|r| r.violations.iter().map(move |v| (r.component_name.as_str(), v)))
        .fold(Accumulator::default(), |acc, (component, violation)| {
            acc.record(categorizer, component, violation)
        })
        .finish(options)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(name: &str, ids: &[(&str, Impact)]) -> AuditResult {
        AuditResult::new(
            name,
            10,
            ids.iter()
                .map(|(id, impact)| {
                    Violation::new(id, *impact)
                        .with_description(&format!("{id} description"))
                        .with_help_url(&format!("https://dequeuniversity.com/rules/axe/4.10/{id}"))
                })
                .collect(),
        )
    }

    #[test]
    fn test_default_category_priority() {
        let c = Categorizer::default();
        assert_eq!(c.categorize("color-contrast"), "Color & Contrast");
        assert_eq!(c.categorize("focus-order-semantics"), "Keyboard Navigation");
        assert_eq!(c.categorize("aria-label-missing"), "Screen Reader Support");
        assert_eq!(c.categorize("page-has-heading-one"), "Document Structure");
        assert_eq!(c.categorize("select-name"), "Screen Reader Support");
        assert_eq!(c.categorize("input-image-alt"), "Form Controls");
        assert_eq!(c.categorize("region"), FALLBACK_CATEGORY);
    }

    #[test]
    fn test_aria_beats_landmark() {
        // both "aria" and "landmark" appear; screen reader rule is checked first
        let c = Categorizer::default();
        assert_eq!(c.categorize("aria-landmark-unique"), "Screen Reader Support");
    }

    #[test]
    fn test_custom_rules_replace_defaults() {
        let c = Categorizer::new(vec![CategoryRule::new("Tables", &["table", "th-"])]);
        assert_eq!(c.categorize("th-has-data-cells"), "Tables");
        assert_eq!(c.categorize("color-contrast"), FALLBACK_CATEGORY);
    }

    #[test]
    fn test_empty_input_yields_empty_analysis() {
        let analysis = aggregate_violations(&[], &Categorizer::default(), AggregateOptions::default());
        assert_eq!(analysis.by_impact, ImpactCounts::default());
        assert!(analysis.by_category.is_empty());
        assert!(analysis.most_common_violations.is_empty());
    }

    #[test]
    fn test_counts_by_impact() {
        let results = vec![
            result("Button", &[("color-contrast", Impact::Serious), ("region", Impact::Moderate)]),
            result("Input", &[("label", Impact::Critical), ("color-contrast", Impact::Serious)]),
        ];
        let analysis = aggregate_violations(&results, &Categorizer::default(), AggregateOptions::default());
        assert_eq!(analysis.by_impact.critical, 1);
        assert_eq!(analysis.by_impact.serious, 2);
        assert_eq!(analysis.by_impact.moderate, 1);
        assert_eq!(analysis.by_impact.minor, 0);
    }

    #[test]
    fn test_categories_in_first_encounter_order_with_percentages() {
        let results = vec![
            result("Button", &[("region", Impact::Moderate), ("color-contrast", Impact::Serious)]),
            result("Input", &[("color-contrast", Impact::Serious)]),
        ];
        let analysis = aggregate_violations(&results, &Categorizer::default(), AggregateOptions::default());

        assert_eq!(analysis.by_category.len(), 2);
        assert_eq!(analysis.by_category[0].category, "Other");
        assert_eq!(analysis.by_category[0].count, 1);
        assert_eq!(analysis.by_category[0].percentage, 33.33);
        assert_eq!(analysis.by_category[1].category, "Color & Contrast");
        assert_eq!(analysis.by_category[1].percentage, 66.67);
        assert_eq!(analysis.by_category[1].examples, vec!["color-contrast"]);
    }

    #[test]
    fn test_examples_capped_and_distinct() {
        let results = vec![result(
            "Dropdown",
            &[
                ("aria-allowed-attr", Impact::Critical),
                ("aria-allowed-attr", Impact::Critical),
                ("label", Impact::Critical),
                ("button-name", Impact::Serious),
                ("aria-roles", Impact::Serious),
            ],
        )];
        let analysis = aggregate_violations(&results, &Categorizer::default(), AggregateOptions::default());
        let screen_reader = &analysis.by_category[0];
        assert_eq!(screen_reader.count, 5);
        assert_eq!(screen_reader.percentage, 100.0);
        assert_eq!(screen_reader.examples, vec!["aria-allowed-attr", "label", "button-name"]);
    }

    #[test]
    fn test_most_common_sorted_stably_and_truncated() {
        let results = vec![
            result("Button", &[("a-1", Impact::Minor), ("b-2", Impact::Minor), ("c-3", Impact::Minor)]),
            result("Input", &[("d-4", Impact::Minor), ("b-2", Impact::Minor), ("e-5", Impact::Minor)]),
            result("Chip", &[("f-6", Impact::Minor), ("e-5", Impact::Minor)]),
        ];
        let analysis = aggregate_violations(&results, &Categorizer::default(), AggregateOptions::default());
        let ids: Vec<&str> = analysis
            .most_common_violations
            .iter()
            .map(|v| v.violation_id.as_str())
            .collect();
        assert_eq!(ids, vec!["b-2", "e-5", "a-1", "c-3", "d-4"]);
        assert_eq!(analysis.most_common_violations[0].affected_components, vec!["Button", "Input"]);
    }

    #[test]
    fn test_tracked_entry_keeps_first_occurrence_details() {
        let results = vec![
            result("Button", &[("color-contrast", Impact::Serious)]),
            result("Button", &[("color-contrast", Impact::Serious)]),
        ];
        let analysis = aggregate_violations(&results, &Categorizer::default(), AggregateOptions::default());
        let entry = &analysis.most_common_violations[0];
        assert_eq!(entry.occurrences, 2);
        assert_eq!(entry.affected_components, vec!["Button"]);
        assert_eq!(entry.severity, Impact::Serious);
        assert_eq!(entry.description, "color-contrast description");
        assert!(entry.wcag_reference.ends_with("/color-contrast"));
    }

    #[test]
    fn test_options_limit_output() {
        let results = vec![result(
            "Button",
            &[("a", Impact::Minor), ("b", Impact::Minor), ("c", Impact::Minor)],
        )];
        let options = AggregateOptions {
            top_violations: 2,
            category_examples: 1,
        };
        let analysis = aggregate_violations(&results, &Categorizer::default(), options);
        assert_eq!(analysis.most_common_violations.len(), 2);
        assert_eq!(analysis.by_category[0].examples, vec!["a"]);
    }
}
