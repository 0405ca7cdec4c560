// SPDX-License-Identifier: PMPL-1.0-or-later
//! Compliance classification for components and for the whole library.

use crate::audit::{AuditResult, ImpactCounts, Violation};
use crate::config::Thresholds;
use serde::{Deserialize, Serialize};

/// Rule-id keywords that disqualify keyboard accessibility
pub const KEYBOARD_KEYWORDS: &[&str] = &["keyboard"];
/// Rule-id keywords that disqualify screen reader optimization
pub const SCREEN_READER_KEYWORDS: &[&str] = &["aria", "label", "name"];
/// Rule-id keywords that disqualify color contrast compliance
pub const CONTRAST_KEYWORDS: &[&str] = &["contrast"];

/// Per-component compliance status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplianceStatus {
    Compliant,
    NeedsImprovement,
    NonCompliant,
}

impl std::fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComplianceStatus::Compliant => write!(f, "COMPLIANT"),
            ComplianceStatus::NeedsImprovement => write!(f, "NEEDS_IMPROVEMENT"),
            ComplianceStatus::NonCompliant => write!(f, "NON_COMPLIANT"),
        }
    }
}

/// Compliance level across all audited components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComplianceLevel {
    #[serde(rename = "WCAG_2_1_AA_COMPLIANT")]
    Wcag21AaCompliant,
    #[serde(rename = "PARTIAL_COMPLIANCE")]
    PartialCompliance,
    #[serde(rename = "NON_COMPLIANT")]
    NonCompliant,
}

impl ComplianceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplianceLevel::Wcag21AaCompliant => "WCAG_2_1_AA_COMPLIANT",
            ComplianceLevel::PartialCompliance => "PARTIAL_COMPLIANCE",
            ComplianceLevel::NonCompliant => "NON_COMPLIANT",
        }
    }

    /// "WCAG 2 1 AA COMPLIANT" style label for prose output
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }
}

impl std::fmt::Display for ComplianceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Estimated test-case coverage for one component
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCoverage {
    pub total_tests: u32,
    pub passed_tests: u32,
    pub failed_tests: u32,
}

/// Feature flags derived from which rule ids were violated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessibilityFlags {
    pub keyboard_accessible: bool,
    pub screen_reader_optimized: bool,
    pub color_contrast_compliant: bool,
}

impl AccessibilityFlags {
    pub fn from_violations(violations: &[Violation]) -> Self {
        let none_match = |keywords: &[&str]| !violations.iter().any(|v| v.id_contains_any(keywords));
        Self {
            keyboard_accessible: none_match(KEYBOARD_KEYWORDS),
            screen_reader_optimized: none_match(SCREEN_READER_KEYWORDS),
            color_contrast_compliant: none_match(CONTRAST_KEYWORDS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentComplianceResult {
    pub component_name: String,
    pub wcag_score: u32,
    pub violation_count: u32,
    pub pass_count: u32,
    pub compliance_status: ComplianceStatus,
    /// Ids of critical and serious violations
    pub critical_issues: Vec<String>,
    pub keyboard_accessible: bool,
    pub screen_reader_optimized: bool,
    pub color_contrast_compliant: bool,
    pub test_coverage: TestCoverage,
}

#[derive(Debug, Clone, Copy)]
pub struct Classifier {
    thresholds: Thresholds,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(Thresholds::default())
    }
}

impl Classifier {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    pub fn status(&self, score: u32) -> ComplianceStatus {
        if score >= self.thresholds.compliant {
            ComplianceStatus::Compliant
        } else if score >= self.thresholds.needs_improvement {
            ComplianceStatus::NeedsImprovement
        } else {
            ComplianceStatus::NonCompliant
        }
    }

    /// Full AA compliance also requires no critical or serious violations
    pub fn overall_level(&self, average_score: f64, impacts: &ImpactCounts) -> ComplianceLevel {
        if average_score >= f64::from(self.thresholds.compliant) && !impacts.has_blocking() {
            ComplianceLevel::Wcag21AaCompliant
        } else if average_score >= f64::from(self.thresholds.needs_improvement) {
            ComplianceLevel::PartialCompliance
        } else {
            ComplianceLevel::NonCompliant
        }
    }

    pub fn classify(&self, result: &AuditResult, coverage: TestCoverage) -> ComponentComplianceResult {
        let score = result.score();
        let flags = AccessibilityFlags::from_violations(&result.violations);

        ComponentComplianceResult {
            component_name: result.component_name.clone(),
            wcag_score: score,
            violation_count: result.violation_count(),
            pass_count: result.pass_count,
            compliance_status: self.status(score),
            critical_issues: result
                .violations
                .iter()
                .filter(|v| v.impact.is_blocking())
                .map(|v| v.id.clone())
                .collect(),
            keyboard_accessible: flags.keyboard_accessible,
            screen_reader_optimized: flags.screen_reader_optimized,
            color_contrast_compliant: flags.color_contrast_compliant,
            test_coverage: coverage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Impact;

    #[test]
    fn test_clean_component_is_compliant() {
        let result = AuditResult::new("Button", 19, Vec::new());
        let classified = Classifier::default().classify(&result, TestCoverage::default());
        assert_eq!(classified.wcag_score, 100);
        assert_eq!(classified.compliance_status, ComplianceStatus::Compliant);
        assert!(classified.keyboard_accessible);
        assert!(classified.screen_reader_optimized);
        assert!(classified.color_contrast_compliant);
        assert!(classified.critical_issues.is_empty());
    }

    #[test]
    fn test_contrast_violation_needs_improvement() {
        let result = AuditResult::new(
            "Chip",
            10,
            vec![Violation::new("color-contrast", Impact::Serious)],
        );
        let classified = Classifier::default().classify(&result, TestCoverage::default());
        assert_eq!(classified.wcag_score, 91);
        assert_eq!(classified.compliance_status, ComplianceStatus::NeedsImprovement);
        assert!(!classified.color_contrast_compliant);
        assert!(classified.keyboard_accessible);
        assert_eq!(classified.critical_issues, vec!["color-contrast"]);
    }

    #[test]
    fn test_status_thresholds() {
        let c = Classifier::default();
        for score in 0..=100 {
            let status = c.status(score);
            assert_eq!(status == ComplianceStatus::Compliant, score >= 95, "score {score}");
            assert_eq!(status == ComplianceStatus::NonCompliant, score < 80, "score {score}");
        }
    }

    #[test]
    fn test_flags_use_substring_match() {
        let violations = vec![
            Violation::new("scrollable-region-focusable", Impact::Serious),
            Violation::new("select-name", Impact::Minor),
        ];
        let flags = AccessibilityFlags::from_violations(&violations);
        // "focusable" is not "keyboard"
        assert!(flags.keyboard_accessible);
        assert!(!flags.screen_reader_optimized);
        assert!(flags.color_contrast_compliant);
    }

    #[test]
    fn test_only_blocking_impacts_are_critical_issues() {
        let result = AuditResult::new(
            "Input",
            5,
            vec![
                Violation::new("label", Impact::Critical),
                Violation::new("region", Impact::Moderate),
                Violation::new("aria-roles", Impact::Serious),
                Violation::new("heading-order", Impact::Minor),
            ],
        );
        let classified = Classifier::default().classify(&result, TestCoverage::default());
        assert_eq!(classified.critical_issues, vec!["label", "aria-roles"]);
    }

    #[test]
    fn test_overall_level() {
        let c = Classifier::default();
        let clean = ImpactCounts::default();
        let serious = ImpactCounts::default().record(Impact::Serious);

        assert_eq!(c.overall_level(97.5, &clean), ComplianceLevel::Wcag21AaCompliant);
        assert_eq!(c.overall_level(97.5, &serious), ComplianceLevel::PartialCompliance);
        assert_eq!(c.overall_level(90.0, &clean), ComplianceLevel::PartialCompliance);
        assert_eq!(c.overall_level(79.99, &clean), ComplianceLevel::NonCompliant);
    }

    #[test]
    fn test_level_serialization_and_label() {
        let json = serde_json::to_string(&ComplianceLevel::Wcag21AaCompliant).unwrap();
        assert_eq!(json, "\"WCAG_2_1_AA_COMPLIANT\"");
        assert_eq!(ComplianceLevel::PartialCompliance.label(), "PARTIAL COMPLIANCE");
        let json = serde_json::to_string(&ComplianceStatus::NeedsImprovement).unwrap();
        assert_eq!(json, "\"NEEDS_IMPROVEMENT\"");
    }
}
