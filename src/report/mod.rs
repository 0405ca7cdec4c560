// SPDX-License-Identifier: PMPL-1.0-or-later
//! Thesis accessibility report: model and builder.
//!
//! [`ReportBuilder`] turns the ordered audit results into one immutable
//! [`ThesisReport`]. Rendering to JSON, CSV and text lives in [`export`].

pub mod export;

pub use export::{generate_report, ArtifactNames, ArtifactSink, DirectorySink, OutputFormat};

use crate::aggregate::{aggregate_violations, AggregateOptions, Categorizer, ViolationAnalysis};
use crate::audit::{AuditResult, ImpactCounts};
use crate::classify::{Classifier, ComplianceLevel, ComponentComplianceResult, TestCoverage};
use crate::config::Config;
use crate::error::{ReportError, Result};
use crate::score::{percentage, round_hundredths};
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// Average score at or above which AAA is recommended as a next step
const AAA_ASPIRATION_SCORE: f64 = 90.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    pub test_date: DateTime<Utc>,
    pub framework: String,
    pub library: String,
    pub wcag_standard: String,
    pub test_methodology: String,
    pub total_components: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallCompliance {
    pub average_wcag_score: f64,
    pub total_violations: usize,
    /// Percentage of components at or above the compliant threshold
    pub pass_rate: f64,
    pub compliance_level: ComplianceLevel,
}

/// Per-principle compliance. All principles carry the same blended
/// passed/total ratio; violations are not mapped to individual criteria.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WcagCriteriaCompliance {
    pub perceivable: f64,
    pub operable: f64,
    pub understandable: f64,
    pub robust: f64,
    pub overall: f64,
}

impl WcagCriteriaCompliance {
    fn blended(ratio: f64) -> Self {
        Self {
            perceivable: ratio,
            operable: ratio,
            understandable: ratio,
            robust: ratio,
            overall: ratio,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThesisReport {
    pub metadata: ReportMetadata,
    pub overall_compliance: OverallCompliance,
    pub component_results: Vec<ComponentComplianceResult>,
    pub violation_analysis: ViolationAnalysis,
    pub wcag_criteria_compliance: WcagCriteriaCompliance,
    pub recommendations: Vec<String>,
}

impl ThesisReport {
    /// Components classified as fully compliant
    pub fn compliant_components(&self) -> impl Iterator<Item = &ComponentComplianceResult> {
        self.component_results
            .iter()
            .filter(|c| c.compliance_status == crate::classify::ComplianceStatus::Compliant)
    }

    pub fn non_compliant_components(&self) -> impl Iterator<Item = &ComponentComplianceResult> {
        self.component_results
            .iter()
            .filter(|c| c.compliance_status == crate::classify::ComplianceStatus::NonCompliant)
    }
}

/// Test-case estimate for one audited component: full marks above
/// `compliant_threshold`, otherwise proportional to the score.
pub fn estimate_coverage(
    result: &AuditResult,
    tests_per_component: u32,
    compliant_threshold: u32,
) -> TestCoverage {
    let score = result.score();
    let passed = if score > compliant_threshold {
        tests_per_component
    } else {
        (f64::from(score) / 100.0 * f64::from(tests_per_component)).floor() as u32
    };
    TestCoverage {
        total_tests: tests_per_component,
        passed_tests: passed,
        failed_tests: result.violation_count(),
    }
}

/// Fixed-rule recommendations from impact counts and average score
pub fn generate_recommendations(
    impacts: &ImpactCounts,
    average_score: f64,
    compliant_threshold: u32,
) -> Vec<String> {
    let mut recommendations = Vec::new();

    if impacts.critical > 0 {
        recommendations.push("Address all critical accessibility violations immediately".to_string());
    }

    if impacts.serious > 0 {
        recommendations
            .push("Resolve serious accessibility issues before production deployment".to_string());
    }

    if average_score < f64::from(compliant_threshold) {
        recommendations.push("Implement automated accessibility testing in CI/CD pipeline".to_string());
        recommendations.push("Conduct regular manual accessibility audits".to_string());
    }

    if average_score >= AAA_ASPIRATION_SCORE {
        recommendations
            .push("Consider pursuing WCAG 2.1 AAA compliance for enhanced accessibility".to_string());
    }

    recommendations
        .push("Establish accessibility guidelines for future component development".to_string());
    recommendations.push("Provide accessibility training for development team".to_string());

    recommendations
}

/// Builds a [`ThesisReport`] from audit results
pub struct ReportBuilder {
    config: Config,
    categorizer: Categorizer,
    classifier: Classifier,
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl ReportBuilder {
    pub fn new(config: &Config) -> Self {
        Self {
            categorizer: Categorizer::new(config.categories.clone()),
            classifier: Classifier::new(config.thresholds),
            config: config.clone(),
        }
    }

    /// Build a report stamped with the current time
    pub fn build(&self, results: &[AuditResult], coverage: &[TestCoverage]) -> Result<ThesisReport> {
        self.build_at(results, coverage, Utc::now())
    }

    /// Build a report. `coverage` is parallel to `results`; components
    /// without an entry get an empty estimate.
    pub fn build_at(
        &self,
        results: &[AuditResult],
        coverage: &[TestCoverage],
        generated_at: DateTime<Utc>,
    ) -> Result<ThesisReport> {
        if results.is_empty() {
            return Err(ReportError::EmptyInput);
        }

        let components = results.len();
        let compliant_threshold = self.classifier.thresholds().compliant;

        let average_score =
            results.iter().map(|r| f64::from(r.score())).sum::<f64>() / components as f64;
        let total_violations: usize = results.iter().map(|r| r.violations.len()).sum();
        let compliant = results.iter().filter(|r| r.score() >= compliant_threshold).count();
        let pass_rate = compliant as f64 / components as f64 * 100.0;

        let violation_analysis = aggregate_violations(
            results,
            &self.categorizer,
            AggregateOptions {
                top_violations: self.config.analysis.top_violations,
                category_examples: self.config.analysis.category_examples,
            },
        );

        let component_results = results
            .iter()
            .enumerate()
            .map(|(i, r)| {
                self.classifier
                    .classify(r, coverage.get(i).copied().unwrap_or_default())
            })
            .collect();

        let compliance_level = self
            .classifier
            .overall_level(average_score, &violation_analysis.by_impact);

        let recommendations = generate_recommendations(
            &violation_analysis.by_impact,
            average_score,
            compliant_threshold,
        );

        let passed_checks: u64 = results.iter().map(|r| u64::from(r.pass_count)).sum();
        let total_checks: u64 = results.iter().map(AuditResult::total_checks).sum();

        let metadata = &self.config.metadata;
        Ok(ThesisReport {
            metadata: ReportMetadata {
                test_date: generated_at.trunc_subsecs(3),
                framework: metadata.framework.clone(),
                library: metadata.library.clone(),
                wcag_standard: metadata.wcag_standard.clone(),
                test_methodology: metadata.test_methodology.clone(),
                total_components: components,
            },
            overall_compliance: OverallCompliance {
                average_wcag_score: round_hundredths(average_score),
                total_violations,
                pass_rate: round_hundredths(pass_rate),
                compliance_level,
            },
            component_results,
            violation_analysis,
            wcag_criteria_compliance: WcagCriteriaCompliance::blended(percentage(
                passed_checks,
                total_checks,
            )),
            recommendations,
        })
    }
}
