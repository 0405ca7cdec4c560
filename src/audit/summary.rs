// SPDX-License-Identifier: PMPL-1.0-or-later
//! Console-facing helpers for individual audits: the consolidated audit log,
//! quick-fix hints and suite summary statistics.

use super::{AuditResult, ImpactCounts};
use crate::error::{ReportError, Result};
use serde::Serialize;
use tracing::info;

/// Longest description excerpt shown in a quick-fix hint
const QUICK_FIX_EXCERPT: usize = 80;

/// Multi-line description of one audit, violations numbered from 1
pub fn describe_audit(result: &AuditResult) -> String {
    let mut lines = vec![
        format!("ACCESSIBILITY TEST: {}", result.component_name),
        format!("WCAG Score: {}%", result.score()),
        format!("Passed checks: {}", result.pass_count),
        format!("Violations: {}", result.violation_count()),
    ];

    if !result.violations.is_empty() {
        lines.push(String::new());
        lines.push("VIOLATIONS FOUND:".to_string());
        for (i, v) in result.violations.iter().enumerate() {
            lines.push(String::new());
            lines.push(format!("{}. {} ({})", i + 1, v.id, v.impact.as_str().to_uppercase()));
            lines.push(format!("   Description: {}", v.description));
            lines.push(format!("   Affected nodes: {}", v.node_count));
            lines.push(format!("   Help: {}", v.help_url));
        }
    }

    lines.join("\n")
}

/// Log an audit as one record; quiet audits are only logged when verbose
pub fn log_audit_result(result: &AuditResult, verbose: bool) {
    if verbose || !result.violations.is_empty() {
        info!("{}", describe_audit(result));
    }
}

/// Fix hints for a component scoring below `compliant_threshold`; empty otherwise
pub fn quick_fixes(result: &AuditResult, compliant_threshold: u32) -> Vec<String> {
    if result.score() >= compliant_threshold {
        return Vec::new();
    }
    result
        .violations
        .iter()
        .map(|v| {
            let excerpt: String = v.description.chars().take(QUICK_FIX_EXCERPT).collect();
            format!("Fix {}: {}...", v.id, excerpt)
        })
        .collect()
}

/// Console outcome of a quick audit: the score line, then either a pass
/// confirmation or the fix hints
pub fn quick_check(result: &AuditResult, compliant_threshold: u32) -> String {
    let mut lines = vec![format!(
        "{}: {}% ({} violations)",
        result.component_name,
        result.score(),
        result.violation_count()
    )];

    let fixes = quick_fixes(result, compliant_threshold);
    if fixes.is_empty() {
        lines.push(format!("{} passed quick accessibility test", result.component_name));
    } else {
        lines.push("Quick fixes:".to_string());
        lines.extend(fixes.into_iter().map(|f| format!("  {}", f)));
    }

    lines.join("\n")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentScore {
    pub name: String,
    pub score: u32,
    pub violations: u32,
}

/// Aggregate figures for a suite of audits
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStats {
    /// Mean score rounded to an integer
    pub average_wcag_score: u32,
    pub total_violations: usize,
    pub violations_by_impact: ImpactCounts,
    pub component_scores: Vec<ComponentScore>,
}

impl SummaryStats {
    pub fn from_results(results: &[AuditResult]) -> Result<Self> {
        if results.is_empty() {
            return Err(ReportError::EmptyInput);
        }

        let average = results.iter().map(|r| f64::from(r.score())).sum::<f64>() / results.len() as f64;
        let violations_by_impact = results
            .iter()
            .flat_map(|r| r.violations.iter().map(|v| v.impact))
            .fold(ImpactCounts::default(), ImpactCounts::record);

        Ok(Self {
            average_wcag_score: average.round() as u32,
            total_violations: results.iter().map(|r| r.violations.len()).sum(),
            violations_by_impact,
            component_scores: results
                .iter()
                .map(|r| ComponentScore {
                    name: r.component_name.clone(),
                    score: r.score(),
                    violations: r.violation_count(),
                })
                .collect(),
        })
    }

    pub fn render(&self) -> String {
        let rule = "=".repeat(36);
        let impacts = &self.violations_by_impact;
        let mut lines = vec![
            rule.clone(),
            "SPADE ACCESSIBILITY TEST RESULTS".to_string(),
            rule.clone(),
            format!("Average WCAG Score: {}%", self.average_wcag_score),
            format!("Total Violations: {}", self.total_violations),
            String::new(),
            "Violations by Impact:".to_string(),
            format!("  Critical: {}", impacts.critical),
            format!("  Serious: {}", impacts.serious),
            format!("  Moderate: {}", impacts.moderate),
            format!("  Minor: {}", impacts.minor),
            String::new(),
            "Component Scores:".to_string(),
        ];
        lines.extend(
            self.component_scores
                .iter()
                .map(|c| format!("  {}: {}% ({} violations)", c.name, c.score, c.violations)),
        );
        lines.push(rule);
        lines.join("\n")
    }
}
