// SPDX-License-Identifier: PMPL-1.0-or-later
//! Audit data model and the adapter seam to the accessibility rule engine.
//!
//! An adapter takes an [`AuditTarget`] (a rendered component state) and
//! returns the raw axe-core pass/violation lists. [`audit_component`] turns
//! those into an immutable [`AuditResult`].

pub mod axe;
pub mod command;
pub mod recorded;
pub mod summary;

pub use axe::{AxeNode, AxeResults, AxeRule, AxeViolation};
pub use command::CommandAuditor;
pub use recorded::RecordedAudits;

use crate::error::Result;
use crate::score;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Violation severity as reported by axe-core
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Minor,
    Moderate,
    Serious,
    Critical,
}

impl Impact {
    /// Map an axe impact string; absent or unknown impacts count as minor
    pub fn from_axe(value: Option<&str>) -> Self {
        match value.map(|v| v.to_ascii_lowercase()).as_deref() {
            Some("critical") => Impact::Critical,
            Some("serious") => Impact::Serious,
            Some("moderate") => Impact::Moderate,
            _ => Impact::Minor,
        }
    }

    /// Critical and serious violations are reported as critical issues
    pub fn is_blocking(&self) -> bool {
        matches!(self, Impact::Critical | Impact::Serious)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Impact::Minor => "minor",
            Impact::Moderate => "moderate",
            Impact::Serious => "serious",
            Impact::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Impact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Violation counts per impact bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactCounts {
    pub critical: usize,
    pub serious: usize,
    pub moderate: usize,
    pub minor: usize,
}

impl ImpactCounts {
    /// Count one more violation of the given impact
    pub fn record(mut self, impact: Impact) -> Self {
        match impact {
            Impact::Critical => self.critical += 1,
            Impact::Serious => self.serious += 1,
            Impact::Moderate => self.moderate += 1,
            Impact::Minor => self.minor += 1,
        }
        self
    }

    pub fn total(&self) -> usize {
        self.critical + self.serious + self.moderate + self.minor
    }

    /// Whether any critical or serious violation was seen
    pub fn has_blocking(&self) -> bool {
        self.critical > 0 || self.serious > 0
    }
}

/// A DOM node affected by a violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViolationNode {
    pub html: String,
    pub target: Vec<String>,
    pub failure_summary: String,
}

/// One failed accessibility rule within an audit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    /// Rule id, e.g. "color-contrast"
    pub id: String,
    pub impact: Impact,
    pub description: String,
    pub help_url: String,
    pub node_count: usize,
    #[serde(default)]
    pub nodes: Vec<ViolationNode>,
}

impl Violation {
    pub fn new(id: &str, impact: Impact) -> Self {
        Self {
            id: id.to_string(),
            impact,
            description: String::new(),
            help_url: String::new(),
            node_count: 0,
            nodes: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_help_url(mut self, url: &str) -> Self {
        self.help_url = url.to_string();
        self
    }

    pub fn with_node_count(mut self, count: usize) -> Self {
        self.node_count = count;
        self
    }

    /// Whether the rule id contains any of the keywords
    pub fn id_contains_any(&self, keywords: &[&str]) -> bool {
        keywords.iter().any(|k| self.id.contains(k))
    }
}

impl From<AxeViolation> for Violation {
    fn from(raw: AxeViolation) -> Self {
        let nodes: Vec<ViolationNode> = raw.nodes.into_iter().map(ViolationNode::from).collect();
        Self {
            impact: Impact::from_axe(raw.impact.as_deref()),
            id: raw.id,
            description: raw.description,
            help_url: raw.help_url,
            node_count: nodes.len(),
            nodes,
        }
    }
}

/// Result of one audit run against one component state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditResult {
    pub component_name: String,
    pub pass_count: u32,
    pub violations: Vec<Violation>,
    pub timestamp: DateTime<Utc>,
}

impl AuditResult {
    pub fn new(component_name: &str, pass_count: u32, violations: Vec<Violation>) -> Self {
        Self::at(component_name, pass_count, violations, Utc::now())
    }

    pub fn at(
        component_name: &str,
        pass_count: u32,
        violations: Vec<Violation>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            component_name: component_name.to_string(),
            pass_count,
            violations,
            timestamp,
        }
    }

    /// Convert raw axe-core output for one component
    pub fn from_axe(component_name: &str, raw: AxeResults, timestamp: DateTime<Utc>) -> Self {
        let pass_count = u32::try_from(raw.passes.len()).unwrap_or(u32::MAX);
        let violations = raw.violations.into_iter().map(Violation::from).collect();
        Self::at(component_name, pass_count, violations, timestamp)
    }

    pub fn violation_count(&self) -> u32 {
        u32::try_from(self.violations.len()).unwrap_or(u32::MAX)
    }

    /// WCAG score, always derived from the pass and violation counts
    pub fn score(&self) -> u32 {
        score::wcag_score(self.pass_count, self.violation_count())
    }

    pub fn total_checks(&self) -> u64 {
        u64::from(self.pass_count) + u64::from(self.violation_count())
    }
}

/// A rendered component state to audit
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AuditTarget {
    pub component: String,
}

impl AuditTarget {
    pub fn new(component: &str) -> Self {
        Self {
            component: component.to_string(),
        }
    }

    /// File-system friendly name, e.g. "Dropdown" -> "dropdown"
    pub fn slug(&self) -> String {
        self.component
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '-' })
            .collect()
    }
}

/// Runs an accessibility rule engine against one rendered component
#[async_trait]
pub trait AuditAdapter: Send + Sync {
    /// Human-readable adapter name
    fn name(&self) -> &str;

    /// Run the rule engine and return its raw results
    async fn run_audit(&self, target: &AuditTarget) -> Result<AxeResults>;
}

/// Audit one component through an adapter
pub async fn audit_component(adapter: &dyn AuditAdapter, target: &AuditTarget) -> Result<AuditResult> {
    debug!(adapter = adapter.name(), component = %target.component, "Running audit");
    let raw = adapter.run_audit(target).await?;
    Ok(AuditResult::from_axe(&target.component, raw, Utc::now()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_impact_is_minor() {
        assert_eq!(Impact::from_axe(None), Impact::Minor);
        assert_eq!(Impact::from_axe(Some("bogus")), Impact::Minor);
        assert_eq!(Impact::from_axe(Some("Serious")), Impact::Serious);
    }

    #[test]
    fn test_impact_counts_record() {
        let counts = [Impact::Critical, Impact::Minor, Impact::Minor]
            .into_iter()
            .fold(ImpactCounts::default(), ImpactCounts::record);
        assert_eq!(counts.critical, 1);
        assert_eq!(counts.minor, 2);
        assert_eq!(counts.total(), 3);
        assert!(counts.has_blocking());
    }

    #[test]
    fn test_score_is_derived() {
        let result = AuditResult::new(
            "Button",
            10,
            vec![Violation::new("color-contrast", Impact::Serious)],
        );
        assert_eq!(result.violation_count(), 1);
        assert_eq!(result.score(), 91);
        assert_eq!(result.total_checks(), 11);
    }

    #[test]
    fn test_from_axe_counts_nodes() {
        let raw: AxeResults = serde_json::from_str(
            r##"{
                "passes": [{"id": "button-name"}, {"id": "region"}],
                "violations": [{
                    "id": "label",
                    "impact": null,
                    "description": "Form elements must have labels",
                    "helpUrl": "https://dequeuniversity.com/rules/axe/4.10/label",
                    "nodes": [{"html": "<input>", "target": ["input"]}, {"html": "<input id=a>", "target": ["#a"]}]
                }]
            }"##,
        )
        .unwrap();

        let result = AuditResult::from_axe("Input", raw, Utc::now());
        assert_eq!(result.pass_count, 2);
        assert_eq!(result.violations[0].impact, Impact::Minor);
        assert_eq!(result.violations[0].node_count, 2);
        assert_eq!(result.violations[0].nodes[1].target, vec!["#a"]);
    }

    #[test]
    fn test_target_slug() {
        assert_eq!(AuditTarget::new("Dropdown").slug(), "dropdown");
        assert_eq!(AuditTarget::new("Button Primary").slug(), "button-primary");
    }
}
