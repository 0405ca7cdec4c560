// SPDX-License-Identifier: PMPL-1.0-or-later
//! Report exporters.
//!
//! Supports three output formats:
//! - JSON: the full report object graph for thesis documentation
//! - CSV: one row per component for quantitative analysis
//! - Text: executive summary for humans
//!
//! All three are pure functions of a [`ThesisReport`]; artifact delivery goes
//! through an [`ArtifactSink`].

use super::ThesisReport;
use crate::error::Result;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// CSV header row
pub const CSV_HEADER: &str = "Component,WCAG_Score,Violations,Passed_Checks,Compliance_Status,Critical_Issues,Keyboard_Accessible,Screen_Reader_Optimized,Color_Contrast_Compliant";

/// Width of the summary's rules
const RULE_WIDTH: usize = 60;

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Structured JSON
    Json,
    /// Per-component CSV
    Csv,
    /// Executive summary text
    Text,
}

impl OutputFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Json => "application/json;charset=utf-8;",
            OutputFormat::Csv => "text/csv;charset=utf-8;",
            OutputFormat::Text => "text/plain;charset=utf-8;",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
            OutputFormat::Text => write!(f, "text"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "text" | "txt" => Ok(OutputFormat::Text),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}

/// Render a report in the given format
pub fn generate_report(report: &ThesisReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => to_json(report),
        OutputFormat::Csv => Ok(to_csv(report)),
        OutputFormat::Text => Ok(executive_summary(report)),
    }
}

/// Pretty-printed JSON with fields in declaration order
pub fn to_json(report: &ThesisReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

/// Quote a field per RFC 4180 when it contains a delimiter, quote or newline
fn escape_csv_field(s: &str) -> String {
    if s.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Header plus one row per component, newline separated
pub fn to_csv(report: &ThesisReport) -> String {
    let mut lines = Vec::with_capacity(report.component_results.len() + 1);
    lines.push(CSV_HEADER.to_string());

    for comp in &report.component_results {
        lines.push(format!(
            "{},{},{},{},{},{},{},{},{}",
            escape_csv_field(&comp.component_name),
            comp.wcag_score,
            comp.violation_count,
            comp.pass_count,
            comp.compliance_status,
            comp.critical_issues.len(),
            yes_no(comp.keyboard_accessible),
            yes_no(comp.screen_reader_optimized),
            yes_no(comp.color_contrast_compliant),
        ));
    }

    lines.join("\n")
}

/// Plain-text executive summary
pub fn executive_summary(report: &ThesisReport) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let meta = &report.metadata;
    let overall = &report.overall_compliance;
    let impacts = &report.violation_analysis.by_impact;
    let criteria = &report.wcag_criteria_compliance;

    let mut lines = vec![
        rule.clone(),
        "SPADE COMPONENT LIBRARY - ACCESSIBILITY COMPLIANCE REPORT".to_string(),
        rule.clone(),
        String::new(),
        format!("Test Date: {}", meta.test_date.format("%Y-%m-%d")),
        format!("Framework: {}", meta.framework),
        format!("Standard: {}", meta.wcag_standard),
        format!("Components Tested: {}", meta.total_components),
        String::new(),
        "OVERALL COMPLIANCE:".to_string(),
        format!("• Average WCAG Score: {}%", overall.average_wcag_score),
        format!("• Compliance Level: {}", overall.compliance_level.label()),
        format!("• Pass Rate: {}% of components fully compliant", overall.pass_rate),
        format!("• Total Violations: {}", overall.total_violations),
        String::new(),
        "COMPONENT BREAKDOWN:".to_string(),
    ];

    lines.extend(report.component_results.iter().map(|c| {
        format!("• {}: {}% ({})", c.component_name, c.wcag_score, c.compliance_status)
    }));

    lines.extend([
        String::new(),
        "VIOLATION ANALYSIS:".to_string(),
        format!("• Critical: {}", impacts.critical),
        format!("• Serious: {}", impacts.serious),
        format!("• Moderate: {}", impacts.moderate),
        format!("• Minor: {}", impacts.minor),
        String::new(),
        "WCAG CRITERIA COMPLIANCE:".to_string(),
        format!("• Perceivable: {}%", criteria.perceivable),
        format!("• Operable: {}%", criteria.operable),
        format!("• Understandable: {}%", criteria.understandable),
        format!("• Robust: {}%", criteria.robust),
        String::new(),
        "KEY RECOMMENDATIONS:".to_string(),
    ]);

    lines.extend(report.recommendations.iter().map(|r| format!("• {}", r)));
    lines.push(String::new());
    lines.push(rule);

    lines.join("\n")
}

/// Timestamp used in artifact names: ISO-8601 to the second with `:` and
/// `.` replaced, e.g. `2025-03-14T09-26-53`
pub fn artifact_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%S")
        .to_string()
        .replace([':', '.'], "-")
}

/// File names for one export run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactNames {
    pub csv: String,
    pub json: String,
    pub summary: String,
}

impl ArtifactNames {
    pub fn at(at: DateTime<Utc>) -> Self {
        let ts = artifact_timestamp(at);
        Self {
            csv: format!("accessibility-report-{}.csv", ts),
            json: format!("accessibility-report-{}.json", ts),
            summary: format!("accessibility-summary-{}.txt", ts),
        }
    }
}

/// Receives exported artifacts (a download prompt, a directory, ...)
pub trait ArtifactSink {
    fn deliver(&self, filename: &str, content: &str, format: OutputFormat) -> Result<()>;
}

/// Writes artifacts into a directory, creating it on first use
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ArtifactSink for DirectorySink {
    fn deliver(&self, filename: &str, content: &str, _format: OutputFormat) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(filename);
        std::fs::write(&path, content)?;
        info!(path = %path.display(), "Wrote report artifact");
        Ok(())
    }
}

/// Render all three formats and hand them to the sink.
///
/// Delivery is fire-and-forget: a failing artifact is logged and the rest
/// are still delivered. Returns the names of the artifacts delivered.
pub fn export_artifacts(
    report: &ThesisReport,
    sink: &dyn ArtifactSink,
    at: DateTime<Utc>,
) -> Result<Vec<String>> {
    let names = ArtifactNames::at(at);
    let artifacts = [
        (names.csv, OutputFormat::Csv),
        (names.json, OutputFormat::Json),
        (names.summary, OutputFormat::Text),
    ];

    let mut delivered = Vec::new();
    for (name, format) in artifacts {
        let content = generate_report(report, format)?;
        match sink.deliver(&name, &content, format) {
            Ok(()) => delivered.push(name),
            Err(e) => warn!(artifact = %name, error = %e, "Could not deliver report artifact"),
        }
    }

    Ok(delivered)
}
