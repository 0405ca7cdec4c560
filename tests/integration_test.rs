// SPDX-License-Identifier: PMPL-1.0-or-later
//! Integration tests for spade-a11y

use chrono::{TimeZone, Utc};
use spade_a11y::audit::{self, AuditTarget, RecordedAudits};
use spade_a11y::classify::{ComplianceLevel, ComplianceStatus};
use spade_a11y::config::Config;
use spade_a11y::pipeline;
use spade_a11y::report::export::{export_artifacts, to_csv, to_json, CSV_HEADER};
use spade_a11y::report::{generate_report, DirectorySink, OutputFormat, ThesisReport};
use spade_a11y::ReportError;
use tempfile::TempDir;

fn fixtures() -> RecordedAudits {
    RecordedAudits::new(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures"))
}

async fn fixture_report() -> ThesisReport {
    pipeline::generate_compliance_report(&fixtures(), &Config::default())
        .await
        .expect("report over fixtures should succeed")
}

#[tokio::test]
async fn test_single_object_recording() {
    let result = audit::audit_component(&fixtures(), &AuditTarget::new("Button"))
        .await
        .expect("button fixture should parse");

    assert_eq!(result.pass_count, 19);
    assert!(result.violations.is_empty());
    assert_eq!(result.score(), 100);
}

#[tokio::test]
async fn test_cli_array_recording_uses_first_result() {
    let result = audit::audit_component(&fixtures(), &AuditTarget::new("Input"))
        .await
        .expect("input fixture should parse");

    assert_eq!(result.pass_count, 10);
    assert_eq!(result.violations.len(), 1);
    assert_eq!(result.violations[0].id, "color-contrast");
    assert_eq!(result.violations[0].node_count, 1);
    assert_eq!(result.score(), 91);
}

#[tokio::test]
async fn test_malformed_recording_is_audit_failure() {
    let err = audit::audit_component(&fixtures(), &AuditTarget::new("Chip"))
        .await
        .unwrap_err();
    assert!(matches!(err, ReportError::Audit { .. }), "got {err}");
}

#[tokio::test]
async fn test_report_skips_malformed_component() {
    let report = fixture_report().await;

    assert_eq!(report.metadata.total_components, 3);
    let names: Vec<_> = report
        .component_results
        .iter()
        .map(|c| c.component_name.as_str())
        .collect();
    assert_eq!(names, vec!["Button", "Input", "Dropdown"]);
}

#[tokio::test]
async fn test_report_over_fixtures() {
    let report = fixture_report().await;
    let components = &report.component_results;

    assert_eq!(components[0].wcag_score, 100);
    assert_eq!(components[0].compliance_status, ComplianceStatus::Compliant);
    assert!(components[0].keyboard_accessible);

    assert_eq!(components[1].wcag_score, 91);
    assert_eq!(components[1].compliance_status, ComplianceStatus::NeedsImprovement);
    assert!(!components[1].color_contrast_compliant);
    assert_eq!(components[1].critical_issues, vec!["color-contrast"]);
    assert_eq!(components[1].test_coverage.passed_tests, 9);

    assert_eq!(components[2].wcag_score, 80);
    assert_eq!(components[2].compliance_status, ComplianceStatus::NeedsImprovement);
    assert!(!components[2].screen_reader_optimized);

    let overall = &report.overall_compliance;
    assert_eq!(overall.average_wcag_score, 90.33);
    assert_eq!(overall.pass_rate, 33.33);
    assert_eq!(overall.total_violations, 3);
    assert_eq!(overall.compliance_level, ComplianceLevel::PartialCompliance);

    let impacts = &report.violation_analysis.by_impact;
    assert_eq!((impacts.critical, impacts.serious, impacts.moderate, impacts.minor), (0, 2, 0, 1));

    let categories: Vec<_> = report
        .violation_analysis
        .by_category
        .iter()
        .map(|c| c.category.as_str())
        .collect();
    assert_eq!(categories, vec!["Color & Contrast", "Screen Reader Support", "Other"]);
}

#[tokio::test]
async fn test_recommendations_follow_impacts() {
    let report = fixture_report().await;
    let recs = &report.recommendations;

    assert!(!recs.iter().any(|r| r.contains("critical")));
    assert!(recs.iter().any(|r| r.contains("serious")));
    assert!(recs.iter().any(|r| r.contains("AAA")));
    assert_eq!(
        recs.last().map(String::as_str),
        Some("Provide accessibility training for development team")
    );
}

#[tokio::test]
async fn test_json_export_is_stable() {
    let report = fixture_report().await;
    let json = to_json(&report).unwrap();

    let parsed: ThesisReport = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, report);
    assert_eq!(to_json(&parsed).unwrap(), json);

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["overallCompliance"]["complianceLevel"], "PARTIAL_COMPLIANCE");
    assert_eq!(value["componentResults"][1]["complianceStatus"], "NEEDS_IMPROVEMENT");
}

#[tokio::test]
async fn test_csv_export_rows() {
    let report = fixture_report().await;
    let csv = to_csv(&report);
    let lines: Vec<_> = csv.lines().collect();

    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], CSV_HEADER);
    assert_eq!(lines[1], "Button,100,0,19,COMPLIANT,0,Yes,Yes,Yes");
    assert_eq!(lines[2], "Input,91,1,10,NEEDS_IMPROVEMENT,1,Yes,Yes,No");
    assert_eq!(lines[3], "Dropdown,80,2,8,NEEDS_IMPROVEMENT,1,Yes,No,Yes");
}

#[tokio::test]
async fn test_text_export_mentions_level() {
    let report = fixture_report().await;
    let text = generate_report(&report, OutputFormat::Text).unwrap();
    assert!(text.contains("PARTIAL COMPLIANCE"));
    assert!(text.contains("Components Tested: 3"));
}

#[tokio::test]
async fn test_artifacts_written_to_directory() {
    let report = fixture_report().await;
    let out = TempDir::new().unwrap();
    let sink = DirectorySink::new(out.path().join("a11y-reports"));
    let at = Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap();

    let delivered = export_artifacts(&report, &sink, at).unwrap();
    assert_eq!(
        delivered,
        vec![
            "accessibility-report-2025-03-14T09-26-53.csv",
            "accessibility-report-2025-03-14T09-26-53.json",
            "accessibility-summary-2025-03-14T09-26-53.txt",
        ]
    );

    let json = std::fs::read_to_string(sink.dir().join(&delivered[1])).unwrap();
    let parsed: ThesisReport = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.metadata.total_components, 3);
}

#[tokio::test]
async fn test_no_recordings_is_empty_input() {
    let empty = TempDir::new().unwrap();
    let err = pipeline::generate_compliance_report(&RecordedAudits::new(empty.path()), &Config::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ReportError::EmptyInput));
}
