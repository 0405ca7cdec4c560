// SPDX-License-Identifier: PMPL-1.0-or-later
//! End-to-end compliance report generation.
//!
//! Audits run one component at a time in configured order so aggregation is
//! reproducible. A component whose audit fails is skipped with a warning;
//! the batch only fails when nothing could be audited.

use crate::audit::{self, summary, AuditAdapter, AuditResult, AuditTarget};
use crate::classify::TestCoverage;
use crate::config::Config;
use crate::error::{ReportError, Result};
use crate::report::export::export_artifacts;
use crate::report::{estimate_coverage, ArtifactSink, ReportBuilder, ThesisReport};
use chrono::Utc;
use tracing::{info, warn};

/// Audits collected for one report, with the parallel coverage estimates
#[derive(Debug, Clone, Default)]
pub struct AuditBatch {
    pub results: Vec<AuditResult>,
    pub coverage: Vec<TestCoverage>,
    /// Components whose audit failed, with the reason
    pub skipped: Vec<(String, String)>,
}

/// Audit every configured component through the adapter
pub async fn run_audits(adapter: &dyn AuditAdapter, config: &Config) -> AuditBatch {
    let mut batch = AuditBatch::default();

    for component in &config.components {
        let target = AuditTarget::new(component);
        match audit::audit_component(adapter, &target).await {
            Ok(result) => {
                summary::log_audit_result(&result, false);
                info!(
                    component = %component,
                    score = result.score(),
                    "Component analyzed"
                );
                batch.coverage.push(estimate_coverage(
                    &result,
                    config.analysis.tests_per_component,
                    config.thresholds.compliant,
                ));
                batch.results.push(result);
            }
            Err(e) => {
                warn!(component = %component, error = %e, "Failed to audit component");
                batch.skipped.push((component.clone(), e.to_string()));
            }
        }
    }

    batch
}

/// Audit all configured components and build the report
pub async fn generate_compliance_report(
    adapter: &dyn AuditAdapter,
    config: &Config,
) -> Result<ThesisReport> {
    info!(
        adapter = adapter.name(),
        components = config.components.len(),
        "Starting accessibility analysis"
    );

    let batch = run_audits(adapter, config).await;
    if batch.results.is_empty() {
        return Err(ReportError::EmptyInput);
    }

    let report = ReportBuilder::new(config).build(&batch.results, &batch.coverage)?;
    info!(
        average = report.overall_compliance.average_wcag_score,
        compliance = %report.overall_compliance.compliance_level,
        skipped = batch.skipped.len(),
        "Accessibility report generated"
    );
    Ok(report)
}

/// Generate the report and deliver the CSV, JSON and summary artifacts
pub async fn generate_and_export(
    adapter: &dyn AuditAdapter,
    config: &Config,
    sink: &dyn ArtifactSink,
) -> Result<(ThesisReport, Vec<String>)> {
    let report = generate_compliance_report(adapter, config).await?;
    let delivered = export_artifacts(&report, sink, Utc::now())?;
    info!(files = delivered.len(), "Report artifacts exported");
    Ok((report, delivered))
}
