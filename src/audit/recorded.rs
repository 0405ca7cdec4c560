// SPDX-License-Identifier: PMPL-1.0-or-later
//! Adapter serving recorded axe-core runs from a directory.
//!
//! Each component's results live in `<dir>/<component slug>.json`, as saved by
//! the browser test run.

use super::axe::parse_axe_json;
use super::{AuditAdapter, AuditTarget, AxeResults};
use crate::error::{ReportError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct RecordedAudits {
    dir: PathBuf,
}

impl RecordedAudits {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the recording for a target
    pub fn path_for(&self, target: &AuditTarget) -> PathBuf {
        self.dir.join(format!("{}.json", target.slug()))
    }
}

#[async_trait]
impl AuditAdapter for RecordedAudits {
    fn name(&self) -> &str {
        "recorded"
    }

    async fn run_audit(&self, target: &AuditTarget) -> Result<AxeResults> {
        let path = self.path_for(target);
        debug!(path = %path.display(), "Reading recorded audit");

        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| ReportError::audit(&target.component, format!("{}: {}", path.display(), e)))?;

        parse_axe_json(&content)
            .map_err(|e| ReportError::audit(&target.component, format!("{}: {}", path.display(), e)))
    }
}
