// SPDX-License-Identifier: PMPL-1.0-or-later
//! Adapter that shells out to an external auditor (e.g. `npx @axe-core/cli`).
//!
//! Every argument has `{component}` replaced by the target's slug; the
//! process must print axe-core JSON on stdout.

use super::axe::parse_axe_json;
use super::{AuditAdapter, AuditTarget, AxeResults};
use crate::error::{ReportError, Result};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

const COMPONENT_PLACEHOLDER: &str = "{component}";

pub struct CommandAuditor {
    program: String,
    args: Vec<String>,
}

impl CommandAuditor {
    pub fn new(program: &str, args: Vec<String>) -> Self {
        Self {
            program: program.to_string(),
            args,
        }
    }

    /// Build from a command line whose first element is the program
    pub fn from_command_line(command: &[String]) -> Result<Self> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| ReportError::Config("audit command is empty".to_string()))?;
        Ok(Self::new(program, args.to_vec()))
    }

    fn args_for(&self, target: &AuditTarget) -> Vec<String> {
        let slug = target.slug();
        self.args
            .iter()
            .map(|a| a.replace(COMPONENT_PLACEHOLDER, &slug))
            .collect()
    }
}

#[async_trait]
impl AuditAdapter for CommandAuditor {
    fn name(&self) -> &str {
        &self.program
    }

    async fn run_audit(&self, target: &AuditTarget) -> Result<AxeResults> {
        let args = self.args_for(target);
        debug!(program = %self.program, ?args, "Running audit command");

        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .await
            .map_err(|e| ReportError::audit(&target.component, format!("{}: {}", self.program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ReportError::audit(
                &target.component,
                format!("{} exited with {}: {}", self.program, output.status, stderr.trim()),
            ));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_axe_json(&stdout).map_err(|e| ReportError::audit(&target.component, e.to_string()))
    }
}
