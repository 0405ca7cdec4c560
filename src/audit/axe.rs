// SPDX-License-Identifier: PMPL-1.0-or-later
//! Raw axe-core result types.
//!
//! Only the fields the report needs are modelled; everything else in the
//! axe output (`incomplete`, `inapplicable`, `testEngine`, ...) is ignored.

use super::ViolationNode;
use crate::error::{ReportError, Result};
use serde::{Deserialize, Serialize};

/// Output of one `axe.run` call
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxeResults {
    #[serde(default)]
    pub passes: Vec<AxeRule>,
    #[serde(default)]
    pub violations: Vec<AxeViolation>,
}

/// A rule that passed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AxeRule {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxeViolation {
    pub id: String,
    #[serde(default)]
    pub impact: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub help_url: String,
    #[serde(default)]
    pub nodes: Vec<AxeNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxeNode {
    #[serde(default)]
    pub html: String,
    /// Selectors; shadow DOM targets are nested arrays
    #[serde(default)]
    pub target: Vec<serde_json::Value>,
    #[serde(default)]
    pub failure_summary: Option<String>,
}

impl From<AxeNode> for ViolationNode {
    fn from(node: AxeNode) -> Self {
        let target = node
            .target
            .into_iter()
            .map(|t| match t {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            })
            .collect();
        Self {
            html: node.html,
            target,
            failure_summary: node.failure_summary.unwrap_or_default(),
        }
    }
}

/// Parse axe-core JSON output.
///
/// The axe CLI writes an array (one entry per page) and `axe.run` a single
/// object; for an array the first entry is used.
pub fn parse_axe_json(content: &str) -> Result<AxeResults> {
    let json: serde_json::Value = serde_json::from_str(content)?;
    let document = match json {
        serde_json::Value::Array(entries) => entries
            .into_iter()
            .next()
            .ok_or_else(|| ReportError::Serialization("axe output contains no results".to_string()))?,
        other => other,
    };
    Ok(serde_json::from_value(document)?)
}
