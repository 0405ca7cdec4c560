// SPDX-License-Identifier: PMPL-1.0-or-later
//! Configuration for spade-a11y

use crate::aggregate::CategoryRule;
use crate::error::{ReportError, Result};
use crate::score::MIN_WCAG_SCORE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Components to audit, in audit order
    pub components: Vec<String>,
    pub thresholds: Thresholds,
    pub analysis: AnalysisConfig,
    pub metadata: MetadataConfig,
    pub audit: AuditConfig,
    pub output: OutputConfig,
    pub feedback: FeedbackConfig,
    /// Ordered violation category rules; first match wins
    pub categories: Vec<CategoryRule>,
}

/// Score thresholds for component status and overall level
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub compliant: u32,
    pub needs_improvement: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// How many of the most frequent violations to keep
    pub top_violations: usize,
    /// How many example rule ids to keep per category
    pub category_examples: usize,
    /// Estimated number of test cases per component
    pub tests_per_component: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataConfig {
    pub framework: String,
    pub library: String,
    pub wcag_standard: String,
    pub test_methodology: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Directory of recorded axe-core results (`<component>.json`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results_dir: Option<PathBuf>,
    /// External auditor command; `{component}` is substituted in each argument
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    pub store_dir: PathBuf,
    pub autosave_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            components: ["Button", "Input", "Dropdown", "Chip"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            thresholds: Thresholds::default(),
            analysis: AnalysisConfig::default(),
            metadata: MetadataConfig::default(),
            audit: AuditConfig::default(),
            output: OutputConfig::default(),
            feedback: FeedbackConfig::default(),
            categories: CategoryRule::defaults(),
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            compliant: MIN_WCAG_SCORE,
            needs_improvement: 80,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            top_violations: 5,
            category_examples: 3,
            tests_per_component: 10,
        }
    }
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            framework: "Angular 20".to_string(),
            library: "Spade Component Library".to_string(),
            wcag_standard: "WCAG 2.1 AA".to_string(),
            test_methodology: "Automated testing with axe-core + manual validation".to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("a11y-reports"),
        }
    }
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            store_dir: dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("spade-a11y")
                .join("feedback"),
            autosave_secs: 30,
        }
    }
}

impl Config {
    /// Reject configurations the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.thresholds.needs_improvement > self.thresholds.compliant {
            return Err(ReportError::Config(format!(
                "needs_improvement threshold ({}) exceeds compliant threshold ({})",
                self.thresholds.needs_improvement, self.thresholds.compliant
            )));
        }
        if self.thresholds.compliant > 100 {
            return Err(ReportError::Config(format!(
                "compliant threshold {} is above 100",
                self.thresholds.compliant
            )));
        }
        if let Some(rule) = self.categories.iter().find(|r| r.keywords.is_empty()) {
            return Err(ReportError::Config(format!(
                "category '{}' has no keywords",
                rule.category
            )));
        }
        Ok(())
    }
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("spade-a11y")
        .join("config.yml")
}

fn is_toml(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("toml")
}

pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)?;

    let config: Config = if is_toml(path) {
        toml::from_str(&content)?
    } else {
        serde_yaml::from_str(&content)
            .map_err(|e| ReportError::Config(format!("YAML parse error: {}", e)))?
    };

    config.validate()?;
    Ok(config)
}

pub fn write_default_config(path: &Path) -> Result<()> {
    let config = Config::default();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let content = if is_toml(path) {
        toml::to_string_pretty(&config)
            .map_err(|e| ReportError::Config(format!("TOML serialize error: {}", e)))?
    } else {
        serde_yaml::to_string(&config)?
    };

    std::fs::write(path, content)?;
    Ok(())
}
