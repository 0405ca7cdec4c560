// SPDX-License-Identifier: PMPL-1.0-or-later
//! Error types for spade-a11y

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReportError>;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    /// The audit adapter rejected or failed for one component
    #[error("Audit of {component} failed: {message}")]
    Audit { component: String, message: String },

    /// A report was requested over zero audit results
    #[error("Cannot build a report from zero audit results")]
    EmptyInput,

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ReportError {
    /// Build an audit failure for a component
    pub fn audit(component: &str, message: impl Into<String>) -> Self {
        ReportError::Audit {
            component: component.to_string(),
            message: message.into(),
        }
    }
}
