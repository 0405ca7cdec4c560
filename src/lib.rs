// SPDX-License-Identifier: PMPL-1.0-or-later
//! spade-a11y - accessibility compliance reporting for the Spade component library
//!
//! Turns per-component axe-core audit results into a WCAG 2.1 AA compliance
//! report for a thesis evaluation.
//!
//! ## Pipeline
//!
//! - **Audit** ([`audit`]): adapters yield raw axe-core results per component
//! - **Score** ([`score`]): pass ratio as an integer percentage
//! - **Aggregate** ([`aggregate`]): impact counts, categories, most common violations
//! - **Classify** ([`classify`]): component status, accessibility flags, overall level
//! - **Report** ([`report`]): the `ThesisReport` and its JSON, CSV and text exports
//!
//! [`feedback`] persists the usability-study survey that accompanies the audits.

pub mod aggregate;
pub mod audit;
pub mod classify;
pub mod config;
pub mod error;
pub mod feedback;
pub mod pipeline;
pub mod report;
pub mod score;

pub use error::{ReportError, Result};
pub use pipeline::{generate_and_export, generate_compliance_report};
pub use report::{ReportBuilder, ThesisReport};
