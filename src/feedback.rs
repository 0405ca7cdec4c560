// SPDX-License-Identifier: PMPL-1.0-or-later
//! Usability-study feedback persistence.
//!
//! The study app keeps one survey response under the `experiment-feedback`
//! key. It is read when a session opens, written on a fixed interval and
//! again when the session closes. Stored JSON that cannot be parsed is
//! never surfaced: the session starts from defaults with a warning.

use crate::error::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Store key for the survey response
pub const FEEDBACK_KEY: &str = "experiment-feedback";

/// Version tag written into exported feedback
pub const EXPERIMENT_VERSION: &str = "1.0";

/// Material vs. Spade measurement for one task
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskData {
    pub material: Option<f64>,
    pub spade: Option<f64>,
}

impl TaskData {
    fn is_complete(&self) -> bool {
        self.material.is_some() && self.spade.is_some()
    }

    fn total(&self) -> f64 {
        self.material.unwrap_or(0.0) + self.spade.unwrap_or(0.0)
    }
}

/// One value per study task
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerTask<T> {
    pub button: T,
    pub input: T,
    pub dropdown: T,
}

impl<T> PerTask<T> {
    const NAMES: [&'static str; 3] = ["button", "input", "dropdown"];

    fn iter(&self) -> impl Iterator<Item = (&'static str, &T)> {
        Self::NAMES
            .into_iter()
            .zip([&self.button, &self.input, &self.dropdown])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Qualitative {
    pub most_challenging: String,
    pub easiest_aspect: String,
    pub material_frustrations: String,
    pub spade_frustrations: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Preferences {
    pub preferred_approach: String,
    pub reasoning: String,
    pub more_intuitive: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Improvements {
    pub material: String,
    pub spade: String,
}

/// A participant's survey response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FeedbackData {
    pub angular_experience: String,
    pub material_experience: String,
    pub completed_tasks: PerTask<bool>,
    pub times: PerTask<TaskData>,
    pub completion: PerTask<TaskData>,
    pub difficulty: PerTask<TaskData>,
    pub qualitative: Qualitative,
    pub preferences: Preferences,
    pub improvements: Improvements,
    pub additional_comments: String,
    pub submission_timestamp: String,
}

impl FeedbackData {
    pub fn has_completed_tasks(&self) -> bool {
        self.completed_tasks.iter().any(|(_, done)| *done)
    }

    pub fn completed_task_count(&self) -> usize {
        self.completed_tasks.iter().filter(|(_, done)| **done).count()
    }

    /// Sum of all recorded task times, both libraries
    pub fn total_time_spent(&self) -> f64 {
        self.times.iter().map(|(_, t)| t.total()).sum()
    }

    /// Ready to submit: a completed task, both experience answers, and both
    /// times for every completed task
    pub fn is_valid_for_submission(&self) -> bool {
        if !self.has_completed_tasks() {
            return false;
        }
        if self.angular_experience.is_empty() || self.material_experience.is_empty() {
            return false;
        }
        self.completed_tasks
            .iter()
            .zip(self.times.iter())
            .filter(|((_, done), _)| **done)
            .all(|(_, (_, times))| times.is_complete())
    }

    /// Export document: stamps the submission time, drops measurements for
    /// tasks that were not completed and appends analysis metadata
    pub fn export_at(&self, at: DateTime<Utc>) -> Result<serde_json::Value> {
        let stamp = at.to_rfc3339_opts(SecondsFormat::Millis, true);
        let mut stamped = self.clone();
        stamped.submission_timestamp = stamp.clone();

        let mut value = serde_json::to_value(&stamped)?;
        for (task, done) in self.completed_tasks.iter() {
            if *done {
                continue;
            }
            for section in ["times", "completion", "difficulty"] {
                if let Some(map) = value.get_mut(section).and_then(|s| s.as_object_mut()) {
                    map.remove(task);
                }
            }
        }

        value["metadata"] = json!({
            "experimentVersion": EXPERIMENT_VERSION,
            "completedTasksCount": self.completed_task_count(),
            "totalTimeSpent": self.total_time_spent(),
            "exportedAt": stamp,
        });

        Ok(value)
    }
}

/// File-backed key-value store: each key is `<dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct FeedbackStore {
    dir: PathBuf,
}

impl FeedbackStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(std::fs::read_to_string(path)?))
    }

    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        std::fs::write(&path, value)?;
        debug!(path = %path.display(), "Stored value");
        Ok(())
    }

    /// Load saved feedback merged over defaults; unreadable or malformed
    /// entries yield defaults
    pub fn load_feedback(&self) -> FeedbackData {
        let saved = match self.get(FEEDBACK_KEY) {
            Ok(Some(saved)) => saved,
            Ok(None) => return FeedbackData::default(),
            Err(e) => {
                warn!(error = %e, "Could not load saved feedback");
                return FeedbackData::default();
            }
        };

        match serde_json::from_str(&saved) {
            Ok(feedback) => feedback,
            Err(e) => {
                warn!(error = %e, "Could not load saved feedback");
                FeedbackData::default()
            }
        }
    }

    pub fn save_feedback(&self, feedback: &FeedbackData) -> Result<()> {
        let json = serde_json::to_string(feedback)?;
        self.set(FEEDBACK_KEY, &json)
    }
}

/// An open feedback form: loaded on open, autosaved, saved on close.
///
/// Dropping a session without `close` still attempts a final save.
pub struct FeedbackSession {
    store: Arc<FeedbackStore>,
    feedback: Arc<Mutex<FeedbackData>>,
    autosave: Option<JoinHandle<()>>,
    closed: bool,
}

impl FeedbackSession {
    pub fn open(store: FeedbackStore) -> Self {
        let feedback = store.load_feedback();
        Self {
            store: Arc::new(store),
            feedback: Arc::new(Mutex::new(feedback)),
            autosave: None,
            closed: false,
        }
    }

    /// Save every `period` until the session closes. Must be called from
    /// within a tokio runtime.
    pub fn start_autosave(&mut self, period: Duration) {
        if let Some(handle) = self.autosave.take() {
            handle.abort();
        }

        let store = Arc::clone(&self.store);
        let feedback = Arc::clone(&self.feedback);
        self.autosave = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // first tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let snapshot = feedback.lock().await.clone();
                if let Err(e) = store.save_feedback(&snapshot) {
                    warn!(error = %e, "Could not save feedback");
                }
            }
        }));
    }

    pub async fn snapshot(&self) -> FeedbackData {
        self.feedback.lock().await.clone()
    }

    pub async fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut FeedbackData),
    {
        let mut guard = self.feedback.lock().await;
        f(&mut *guard);
    }

    /// Stop autosaving and write the final state
    pub async fn close(mut self) -> Result<()> {
        if let Some(handle) = self.autosave.take() {
            handle.abort();
        }
        let snapshot = self.feedback.lock().await.clone();
        self.closed = true;
        self.store.save_feedback(&snapshot)
    }
}

impl Drop for FeedbackSession {
    fn drop(&mut self) {
        if let Some(handle) = self.autosave.take() {
            handle.abort();
        }
        if self.closed {
            return;
        }
        match self.feedback.try_lock() {
            Ok(feedback) => {
                if let Err(e) = self.store.save_feedback(&feedback) {
                    warn!(error = %e, "Could not save feedback");
                }
            }
            Err(_) => warn!("Feedback busy, final save skipped"),
        }
    }
}
