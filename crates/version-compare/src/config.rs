use crate::line_diff::DiffOptions;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Knobs for the comparison pipeline, loadable from the `[compare]` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareConfig {
    /// Deadline for the display line diff in milliseconds, 0 disables it.
    /// The stored similarity never uses it; bound that with `max_text_chars`.
    pub diff_timeout_ms: u64,
    /// Texts longer than this (in characters) are compared by hash only
    pub max_text_chars: Option<usize>,
    /// Similarity percentage at or above which a version counts as unchanged
    pub identical_threshold: f64,
    pub diff: DiffOptions,
}

impl CompareConfig {
    pub fn diff_timeout(&self) -> Option<Duration> {
        match self.diff_timeout_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            diff_timeout_ms: 1000,
            max_text_chars: None,
            identical_threshold: 99.9,
            diff: DiffOptions::default(),
        }
    }
}
