use crate::snippets::ContextWindow;
use serde::{Deserialize, Serialize};

/// Knobs for the review view, loadable from the `[annotate]` table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotateConfig {
    pub max_snippets: usize,
    /// Characters of context taken before a match when no line feed is near
    pub context_before: usize,
    /// Characters of context taken after a match when no line feed is near
    pub context_after: usize,
}

impl AnnotateConfig {
    pub fn window(&self) -> ContextWindow {
        ContextWindow {
            before: self.context_before,
            after: self.context_after,
        }
    }
}

impl Default for AnnotateConfig {
    fn default() -> Self {
        let window = ContextWindow::default();
        Self {
            max_snippets: 24,
            context_before: window.before,
            context_after: window.after,
        }
    }
}
