//! Task execution status and the subtask completion rollup.

use super::ParseTaskStatusError;
use serde::{Deserialize, Serialize};

/// Execution status of a task.
///
/// `InProgress` is reachable only through the subtask rollup; directly
/// toggling a task moves it between `NotStarted` and `Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// No work recorded yet.
    NotStarted,
    /// Some, but not all, subtasks are completed.
    InProgress,
    /// All work is done.
    Completed,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    /// Returns true when the status is `Completed`.
    #[must_use]
    pub const fn is_completed(self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Derives a task's status from its subtask completion counts.
    ///
    /// Returns `None` for an empty subtask set: with nothing to roll up,
    /// the task keeps whatever status it already holds.
    #[must_use]
    pub const fn rollup(completed: usize, total: usize) -> Option<Self> {
        if total == 0 {
            return None;
        }
        if completed == total {
            Some(Self::Completed)
        } else if completed > 0 {
            Some(Self::InProgress)
        } else {
            Some(Self::NotStarted)
        }
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "not_started" => Ok(Self::NotStarted),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}
