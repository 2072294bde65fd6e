//! Error types for the task store, focus timer and persistence layer
//!
//! Every domain operation is synchronous and either succeeds completely or is
//! rejected with one of these errors, leaving in-memory state untouched.

use crate::tasks::{SubtaskId, TaskId};
use thiserror::Error;

/// Failure while reading or writing the persisted state document
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid data file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize state: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Error returned by task store, focus timer and settings operations
#[derive(Debug, Error)]
pub enum TaskError {
    /// A required field was empty or a value was out of range
    #[error("{0}")]
    Validation(String),

    #[error("Task {0} not found")]
    TaskNotFound(TaskId),

    #[error("Subtask {subtask_id} not found in task {task_id}")]
    SubtaskNotFound {
        task_id: TaskId,
        subtask_id: SubtaskId,
    },

    /// Stored ids already sit at the top of the id range
    #[error("No ids left to assign")]
    IdsExhausted,

    /// The change could not be written to storage and was not applied
    #[error("Failed to save: {0}")]
    Storage(#[from] StorageError),
}

impl TaskError {
    pub(crate) fn empty(field: &str) -> Self {
        TaskError::Validation(format!("{} must not be empty", field))
    }

    /// True for both task and subtask lookups that missed
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            TaskError::TaskNotFound(_) | TaskError::SubtaskNotFound { .. }
        )
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, TaskError::Validation(_))
    }
}

pub type TaskResult<T> = Result<T, TaskError>;
