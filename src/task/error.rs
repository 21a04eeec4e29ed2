use thiserror::Error;

use super::TaskId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaskError {
    #[error("Task name is empty")]
    EmptyName,

    #[error("Invalid duration '{0}': expected a positive whole number of seconds")]
    InvalidDuration(String),

    #[error("Task not found: {0}")]
    NotFound(TaskId),

    #[error("No task is being edited")]
    NoEditInProgress,
}

pub type Result<T> = std::result::Result<T, TaskError>;
