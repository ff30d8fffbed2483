use thiserror::Error;

/// Failure kinds a task operation can report back to the caller
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// A required field is missing or empty
    #[error("{0}")]
    Validation(String),

    /// The referenced id does not exist
    #[error("{0}")]
    NotFound(String),

    /// Store connectivity or statement failure; the message goes to the client as-is
    #[error("{0}")]
    Internal(String),
}

impl TaskError {
    pub fn task_required() -> Self {
        TaskError::Validation("Task is required".to_string())
    }

    pub fn id_required() -> Self {
        TaskError::Validation("Todo ID is required".to_string())
    }

    pub fn not_found() -> Self {
        TaskError::NotFound("Todo not found".to_string())
    }
}

impl From<sqlx::Error> for TaskError {
    fn from(e: sqlx::Error) -> Self {
        TaskError::Internal(e.to_string())
    }
}
