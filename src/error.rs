use thiserror::Error;

/// Failure talking to the sustainability backend.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid response: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Storage write failed: {0}")]
    Write(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error("Cannot {action} while {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },

    #[error("Failed to serialize user: {0}")]
    Serialize(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Recoverable failures of the optimize/accept workflow.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorkflowError {
    #[error("Optimization failed: {0}")]
    OptimizeFailed(ApiError),

    #[error("Failed to apply sustainability impact: {0}")]
    AcceptFailed(ApiError),
}

impl WorkflowError {
    /// Short message shown in the blocking notification.
    pub fn user_message(&self) -> &'static str {
        match self {
            WorkflowError::OptimizeFailed(_) => "Optimization failed",
            WorkflowError::AcceptFailed(_) => "Failed to apply sustainability impact",
        }
    }
}

impl From<ApiError> for String {
    fn from(err: ApiError) -> Self {
        err.to_string()
    }
}

impl From<SessionError> for String {
    fn from(err: SessionError) -> Self {
        err.to_string()
    }
}

impl From<WorkflowError> for String {
    fn from(err: WorkflowError) -> Self {
        err.to_string()
    }
}
