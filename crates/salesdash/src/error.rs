//! Application-wide error types using thiserror.

use salesdash_common::DashError;

/// Main application error type.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Pipeline or configuration error.
    #[error(transparent)]
    Dash(#[from] DashError),

    /// Terminal or signal handler I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A spawned render pass panicked or was aborted.
    #[error("Render task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Result type for the application.
pub type AppResult<T> = Result<T, AppError>;
