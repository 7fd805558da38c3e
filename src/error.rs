use std::path::PathBuf;
use thiserror::Error;

/// Exit code used when a run is interrupted by the user.
pub const EXIT_CODE_INTERRUPTED: i32 = 130;

#[derive(Debug, Error)]
pub enum ScribError {
    #[error("required command not available: {0}")]
    ToolUnavailable(String),
    #[error("file not found: {}", .0.display())]
    InputNotFound(PathBuf),
    #[error("{context} failed: {detail}")]
    CommandFailed { context: String, detail: String },
    #[error("interrupted by user")]
    Interrupted,
}

impl ScribError {
    /// Process exit code for this error. Only `main` terminates the process.
    pub fn exit_code(&self) -> i32 {
        match self {
            ScribError::Interrupted => EXIT_CODE_INTERRUPTED,
            _ => 1,
        }
    }
}
