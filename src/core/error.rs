use std::io;
use thiserror::Error;

/// Errors surfaced by the regrouping engine and its collaborators.
///
/// Formatter failures and I/O failures are kept apart so a caller can tell
/// "the external formatter rejected this file" from "the file could not be
/// read or written".
#[derive(Error, Debug)]
pub enum GroupsError {
    /// The source is not line-oriented UTF-8 text.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The external style formatter exited unsuccessfully or could not be run.
    #[error("{program} failed: {message}")]
    FormatterFailure { program: String, message: String },

    /// Reading, writing, backing up or diffing a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The settings file exists but cannot be read or parsed.
    #[error("config error: {0}")]
    Config(String),

    /// `diff` failed or produced output that does not look like a unified diff.
    #[error("diff failed for {0}")]
    Diff(String),
}

pub type Result<T> = std::result::Result<T, GroupsError>;

impl GroupsError {
    /// True when the error came from the external formatter.
    pub fn is_formatter_failure(&self) -> bool {
        matches!(self, GroupsError::FormatterFailure { .. })
    }
}
