//! Run-fatal errors.

use thiserror::Error;

use crate::commit_message::CommitMessageError;
use crate::git::CloneError;
use crate::github::HostingError;

/// Errors that abort a discovery run before it produces a report.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RunError {
    /// Configuration is missing or invalid.
    #[error("configuration error: {message}")]
    Configuration {
        /// Description of the problem.
        message: String,
    },

    /// The initial repository search failed, or the hosting client could not
    /// be built.
    #[error(transparent)]
    Hosting(#[from] HostingError),

    /// The commit message file could not be used.
    #[error(transparent)]
    CommitMessage(#[from] CommitMessageError),

    /// The clone directory could not be prepared.
    #[error(transparent)]
    CloneDirectory(#[from] CloneError),

    /// Writing the report failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail.
        message: String,
    },
}

impl RunError {
    /// Builds a configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for RunError {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: error.to_string(),
        }
    }
}
