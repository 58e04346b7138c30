//! Error types for cloning forks.

use thiserror::Error;

/// Errors raised while preparing the clone root or cloning a fork.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CloneError {
    /// Git reported a failure while cloning.
    #[error("git clone of {uri} failed: {message}")]
    Git {
        /// URI that was being cloned.
        uri: String,
        /// Error detail from the git2 library.
        message: String,
    },

    /// The destination directory already holds files.
    #[error("clone destination {path} already exists")]
    DestinationExists {
        /// Destination that was requested.
        path: String,
    },

    /// The blocking clone task panicked or was cancelled.
    #[error("clone task did not complete: {message}")]
    Task {
        /// Join error detail.
        message: String,
    },

    /// The clone root could not be cleared or created.
    #[error("could not prepare clone directory {path}: {message}")]
    Directory {
        /// Directory being prepared.
        path: String,
        /// Error detail from the filesystem.
        message: String,
    },
}
