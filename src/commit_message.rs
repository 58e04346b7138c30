//! Commit message parsing.
//!
//! The subject doubles as the expected pull request title and the body as the
//! expected pull request description when looking for duplicates.

use std::fs;

use camino::Utf8Path;
use thiserror::Error;

/// Errors raised while reading a commit message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommitMessageError {
    /// The commit message file could not be read.
    #[error("could not read commit message file {path}: {message}")]
    Read {
        /// Path that was read.
        path: String,
        /// Error detail from the filesystem.
        message: String,
    },

    /// The first line of the commit message is blank.
    #[error("commit message subject must not be empty")]
    EmptySubject,
}

/// A commit message split into subject and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitMessage {
    subject: String,
    body: String,
}

impl CommitMessage {
    /// Builds a message from already separated parts.
    #[must_use]
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
        }
    }

    /// Splits text into a subject (first line) and a body (the remaining
    /// lines, trimmed). Text without a newline has an empty body.
    ///
    /// # Errors
    ///
    /// Returns [`CommitMessageError::EmptySubject`] when the first line is
    /// blank.
    pub fn parse(text: &str) -> Result<Self, CommitMessageError> {
        let (first_line, rest) = text.split_once('\n').unwrap_or((text, ""));
        let subject = first_line.strip_suffix('\r').unwrap_or(first_line);
        if subject.trim().is_empty() {
            return Err(CommitMessageError::EmptySubject);
        }
        Ok(Self::new(subject, rest.trim()))
    }

    /// Reads and parses a commit message file.
    ///
    /// # Errors
    ///
    /// Returns [`CommitMessageError::Read`] when the file cannot be read, or
    /// any error from [`CommitMessage::parse`].
    pub fn load(path: &Utf8Path) -> Result<Self, CommitMessageError> {
        let text = fs::read_to_string(path).map_err(|error| CommitMessageError::Read {
            path: path.to_string(),
            message: error.to_string(),
        })?;
        Self::parse(&text)
    }

    /// First line of the message.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Remaining lines, trimmed.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }
}
