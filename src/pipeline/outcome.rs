//! Per-candidate outcomes and the run report.

use std::fmt;

use camino::Utf8PathBuf;
use thiserror::Error;

use crate::git::CloneError;
use crate::github::{CandidateRepository, HostingError, RepositoryOwner, RepositorySlug};

/// Why a candidate failed, tagged with the stage that failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CandidateFailure {
    /// Listing open pull requests failed.
    #[error("duplicate check failed: {0}")]
    DuplicateCheck(HostingError),

    /// The content search call failed.
    #[error("content verification failed: {0}")]
    ContentVerification(HostingError),

    /// The fork request failed.
    #[error("fork failed: {0}")]
    Fork(HostingError),

    /// The fork was created under another account than the fork owner.
    #[error("fork landed at {fork}, expected it under {expected_owner}")]
    ForkOwnerMismatch {
        /// The fork the hosting service reported.
        fork: RepositorySlug,
        /// The configured fork owner.
        expected_owner: RepositoryOwner,
    },

    /// Cloning the fork failed.
    #[error("clone failed: {0}")]
    Clone(CloneError),
}

/// What happened to one attempted candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForkOutcome {
    /// An open pull request with the same author, title, and body exists.
    SkippedDuplicate {
        /// Number of the matching pull request.
        pull_request: u64,
    },
    /// No default-branch file contained the query.
    SkippedNoContentMatch,
    /// The candidate was forked and the fork cloned.
    ForkedAndCloned {
        /// The fork that was created.
        fork: RepositorySlug,
        /// Directory the fork was cloned into.
        destination: Utf8PathBuf,
    },
    /// A stage failed; the run moved on to the next candidate.
    Failed(CandidateFailure),
}

impl fmt::Display for ForkOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SkippedDuplicate { pull_request } => {
                write!(f, "skipped, duplicate of pull request #{pull_request}")
            }
            Self::SkippedNoContentMatch => f.write_str("skipped, content not found on default branch"),
            Self::ForkedAndCloned { fork, destination } => {
                write!(f, "forked to {fork}, cloned into {destination}")
            }
            Self::Failed(failure) => write!(f, "failed, {failure}"),
        }
    }
}

/// Ordered outcomes of one discovery run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    outcomes: Vec<(CandidateRepository, ForkOutcome)>,
}

impl RunReport {
    /// Appends the outcome of the next attempted candidate.
    pub fn record(&mut self, candidate: CandidateRepository, outcome: ForkOutcome) {
        self.outcomes.push((candidate, outcome));
    }

    /// Candidates and outcomes in search order.
    #[must_use]
    pub fn outcomes(&self) -> &[(CandidateRepository, ForkOutcome)] {
        &self.outcomes
    }

    /// Number of candidates attempted, skips included.
    #[must_use]
    pub const fn attempted(&self) -> usize {
        self.outcomes.len()
    }

    /// Number of candidates forked and cloned.
    #[must_use]
    pub fn forked(&self) -> usize {
        self.count(|outcome| matches!(outcome, ForkOutcome::ForkedAndCloned { .. }))
    }

    /// Number of candidates skipped as duplicates.
    #[must_use]
    pub fn skipped_duplicate(&self) -> usize {
        self.count(|outcome| matches!(outcome, ForkOutcome::SkippedDuplicate { .. }))
    }

    /// Number of candidates skipped because the content was not found.
    #[must_use]
    pub fn skipped_no_content_match(&self) -> usize {
        self.count(|outcome| matches!(outcome, ForkOutcome::SkippedNoContentMatch))
    }

    /// Number of failed candidates.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|outcome| matches!(outcome, ForkOutcome::Failed(_)))
    }

    fn count(&self, predicate: impl Fn(&ForkOutcome) -> bool) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| predicate(outcome))
            .count()
    }
}
