//! Candidate discovery and fork orchestration.
//!
//! [`PipelineDriver`] walks repository search results in ranking order and
//! runs each candidate through three gates:
//!
//! 1. [`DuplicateGuard`] skips repositories that already have an equivalent
//!    open pull request from the fork owner.
//! 2. [`ContentVerifier`] skips repositories whose default branch no longer
//!    contains the query.
//! 3. [`ForkOrchestrator`] forks the survivor and clones the fork.
//!
//! A failing stage only fails its own candidate. The run stops once the
//! candidate cap is reached or the search is exhausted.

pub mod content_verifier;
pub mod duplicate_guard;
pub mod fork_orchestrator;
pub mod outcome;

pub use content_verifier::ContentVerifier;
pub use duplicate_guard::DuplicateGuard;
pub use fork_orchestrator::{DEFAULT_PROPAGATION_DELAY, ForkOptions, ForkOrchestrator, ForkedClone};
pub use outcome::{CandidateFailure, ForkOutcome, RunReport};

use crate::commit_message::CommitMessage;
use crate::error::RunError;
use crate::git::{RepoCloner, reset_clone_dir};
use crate::github::{
    CandidateRepository, HostingConventions, HostingGateway, RepositorySearch, SearchQuery,
};

/// Candidate cap applied when none is configured.
pub const DEFAULT_MAX_CANDIDATES: usize = 100;

/// Settings for one discovery run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSettings {
    /// Fork lifecycle settings, including the fork owner.
    pub fork: ForkOptions,
    /// Maximum number of candidates attempted, skips included.
    pub max_candidates: usize,
    /// Tokens used to derive default-branch raw URLs.
    pub conventions: HostingConventions,
}

impl PipelineSettings {
    /// Settings with the default cap and hosting conventions.
    #[must_use]
    pub fn new(fork: ForkOptions) -> Self {
        Self {
            fork,
            max_candidates: DEFAULT_MAX_CANDIDATES,
            conventions: HostingConventions::default(),
        }
    }
}

/// Runs discovery to completion or to the candidate cap.
pub struct PipelineDriver<'run, Gateway, Cloner>
where
    Gateway: HostingGateway + ?Sized,
    Cloner: RepoCloner + ?Sized,
{
    gateway: &'run Gateway,
    cloner: &'run Cloner,
    settings: PipelineSettings,
}

impl<'run, Gateway, Cloner> PipelineDriver<'run, Gateway, Cloner>
where
    Gateway: HostingGateway + ?Sized,
    Cloner: RepoCloner + ?Sized,
{
    /// Creates a driver over the given collaborators.
    #[must_use]
    pub const fn new(
        gateway: &'run Gateway,
        cloner: &'run Cloner,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            gateway,
            cloner,
            settings,
        }
    }

    /// Clears the clone root, then attempts up to `max_candidates` search
    /// results in order.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::CloneDirectory`] when the clone root cannot be
    /// reset and [`RunError::Hosting`] when the first search request fails.
    /// Per-candidate failures are recorded in the report instead.
    pub async fn run(
        &self,
        query: &SearchQuery,
        message: &CommitMessage,
    ) -> Result<RunReport, RunError> {
        reset_clone_dir(&self.settings.fork.clone_root).await?;
        let mut search = RepositorySearch::start(self.gateway, query).await?;

        let mut report = RunReport::default();
        while report.attempted() < self.settings.max_candidates {
            let Some(candidate) = search.next().await else {
                break;
            };
            let outcome = self.process(&candidate, query, message).await;
            match &outcome {
                ForkOutcome::Failed(failure) => {
                    tracing::warn!("{}: {failure}", candidate.slug);
                }
                other => tracing::info!("{}: {other}", candidate.slug),
            }
            report.record(candidate, outcome);
        }

        tracing::info!(
            "attempted {} candidates: {} forked, {} duplicates, {} without content match, {} failed",
            report.attempted(),
            report.forked(),
            report.skipped_duplicate(),
            report.skipped_no_content_match(),
            report.failed()
        );
        Ok(report)
    }

    async fn process(
        &self,
        candidate: &CandidateRepository,
        query: &SearchQuery,
        message: &CommitMessage,
    ) -> ForkOutcome {
        let guard = DuplicateGuard::new(self.gateway);
        let fork_owner = self.settings.fork.fork_owner.as_str();
        match guard.find_matching_pr(fork_owner, candidate, message).await {
            Ok(Some(duplicate)) => {
                return ForkOutcome::SkippedDuplicate {
                    pull_request: duplicate.number,
                };
            }
            Ok(None) => {}
            Err(error) => return ForkOutcome::Failed(CandidateFailure::DuplicateCheck(error)),
        }

        let verifier = ContentVerifier::new(self.gateway, self.settings.conventions.clone());
        match verifier.verify(query.content(), candidate).await {
            Ok(true) => {}
            Ok(false) => return ForkOutcome::SkippedNoContentMatch,
            Err(error) => {
                return ForkOutcome::Failed(CandidateFailure::ContentVerification(error));
            }
        }

        let orchestrator = ForkOrchestrator::new(self.gateway, self.cloner, &self.settings.fork);
        match orchestrator.fork_and_clone(candidate).await {
            Ok(ForkedClone { fork, destination }) => ForkOutcome::ForkedAndCloned {
                fork: fork.slug,
                destination,
            },
            Err(failure) => ForkOutcome::Failed(failure),
        }
    }
}

#[cfg(test)]
mod tests;
