//! Fork lifecycle for one candidate: delete stale fork, fork, wait, clone.

use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};

use super::outcome::CandidateFailure;
use crate::git::RepoCloner;
use crate::github::{
    CandidateRepository, CloneProtocol, DeleteOutcome, ForkGateway, RepositoryOwner,
};

/// Propagation wait applied when none is configured.
pub const DEFAULT_PROPAGATION_DELAY: Duration = Duration::from_secs(10);

/// Settings shared by every fork in a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForkOptions {
    /// Account or organization that receives the forks.
    pub fork_owner: RepositoryOwner,
    /// Delete an existing fork of the same name before forking.
    pub delete_stale_fork: bool,
    /// Fixed wait between the fork request and the clone.
    pub propagation_delay: Duration,
    /// Directory each fork is cloned under.
    pub clone_root: Utf8PathBuf,
    /// Transport used for cloning.
    pub protocol: CloneProtocol,
}

impl ForkOptions {
    /// Options with the default delay, clone root `repos`, and SSH transport.
    #[must_use]
    pub fn new(fork_owner: RepositoryOwner) -> Self {
        Self {
            fork_owner,
            delete_stale_fork: false,
            propagation_delay: DEFAULT_PROPAGATION_DELAY,
            clone_root: Utf8PathBuf::from("repos"),
            protocol: CloneProtocol::default(),
        }
    }
}

/// A fork that was created and cloned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForkedClone {
    /// The fork as returned by the hosting service.
    pub fork: CandidateRepository,
    /// Directory the fork was cloned into.
    pub destination: Utf8PathBuf,
}

/// Drives one candidate through the fork lifecycle.
pub struct ForkOrchestrator<'run, Gateway, Cloner>
where
    Gateway: ForkGateway + ?Sized,
    Cloner: RepoCloner + ?Sized,
{
    gateway: &'run Gateway,
    cloner: &'run Cloner,
    options: &'run ForkOptions,
}

impl<'run, Gateway, Cloner> ForkOrchestrator<'run, Gateway, Cloner>
where
    Gateway: ForkGateway + ?Sized,
    Cloner: RepoCloner + ?Sized,
{
    /// Creates an orchestrator over the given collaborators.
    #[must_use]
    pub const fn new(
        gateway: &'run Gateway,
        cloner: &'run Cloner,
        options: &'run ForkOptions,
    ) -> Self {
        Self {
            gateway,
            cloner,
            options,
        }
    }

    /// Forks `candidate` under the fork owner and clones the fork.
    ///
    /// A failed stale-fork deletion is logged and does not stop the fork.
    ///
    /// # Errors
    ///
    /// Returns [`CandidateFailure::Fork`] when the fork request fails,
    /// [`CandidateFailure::ForkOwnerMismatch`] when the fork is not owned by
    /// the fork owner (no clone is attempted in either case), and
    /// [`CandidateFailure::Clone`] when cloning fails.
    pub async fn fork_and_clone(
        &self,
        candidate: &CandidateRepository,
    ) -> Result<ForkedClone, CandidateFailure> {
        if self.options.delete_stale_fork {
            self.delete_stale_fork(candidate).await;
        }

        tracing::debug!("{}: forking under {}", candidate.slug, self.options.fork_owner);
        let fork = self
            .gateway
            .fork_repository(&candidate.slug, &self.options.fork_owner)
            .await
            .map_err(CandidateFailure::Fork)?;

        // Logins are case-insensitive on GitHub.
        if !fork
            .slug
            .owner()
            .as_str()
            .eq_ignore_ascii_case(self.options.fork_owner.as_str())
        {
            return Err(CandidateFailure::ForkOwnerMismatch {
                fork: fork.slug,
                expected_owner: self.options.fork_owner.clone(),
            });
        }

        if !self.options.propagation_delay.is_zero() {
            tracing::debug!(
                "{}: waiting {:?} for the fork to propagate",
                fork.slug,
                self.options.propagation_delay
            );
            tokio::time::sleep(self.options.propagation_delay).await;
        }

        let destination = clone_destination(&self.options.clone_root, &fork);
        self.cloner
            .clone_repository(fork.transport_uri(self.options.protocol), &destination)
            .await
            .map_err(CandidateFailure::Clone)?;

        Ok(ForkedClone { fork, destination })
    }

    async fn delete_stale_fork(&self, candidate: &CandidateRepository) {
        let stale = candidate.slug.fork_under(&self.options.fork_owner);
        match self.gateway.delete_repository(&stale).await {
            Ok(DeleteOutcome::Deleted) => tracing::info!("deleted stale fork {stale}"),
            Ok(DeleteOutcome::NotFound) => tracing::debug!("no stale fork {stale} to delete"),
            Err(error) => tracing::warn!("deleting stale fork {stale} failed: {error}"),
        }
    }
}

fn clone_destination(clone_root: &Utf8Path, fork: &CandidateRepository) -> Utf8PathBuf {
    clone_root.join(fork.slug.name().as_str())
}
