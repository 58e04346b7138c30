//! Detection of pull requests that already carry the same change.

use crate::commit_message::CommitMessage;
use crate::github::{CandidateRepository, HostingError, PullRequestGateway, PullRequestRecord};

/// Looks for an open pull request equivalent to the one a run would open.
pub struct DuplicateGuard<'gateway, Gateway>
where
    Gateway: PullRequestGateway + ?Sized,
{
    gateway: &'gateway Gateway,
}

impl<'gateway, Gateway> DuplicateGuard<'gateway, Gateway>
where
    Gateway: PullRequestGateway + ?Sized,
{
    /// Creates a guard over `gateway`.
    #[must_use]
    pub const fn new(gateway: &'gateway Gateway) -> Self {
        Self { gateway }
    }

    /// Returns the first open pull request, in listing order, authored by
    /// `user` whose title and body equal the commit message subject and body.
    ///
    /// Only the first listing page is inspected.
    ///
    /// # Errors
    ///
    /// Propagates a failure to list pull requests.
    pub async fn find_matching_pr(
        &self,
        user: &str,
        candidate: &CandidateRepository,
        message: &CommitMessage,
    ) -> Result<Option<PullRequestRecord>, HostingError> {
        let pulls = self
            .gateway
            .list_open_pull_requests(&candidate.slug)
            .await?;
        Ok(pulls
            .into_iter()
            .find(|record| is_same(record, user, message)))
    }
}

/// Exact, case-sensitive comparison of author, title, and body. A missing
/// title or body compares as empty text.
#[must_use]
pub fn is_same(record: &PullRequestRecord, user: &str, message: &CommitMessage) -> bool {
    record.author.as_deref() == Some(user)
        && record.title.as_deref().unwrap_or_default() == message.subject()
        && record.body.as_deref().unwrap_or_default() == message.body()
}
