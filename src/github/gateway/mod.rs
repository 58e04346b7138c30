//! Gateways for talking to GitHub through Octocrab.
//!
//! Each pipeline stage depends only on the narrow trait it needs, so tests can
//! mock a single capability. [`OctocrabHostingGateway`] implements all of them
//! against a real GitHub or GitHub Enterprise installation.

mod client;
mod error_mapping;
mod octocrab_gateway;
mod raw_content;

pub use octocrab_gateway::OctocrabHostingGateway;

use async_trait::async_trait;

use crate::github::error::HostingError;
use crate::github::locator::{RepositoryOwner, RepositorySlug};
use crate::github::models::{
    CandidateRepository, ContentHitPage, DeleteOutcome, PullRequestRecord, RawContent, SearchPage,
};
use crate::github::search::SearchQuery;

/// Gateway for repository search.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RepositorySearchGateway: Send + Sync {
    /// Fetch one page (1-based) of repositories matching the query filters.
    async fn search_repositories(
        &self,
        query: &SearchQuery,
        page: u32,
    ) -> Result<SearchPage, HostingError>;
}

/// Gateway for code search and raw file retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentGateway: Send + Sync {
    /// Fetch one page (1-based) of code-search hits for `query` inside one
    /// repository.
    async fn search_content(
        &self,
        repository: &RepositorySlug,
        query: &str,
        page: u32,
    ) -> Result<ContentHitPage, HostingError>;

    /// Fetch a raw file. Non-2xx statuses are returned, not raised.
    async fn fetch_raw(&self, url: &str) -> Result<RawContent, HostingError>;
}

/// Gateway for listing pull requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PullRequestGateway: Send + Sync {
    /// List open pull requests (first page only).
    async fn list_open_pull_requests(
        &self,
        repository: &RepositorySlug,
    ) -> Result<Vec<PullRequestRecord>, HostingError>;
}

/// Gateway for the fork lifecycle.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ForkGateway: Send + Sync {
    /// Fork `repository` under `owner` and return the fork.
    ///
    /// Implementations may only be able to target the token's own account,
    /// so callers check the returned fork's owner.
    async fn fork_repository(
        &self,
        repository: &RepositorySlug,
        owner: &RepositoryOwner,
    ) -> Result<CandidateRepository, HostingError>;

    /// Delete a repository, reporting whether it existed.
    async fn delete_repository(
        &self,
        repository: &RepositorySlug,
    ) -> Result<DeleteOutcome, HostingError>;
}

/// Every capability the discovery pipeline needs from the hosting service.
pub trait HostingGateway:
    RepositorySearchGateway + ContentGateway + PullRequestGateway + ForkGateway
{
}

impl<T> HostingGateway for T where
    T: RepositorySearchGateway + ContentGateway + PullRequestGateway + ForkGateway
{
}
