//! GitHub hosting client.
//!
//! This module wraps Octocrab to search repositories and code, read raw file
//! content, list pull requests, and manage forks. Errors are mapped into
//! [`HostingError`] variants so that callers can report precise failures
//! without exposing Octocrab internals.

pub mod error;
pub mod gateway;
pub mod locator;
pub mod models;
pub mod raw_url;
pub mod search;

pub use error::HostingError;
pub use gateway::{
    ContentGateway, ForkGateway, HostingGateway, OctocrabHostingGateway, PullRequestGateway,
    RepositorySearchGateway,
};
pub use locator::{
    HostingEndpoints, PersonalAccessToken, RepositoryName, RepositoryOwner, RepositorySlug,
};
pub use models::{
    CandidateRepository, CloneProtocol, ContentHit, ContentHitPage, DeleteOutcome,
    PullRequestRecord, RawContent, SearchPage,
};
pub use raw_url::HostingConventions;
pub use search::{RepositorySearch, SearchOrder, SearchQuery};

#[cfg(test)]
pub use gateway::{
    MockContentGateway, MockForkGateway, MockPullRequestGateway, MockRepositorySearchGateway,
};
