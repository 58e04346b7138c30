//! Domain models for repositories, content hits, and pull requests.
//!
//! Types prefixed with `Api` are internal deserialisation targets that convert
//! into public domain types.

use serde::Deserialize;

use super::error::HostingError;
use super::locator::RepositorySlug;

/// Transport used when cloning a fork.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CloneProtocol {
    /// `git@host:owner/name.git`.
    #[default]
    Ssh,
    /// `https://host/owner/name.git`.
    Https,
}

/// A repository surfaced by search, or a fork returned by the fork API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateRepository {
    /// `owner/name` identifier.
    pub slug: RepositorySlug,
    /// Name of the default branch, e.g. `master`.
    pub default_branch: String,
    /// HTTPS clone URI.
    pub clone_url: String,
    /// SSH clone URI.
    pub ssh_url: String,
}

impl CandidateRepository {
    /// The clone URI for the requested transport.
    #[must_use]
    pub fn transport_uri(&self, protocol: CloneProtocol) -> &str {
        match protocol {
            CloneProtocol::Ssh => &self.ssh_url,
            CloneProtocol::Https => &self.clone_url,
        }
    }
}

/// A code-search hit inside one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentHit {
    /// Browsable URL of the matching file, pinned to the indexed commit.
    pub html_url: String,
}

/// Status and body of a raw content fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawContent {
    /// HTTP status code.
    pub status: u16,
    /// Response body decoded as text.
    pub body: String,
}

impl RawContent {
    /// Whether the fetch returned a 2xx status.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// An open pull request as observed from the hosting API.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullRequestRecord {
    /// Pull request number.
    pub number: u64,
    /// Author login if present.
    pub author: Option<String>,
    /// Title of the pull request.
    pub title: Option<String>,
    /// Body of the pull request.
    pub body: Option<String>,
    /// HTML URL for displaying to a user.
    pub html_url: Option<String>,
}

/// Result of deleting a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The repository existed and was deleted.
    Deleted,
    /// No repository existed under that identifier.
    NotFound,
}

/// One page of repository search results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPage {
    /// Repositories on this page, in ranking order.
    pub items: Vec<CandidateRepository>,
    /// Whether the API advertised a further page.
    pub has_next: bool,
}

/// One page of code-search hits inside a repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentHitPage {
    /// Hits on this page, in ranking order.
    pub hits: Vec<ContentHit>,
    /// Whether the API advertised a further page.
    pub has_next: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiRepository {
    pub(crate) full_name: String,
    pub(crate) default_branch: Option<String>,
    pub(crate) clone_url: Option<String>,
    pub(crate) ssh_url: Option<String>,
}

impl TryFrom<ApiRepository> for CandidateRepository {
    type Error = HostingError;

    fn try_from(value: ApiRepository) -> Result<Self, Self::Error> {
        Ok(Self {
            slug: RepositorySlug::parse(&value.full_name)?,
            default_branch: value.default_branch.unwrap_or_else(|| "master".to_owned()),
            clone_url: value.clone_url.unwrap_or_default(),
            ssh_url: value.ssh_url.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiCodeHit {
    pub(crate) html_url: String,
}

impl From<ApiCodeHit> for ContentHit {
    fn from(value: ApiCodeHit) -> Self {
        Self {
            html_url: value.html_url,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiUser {
    pub(crate) login: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiPullRequest {
    pub(crate) number: u64,
    pub(crate) title: Option<String>,
    pub(crate) body: Option<String>,
    pub(crate) html_url: Option<String>,
    pub(crate) user: Option<ApiUser>,
}

impl From<ApiPullRequest> for PullRequestRecord {
    fn from(value: ApiPullRequest) -> Self {
        Self {
            number: value.number,
            author: value.user.and_then(|user| user.login),
            title: value.title,
            body: value.body,
            html_url: value.html_url,
        }
    }
}
