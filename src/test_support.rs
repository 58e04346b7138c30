//! Scripted collaborators for exercising the pipeline without network access.
//!
//! Compiled for unit tests and for integration tests through the
//! `test-support` feature.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};

use crate::git::{CloneError, RepoCloner};
use crate::github::{
    CandidateRepository, ContentGateway, ContentHit, ContentHitPage, DeleteOutcome, ForkGateway,
    HostingError, PullRequestGateway, PullRequestRecord, RawContent, RepositoryOwner,
    RepositorySearchGateway, RepositorySlug, SearchPage, SearchQuery,
};

/// Host used in every URL the scripted hosting service produces.
pub const SCRIPTED_HOST: &str = "https://github.test";

/// Builds a candidate with SSH and HTTPS URIs on [`SCRIPTED_HOST`].
///
/// # Panics
///
/// Panics when `full_name` is not `owner/name`.
#[must_use]
#[expect(clippy::expect_used, reason = "test helper with literal input")]
pub fn candidate(full_name: &str) -> CandidateRepository {
    CandidateRepository {
        slug: RepositorySlug::parse(full_name).expect("full name should be owner/name"),
        default_branch: "master".to_owned(),
        clone_url: format!("{SCRIPTED_HOST}/{full_name}.git"),
        ssh_url: format!("git@github.test:{full_name}.git"),
    }
}

/// In-memory hosting service driven by per-repository scripts.
///
/// Repositories without a script have no open pull requests, no content
/// hits, and fork successfully.
#[derive(Debug, Default)]
pub struct ScriptedHosting {
    search_pages: Vec<SearchPage>,
    search_failure: Option<HostingError>,
    pull_requests: HashMap<String, Vec<PullRequestRecord>>,
    content_hits: HashMap<String, Vec<ContentHit>>,
    raw_files: HashMap<String, String>,
    fork_failures: HashMap<String, HostingError>,
    existing_forks: Vec<String>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedHosting {
    /// Creates an empty hosting service.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a search result page of repositories in ranking order.
    #[must_use]
    pub fn with_search_page(mut self, full_names: &[&str]) -> Self {
        self.search_pages.push(SearchPage {
            items: full_names.iter().map(|name| candidate(name)).collect(),
            has_next: false,
        });
        let count = self.search_pages.len();
        for (index, page) in self.search_pages.iter_mut().enumerate() {
            page.has_next = index + 1 < count;
        }
        self
    }

    /// Makes every repository search request fail.
    #[must_use]
    pub fn with_search_failure(mut self, error: HostingError) -> Self {
        self.search_failure = Some(error);
        self
    }

    /// Adds an open pull request to `full_name`.
    #[must_use]
    pub fn with_open_pull_request(mut self, full_name: &str, record: PullRequestRecord) -> Self {
        self.pull_requests
            .entry(full_name.to_owned())
            .or_default()
            .push(record);
        self
    }

    /// Indexes `path` in `full_name` and serves `body` for it from the
    /// default branch.
    #[must_use]
    pub fn with_file(mut self, full_name: &str, path: &str, body: &str) -> Self {
        self.content_hits
            .entry(full_name.to_owned())
            .or_default()
            .push(ContentHit {
                html_url: format!("{SCRIPTED_HOST}/{full_name}/blob/0a1b2c3d/{path}"),
            });
        self.raw_files.insert(
            format!("{SCRIPTED_HOST}/raw/{full_name}/master/{path}"),
            body.to_owned(),
        );
        self
    }

    /// Makes forking `full_name` fail with `error`.
    #[must_use]
    pub fn with_fork_failure(mut self, full_name: &str, error: HostingError) -> Self {
        self.fork_failures.insert(full_name.to_owned(), error);
        self
    }

    /// Records that a fork named `full_name` already exists.
    #[must_use]
    pub fn with_existing_fork(mut self, full_name: &str) -> Self {
        self.existing_forks.push(full_name.to_owned());
        self
    }

    /// Every call made so far, as `operation target` strings.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    /// Whether any call referenced `full_name`.
    #[must_use]
    pub fn touched(&self, full_name: &str) -> bool {
        self.calls()
            .iter()
            .any(|call| call.split(' ').any(|part| part == full_name))
    }

    fn log(&self, call: String) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

#[async_trait]
impl RepositorySearchGateway for ScriptedHosting {
    async fn search_repositories(
        &self,
        _query: &SearchQuery,
        page: u32,
    ) -> Result<SearchPage, HostingError> {
        self.log(format!("search_repositories {page}"));
        if let Some(error) = &self.search_failure {
            return Err(error.clone());
        }
        let index = usize::try_from(page.saturating_sub(1)).unwrap_or(usize::MAX);
        Ok(self.search_pages.get(index).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl ContentGateway for ScriptedHosting {
    async fn search_content(
        &self,
        repository: &RepositorySlug,
        _query: &str,
        page: u32,
    ) -> Result<ContentHitPage, HostingError> {
        self.log(format!("search_content {repository} page {page}"));
        let hits = if page == 1 {
            self.content_hits
                .get(&repository.to_string())
                .cloned()
                .unwrap_or_default()
        } else {
            Vec::new()
        };
        Ok(ContentHitPage {
            hits,
            has_next: false,
        })
    }

    async fn fetch_raw(&self, url: &str) -> Result<RawContent, HostingError> {
        self.log(format!("fetch_raw {url}"));
        Ok(self.raw_files.get(url).map_or_else(
            || RawContent {
                status: 404,
                body: "Not Found".to_owned(),
            },
            |body| RawContent {
                status: 200,
                body: body.clone(),
            },
        ))
    }
}

#[async_trait]
impl PullRequestGateway for ScriptedHosting {
    async fn list_open_pull_requests(
        &self,
        repository: &RepositorySlug,
    ) -> Result<Vec<PullRequestRecord>, HostingError> {
        self.log(format!("list_open_pull_requests {repository}"));
        Ok(self
            .pull_requests
            .get(&repository.to_string())
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl ForkGateway for ScriptedHosting {
    async fn fork_repository(
        &self,
        repository: &RepositorySlug,
        owner: &RepositoryOwner,
    ) -> Result<CandidateRepository, HostingError> {
        self.log(format!("fork_repository {repository}"));
        if let Some(error) = self.fork_failures.get(&repository.to_string()) {
            return Err(error.clone());
        }
        Ok(candidate(&repository.fork_under(owner).to_string()))
    }

    async fn delete_repository(
        &self,
        repository: &RepositorySlug,
    ) -> Result<DeleteOutcome, HostingError> {
        self.log(format!("delete_repository {repository}"));
        let name = repository.to_string();
        if self.existing_forks.contains(&name) {
            Ok(DeleteOutcome::Deleted)
        } else {
            Ok(DeleteOutcome::NotFound)
        }
    }
}

/// [`RepoCloner`] that records requests instead of cloning.
#[derive(Debug, Default)]
pub struct RecordingCloner {
    failing_uris: Vec<String>,
    clones: Mutex<Vec<(String, Utf8PathBuf)>>,
}

impl RecordingCloner {
    /// Creates a cloner where every clone succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes cloning `uri` fail.
    #[must_use]
    pub fn failing_for(mut self, uri: &str) -> Self {
        self.failing_uris.push(uri.to_owned());
        self
    }

    /// Clone requests received so far, in order.
    #[must_use]
    pub fn clones(&self) -> Vec<(String, Utf8PathBuf)> {
        self.clones
            .lock()
            .map(|clones| clones.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl RepoCloner for RecordingCloner {
    async fn clone_repository(
        &self,
        uri: &str,
        destination: &Utf8Path,
    ) -> Result<(), CloneError> {
        if let Ok(mut clones) = self.clones.lock() {
            clones.push((uri.to_owned(), destination.to_owned()));
        }
        if self.failing_uris.iter().any(|failing| failing == uri) {
            return Err(CloneError::Git {
                uri: uri.to_owned(),
                message: "scripted clone failure".to_owned(),
            });
        }
        Ok(())
    }
}
