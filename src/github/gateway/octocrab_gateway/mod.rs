//! Octocrab implementation of every hosting gateway trait.

use async_trait::async_trait;
use http::{StatusCode, Uri};
use octocrab::{Octocrab, Page};
use serde_json::json;

use crate::github::error::HostingError;
use crate::github::locator::{
    HostingEndpoints, PersonalAccessToken, RepositoryOwner, RepositorySlug,
};
use crate::github::models::{
    ApiCodeHit, ApiPullRequest, ApiRepository, CandidateRepository, ContentHit, ContentHitPage,
    DeleteOutcome, PullRequestRecord, RawContent, SearchPage,
};
use crate::github::search::{SEARCH_PAGE_SIZE, SearchQuery};

use super::client::build_octocrab_client;
use super::error_mapping::{extract_github_message, map_http_error, map_octocrab_error};
use super::raw_content::RawContentClient;
use super::{ContentGateway, ForkGateway, PullRequestGateway, RepositorySearchGateway};

/// Octocrab-backed hosting gateway.
pub struct OctocrabHostingGateway {
    client: Octocrab,
    raw: RawContentClient,
    fork_into_organization: bool,
}

impl OctocrabHostingGateway {
    /// Builds the gateway for the given token and API endpoints.
    ///
    /// # Errors
    ///
    /// Returns `HostingError::InvalidUrl` when the base URI cannot be parsed,
    /// `HostingError::Api` when Octocrab fails to construct a client, or
    /// `HostingError::Network` when the raw-content HTTP client cannot be
    /// built.
    pub fn for_token(
        token: &PersonalAccessToken,
        endpoints: &HostingEndpoints,
    ) -> Result<Self, HostingError> {
        let client = build_octocrab_client(token, endpoints)?;
        let raw = RawContentClient::new(token.clone())?;
        Ok(Self {
            client,
            raw,
            fork_into_organization: false,
        })
    }

    /// Sends the fork owner as `organization` in fork requests.
    ///
    /// Without it GitHub forks into the account that owns the token.
    #[must_use]
    pub const fn with_organization_forks(mut self, enabled: bool) -> Self {
        self.fork_into_organization = enabled;
        self
    }
}

#[async_trait]
impl RepositorySearchGateway for OctocrabHostingGateway {
    async fn search_repositories(
        &self,
        query: &SearchQuery,
        page: u32,
    ) -> Result<SearchPage, HostingError> {
        let qualifiers = query.repository_qualifiers();
        let (sort, order) = query.order().as_params();
        let page_str = page.to_string();
        let per_page_str = SEARCH_PAGE_SIZE.to_string();
        let params = [
            ("q", qualifiers.as_str()),
            ("sort", sort),
            ("order", order),
            ("per_page", per_page_str.as_str()),
            ("page", page_str.as_str()),
        ];

        let result: Page<ApiRepository> = self
            .client
            .get("/search/repositories", Some(&params))
            .await
            .map_err(|error| map_octocrab_error("search repositories", &error))?;

        let has_next = result.next.is_some();
        let items = result
            .items
            .into_iter()
            .filter_map(|api| {
                let full_name = api.full_name.clone();
                CandidateRepository::try_from(api)
                    .inspect_err(|error| {
                        tracing::warn!("skipping search result {full_name}: {error}");
                    })
                    .ok()
            })
            .collect();

        Ok(SearchPage { items, has_next })
    }
}

#[async_trait]
impl ContentGateway for OctocrabHostingGateway {
    async fn search_content(
        &self,
        repository: &RepositorySlug,
        query: &str,
        page: u32,
    ) -> Result<ContentHitPage, HostingError> {
        let search = format!("{query} in:file repo:{repository}");
        let page_str = page.to_string();
        let per_page_str = SEARCH_PAGE_SIZE.to_string();
        let params = [
            ("q", search.as_str()),
            ("per_page", per_page_str.as_str()),
            ("page", page_str.as_str()),
        ];

        let result: Page<ApiCodeHit> = self
            .client
            .get("/search/code", Some(&params))
            .await
            .map_err(|error| map_octocrab_error("search code", &error))?;

        Ok(ContentHitPage {
            has_next: result.next.is_some(),
            hits: result.items.into_iter().map(ContentHit::from).collect(),
        })
    }

    async fn fetch_raw(&self, url: &str) -> Result<RawContent, HostingError> {
        self.raw.fetch(url).await
    }
}

#[async_trait]
impl PullRequestGateway for OctocrabHostingGateway {
    async fn list_open_pull_requests(
        &self,
        repository: &RepositorySlug,
    ) -> Result<Vec<PullRequestRecord>, HostingError> {
        let per_page_str = SEARCH_PAGE_SIZE.to_string();
        let params = [("state", "open"), ("per_page", per_page_str.as_str())];

        let result: Page<ApiPullRequest> = self
            .client
            .get(repository.pulls_path(), Some(&params))
            .await
            .map_err(|error| map_octocrab_error("list pulls", &error))?;

        Ok(result
            .items
            .into_iter()
            .map(PullRequestRecord::from)
            .collect())
    }
}

#[async_trait]
impl ForkGateway for OctocrabHostingGateway {
    async fn fork_repository(
        &self,
        repository: &RepositorySlug,
        owner: &RepositoryOwner,
    ) -> Result<CandidateRepository, HostingError> {
        let body = if self.fork_into_organization {
            json!({ "organization": owner.as_str() })
        } else {
            json!({})
        };

        let fork: ApiRepository = self
            .client
            .post(repository.forks_path(), Some(&body))
            .await
            .map_err(|error| map_octocrab_error("fork repository", &error))?;

        CandidateRepository::try_from(fork)
    }

    async fn delete_repository(
        &self,
        repository: &RepositorySlug,
    ) -> Result<DeleteOutcome, HostingError> {
        let uri: Uri = repository
            .repository_path()
            .parse::<Uri>()
            .map_err(|error| HostingError::InvalidUrl(error.to_string()))?;

        let response = self
            .client
            ._delete(uri, None::<&()>)
            .await
            .map_err(|error| map_octocrab_error("delete repository", &error))?;

        match response.status() {
            status if status.is_success() => Ok(DeleteOutcome::Deleted),
            StatusCode::NOT_FOUND => Ok(DeleteOutcome::NotFound),
            status => {
                let body = self
                    .client
                    .body_to_string(response)
                    .await
                    .unwrap_or_else(|_| String::new());
                Err(map_http_error(
                    "delete repository",
                    status,
                    extract_github_message(&body),
                ))
            }
        }
    }
}
