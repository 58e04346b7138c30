//! Repository search query and the lazily paged result cursor.

use std::collections::VecDeque;

use chrono::NaiveDate;

use super::error::HostingError;
use super::gateway::RepositorySearchGateway;
use super::models::CandidateRepository;

/// Results requested per search page (the API maximum).
pub const SEARCH_PAGE_SIZE: u8 = 100;

/// The search API only exposes the first 1000 results.
pub const MAX_SEARCH_PAGES: u32 = 10;

/// Date format accepted for the pushed-since boundary.
pub const PUSHED_DATE_FORMAT: &str = "%Y-%m-%d";

/// Sort order of repository search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchOrder {
    /// Most recently updated first.
    #[default]
    RecentlyUpdated,
}

impl SearchOrder {
    /// The `sort` and `order` query parameters for this ordering.
    #[must_use]
    pub const fn as_params(self) -> (&'static str, &'static str) {
        match self {
            Self::RecentlyUpdated => ("updated", "desc"),
        }
    }
}

/// Content string plus the repository filters for one discovery run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    content: String,
    pushed_since: NaiveDate,
    language: Option<String>,
    order: SearchOrder,
}

impl SearchQuery {
    /// Builds a query, validating it against `today`.
    ///
    /// # Errors
    ///
    /// Returns `HostingError::InvalidQuery` when the content string is blank
    /// or `pushed_since` lies after `today`.
    pub fn new(
        content: &str,
        pushed_since: NaiveDate,
        today: NaiveDate,
    ) -> Result<Self, HostingError> {
        if content.trim().is_empty() {
            return Err(HostingError::InvalidQuery {
                message: "query string must not be empty".to_owned(),
            });
        }
        if pushed_since > today {
            return Err(HostingError::InvalidQuery {
                message: format!("pushed-since date {pushed_since} is after today ({today})"),
            });
        }
        Ok(Self {
            content: content.to_owned(),
            pushed_since,
            language: None,
            order: SearchOrder::default(),
        })
    }

    /// Restricts repository search to one language.
    #[must_use]
    pub fn with_language(mut self, language: Option<String>) -> Self {
        self.language = language.filter(|value| !value.trim().is_empty());
        self
    }

    /// The literal string searched for in file contents.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Inclusive lower bound on the last push date.
    #[must_use]
    pub const fn pushed_since(&self) -> NaiveDate {
        self.pushed_since
    }

    /// Result ordering.
    #[must_use]
    pub const fn order(&self) -> SearchOrder {
        self.order
    }

    /// The `q` parameter for repository search.
    #[must_use]
    pub fn repository_qualifiers(&self) -> String {
        let pushed = format!(
            "pushed:>={}",
            self.pushed_since.format(PUSHED_DATE_FORMAT)
        );
        match &self.language {
            Some(language) => format!("{pushed} language:{language}"),
            None => pushed,
        }
    }
}

/// Forward-only cursor over repository search results.
///
/// The first page is fetched by [`RepositorySearch::start`], so a failing
/// initial request surfaces to the caller. Later pages are fetched on demand;
/// a failure there ends the sequence.
pub struct RepositorySearch<'gateway, Gateway>
where
    Gateway: RepositorySearchGateway + ?Sized,
{
    gateway: &'gateway Gateway,
    query: SearchQuery,
    buffered: VecDeque<CandidateRepository>,
    next_page: u32,
    exhausted: bool,
}

impl<'gateway, Gateway> RepositorySearch<'gateway, Gateway>
where
    Gateway: RepositorySearchGateway + ?Sized,
{
    /// Runs the initial search request.
    ///
    /// # Errors
    ///
    /// Propagates the gateway error of the first page request.
    pub async fn start(
        gateway: &'gateway Gateway,
        query: &SearchQuery,
    ) -> Result<Self, HostingError> {
        let first = gateway.search_repositories(query, 1).await?;
        tracing::info!(
            "repository search returned {} results on the first page",
            first.items.len()
        );
        Ok(Self {
            gateway,
            query: query.clone(),
            exhausted: !first.has_next,
            buffered: first.items.into(),
            next_page: 2,
        })
    }

    /// Yields the next candidate, fetching another page when the buffer is
    /// empty.
    pub async fn next(&mut self) -> Option<CandidateRepository> {
        loop {
            if let Some(candidate) = self.buffered.pop_front() {
                return Some(candidate);
            }
            if self.exhausted || self.next_page > MAX_SEARCH_PAGES {
                return None;
            }

            let page = self.next_page;
            self.next_page += 1;
            match self.gateway.search_repositories(&self.query, page).await {
                Ok(result) => {
                    self.exhausted = !result.has_next || result.items.is_empty();
                    self.buffered.extend(result.items);
                }
                Err(error) => {
                    tracing::warn!("repository search page {page} failed, stopping: {error}");
                    self.exhausted = true;
                }
            }
        }
    }
}
