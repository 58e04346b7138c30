//! Confirms that a candidate's default branch still contains the query.

use crate::github::raw_url::default_branch_raw_url;
use crate::github::search::MAX_SEARCH_PAGES;
use crate::github::{
    CandidateRepository, ContentGateway, ContentHit, HostingConventions, HostingError,
};

/// Checks code-search hits against the live default branch.
///
/// The search index can lag behind the branch head, so each hit is re-read
/// through the raw-content route before the candidate counts as a match.
pub struct ContentVerifier<'gateway, Gateway>
where
    Gateway: ContentGateway + ?Sized,
{
    gateway: &'gateway Gateway,
    conventions: HostingConventions,
}

impl<'gateway, Gateway> ContentVerifier<'gateway, Gateway>
where
    Gateway: ContentGateway + ?Sized,
{
    /// Creates a verifier that rewrites hit URLs with `conventions`.
    #[must_use]
    pub const fn new(gateway: &'gateway Gateway, conventions: HostingConventions) -> Self {
        Self {
            gateway,
            conventions,
        }
    }

    /// Returns `true` as soon as one hit's default-branch file contains
    /// `query` literally.
    ///
    /// Hit pages are requested one at a time, up to the search API's page
    /// limit, and only while nothing has verified. Unrewritable URLs, failed
    /// fetches and non-success statuses only disqualify the hit they belong
    /// to.
    ///
    /// # Errors
    ///
    /// Propagates a failure of any content search page request.
    pub async fn verify(
        &self,
        query: &str,
        candidate: &CandidateRepository,
    ) -> Result<bool, HostingError> {
        for page in 1..=MAX_SEARCH_PAGES {
            let result = self
                .gateway
                .search_content(&candidate.slug, query, page)
                .await?;
            if page == 1 && result.hits.is_empty() {
                tracing::debug!("{}: content search returned no hits", candidate.slug);
            }

            for hit in &result.hits {
                if self.hit_still_matches(query, candidate, hit).await {
                    return Ok(true);
                }
            }

            if !result.has_next || result.hits.is_empty() {
                return Ok(false);
            }
        }

        tracing::debug!(
            "{}: no hit verified within {MAX_SEARCH_PAGES} content search pages",
            candidate.slug
        );
        Ok(false)
    }

    async fn hit_still_matches(
        &self,
        query: &str,
        candidate: &CandidateRepository,
        hit: &ContentHit,
    ) -> bool {
        let raw_url = match default_branch_raw_url(&hit.html_url, &self.conventions) {
            Ok(url) => url,
            Err(error) => {
                tracing::warn!("{}: skipping hit: {error}", candidate.slug);
                return false;
            }
        };

        match self.gateway.fetch_raw(&raw_url).await {
            Ok(content) if content.is_success() => {
                if content.body.contains(query) {
                    return true;
                }
                tracing::debug!("{}: {raw_url} no longer contains the query", candidate.slug);
            }
            Ok(content) => {
                tracing::warn!(
                    "{}: fetching {raw_url} returned status {}",
                    candidate.slug,
                    content.status
                );
            }
            Err(error) => {
                tracing::warn!("{}: fetching {raw_url} failed: {error}", candidate.slug);
            }
        }
        false
    }
}
