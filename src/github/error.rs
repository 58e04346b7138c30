//! Error types exposed by the GitHub hosting layer.

use thiserror::Error;

/// Errors surfaced while parsing hosting identifiers or talking to GitHub.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HostingError {
    /// The provided URL could not be parsed.
    #[error("URL is invalid: {0}")]
    InvalidUrl(String),

    /// A content-search hit carried a browsable URL that does not follow the
    /// `/<owner>/<repo>/blob/<ref>/<path>` shape.
    #[error("content URL does not match /owner/repo/blob/<ref>/<path>: {url}")]
    MalformedContentUrl {
        /// The browsable URL returned by the search API.
        url: String,
    },

    /// The search query is unusable.
    #[error("invalid search query: {message}")]
    InvalidQuery {
        /// Why the query was rejected.
        message: String,
    },

    /// A repository identifier is incomplete.
    #[error("repository must be given as <owner>/<name>")]
    MissingPathSegments,

    /// The authentication token was missing.
    #[error("personal access token is required")]
    MissingToken,

    /// The authentication token was rejected by GitHub.
    #[error("GitHub rejected the token: {message}")]
    Authentication {
        /// GitHub error message returned with the 401/403 response.
        message: String,
    },

    /// The requested repository does not exist or is not visible.
    #[error("not found: {message}")]
    NotFound {
        /// Which operation hit the 404.
        message: String,
    },

    /// GitHub returned a non-authentication API error.
    #[error("GitHub API error: {message}")]
    Api {
        /// Response body from GitHub describing the failure.
        message: String,
    },

    /// Networking failed while calling GitHub.
    #[error("network error talking to GitHub: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// Rate limit exceeded - the API returned 403/429 with a rate limit message.
    #[error("GitHub API rate limit exceeded: {message}")]
    RateLimitExceeded {
        /// Error message from GitHub.
        message: String,
    },
}
