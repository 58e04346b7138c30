//! Octocrab client construction helpers for gateway implementations.

use http::Uri;
use octocrab::Octocrab;

use crate::github::error::HostingError;
use crate::github::locator::{HostingEndpoints, PersonalAccessToken};

use super::error_mapping::map_octocrab_error;

/// Builds an Octocrab client for the given token and API endpoints.
///
/// # Errors
///
/// Returns `HostingError::InvalidUrl` when the base URI cannot be parsed or
/// `HostingError::Api` when Octocrab fails to construct a client.
pub(super) fn build_octocrab_client(
    token: &PersonalAccessToken,
    endpoints: &HostingEndpoints,
) -> Result<Octocrab, HostingError> {
    let base_uri: Uri = endpoints
        .api_base()
        .as_str()
        .parse::<Uri>()
        .map_err(|error| HostingError::InvalidUrl(error.to_string()))?;

    Octocrab::builder()
        .personal_token(token.value())
        .base_uri(base_uri)
        .map_err(|error| HostingError::Api {
            message: format!("build client failed: {error}"),
        })?
        .build()
        .map_err(|error| map_octocrab_error("build client", &error))
}
