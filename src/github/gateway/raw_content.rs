//! Raw file retrieval over plain HTTP.
//!
//! Raw-content routes live outside the REST API base, so they are fetched with
//! `reqwest` rather than through Octocrab.

use http::header::{AUTHORIZATION, USER_AGENT};

use crate::github::error::HostingError;
use crate::github::locator::PersonalAccessToken;
use crate::github::models::RawContent;

pub(super) struct RawContentClient {
    http: reqwest::Client,
    token: PersonalAccessToken,
}

impl RawContentClient {
    pub(super) fn new(token: PersonalAccessToken) -> Result<Self, HostingError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|error| HostingError::Network {
                message: format!("build HTTP client failed: {error}"),
            })?;
        Ok(Self { http, token })
    }

    pub(super) async fn fetch(&self, url: &str) -> Result<RawContent, HostingError> {
        let response = self
            .http
            .get(url)
            .header(AUTHORIZATION, format!("token {}", self.token.value()))
            .header(USER_AGENT, concat!("prbot/", env!("CARGO_PKG_VERSION")))
            .send()
            .await
            .map_err(|error| HostingError::Network {
                message: format!("raw fetch of {url} failed: {error}"),
            })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|error| HostingError::Network {
                message: format!("raw fetch of {url} failed reading body: {error}"),
            })?;

        Ok(RawContent { status, body })
    }
}
