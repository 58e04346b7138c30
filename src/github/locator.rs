//! Identity wrappers for repositories, tokens, and hosting endpoints.

use std::fmt;

use url::Url;

use super::error::HostingError;

/// Repository owner wrapper to avoid stringly typed parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryOwner(String);

impl RepositoryOwner {
    /// Validates that the owner is non-empty.
    ///
    /// # Errors
    ///
    /// Returns `HostingError::MissingPathSegments` for a blank owner.
    pub fn new(value: &str) -> Result<Self, HostingError> {
        if value.trim().is_empty() {
            return Err(HostingError::MissingPathSegments);
        }
        Ok(Self(value.to_owned()))
    }

    /// Borrow the owner value.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for RepositoryOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Repository name wrapper to prevent parameter mix-ups.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryName(String);

impl RepositoryName {
    /// Validates that the name is non-empty.
    ///
    /// # Errors
    ///
    /// Returns `HostingError::MissingPathSegments` for a blank name.
    pub fn new(value: &str) -> Result<Self, HostingError> {
        if value.trim().is_empty() {
            return Err(HostingError::MissingPathSegments);
        }
        Ok(Self(value.to_owned()))
    }

    /// Borrow the repository name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for RepositoryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Globally unique `owner/name` identifier of a repository on one host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositorySlug {
    owner: RepositoryOwner,
    name: RepositoryName,
}

impl RepositorySlug {
    /// Combines an owner and a name.
    #[must_use]
    pub const fn new(owner: RepositoryOwner, name: RepositoryName) -> Self {
        Self { owner, name }
    }

    /// Parses an `owner/name` string.
    ///
    /// # Errors
    ///
    /// Returns `HostingError::MissingPathSegments` unless the input has exactly
    /// two non-empty segments.
    pub fn parse(full_name: &str) -> Result<Self, HostingError> {
        let (owner, name) = full_name
            .split_once('/')
            .ok_or(HostingError::MissingPathSegments)?;
        if name.contains('/') {
            return Err(HostingError::MissingPathSegments);
        }
        Ok(Self::new(
            RepositoryOwner::new(owner)?,
            RepositoryName::new(name)?,
        ))
    }

    /// Repository owner.
    #[must_use]
    pub const fn owner(&self) -> &RepositoryOwner {
        &self.owner
    }

    /// Repository name.
    #[must_use]
    pub const fn name(&self) -> &RepositoryName {
        &self.name
    }

    /// The slug a fork of this repository would have under `fork_owner`.
    #[must_use]
    pub fn fork_under(&self, fork_owner: &RepositoryOwner) -> Self {
        Self::new(fork_owner.clone(), self.name.clone())
    }

    pub(crate) fn repository_path(&self) -> String {
        format!("/repos/{}/{}", self.owner.as_str(), self.name.as_str())
    }

    pub(crate) fn pulls_path(&self) -> String {
        format!("{}/pulls", self.repository_path())
    }

    pub(crate) fn forks_path(&self) -> String {
        format!("{}/forks", self.repository_path())
    }
}

impl fmt::Display for RepositorySlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Personal access token wrapper enforcing presence.
#[derive(Clone, PartialEq, Eq)]
pub struct PersonalAccessToken(String);

impl PersonalAccessToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns `HostingError::MissingToken` when the supplied string is blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, HostingError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(HostingError::MissingToken);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PersonalAccessToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

impl fmt::Debug for PersonalAccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PersonalAccessToken(<redacted>)")
    }
}

/// Default GitHub domain.
pub const DEFAULT_DOMAIN: &str = "github.com";

/// API base URL of a GitHub or GitHub Enterprise installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostingEndpoints {
    api_base: Url,
}

impl HostingEndpoints {
    /// Derives the API base from a domain such as `github.com` or
    /// `ghe.example.com:8443`.
    ///
    /// `github.com` maps to `https://api.github.com`; any other domain maps to
    /// `https://<domain>/api/v3`.
    ///
    /// # Errors
    ///
    /// Returns `HostingError::InvalidUrl` when the domain does not form a
    /// valid URL.
    pub fn for_domain(domain: &str) -> Result<Self, HostingError> {
        let parsed = Url::parse(&format!("https://{}", domain.trim()))
            .map_err(|error| HostingError::InvalidUrl(error.to_string()))?;
        let host = parsed
            .host_str()
            .ok_or_else(|| HostingError::InvalidUrl("domain must include a host".to_owned()))?;
        let api_base = derive_api_base_from_host(parsed.scheme(), host, parsed.port())?;
        Ok(Self { api_base })
    }

    /// Uses an explicit API base URL.
    ///
    /// # Errors
    ///
    /// Returns `HostingError::InvalidUrl` when the URL cannot be parsed.
    pub fn with_api_base(api_base: &str) -> Result<Self, HostingError> {
        let api_base =
            Url::parse(api_base).map_err(|error| HostingError::InvalidUrl(error.to_string()))?;
        Ok(Self { api_base })
    }

    /// API base URL.
    #[must_use]
    pub const fn api_base(&self) -> &Url {
        &self.api_base
    }
}

fn derive_api_base_from_host(
    scheme: &str,
    host: &str,
    port: Option<u16>,
) -> Result<Url, HostingError> {
    if host.eq_ignore_ascii_case(DEFAULT_DOMAIN) {
        return Url::parse("https://api.github.com")
            .map_err(|error| HostingError::InvalidUrl(error.to_string()));
    }

    let mut api_url = Url::parse(&format!("{scheme}://{host}"))
        .map_err(|error| HostingError::InvalidUrl(error.to_string()))?;
    api_url
        .set_port(port)
        .map_err(|()| HostingError::InvalidUrl("invalid port".to_owned()))?;
    api_url.set_path("api/v3");
    Ok(api_url)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{HostingEndpoints, PersonalAccessToken, RepositoryOwner, RepositorySlug};
    use crate::github::error::HostingError;

    #[rstest]
    fn slug_parses_owner_and_name() {
        let slug = RepositorySlug::parse("octo/widgets").expect("slug should parse");
        assert_eq!(slug.owner().as_str(), "octo");
        assert_eq!(slug.name().as_str(), "widgets");
        assert_eq!(slug.to_string(), "octo/widgets");
        assert_eq!(slug.pulls_path(), "/repos/octo/widgets/pulls");
        assert_eq!(slug.forks_path(), "/repos/octo/widgets/forks");
    }

    #[rstest]
    #[case::no_separator("octo")]
    #[case::empty_owner("/widgets")]
    #[case::empty_name("octo/")]
    #[case::extra_segment("octo/widgets/extra")]
    fn slug_rejects_malformed_input(#[case] input: &str) {
        assert_eq!(
            RepositorySlug::parse(input),
            Err(HostingError::MissingPathSegments)
        );
    }

    #[rstest]
    fn fork_under_keeps_repository_name() {
        let slug = RepositorySlug::parse("upstream/widgets").expect("slug should parse");
        let owner = RepositoryOwner::new("bot").expect("owner should be valid");
        assert_eq!(slug.fork_under(&owner).to_string(), "bot/widgets");
    }

    #[rstest]
    #[case::github("github.com", "https://api.github.com/")]
    #[case::enterprise("ghe.example.com", "https://ghe.example.com/api/v3")]
    #[case::enterprise_with_port("ghe.example.com:8443", "https://ghe.example.com:8443/api/v3")]
    fn endpoints_derive_api_base(#[case] domain: &str, #[case] expected: &str) {
        let endpoints = HostingEndpoints::for_domain(domain).expect("domain should be valid");
        assert_eq!(endpoints.api_base().as_str(), expected);
    }

    #[rstest]
    fn token_is_trimmed_and_redacted() {
        let token = PersonalAccessToken::new("  ghp_secret \n").expect("token should be valid");
        assert_eq!(token.value(), "ghp_secret");
        assert!(!format!("{token:?}").contains("ghp_secret"));
    }

    #[rstest]
    fn blank_token_is_rejected() {
        assert_eq!(
            PersonalAccessToken::new("   "),
            Err(HostingError::MissingToken)
        );
    }
}
