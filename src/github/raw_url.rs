//! Derivation of default-branch raw-content URLs from code-search hits.
//!
//! Code search returns browsable URLs pinned to the commit the index was built
//! from. The index can lag behind the branch head, so the verifier re-reads
//! the file from the default branch through the raw-content route instead.

use url::Url;

use super::error::HostingError;

/// Hosting-specific tokens used when rewriting browsable URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostingConventions {
    /// Branch name substituted for the pinned commit.
    pub default_branch: String,
    /// Path prefix of the raw-content route, inserted after the origin.
    pub raw_prefix: String,
}

impl Default for HostingConventions {
    fn default() -> Self {
        Self {
            default_branch: "master".to_owned(),
            raw_prefix: "raw".to_owned(),
        }
    }
}

/// Rewrites `https://host/<owner>/<repo>/blob/<ref>/<path>` into
/// `https://host/<raw_prefix>/<owner>/<repo>/<default_branch>/<path>`.
///
/// Explicit ports are preserved and empty path segments after the ref are
/// kept verbatim. Query strings and fragments are dropped.
///
/// # Example
///
/// ```
/// use prbot::github::raw_url::{HostingConventions, default_branch_raw_url};
///
/// let raw = default_branch_raw_url(
///     "https://github.com/foo/bar/blob/93d1bc/path/to/file.txt",
///     &HostingConventions::default(),
/// )
/// .expect("URL should be rewritten");
/// assert_eq!(raw, "https://github.com/raw/foo/bar/master/path/to/file.txt");
/// ```
///
/// # Errors
///
/// Returns `HostingError::InvalidUrl` when the input is not a URL and
/// `HostingError::MalformedContentUrl` when its path lacks the
/// `blob/<ref>/` marker.
pub fn default_branch_raw_url(
    html_url: &str,
    conventions: &HostingConventions,
) -> Result<String, HostingError> {
    let parsed = Url::parse(html_url).map_err(|error| HostingError::InvalidUrl(error.to_string()))?;
    if parsed.cannot_be_a_base() || parsed.host_str().is_none() {
        return Err(malformed(html_url));
    }

    let path = parsed.path().trim_start_matches('/');
    let mut segments = path.splitn(5, '/');
    let (Some(owner), Some(repository), Some(marker), Some(reference), Some(file_path)) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(malformed(html_url));
    };

    if owner.is_empty() || repository.is_empty() || marker != "blob" || reference.is_empty() {
        return Err(malformed(html_url));
    }

    Ok(format!(
        "{origin}/{prefix}/{owner}/{repository}/{branch}/{file_path}",
        origin = parsed.origin().ascii_serialization(),
        prefix = conventions.raw_prefix,
        branch = conventions.default_branch,
    ))
}

fn malformed(html_url: &str) -> HostingError {
    HostingError::MalformedContentUrl {
        url: html_url.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{HostingConventions, default_branch_raw_url};
    use crate::github::error::HostingError;

    #[rstest]
    #[case::short_ref(
        "https://github.com/foo/bar/blob/93d1bc/path/to/file.txt",
        "https://github.com/raw/foo/bar/master/path/to/file.txt"
    )]
    #[case::full_sha(
        "https://github.com/foo/bar/blob/0123456789abcdef0123456789abcdef01234567/pom.xml",
        "https://github.com/raw/foo/bar/master/pom.xml"
    )]
    #[case::empty_segment_kept(
        "https://ghe.mydomain.net/spotify/helios/blob/ea5e46dc0//pom.xml",
        "https://ghe.mydomain.net/raw/spotify/helios/master//pom.xml"
    )]
    #[case::explicit_port(
        "https://github.com:5801/foo/bar/blob/93d1bc/path/to/file.txt",
        "https://github.com:5801/raw/foo/bar/master/path/to/file.txt"
    )]
    #[case::explicit_port_empty_segment(
        "https://ghe.mydomain.net:5801/spotify/helios/blob/ea5e46dc0//pom.xml",
        "https://ghe.mydomain.net:5801/raw/spotify/helios/master//pom.xml"
    )]
    fn rewrites_blob_urls_to_default_branch(#[case] html_url: &str, #[case] expected: &str) {
        let derived = default_branch_raw_url(html_url, &HostingConventions::default())
            .expect("URL should be rewritten");
        assert_eq!(derived, expected);
    }

    #[rstest]
    fn honours_configured_branch_and_prefix() {
        let conventions = HostingConventions {
            default_branch: "main".to_owned(),
            raw_prefix: "raw-content".to_owned(),
        };
        let derived =
            default_branch_raw_url("https://example.com/o/r/blob/abc123/src/lib.rs", &conventions)
                .expect("URL should be rewritten");
        assert_eq!(derived, "https://example.com/raw-content/o/r/main/src/lib.rs");
    }

    #[rstest]
    #[case::tree_marker("https://github.com/foo/bar/tree/93d1bc/path")]
    #[case::missing_path("https://github.com/foo/bar/blob/93d1bc")]
    #[case::repository_root("https://github.com/foo/bar")]
    fn rejects_urls_without_blob_marker(#[case] html_url: &str) {
        let result = default_branch_raw_url(html_url, &HostingConventions::default());
        assert!(
            matches!(result, Err(HostingError::MalformedContentUrl { .. })),
            "expected MalformedContentUrl, got {result:?}"
        );
    }

    #[rstest]
    fn rejects_unparseable_urls() {
        let result = default_branch_raw_url("not a url", &HostingConventions::default());
        assert!(
            matches!(result, Err(HostingError::InvalidUrl(_))),
            "expected InvalidUrl, got {result:?}"
        );
    }
}
