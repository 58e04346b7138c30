//! Error mapping helpers for the Octocrab gateway.

use http::StatusCode;

use crate::github::error::HostingError;

/// Checks if a GitHub error status indicates an authentication failure.
pub(super) const fn is_auth_failure(status: StatusCode) -> bool {
    matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
}

/// Checks if an octocrab error represents a network/transport issue.
pub(super) const fn is_network_error(error: &octocrab::Error) -> bool {
    matches!(
        error,
        octocrab::Error::Http { .. }
            | octocrab::Error::Hyper { .. }
            | octocrab::Error::Service { .. }
    )
}

/// Rate limiting is reported as 403 or 429 with a message or documentation
/// URL mentioning the limit.
fn is_rate_limited(status: StatusCode, message: &str, documentation_url: Option<&str>) -> bool {
    let is_rate_limit_status = matches!(
        status,
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS
    );

    let message_indicates_rate_limit = message.to_lowercase().contains("rate limit")
        || documentation_url.is_some_and(|url| url.contains("rate-limit"));

    is_rate_limit_status && message_indicates_rate_limit
}

fn map_status(operation: &str, status: StatusCode, message: &str) -> HostingError {
    if status == StatusCode::NOT_FOUND {
        HostingError::NotFound {
            message: format!("{operation} failed: {message}"),
        }
    } else if is_auth_failure(status) {
        HostingError::Authentication {
            message: format!("{operation} failed: GitHub returned {status} {message}"),
        }
    } else {
        HostingError::Api {
            message: format!("{operation} failed with status {status}: {message}"),
        }
    }
}

pub(super) fn map_octocrab_error(operation: &str, error: &octocrab::Error) -> HostingError {
    if let octocrab::Error::GitHub { source, .. } = error {
        if is_rate_limited(
            source.status_code,
            &source.message,
            source.documentation_url.as_deref(),
        ) {
            return HostingError::RateLimitExceeded {
                message: format!("{operation} failed: {}", source.message),
            };
        }
        return map_status(operation, source.status_code, &source.message);
    }

    if is_network_error(error) {
        return HostingError::Network {
            message: format!("{operation} failed: {error}"),
        };
    }

    HostingError::Api {
        message: format!("{operation} failed: {error}"),
    }
}

pub(super) fn map_http_error(
    operation: &str,
    status: StatusCode,
    maybe_message: Option<String>,
) -> HostingError {
    let message = maybe_message.unwrap_or_else(|| "unknown error".to_owned());
    if is_rate_limited(status, &message, None) {
        return HostingError::RateLimitExceeded {
            message: format!("{operation} failed: {message}"),
        };
    }
    map_status(operation, status, &message)
}

pub(super) fn extract_github_message(body: &str) -> Option<String> {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return None;
    };
    value
        .get("message")
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
}
