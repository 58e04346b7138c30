//! Cloning forks onto local disk.
//!
//! [`RepoCloner`] is the seam the fork orchestrator clones through.
//! [`Git2Cloner`] implements it with libgit2 on tokio's blocking pool, since
//! a clone holds a thread for its whole duration.

mod error;

pub use error::CloneError;

use std::io::ErrorKind;

use async_trait::async_trait;
use camino::Utf8Path;
use git2::build::RepoBuilder;
use git2::{Cred, CredentialType, FetchOptions, RemoteCallbacks};

use crate::github::PersonalAccessToken;

/// Username GitHub accepts alongside a token for HTTPS transport.
const TOKEN_USERNAME: &str = "x-access-token";

/// libgit2 re-invokes the credential callback after each rejection.
const MAX_CREDENTIAL_ATTEMPTS: u8 = 3;

/// Clones a remote repository into a local directory.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RepoCloner: Send + Sync {
    /// Clone `uri` into `destination`, which must not already exist.
    async fn clone_repository(&self, uri: &str, destination: &Utf8Path)
    -> Result<(), CloneError>;
}

/// [`RepoCloner`] backed by `git2`.
///
/// SSH URIs authenticate through the running SSH agent; HTTPS URIs use the
/// configured token when one is present.
#[derive(Debug, Clone, Default)]
pub struct Git2Cloner {
    token: Option<PersonalAccessToken>,
}

impl Git2Cloner {
    /// Creates a cloner that authenticates HTTPS transport with `token`.
    #[must_use]
    pub const fn with_token(token: PersonalAccessToken) -> Self {
        Self { token: Some(token) }
    }
}

#[async_trait]
impl RepoCloner for Git2Cloner {
    async fn clone_repository(
        &self,
        uri: &str,
        destination: &Utf8Path,
    ) -> Result<(), CloneError> {
        let owned_uri = uri.to_owned();
        let owned_destination = destination.to_owned();
        let token = self.token.clone();

        tokio::task::spawn_blocking(move || {
            clone_blocking(&owned_uri, &owned_destination, token.as_ref())
        })
            .await
            .map_err(|error| CloneError::Task {
                message: error.to_string(),
            })?
    }
}

fn clone_blocking(
    uri: &str,
    destination: &Utf8Path,
    token: Option<&PersonalAccessToken>,
) -> Result<(), CloneError> {
    if destination.exists() {
        return Err(CloneError::DestinationExists {
            path: destination.to_string(),
        });
    }

    let mut attempts = 0_u8;
    let mut callbacks = RemoteCallbacks::new();
    callbacks.credentials(move |_url, username_from_url, allowed| {
        attempts += 1;
        if attempts > MAX_CREDENTIAL_ATTEMPTS {
            return Err(git2::Error::from_str("credentials rejected"));
        }
        if allowed.contains(CredentialType::SSH_KEY) {
            return Cred::ssh_key_from_agent(username_from_url.unwrap_or("git"));
        }
        match token {
            Some(value) if allowed.contains(CredentialType::USER_PASS_PLAINTEXT) => {
                Cred::userpass_plaintext(TOKEN_USERNAME, value.value())
            }
            _ => Cred::default(),
        }
    });

    let mut fetch_options = FetchOptions::new();
    fetch_options.remote_callbacks(callbacks);

    tracing::debug!("cloning {uri} into {destination}");
    RepoBuilder::new()
        .fetch_options(fetch_options)
        .clone(uri, destination.as_std_path())
        .map(|_| ())
        .map_err(|error| CloneError::Git {
            uri: uri.to_owned(),
            message: error.message().to_owned(),
        })
}

/// Removes everything under `root` and recreates it empty.
///
/// # Errors
///
/// Returns [`CloneError::Directory`] when the directory cannot be removed or
/// created.
pub async fn reset_clone_dir(root: &Utf8Path) -> Result<(), CloneError> {
    let directory_error = |error: std::io::Error| CloneError::Directory {
        path: root.to_string(),
        message: error.to_string(),
    };

    match tokio::fs::remove_dir_all(root).await {
        Ok(()) => {}
        Err(error) if error.kind() == ErrorKind::NotFound => {}
        Err(error) => return Err(directory_error(error)),
    }
    tokio::fs::create_dir_all(root)
        .await
        .map_err(directory_error)
}
