//! prbot library crate for repository discovery and fork orchestration.
//!
//! A run searches GitHub for recently pushed repositories, skips those that
//! already carry an equivalent pull request or no longer contain the query on
//! their default branch, and forks and clones the rest so a pull request can
//! be prepared from the local copy.

pub mod commit_message;
pub mod config;
pub mod error;
pub mod git;
pub mod github;
pub mod pipeline;
pub mod telemetry;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use commit_message::{CommitMessage, CommitMessageError};
pub use config::PrbotConfig;
pub use error::RunError;
pub use git::{CloneError, Git2Cloner, RepoCloner};
pub use github::{
    CandidateRepository, HostingError, OctocrabHostingGateway, PersonalAccessToken,
    RepositorySlug, SearchQuery,
};
pub use pipeline::{CandidateFailure, ForkOutcome, PipelineDriver, PipelineSettings, RunReport};
