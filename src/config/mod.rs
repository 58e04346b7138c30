//! Run configuration loaded from CLI, environment, and files.
//!
//! Values are merged with ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in defaults
//! 2. **Configuration file** – `.prbot.toml` in the current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables** – `PRBOT_*`, plus `GITHUB_TOKEN` as a token
//!    fallback
//! 4. **Command-line arguments**
//!
//! # Configuration File
//!
//! ```toml
//! query = "<artifactId>old-artifact</artifactId>"
//! language = "java"
//! fork_owner = "upgrade-bot"
//! commit_message_file = "commit-message.txt"
//! domain = "ghe.example.com"
//! delete_forks = true
//! max_candidates = 25
//! ```

use std::env;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use chrono::{Months, NaiveDate};
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::error::RunError;
use crate::github::locator::DEFAULT_DOMAIN;
use crate::github::search::PUSHED_DATE_FORMAT;
use crate::github::{
    CloneProtocol, HostingConventions, HostingEndpoints, HostingError, RepositoryOwner,
    SearchQuery,
};
use crate::pipeline::{DEFAULT_MAX_CANDIDATES, ForkOptions, PipelineSettings};

const DEFAULT_CLONE_DIR: &str = "repos";
const DEFAULT_PROPAGATION_DELAY_SECONDS: u64 = 10;

/// Discovery run configuration supporting CLI, environment, and file sources.
///
/// Boolean flags are read from the CLI and configuration files only;
/// `ortho_config` does not load boolean values from the environment.
///
/// # Example
///
/// ```no_run
/// use ortho_config::OrthoConfig;
/// use prbot::PrbotConfig;
///
/// let config = PrbotConfig::load().expect("failed to load configuration");
/// let query = config.require_query().expect("query required");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "PRBOT",
    discovery(
        dotfile_name = ".prbot.toml",
        config_file_name = "prbot.toml",
        app_name = "prbot"
    )
)]
pub struct PrbotConfig {
    /// Literal text searched for in repository file contents.
    ///
    /// CLI: `--query <TEXT>` or `-q <TEXT>`; environment: `PRBOT_QUERY`.
    #[ortho_config(cli_short = 'q')]
    pub query: Option<String>,

    /// Only consider repositories pushed on or after this date
    /// (`YYYY-MM-DD`). Defaults to one month before the run starts.
    #[ortho_config(cli_short = 'p')]
    pub pushed_since: Option<String>,

    /// Restricts repository search to one language, e.g. `java`.
    #[ortho_config(cli_short = 'l')]
    pub language: Option<String>,

    /// Account or organization that receives the forks.
    ///
    /// CLI: `--fork-owner <LOGIN>` or `-o <LOGIN>`; environment:
    /// `PRBOT_FORK_OWNER`.
    #[ortho_config(cli_short = 'o')]
    pub fork_owner: Option<String>,

    /// Request forks into the fork owner as an organization.
    #[ortho_config()]
    pub fork_into_organization: bool,

    /// Personal access token for GitHub API authentication.
    ///
    /// CLI: `--token <TOKEN>` or `-t <TOKEN>`; environment: `PRBOT_TOKEN` or
    /// `GITHUB_TOKEN`.
    #[ortho_config(cli_short = 't')]
    pub token: Option<String>,

    /// GitHub or GitHub Enterprise domain. Defaults to `github.com`.
    ///
    /// CLI: `--domain <HOST>` or `-D <HOST>`.
    #[ortho_config(cli_short = 'D')]
    pub domain: Option<String>,

    /// Explicit API base URL, overriding the one derived from `domain`.
    #[ortho_config()]
    pub api_url: Option<String>,

    /// File whose first line is the pull request title and whose remaining
    /// lines are its body.
    #[ortho_config(cli_short = 'm')]
    pub commit_message_file: Option<String>,

    /// Delete an existing fork of each candidate before forking it again.
    #[ortho_config(cli_short = 'd')]
    pub delete_forks: bool,

    /// Mention recent committers in the pull request. Carried for the
    /// pull request stage, which runs outside this tool.
    #[ortho_config()]
    pub at_mention_committers: bool,

    /// Maximum number of candidates attempted, skips included.
    #[ortho_config(cli_short = 'n')]
    pub max_candidates: usize,

    /// Directory forks are cloned under. Cleared at the start of each run.
    #[ortho_config()]
    pub clone_dir: Option<String>,

    /// Fixed wait between forking and cloning, in seconds.
    #[ortho_config()]
    pub propagation_delay_seconds: u64,

    /// Branch name used when re-reading search hits. Defaults to `master`.
    #[ortho_config()]
    pub default_branch: Option<String>,

    /// Clone forks over HTTPS with the token instead of SSH.
    #[ortho_config()]
    pub clone_over_https: bool,

    /// Enables debug logging.
    #[ortho_config(cli_short = 'v')]
    pub verbose: bool,
}

impl Default for PrbotConfig {
    fn default() -> Self {
        Self {
            query: None,
            pushed_since: None,
            language: None,
            fork_owner: None,
            fork_into_organization: false,
            token: None,
            domain: None,
            api_url: None,
            commit_message_file: None,
            delete_forks: false,
            at_mention_committers: false,
            max_candidates: DEFAULT_MAX_CANDIDATES,
            clone_dir: None,
            propagation_delay_seconds: DEFAULT_PROPAGATION_DELAY_SECONDS,
            default_branch: None,
            clone_over_https: false,
            verbose: false,
        }
    }
}

impl PrbotConfig {
    /// Resolves the token from configuration or the `GITHUB_TOKEN`
    /// environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`HostingError::MissingToken`] when no source provides a value.
    pub fn resolve_token(&self) -> Result<String, HostingError> {
        self.token
            .clone()
            .or_else(|| env::var("GITHUB_TOKEN").ok())
            .filter(|token| !token.trim().is_empty())
            .ok_or(HostingError::MissingToken)
    }

    /// Returns the content query.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::Configuration`] when no query is configured.
    pub fn require_query(&self) -> Result<&str, RunError> {
        self.query
            .as_deref()
            .filter(|query| !query.trim().is_empty())
            .ok_or_else(|| RunError::configuration("a query is required (use --query or -q)"))
    }

    /// Returns the fork owner.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::Configuration`] when the owner is missing or not a
    /// valid login.
    pub fn require_fork_owner(&self) -> Result<RepositoryOwner, RunError> {
        let owner = self.fork_owner.as_deref().ok_or_else(|| {
            RunError::configuration("a fork owner is required (use --fork-owner or -o)")
        })?;
        RepositoryOwner::new(owner)
            .map_err(|error| RunError::configuration(format!("invalid fork owner: {error}")))
    }

    /// Returns the commit message file path.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::Configuration`] when no path is configured.
    pub fn require_commit_message_file(&self) -> Result<&Utf8Path, RunError> {
        self.commit_message_file
            .as_deref()
            .map(Utf8Path::new)
            .ok_or_else(|| {
                RunError::configuration(
                    "a commit message file is required (use --commit-message-file or -m)",
                )
            })
    }

    /// Parses the pushed-since date, defaulting to one month before `today`.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::Configuration`] when the date is not `YYYY-MM-DD`
    /// or lies after `today`.
    pub fn resolve_pushed_since(&self, today: NaiveDate) -> Result<NaiveDate, RunError> {
        let pushed_since = match self.pushed_since.as_deref() {
            Some(raw) => NaiveDate::parse_from_str(raw.trim(), PUSHED_DATE_FORMAT).map_err(
                |error| RunError::configuration(format!("invalid pushed-since date {raw}: {error}")),
            )?,
            None => today
                .checked_sub_months(Months::new(1))
                .ok_or_else(|| RunError::configuration("cannot derive default pushed-since date"))?,
        };

        if pushed_since > today {
            return Err(RunError::configuration(format!(
                "pushed-since date {pushed_since} is in the future"
            )));
        }
        Ok(pushed_since)
    }

    /// Builds the repository search query for a run starting on `today`.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::Configuration`] when the query or date is invalid.
    pub fn search_query(&self, today: NaiveDate) -> Result<SearchQuery, RunError> {
        let content = self.require_query()?;
        let pushed_since = self.resolve_pushed_since(today)?;
        SearchQuery::new(content, pushed_since, today)
            .map(|query| query.with_language(self.language.clone()))
            .map_err(|error| RunError::configuration(error.to_string()))
    }

    /// Resolves the API endpoints from `api_url`, or from `domain` when no
    /// explicit URL is set.
    ///
    /// # Errors
    ///
    /// Returns [`HostingError::InvalidUrl`] when the URL or domain is invalid.
    pub fn resolve_endpoints(&self) -> Result<HostingEndpoints, HostingError> {
        match self.api_url.as_deref() {
            Some(api_url) => HostingEndpoints::with_api_base(api_url),
            None => HostingEndpoints::for_domain(self.domain.as_deref().unwrap_or(DEFAULT_DOMAIN)),
        }
    }

    /// Directory forks are cloned under.
    #[must_use]
    pub fn clone_root(&self) -> Utf8PathBuf {
        Utf8PathBuf::from(self.clone_dir.as_deref().unwrap_or(DEFAULT_CLONE_DIR))
    }

    /// Wait between forking and cloning.
    #[must_use]
    pub const fn propagation_delay(&self) -> Duration {
        Duration::from_secs(self.propagation_delay_seconds)
    }

    /// Transport used for cloning forks.
    #[must_use]
    pub const fn clone_protocol(&self) -> CloneProtocol {
        if self.clone_over_https {
            CloneProtocol::Https
        } else {
            CloneProtocol::Ssh
        }
    }

    /// Tokens used to derive default-branch raw URLs.
    #[must_use]
    pub fn conventions(&self) -> HostingConventions {
        let defaults = HostingConventions::default();
        HostingConventions {
            default_branch: self
                .default_branch
                .clone()
                .unwrap_or(defaults.default_branch),
            ..defaults
        }
    }

    /// Assembles the pipeline settings.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::Configuration`] when the fork owner is missing or
    /// invalid.
    pub fn pipeline_settings(&self) -> Result<PipelineSettings, RunError> {
        let fork = ForkOptions {
            fork_owner: self.require_fork_owner()?,
            delete_stale_fork: self.delete_forks,
            propagation_delay: self.propagation_delay(),
            clone_root: self.clone_root(),
            protocol: self.clone_protocol(),
        };
        Ok(PipelineSettings {
            fork,
            max_candidates: self.max_candidates,
            conventions: self.conventions(),
        })
    }

    /// Checks the configuration before any remote call is made.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::Configuration`] when a required value is missing
    /// or the candidate cap is zero.
    pub fn validate(&self) -> Result<(), RunError> {
        self.require_query()?;
        self.require_fork_owner()?;
        self.require_commit_message_file()?;
        if self.max_candidates == 0 {
            return Err(RunError::configuration(
                "max candidates must be at least 1",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
