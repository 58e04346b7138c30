//! Tests for the pipeline driver.

use std::time::Duration;

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use mockall::mock;
use mockall::predicate::eq;
use rstest::{fixture, rstest};
use tempfile::TempDir;

use super::{CandidateFailure, ForkOptions, ForkOutcome, PipelineDriver, PipelineSettings};
use crate::commit_message::CommitMessage;
use crate::error::RunError;
use crate::git::MockRepoCloner;
use crate::github::{
    CandidateRepository, ContentGateway, ContentHit, ContentHitPage, DeleteOutcome, ForkGateway,
    HostingError,
    PullRequestGateway, PullRequestRecord, RawContent, RepositoryOwner, RepositorySearchGateway,
    RepositorySlug, SearchPage, SearchQuery,
};

mock! {
    pub Hosting {}

    #[async_trait]
    impl RepositorySearchGateway for Hosting {
        async fn search_repositories(
            &self,
            query: &SearchQuery,
            page: u32,
        ) -> Result<SearchPage, HostingError>;
    }

    #[async_trait]
    impl ContentGateway for Hosting {
        async fn search_content(
            &self,
            repository: &RepositorySlug,
            query: &str,
            page: u32,
        ) -> Result<ContentHitPage, HostingError>;

        async fn fetch_raw(&self, url: &str) -> Result<RawContent, HostingError>;
    }

    #[async_trait]
    impl PullRequestGateway for Hosting {
        async fn list_open_pull_requests(
            &self,
            repository: &RepositorySlug,
        ) -> Result<Vec<PullRequestRecord>, HostingError>;
    }

    #[async_trait]
    impl ForkGateway for Hosting {
        async fn fork_repository(
            &self,
            repository: &RepositorySlug,
            owner: &RepositoryOwner,
        ) -> Result<CandidateRepository, HostingError>;

        async fn delete_repository(
            &self,
            repository: &RepositorySlug,
        ) -> Result<DeleteOutcome, HostingError>;
    }
}

const QUERY: &str = "old-artifact";

struct Workspace {
    _temp_dir: TempDir,
    clone_root: Utf8PathBuf,
}

#[fixture]
fn workspace() -> Workspace {
    let temp_dir = TempDir::new().expect("should create temp directory");
    let clone_root = Utf8Path::from_path(temp_dir.path())
        .expect("temp path should be UTF-8")
        .join("repos");
    Workspace {
        _temp_dir: temp_dir,
        clone_root,
    }
}

#[fixture]
fn message() -> CommitMessage {
    CommitMessage::new("Upgrade old-artifact", "Bumps the version.")
}

fn query() -> SearchQuery {
    let today = chrono::NaiveDate::from_ymd_opt(2024, 6, 1).expect("date should be valid");
    let since = chrono::NaiveDate::from_ymd_opt(2024, 5, 1).expect("date should be valid");
    SearchQuery::new(QUERY, since, today).expect("query should be valid")
}

fn repository(full_name: &str) -> CandidateRepository {
    CandidateRepository {
        slug: RepositorySlug::parse(full_name).expect("slug should parse"),
        default_branch: "master".to_owned(),
        clone_url: format!("https://github.com/{full_name}.git"),
        ssh_url: format!("git@github.com:{full_name}.git"),
    }
}

fn settings(clone_root: &Utf8Path, max_candidates: usize) -> PipelineSettings {
    let owner = RepositoryOwner::new("bots").expect("owner should be valid");
    PipelineSettings {
        max_candidates,
        ..PipelineSettings::new(ForkOptions {
            propagation_delay: Duration::ZERO,
            clone_root: clone_root.to_owned(),
            ..ForkOptions::new(owner)
        })
    }
}

fn single_page(names: &[&str]) -> SearchPage {
    SearchPage {
        items: names.iter().map(|name| repository(name)).collect(),
        has_next: false,
    }
}

fn hit_for(slug: &RepositorySlug) -> ContentHit {
    ContentHit {
        html_url: format!("https://github.com/{slug}/blob/93d1bc/pom.xml"),
    }
}

fn only_page(hits: Vec<ContentHit>) -> Result<ContentHitPage, HostingError> {
    Ok(ContentHitPage {
        hits,
        has_next: false,
    })
}

fn is_repo(slug: &RepositorySlug, full_name: &str) -> bool {
    slug.to_string() == full_name
}

#[rstest]
#[tokio::test]
async fn five_candidates_capped_at_four(workspace: Workspace, message: CommitMessage) {
    let mut hosting = MockHosting::new();
    hosting
        .expect_search_repositories()
        .with(mockall::predicate::always(), eq(1))
        .times(1)
        .returning(|_, _| {
            Ok(single_page(&[
                "octo/dup",
                "octo/stale",
                "octo/good",
                "octo/broken",
                "octo/unseen",
            ]))
        });

    hosting
        .expect_list_open_pull_requests()
        .withf(|slug| is_repo(slug, "octo/dup"))
        .times(1)
        .returning(|_| {
            Ok(vec![PullRequestRecord {
                number: 42,
                author: Some("bots".to_owned()),
                title: Some("Upgrade old-artifact".to_owned()),
                body: Some("Bumps the version.".to_owned()),
                html_url: None,
            }])
        });
    hosting
        .expect_list_open_pull_requests()
        .withf(|slug| !is_repo(slug, "octo/dup") && !is_repo(slug, "octo/unseen"))
        .times(3)
        .returning(|_| Ok(Vec::new()));

    hosting
        .expect_search_content()
        .withf(|slug, query, _| !is_repo(slug, "octo/unseen") && query == QUERY)
        .times(3)
        .returning(|slug, _, _| only_page(vec![hit_for(slug)]));
    hosting
        .expect_fetch_raw()
        .with(eq("https://github.com/raw/octo/stale/master/pom.xml".to_owned()))
        .returning(|_| {
            Ok(RawContent {
                status: 200,
                body: "new-artifact".to_owned(),
            })
        });
    hosting.expect_fetch_raw().returning(|_| {
        Ok(RawContent {
            status: 200,
            body: "<artifactId>old-artifact</artifactId>".to_owned(),
        })
    });

    hosting
        .expect_fork_repository()
        .withf(|slug, _| is_repo(slug, "octo/good"))
        .times(1)
        .returning(|_, _| Ok(repository("bots/good")));
    hosting
        .expect_fork_repository()
        .withf(|slug, _| is_repo(slug, "octo/broken"))
        .times(1)
        .returning(|_, _| {
            Err(HostingError::Api {
                message: "Repository access blocked".to_owned(),
            })
        });
    hosting.expect_delete_repository().never();

    let mut cloner = MockRepoCloner::new();
    let expected_destination = workspace.clone_root.join("good");
    cloner
        .expect_clone_repository()
        .withf(move |uri, destination| {
            uri == "git@github.com:bots/good.git" && destination == expected_destination.as_path()
        })
        .times(1)
        .returning(|_, _| Ok(()));

    let driver = PipelineDriver::new(&hosting, &cloner, settings(&workspace.clone_root, 4));
    let report = driver
        .run(&query(), &message)
        .await
        .expect("run should complete");

    let summary: Vec<(String, ForkOutcome)> = report
        .outcomes()
        .iter()
        .map(|(candidate, outcome)| (candidate.slug.to_string(), outcome.clone()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (
                "octo/dup".to_owned(),
                ForkOutcome::SkippedDuplicate { pull_request: 42 }
            ),
            ("octo/stale".to_owned(), ForkOutcome::SkippedNoContentMatch),
            (
                "octo/good".to_owned(),
                ForkOutcome::ForkedAndCloned {
                    fork: RepositorySlug::parse("bots/good").expect("slug should parse"),
                    destination: workspace.clone_root.join("good"),
                }
            ),
            (
                "octo/broken".to_owned(),
                ForkOutcome::Failed(CandidateFailure::Fork(HostingError::Api {
                    message: "Repository access blocked".to_owned(),
                }))
            ),
        ]
    );
    assert_eq!(report.attempted(), 4);
}

#[rstest]
#[tokio::test]
async fn initial_search_failure_is_fatal(workspace: Workspace, message: CommitMessage) {
    let mut hosting = MockHosting::new();
    hosting.expect_search_repositories().returning(|_, _| {
        Err(HostingError::Authentication {
            message: "Bad credentials".to_owned(),
        })
    });
    hosting.expect_list_open_pull_requests().never();
    let mut cloner = MockRepoCloner::new();
    cloner.expect_clone_repository().never();

    let driver = PipelineDriver::new(&hosting, &cloner, settings(&workspace.clone_root, 4));
    let error = driver
        .run(&query(), &message)
        .await
        .expect_err("run should fail");

    assert!(
        matches!(error, RunError::Hosting(HostingError::Authentication { .. })),
        "expected Authentication error, got {error:?}"
    );
}

#[rstest]
#[tokio::test]
async fn gate_failures_fail_only_their_candidate(workspace: Workspace, message: CommitMessage) {
    let mut hosting = MockHosting::new();
    hosting
        .expect_search_repositories()
        .returning(|_, _| Ok(single_page(&["octo/a", "octo/b", "octo/c"])));
    hosting
        .expect_list_open_pull_requests()
        .withf(|slug| is_repo(slug, "octo/a"))
        .returning(|_| {
            Err(HostingError::Network {
                message: "connection reset".to_owned(),
            })
        });
    hosting
        .expect_list_open_pull_requests()
        .returning(|_| Ok(Vec::new()));
    hosting
        .expect_search_content()
        .withf(|slug, _, _| is_repo(slug, "octo/b"))
        .returning(|_, _, _| {
            Err(HostingError::RateLimitExceeded {
                message: "secondary rate limit".to_owned(),
            })
        });
    hosting
        .expect_search_content()
        .returning(|_, _, _| only_page(Vec::new()));
    hosting.expect_fork_repository().never();
    let mut cloner = MockRepoCloner::new();
    cloner.expect_clone_repository().never();

    let driver = PipelineDriver::new(&hosting, &cloner, settings(&workspace.clone_root, 10));
    let report = driver
        .run(&query(), &message)
        .await
        .expect("run should complete");

    let outcomes: Vec<&ForkOutcome> = report.outcomes().iter().map(|(_, outcome)| outcome).collect();
    assert!(matches!(
        outcomes.as_slice(),
        [
            ForkOutcome::Failed(CandidateFailure::DuplicateCheck(_)),
            ForkOutcome::Failed(CandidateFailure::ContentVerification(_)),
            ForkOutcome::SkippedNoContentMatch,
        ]
    ));
    assert_eq!(report.failed(), 2);
}

#[rstest]
#[case::cap_above_results(10, 3)]
#[case::cap_below_results(2, 2)]
#[case::cap_of_one(1, 1)]
#[tokio::test]
async fn attempts_never_exceed_cap(
    workspace: Workspace,
    message: CommitMessage,
    #[case] max_candidates: usize,
    #[case] expected_attempts: usize,
) {
    let mut hosting = MockHosting::new();
    hosting
        .expect_search_repositories()
        .with(mockall::predicate::always(), eq(1))
        .returning(|_, _| {
            Ok(SearchPage {
                items: vec![repository("octo/a"), repository("octo/b")],
                has_next: true,
            })
        });
    hosting
        .expect_search_repositories()
        .with(mockall::predicate::always(), eq(2))
        .returning(|_, _| Ok(single_page(&["octo/c"])));
    hosting
        .expect_list_open_pull_requests()
        .times(expected_attempts)
        .returning(|_| Ok(Vec::new()));
    hosting
        .expect_search_content()
        .times(expected_attempts)
        .returning(|_, _, _| only_page(Vec::new()));

    let cloner = MockRepoCloner::new();
    let driver = PipelineDriver::new(
        &hosting,
        &cloner,
        settings(&workspace.clone_root, max_candidates),
    );
    let report = driver
        .run(&query(), &message)
        .await
        .expect("run should complete");

    assert_eq!(report.attempted(), expected_attempts);
    assert_eq!(report.outcomes().len(), expected_attempts);
}

#[rstest]
#[tokio::test]
async fn run_clears_clone_root_first(workspace: Workspace, message: CommitMessage) {
    std::fs::create_dir_all(workspace.clone_root.join("leftover"))
        .expect("should create leftover clone");

    let mut hosting = MockHosting::new();
    hosting
        .expect_search_repositories()
        .returning(|_, _| Ok(SearchPage::default()));
    let cloner = MockRepoCloner::new();

    let driver = PipelineDriver::new(&hosting, &cloner, settings(&workspace.clone_root, 4));
    let report = driver
        .run(&query(), &message)
        .await
        .expect("run should complete");

    assert_eq!(report.attempted(), 0);
    assert!(workspace.clone_root.is_dir());
    assert!(!workspace.clone_root.join("leftover").exists());
}
