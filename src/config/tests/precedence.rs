//! Tests for configuration layer precedence.

use rstest::rstest;
use serde_json::{Value, json};

use super::helpers::build_config_from_layers;

#[rstest]
#[case::file_overrides_defaults(
    vec![("defaults", json!({"query": "default-query"})), ("file", json!({"query": "file-query"}))],
    "query",
    "file-query",
    "file should override default"
)]
#[case::environment_overrides_file(
    vec![("file", json!({"token": "file-token"})), ("environment", json!({"token": "env-token"}))],
    "token",
    "env-token",
    "environment should override file"
)]
#[case::cli_overrides_environment(
    vec![("environment", json!({"fork_owner": "env-bot"})), ("cli", json!({"fork_owner": "cli-bot"}))],
    "fork_owner",
    "cli-bot",
    "CLI should override environment"
)]
#[case::pushed_since_defaults_file_env_cli(
    vec![
        ("defaults", json!({"pushed_since": "2024-01-01"})),
        ("file", json!({"pushed_since": "2024-02-01"})),
        ("environment", json!({"pushed_since": "2024-03-01"})),
        ("cli", json!({"pushed_since": "2024-04-01"}))
    ],
    "pushed_since",
    "2024-04-01",
    "CLI should win for pushed_since"
)]
fn test_layer_precedence(
    #[case] layers: Vec<(&str, Value)>,
    #[case] field: &str,
    #[case] expected: &str,
    #[case] message: &str,
) {
    let config = build_config_from_layers(&layers);

    let actual = match field {
        "query" => config.query.as_deref(),
        "token" => config.token.as_deref(),
        "fork_owner" => config.fork_owner.as_deref(),
        "pushed_since" => config.pushed_since.as_deref(),
        _ => panic!("unknown field: {field}"),
    };

    assert_eq!(actual, Some(expected), "{message}");
}

#[rstest]
fn numeric_defaults_apply_when_no_sources_provided() {
    let config = build_config_from_layers(&[("defaults", json!({"query": null}))]);

    assert!(config.query.is_none(), "query should be None");
    assert!(config.fork_owner.is_none(), "fork_owner should be None");
    assert_eq!(config.max_candidates, 100);
    assert_eq!(config.propagation_delay_seconds, 10);
    assert!(!config.delete_forks, "delete_forks should default to false");
}

#[rstest]
fn file_values_populate_flags_and_numbers() {
    let config = build_config_from_layers(&[(
        "file",
        json!({
            "delete_forks": true,
            "clone_over_https": true,
            "max_candidates": 25,
            "propagation_delay_seconds": 0,
            "clone_dir": "/tmp/forks"
        }),
    )]);

    assert!(config.delete_forks);
    assert!(config.clone_over_https);
    assert_eq!(config.max_candidates, 25);
    assert_eq!(config.propagation_delay_seconds, 0);
    assert_eq!(config.clone_dir.as_deref(), Some("/tmp/forks"));
}
