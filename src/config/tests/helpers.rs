//! Shared test helpers for configuration tests.

use ortho_config::MergeComposer;
use serde_json::Value;

use crate::PrbotConfig;

/// Applies a configuration layer to the composer based on the layer type.
pub fn apply_layer(composer: &mut MergeComposer, layer_type: &str, value: Value) {
    match layer_type {
        "defaults" => composer.push_defaults(value),
        "file" => composer.push_file(value, None),
        "environment" => composer.push_environment(value),
        "cli" => composer.push_cli(value),
        _ => panic!("unknown layer type: {layer_type}"),
    }
}

/// Composes a [`PrbotConfig`] from a sequence of `(layer_type, value)` pairs.
pub fn build_config_from_layers(layers: &[(&str, Value)]) -> PrbotConfig {
    let mut composer = MergeComposer::new();

    for (layer_type, value) in layers {
        apply_layer(&mut composer, layer_type, value.clone());
    }

    PrbotConfig::merge_from_layers(composer.layers()).expect("merge should succeed")
}

/// A configuration with every required value present.
pub fn complete_config() -> PrbotConfig {
    PrbotConfig {
        query: Some("old-artifact".to_owned()),
        fork_owner: Some("bots".to_owned()),
        commit_message_file: Some("message.txt".to_owned()),
        ..Default::default()
    }
}
