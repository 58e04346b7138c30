//! Wiring for a discovery run: configuration, collaborators, and output.

pub mod output;

use std::io;

use chrono::Local;
use ortho_config::OrthoConfig;
use prbot::telemetry::{
    self, NoopTelemetrySink, StderrJsonlTelemetrySink, TelemetryEvent, TelemetrySink,
};
use prbot::{
    CommitMessage, Git2Cloner, OctocrabHostingGateway, PersonalAccessToken, PipelineDriver,
    PrbotConfig, RunError,
};

/// Loads configuration, runs the pipeline, and prints the report.
///
/// # Errors
///
/// Returns any run-fatal error: invalid configuration, an unreadable commit
/// message, a failed initial search, or an unwritable clone directory.
pub async fn run() -> Result<(), RunError> {
    let config = load_config()?;
    if !telemetry::init_tracing(config.verbose) {
        tracing::debug!("log subscriber already installed");
    }
    config.validate()?;

    let query = config.search_query(Local::now().date_naive())?;
    let message = CommitMessage::load(config.require_commit_message_file()?)?;
    let token = PersonalAccessToken::new(config.resolve_token()?)?;
    let endpoints = config.resolve_endpoints()?;
    let gateway = OctocrabHostingGateway::for_token(&token, &endpoints)?
        .with_organization_forks(config.fork_into_organization);
    let cloner = Git2Cloner::with_token(token);

    if config.at_mention_committers {
        tracing::debug!("committer mentions apply when the pull request is opened");
    }

    let driver = PipelineDriver::new(&gateway, &cloner, config.pipeline_settings()?);
    let report = driver.run(&query, &message).await?;

    output::write_report(&mut io::stdout().lock(), &report)?;
    telemetry_sink(config.verbose).record(TelemetryEvent::from(&report));
    Ok(())
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`RunError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<PrbotConfig, RunError> {
    PrbotConfig::load().map_err(|error| RunError::configuration(error.to_string()))
}

fn telemetry_sink(verbose: bool) -> Box<dyn TelemetrySink> {
    if verbose {
        Box::new(StderrJsonlTelemetrySink)
    } else {
        Box::new(NoopTelemetrySink)
    }
}
