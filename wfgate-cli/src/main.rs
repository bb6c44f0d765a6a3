//! Wfgate
//!
//! A CI-pipeline gate: before the invoking job proceeds, wait for other
//! in-flight GitHub workflow runs on the same commit to finish, then
//! optionally verify none of the matching runs failed.
//!
//! Architecture:
//! - Configuration: clap arguments fed by the action's `INPUT_*` environment
//! - Context: repository, commit, and self run id resolved once up front
//! - Client: read-only GitHub Actions API access with bounded retries
//! - Gate: initial delay, poll-until-clear, optional failure verification
//!
//! The gate observes; it never cancels or retries the runs it watches. Its
//! result is binary: exit 0 when the commit's workflows cleared (and, if
//! required, none failed), exit 1 otherwise.

mod config;
mod context;
mod gate;

use anyhow::{Context as AnyhowContext, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Cli, GateConfig, parse_name_list};
use crate::context::GithubContext;
use crate::gate::Gate;
use wfgate_client::GithubClient;
use wfgate_core::domain::filter::FilterCriteria;

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wfgate=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = GateConfig::from_cli(&cli);
    config.log_summary();

    let context = GithubContext::from_env().context("Failed to resolve GitHub context")?;
    info!(
        "Gating {} at commit {} (own run id {})",
        context.repo, context.sha, context.run_id
    );

    let client = GithubClient::new(&cli.api_url, &cli.access_token, context.repo.clone());

    let criteria = FilterCriteria {
        head_sha: context.sha,
        self_run_id: context.run_id,
        include_names: parse_name_list(&cli.workflows),
        exclude_names: parse_name_list(&cli.excluded_workflows),
    };

    let gate = Gate::new(&client, criteria, config);
    let outcome = gate.run().await?;

    info!("{}", outcome);
    info!("Previous GitHub workflows completed. Resuming...");

    Ok(())
}
