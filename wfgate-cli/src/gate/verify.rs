//! Post-wait failure verification
//!
//! After the wait clears, re-queries the failure-class statuses with the
//! same filter criteria used during polling and fails the gate if any
//! matching run concluded badly.

use tracing::{error, info};
use wfgate_client::{ActionsApi, fetch_runs};
use wfgate_core::domain::filter::{FilterCriteria, filter_runs};
use wfgate_core::domain::run::RunStatus;

use crate::gate::error::GateError;

/// Fails the gate if any matching run ended in a failure-class status
///
/// Each failing run is logged with enough detail to find it before the
/// error is raised.
pub async fn verify_no_failures(
    api: &dyn ActionsApi,
    criteria: &FilterCriteria,
) -> Result<(), GateError> {
    let runs = fetch_runs(api, &RunStatus::FAILURE_CLASS).await?;
    let failed = filter_runs(runs, criteria)?;

    if failed.is_empty() {
        info!("No failed workflows for commit {}", criteria.head_sha);
        return Ok(());
    }

    for run in &failed {
        error!(
            "Workflow {}, run id: {} ({}) failed with conclusion: {} and status of {}, See: {}",
            run.name.as_deref().unwrap_or("<unnamed>"),
            run.id,
            run.created_at,
            run.conclusion.map(|c| c.as_str()).unwrap_or("unknown"),
            run.status,
            run.html_url
        );
    }

    Err(GateError::FailedWorkflows {
        count: failed.len(),
    })
}
