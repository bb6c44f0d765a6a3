//! Multi-status run fetch with bounded retries
//!
//! The Actions API filters by a single status value per call, so one gate
//! observation fans out into one query per requested status. Each query gets
//! a fixed number of attempts; this is the only retry boundary in the
//! system, since the poller already re-runs the whole fetch on its cadence.

use tracing::error;
use wfgate_core::domain::run::{RunStatus, WorkflowRun};

use crate::error::{ClientError, Result};
use crate::runs::ActionsApi;

/// Attempts per status before the whole fetch is abandoned
const MAX_ATTEMPTS: u32 = 3;

/// Fetch all runs matching any of the requested statuses
///
/// Queries are issued one at a time to stay clear of rate limits, and the
/// results are concatenated. Each per-status query is retried up to
/// [`MAX_ATTEMPTS`] times with no backoff, logging every failure; if the
/// attempts for a status are exhausted the fetch fails atomically with the
/// last error, discarding any runs already gathered for earlier statuses.
pub async fn fetch_runs(
    api: &dyn ActionsApi,
    statuses: &[RunStatus],
) -> Result<Vec<WorkflowRun>> {
    let mut runs = Vec::new();

    for &status in statuses {
        runs.extend(fetch_status(api, status).await?);
    }

    Ok(runs)
}

/// Fetch runs for a single status, retrying on transient failures
async fn fetch_status(api: &dyn ActionsApi, status: RunStatus) -> Result<Vec<WorkflowRun>> {
    let mut last_error: Option<ClientError> = None;

    for attempt in 1..=MAX_ATTEMPTS {
        match api.list_runs(status).await {
            Ok(runs) => return Ok(runs),
            Err(e) => {
                error!(
                    "Error encountered while calling the GitHub API for status '{}'. \
                     Attempt {} of {}. Error: {}",
                    status, attempt, MAX_ATTEMPTS, e
                );
                last_error = Some(e);
            }
        }
    }

    // All attempts failed; MAX_ATTEMPTS >= 1 guarantees an error is recorded.
    Err(last_error
        .unwrap_or_else(|| ClientError::ParseError("no attempts were made".to_string())))
}
