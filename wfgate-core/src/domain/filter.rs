//! Run filtering
//!
//! Decides which observed runs are relevant to the current gate invocation.
//! The filter is pure: given the same runs and criteria it always produces
//! the same output, and its only failure mode is the explicit missing-name
//! check.

use crate::domain::run::WorkflowRun;
use crate::error::FilterError;

/// Criteria a run must meet to be considered by the gate
///
/// Built once per invocation and shared by the polling and verification
/// phases so both observe the same subset of runs.
#[derive(Debug, Clone)]
pub struct FilterCriteria {
    /// Commit this gate is evaluating
    pub head_sha: String,

    /// Id of the run invoking the gate; always excluded so the gate can
    /// never wait on or fail because of itself
    pub self_run_id: u64,

    /// Allow-list of workflow names; empty means all names pass
    pub include_names: Vec<String>,

    /// Deny-list of workflow names, applied after the allow-list
    pub exclude_names: Vec<String>,
}

impl FilterCriteria {
    pub fn new(head_sha: impl Into<String>, self_run_id: u64) -> Self {
        Self {
            head_sha: head_sha.into(),
            self_run_id,
            include_names: Vec::new(),
            exclude_names: Vec::new(),
        }
    }
}

/// Filters raw runs down to the set relevant to this gate
///
/// In order: reject any unnamed run, drop the invoking run itself, keep only
/// runs for the gate's commit, then apply the include allow-list and the
/// exclude deny-list. A name on both lists is excluded.
///
/// # Errors
/// [`FilterError::MissingName`] if any run lacks a name, carrying the ids of
/// the offending runs.
pub fn filter_runs(
    runs: Vec<WorkflowRun>,
    criteria: &FilterCriteria,
) -> Result<Vec<WorkflowRun>, FilterError> {
    let unnamed: Vec<u64> = runs
        .iter()
        .filter(|run| run.name.is_none())
        .map(|run| run.id)
        .collect();

    if !unnamed.is_empty() {
        return Err(FilterError::MissingName { run_ids: unnamed });
    }

    let matched = runs
        .into_iter()
        .filter(|run| run.id != criteria.self_run_id)
        .filter(|run| run.head_sha == criteria.head_sha)
        .filter(|run| {
            criteria.include_names.is_empty()
                || run
                    .name
                    .as_ref()
                    .is_some_and(|name| criteria.include_names.contains(name))
        })
        .filter(|run| {
            criteria.exclude_names.is_empty()
                || !run
                    .name
                    .as_ref()
                    .is_some_and(|name| criteria.exclude_names.contains(name))
        })
        .collect();

    Ok(matched)
}
