//! Error types for core domain operations

use thiserror::Error;

/// Errors raised while filtering observed workflow runs
#[derive(Debug, Error)]
pub enum FilterError {
    /// One or more runs came back without a name
    ///
    /// Name-based filtering depends on the name, so an unnamed run is never
    /// silently dropped; the offending run ids are carried in the error.
    #[error("workflow name not found for run(s) {}", format_ids(.run_ids))]
    MissingName {
        /// Ids of the runs that lacked a name
        run_ids: Vec<u64>,
    },
}

fn format_ids(ids: &[u64]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
