//! Error types for the gate

use thiserror::Error;
use wfgate_client::ClientError;
use wfgate_core::FilterError;

/// Terminal failures of a gate invocation
///
/// Every variant ends the gate; there is no partial success. The timeout
/// variant is an expected, reportable outcome with a stable message so
/// operators can tell "still busy" from "broken".
#[derive(Debug, Error)]
pub enum GateError {
    /// In-flight workflows never cleared within the configured budget
    #[error("action_timeout_exceeded")]
    TimeoutExceeded,

    /// One or more matching runs concluded in a failure-class status
    #[error("One or more failed workflows exist for commit, failing step ({count} failed)")]
    FailedWorkflows {
        /// How many matching runs failed
        count: usize,
    },

    /// A run came back without a name
    #[error(transparent)]
    Filter(#[from] FilterError),

    /// The run-tracking service could not be queried
    #[error(transparent)]
    Client(#[from] ClientError),
}
