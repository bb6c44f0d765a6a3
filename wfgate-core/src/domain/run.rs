//! Workflow run domain types

use serde::{Deserialize, Serialize};

/// Lifecycle status of a workflow run as reported by GitHub
///
/// This is the single status vocabulary for the whole gate; raw service
/// responses are parsed into it exactly once, at the client boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    Waiting,
    Requested,
    ActionRequired,
    Completed,
    Success,
    Failure,
    Cancelled,
    TimedOut,
    Neutral,
    Skipped,
    Stale,
}

impl RunStatus {
    /// Statuses the gate waits on before letting the pipeline proceed
    pub const IN_FLIGHT: [RunStatus; 2] = [RunStatus::Queued, RunStatus::InProgress];

    /// Terminal statuses that count as a failed run during verification
    pub const FAILURE_CLASS: [RunStatus; 3] =
        [RunStatus::Cancelled, RunStatus::TimedOut, RunStatus::Failure];

    /// The snake_case wire form, usable as the `status` query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Queued => "queued",
            RunStatus::InProgress => "in_progress",
            RunStatus::Waiting => "waiting",
            RunStatus::Requested => "requested",
            RunStatus::ActionRequired => "action_required",
            RunStatus::Completed => "completed",
            RunStatus::Success => "success",
            RunStatus::Failure => "failure",
            RunStatus::Cancelled => "cancelled",
            RunStatus::TimedOut => "timed_out",
            RunStatus::Neutral => "neutral",
            RunStatus::Skipped => "skipped",
            RunStatus::Stale => "stale",
        }
    }

    /// Whether this status means the run has finished
    pub fn is_terminal(&self) -> bool {
        !matches!(
            self,
            RunStatus::Queued
                | RunStatus::InProgress
                | RunStatus::Waiting
                | RunStatus::Requested
                | RunStatus::ActionRequired
        )
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal outcome detail of a completed run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Conclusion {
    Success,
    Failure,
    Cancelled,
    TimedOut,
    Neutral,
    Skipped,
    Stale,
    ActionRequired,
    StartupFailure,
}

impl Conclusion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Conclusion::Success => "success",
            Conclusion::Failure => "failure",
            Conclusion::Cancelled => "cancelled",
            Conclusion::TimedOut => "timed_out",
            Conclusion::Neutral => "neutral",
            Conclusion::Skipped => "skipped",
            Conclusion::Stale => "stale",
            Conclusion::ActionRequired => "action_required",
            Conclusion::StartupFailure => "startup_failure",
        }
    }
}

impl std::fmt::Display for Conclusion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single workflow run record from the GitHub Actions API
///
/// `name` is optional in the wire format but the gate treats its absence as
/// a data-integrity error: name-based filtering cannot silently skip a run
/// it could not identify.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowRun {
    pub id: u64,
    pub name: Option<String>,
    pub status: RunStatus,
    pub head_sha: String,
    pub conclusion: Option<Conclusion>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub html_url: String,
}

/// Owner/repository pair identifying where runs are listed from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoId {
    pub owner: String,
    pub repo: String,
}

impl std::fmt::Display for RepoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}
