//! Gate orchestration
//!
//! Sequences the phases of one gate invocation: initial delay, poll until
//! no matching workflow is in flight, then an optional verification that
//! none of the matching runs failed. Any error at any phase ends the gate.

mod error;
mod poller;
mod verify;

pub use error::GateError;
pub use poller::{CheckOutcome, PollCheck, PollConfig, poll};

use async_trait::async_trait;
use tokio::time::sleep;
use tracing::info;
use wfgate_client::{ActionsApi, fetch_runs};
use wfgate_core::domain::filter::{FilterCriteria, filter_runs};
use wfgate_core::domain::run::RunStatus;

use crate::config::GateConfig;

/// Terminal outcome of a successful or timed-out gate, by stable name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    WorkflowsAwaitedOk,
    TimeoutExceeded,
}

impl std::fmt::Display for GateOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GateOutcome::WorkflowsAwaitedOk => f.write_str("workflows_awaited_ok"),
            GateOutcome::TimeoutExceeded => f.write_str("action_timeout_exceeded"),
        }
    }
}

/// One gate invocation over a runs API
pub struct Gate<'a> {
    api: &'a dyn ActionsApi,
    criteria: FilterCriteria,
    config: GateConfig,
}

impl<'a> Gate<'a> {
    /// Creates a gate over the given API, criteria, and configuration
    pub fn new(api: &'a dyn ActionsApi, criteria: FilterCriteria, config: GateConfig) -> Self {
        Self {
            api,
            criteria,
            config,
        }
    }

    /// Runs the gate to its terminal outcome
    ///
    /// # Errors
    /// Short-circuits with the first error any phase raises; see
    /// [`GateError`] for the taxonomy.
    pub async fn run(&self) -> Result<GateOutcome, GateError> {
        if !self.config.initial_delay.is_zero() {
            info!(
                "Waiting {}s before the first poll",
                self.config.initial_delay.as_secs()
            );
            sleep(self.config.initial_delay).await;
        }

        let poll_config = PollConfig {
            timeout: self.config.timeout,
            interval: self.config.interval,
        };
        let mut check = WorkflowsCheck {
            api: self.api,
            criteria: &self.criteria,
        };
        poller::poll(&poll_config, &mut check).await?;

        if self.config.require_success {
            verify::verify_no_failures(self.api, &self.criteria).await?;
        }

        Ok(GateOutcome::WorkflowsAwaitedOk)
    }
}

/// Poll check observing the in-flight workflow runs for the gate's commit
struct WorkflowsCheck<'a> {
    api: &'a dyn ActionsApi,
    criteria: &'a FilterCriteria,
}

#[async_trait]
impl PollCheck for WorkflowsCheck<'_> {
    async fn observe(&mut self, retries: u32) -> Result<CheckOutcome, GateError> {
        let runs = fetch_runs(self.api, &RunStatus::IN_FLIGHT).await?;
        let mut in_flight = filter_runs(runs, self.criteria)?;
        // A run can flip to completed between the server-side status filter
        // and this observation; those are done and not worth waiting on.
        in_flight.retain(|run| run.status != RunStatus::Completed);

        if in_flight.is_empty() {
            return Ok(CheckOutcome::Clear);
        }

        info!(
            "Retry #{} - {} {} in progress found. Please, wait until completion \
             or consider cancelling these workflows manually:",
            retries,
            in_flight.len(),
            if in_flight.len() > 1 {
                "workflows"
            } else {
                "workflow"
            }
        );
        for run in &in_flight {
            info!("* {}: {}", run.name.as_deref().unwrap_or("<unnamed>"), run.status);
        }

        Ok(CheckOutcome::InFlight(in_flight.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;
    use wfgate_client::error::Result as ClientResult;
    use wfgate_core::domain::run::{Conclusion, WorkflowRun};

    const SHA: &str = "acb5820ced9479c074f688cc328bf03f341a511d";
    const SELF_ID: u64 = 42;

    fn run(id: u64, name: &str, status: RunStatus, conclusion: Option<Conclusion>) -> WorkflowRun {
        WorkflowRun {
            id,
            name: Some(name.to_string()),
            status,
            head_sha: SHA.to_string(),
            conclusion,
            created_at: chrono::Utc::now(),
            html_url: format!("https://github.com/octo-org/octo-repo/actions/runs/{id}"),
        }
    }

    fn criteria() -> FilterCriteria {
        FilterCriteria::new(SHA, SELF_ID)
    }

    fn config(require_success: bool) -> GateConfig {
        GateConfig {
            timeout: Duration::from_millis(100),
            interval: Duration::from_millis(5),
            initial_delay: Duration::ZERO,
            require_success,
        }
    }

    /// Fake API serving a scripted queue of responses per status
    ///
    /// Once a status's queue is drained it keeps answering with an empty
    /// list, and every queried status is recorded.
    struct ScriptedApi {
        responses: Mutex<HashMap<RunStatus, VecDeque<Vec<WorkflowRun>>>>,
        queried: Mutex<Vec<RunStatus>>,
    }

    impl ScriptedApi {
        fn new() -> Self {
            Self {
                responses: Mutex::new(HashMap::new()),
                queried: Mutex::new(Vec::new()),
            }
        }

        fn push(&self, status: RunStatus, runs: Vec<WorkflowRun>) {
            self.responses
                .lock()
                .unwrap()
                .entry(status)
                .or_default()
                .push_back(runs);
        }

        fn queried(&self) -> Vec<RunStatus> {
            self.queried.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ActionsApi for ScriptedApi {
        async fn list_runs(&self, status: RunStatus) -> ClientResult<Vec<WorkflowRun>> {
            self.queried.lock().unwrap().push(status);
            Ok(self
                .responses
                .lock()
                .unwrap()
                .get_mut(&status)
                .and_then(VecDeque::pop_front)
                .unwrap_or_default())
        }
    }

    #[tokio::test]
    async fn test_gate_waits_until_runs_clear() {
        let api = ScriptedApi::new();
        // First tick sees two queued runs, second tick sees none.
        api.push(
            RunStatus::Queued,
            vec![
                run(1, "Build", RunStatus::Queued, None),
                run(2, "Test", RunStatus::Queued, None),
            ],
        );

        let gate = Gate::new(&api, criteria(), config(false));
        let outcome = gate.run().await.unwrap();
        assert_eq!(outcome, GateOutcome::WorkflowsAwaitedOk);

        // Both ticks queried both in-flight statuses.
        let in_flight_queries = api
            .queried()
            .iter()
            .filter(|s| RunStatus::IN_FLIGHT.contains(s))
            .count();
        assert_eq!(in_flight_queries, 4);
    }

    #[tokio::test]
    async fn test_gate_times_out_while_runs_stay_busy() {
        /// Always-busy API: every in-progress query reports the same run
        struct BusyApi;

        #[async_trait]
        impl ActionsApi for BusyApi {
            async fn list_runs(&self, status: RunStatus) -> ClientResult<Vec<WorkflowRun>> {
                Ok(match status {
                    RunStatus::InProgress => vec![run(7, "Build", RunStatus::InProgress, None)],
                    _ => vec![],
                })
            }
        }

        let gate_config = GateConfig {
            timeout: Duration::from_millis(10),
            interval: Duration::from_millis(5),
            initial_delay: Duration::ZERO,
            require_success: false,
        };

        let gate = Gate::new(&BusyApi, criteria(), gate_config);
        let err = gate.run().await.unwrap_err();
        assert!(matches!(err, GateError::TimeoutExceeded));
        assert_eq!(err.to_string(), GateOutcome::TimeoutExceeded.to_string());
    }

    #[tokio::test]
    async fn test_require_success_fails_on_failed_run() {
        let api = ScriptedApi::new();
        api.push(
            RunStatus::Failure,
            vec![run(
                9,
                "Deploy",
                RunStatus::Completed,
                Some(Conclusion::Failure),
            )],
        );

        let gate = Gate::new(&api, criteria(), config(true));
        let err = gate.run().await.unwrap_err();
        assert!(matches!(err, GateError::FailedWorkflows { count: 1 }));
    }

    #[tokio::test]
    async fn test_verifier_skipped_without_require_success() {
        let api = ScriptedApi::new();
        // A failed run exists, but the verify phase must never see it.
        api.push(
            RunStatus::Failure,
            vec![run(
                9,
                "Deploy",
                RunStatus::Completed,
                Some(Conclusion::Failure),
            )],
        );

        let gate = Gate::new(&api, criteria(), config(false));
        gate.run().await.unwrap();

        assert!(
            api.queried()
                .iter()
                .all(|s| !RunStatus::FAILURE_CLASS.contains(s))
        );
    }

    #[tokio::test]
    async fn test_require_success_passes_with_no_failures() {
        let api = ScriptedApi::new();

        let gate = Gate::new(&api, criteria(), config(true));
        let outcome = gate.run().await.unwrap();
        assert_eq!(outcome, GateOutcome::WorkflowsAwaitedOk);

        // Verify phase queried all three failure-class statuses.
        for status in RunStatus::FAILURE_CLASS {
            assert!(api.queried().contains(&status));
        }
    }

    #[tokio::test]
    async fn test_own_run_never_blocks_the_gate() {
        let api = ScriptedApi::new();
        api.push(
            RunStatus::InProgress,
            vec![run(SELF_ID, "Gate", RunStatus::InProgress, None)],
        );

        let gate = Gate::new(&api, criteria(), config(false));
        let outcome = gate.run().await.unwrap();
        assert_eq!(outcome, GateOutcome::WorkflowsAwaitedOk);
    }
}
