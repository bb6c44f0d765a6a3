//! Workflow-run listing endpoint

use async_trait::async_trait;
use serde::Deserialize;
use wfgate_core::domain::run::{RunStatus, WorkflowRun};

use crate::GithubClient;
use crate::error::Result;

/// Read-only view of the GitHub Actions runs API
///
/// The gate only ever lists runs; keeping that single capability behind a
/// trait lets the poller and verifier be exercised against in-memory fakes.
#[async_trait]
pub trait ActionsApi: Send + Sync {
    /// List workflow runs for the repository with the given status
    async fn list_runs(&self, status: RunStatus) -> Result<Vec<WorkflowRun>>;
}

/// Wire shape of `GET /repos/{owner}/{repo}/actions/runs`
#[derive(Debug, Deserialize)]
struct ListRunsResponse {
    #[allow(dead_code)]
    total_count: u64,
    workflow_runs: Vec<WorkflowRun>,
}

#[async_trait]
impl ActionsApi for GithubClient {
    /// List workflow runs filtered server-side by a single status value
    ///
    /// See: https://docs.github.com/en/rest/reference/actions#list-workflow-runs-for-a-repository
    async fn list_runs(&self, status: RunStatus) -> Result<Vec<WorkflowRun>> {
        let url = format!(
            "{}/repos/{}/{}/actions/runs",
            self.base_url(),
            self.repo().owner,
            self.repo().repo
        );
        let response = self
            .get(&url)
            .query(&[("status", status.as_str()), ("per_page", "100")])
            .send()
            .await?;

        let body: ListRunsResponse = self.handle_response(response).await?;
        Ok(body.workflow_runs)
    }
}
