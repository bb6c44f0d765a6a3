//! GitHub invocation context
//!
//! Resolves the repository, the commit under evaluation, and the invoking
//! run's own id from the environment a workflow run executes in. The result
//! is an explicit value constructed once in `main` and passed down; nothing
//! else in the gate reads process state.

use anyhow::{Context as AnyhowContext, Result, anyhow};
use serde_json::Value as JsonValue;
use wfgate_core::domain::run::RepoId;

/// Identity of the invoking workflow run
#[derive(Debug, Clone)]
pub struct GithubContext {
    /// Repository the gate queries for runs
    pub repo: RepoId,

    /// Commit the gate is evaluating
    pub sha: String,

    /// Id of the run invoking the gate, excluded from every observation
    pub run_id: u64,
}

impl GithubContext {
    /// Builds the context from the standard GitHub Actions environment
    ///
    /// Reads `GITHUB_REPOSITORY`, `GITHUB_RUN_ID`, `GITHUB_SHA`, and, when
    /// present, the event payload behind `GITHUB_EVENT_PATH`. A missing or
    /// unreadable payload is not an error; it only means the direct commit
    /// is used.
    pub fn from_env() -> Result<Self> {
        let repository = std::env::var("GITHUB_REPOSITORY")
            .map_err(|_| anyhow!("GITHUB_REPOSITORY environment variable not set"))?;

        let run_id = std::env::var("GITHUB_RUN_ID")
            .map_err(|_| anyhow!("GITHUB_RUN_ID environment variable not set"))?;

        let sha = std::env::var("GITHUB_SHA")
            .map_err(|_| anyhow!("GITHUB_SHA environment variable not set"))?;

        let payload = std::env::var("GITHUB_EVENT_PATH")
            .ok()
            .and_then(|path| std::fs::read_to_string(path).ok())
            .and_then(|raw| serde_json::from_str::<JsonValue>(&raw).ok());

        Self::from_parts(&repository, &run_id, sha, payload.as_ref())
    }

    /// Assembles the context from already-read inputs
    pub fn from_parts(
        repository: &str,
        run_id: &str,
        sha: String,
        payload: Option<&JsonValue>,
    ) -> Result<Self> {
        let (owner, repo) = repository
            .split_once('/')
            .filter(|(owner, repo)| !owner.is_empty() && !repo.is_empty())
            .ok_or_else(|| anyhow!("Malformed repository identifier: '{}'", repository))?;

        let run_id: u64 = run_id
            .parse()
            .with_context(|| format!("Invalid run id: '{}'", run_id))?;

        Ok(Self {
            repo: RepoId {
                owner: owner.to_string(),
                repo: repo.to_string(),
            },
            sha: resolve_sha(sha, payload),
            run_id,
        })
    }
}

/// Picks the commit the gate evaluates
///
/// A pull-request event gates on the PR head commit and a workflow_run event
/// on its recorded head commit; everything else uses the direct commit.
fn resolve_sha(direct_sha: String, payload: Option<&JsonValue>) -> String {
    let Some(payload) = payload else {
        return direct_sha;
    };

    if let Some(sha) = payload
        .pointer("/pull_request/head/sha")
        .and_then(JsonValue::as_str)
    {
        return sha.to_string();
    }

    if let Some(sha) = payload
        .pointer("/workflow_run/head_sha")
        .and_then(JsonValue::as_str)
    {
        return sha.to_string();
    }

    direct_sha
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pull_request_head_takes_precedence() {
        let payload = json!({
            "pull_request": { "head": { "sha": "pr-head-sha" } },
            "workflow_run": { "head_sha": "wr-head-sha" }
        });

        let ctx = GithubContext::from_parts(
            "octo-org/octo-repo",
            "42",
            "direct-sha".to_string(),
            Some(&payload),
        )
        .unwrap();
        assert_eq!(ctx.sha, "pr-head-sha");
    }

    #[test]
    fn test_workflow_run_head_sha_used_without_pull_request() {
        let payload = json!({
            "workflow_run": { "head_sha": "wr-head-sha" }
        });

        let ctx = GithubContext::from_parts(
            "octo-org/octo-repo",
            "42",
            "direct-sha".to_string(),
            Some(&payload),
        )
        .unwrap();
        assert_eq!(ctx.sha, "wr-head-sha");
    }

    #[test]
    fn test_direct_sha_when_payload_is_unhelpful() {
        let payload = json!({ "push": {} });

        let ctx = GithubContext::from_parts(
            "octo-org/octo-repo",
            "42",
            "direct-sha".to_string(),
            Some(&payload),
        )
        .unwrap();
        assert_eq!(ctx.sha, "direct-sha");

        let ctx =
            GithubContext::from_parts("octo-org/octo-repo", "42", "direct-sha".to_string(), None)
                .unwrap();
        assert_eq!(ctx.sha, "direct-sha");
    }

    #[test]
    fn test_repository_must_be_owner_slash_repo() {
        assert!(GithubContext::from_parts("octo-org", "42", "sha".to_string(), None).is_err());
        assert!(GithubContext::from_parts("/repo", "42", "sha".to_string(), None).is_err());
    }

    #[test]
    fn test_run_id_must_be_numeric() {
        assert!(
            GithubContext::from_parts("octo-org/octo-repo", "not-a-number", "sha".to_string(), None)
                .is_err()
        );
    }

    #[test]
    fn test_context_fields() {
        let ctx =
            GithubContext::from_parts("octo-org/octo-repo", "42", "sha".to_string(), None).unwrap();
        assert_eq!(ctx.repo.owner, "octo-org");
        assert_eq!(ctx.repo.repo, "octo-repo");
        assert_eq!(ctx.run_id, 42);
    }
}
