//! Wfgate GitHub Client
//!
//! A small, type-safe client for the GitHub Actions REST API, scoped to the
//! single read-only capability the gate needs: listing workflow runs for a
//! repository filtered by status.
//!
//! The [`ActionsApi`] trait is the seam between the gate and the network;
//! [`GithubClient`] is its production implementation and tests substitute
//! their own.
//!
//! # Example
//!
//! ```no_run
//! use wfgate_client::{ActionsApi, GithubClient};
//! use wfgate_core::domain::run::{RepoId, RunStatus};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), wfgate_client::ClientError> {
//!     let repo = RepoId {
//!         owner: "octo-org".to_string(),
//!         repo: "octo-repo".to_string(),
//!     };
//!     let client = GithubClient::new("https://api.github.com", "ghp_example", repo);
//!
//!     let runs = client.list_runs(RunStatus::Queued).await?;
//!     println!("{} queued run(s)", runs.len());
//!     Ok(())
//! }
//! ```

pub mod error;
mod fetch;
mod runs;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use fetch::fetch_runs;
pub use runs::ActionsApi;

use reqwest::Client;
use serde::de::DeserializeOwned;
use wfgate_core::domain::run::RepoId;

/// User agent sent with every request; GitHub rejects anonymous clients
const USER_AGENT: &str = concat!("wfgate/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the GitHub Actions API
#[derive(Debug, Clone)]
pub struct GithubClient {
    /// Base URL of the API (e.g., "https://api.github.com")
    base_url: String,
    /// Bearer credential supplied by the caller
    token: String,
    /// Repository whose runs are listed
    repo: RepoId,
    /// HTTP client instance
    client: Client,
}

impl GithubClient {
    /// Create a new GitHub client
    ///
    /// # Arguments
    /// * `base_url` - API base URL; trailing slashes are trimmed
    /// * `token` - bearer token used to authenticate every request
    /// * `repo` - repository whose workflow runs are queried
    pub fn new(base_url: impl Into<String>, token: impl Into<String>, repo: RepoId) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
            repo,
            client: Client::new(),
        }
    }

    /// Create a new GitHub client with a custom HTTP client
    ///
    /// Allows configuring timeouts, proxies, TLS settings, etc.
    pub fn with_client(
        base_url: impl Into<String>,
        token: impl Into<String>,
        repo: RepoId,
        client: Client,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
            repo,
            client,
        }
    }

    /// Get the base URL of the API
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the repository this client queries
    pub fn repo(&self) -> &RepoId {
        &self.repo
    }

    /// Build a GET request with the standard auth and accept headers
    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .get(url)
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .header(reqwest::header::USER_AGENT, USER_AGENT)
    }

    /// Handle an API response and deserialize JSON
    ///
    /// Checks the status code and returns an appropriate error if the
    /// request failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}
