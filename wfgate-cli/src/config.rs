//! Gate configuration
//!
//! Arguments arrive either on the command line or through the environment
//! variables a GitHub Action invocation provides (the `INPUT_*` names).
//! Everything downstream works with an explicit [`GateConfig`] value; no
//! code below `main` reads configuration from ambient state.

use clap::Parser;
use std::time::Duration;
use tracing::info;

/// Command-line interface for the workflow gate
#[derive(Debug, Parser)]
#[command(name = "wfgate")]
#[command(about = "Wait for other GitHub workflow runs on the same commit", long_about = None)]
pub struct Cli {
    /// Maximum time to wait for in-flight workflows, in seconds
    #[arg(long, env = "INPUT_TIMEOUT", default_value_t = 600)]
    pub timeout: u64,

    /// Seconds between polls
    #[arg(long, env = "INPUT_INTERVAL", default_value_t = 10)]
    pub interval: u64,

    /// Seconds to wait before the first poll
    #[arg(long, env = "INPUT_INITIAL_DELAY", default_value_t = 0)]
    pub initial_delay: u64,

    /// After waiting, fail if any matching run concluded in a failure-class status
    #[arg(long, env = "INPUT_REQUIRE_SUCCESS")]
    pub require_success: bool,

    /// Newline-separated allow-list of workflow names to wait for
    #[arg(long, env = "INPUT_WORKFLOWS", default_value = "")]
    pub workflows: String,

    /// Newline-separated deny-list of workflow names to ignore
    #[arg(long, env = "INPUT_EXCLUDEDWORKFLOWS", default_value = "")]
    pub excluded_workflows: String,

    /// Token used to authenticate against the GitHub API
    #[arg(long, env = "INPUT_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: String,

    /// Base URL of the GitHub API
    #[arg(long, env = "GITHUB_API_URL", default_value = "https://api.github.com")]
    pub api_url: String,
}

/// Resolved gate timings and verification switch
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Maximum wall-clock time spent polling
    pub timeout: Duration,

    /// Pause between poll ticks
    pub interval: Duration,

    /// Pause before the first poll; zero means no wait
    pub initial_delay: Duration,

    /// Whether to run the failure verification phase after the wait clears
    pub require_success: bool,
}

impl GateConfig {
    /// Builds the gate configuration from parsed CLI arguments
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            timeout: Duration::from_secs(cli.timeout),
            interval: Duration::from_secs(cli.interval),
            initial_delay: Duration::from_secs(cli.initial_delay),
            require_success: cli.require_success,
        }
    }

    /// Logs the configuration one line, before the gate starts
    pub fn log_summary(&self) {
        info!(
            "Gate configuration: {}s initial delay, {}s interval, {}s timeout, require success: {}",
            self.initial_delay.as_secs(),
            self.interval.as_secs(),
            self.timeout.as_secs(),
            self.require_success
        );
    }
}

/// Splits a newline-separated name list into trimmed, non-empty entries
///
/// Action inputs deliver multi-line values as a single string, one name per
/// line.
pub fn parse_name_list(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
