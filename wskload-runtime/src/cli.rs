use crate::error::RuntimeError;
use crate::runtime::{LoadRuntime, DEFAULT_SPAWN_RATE, DEFAULT_USERS};
use clap::Parser;
use std::time::Duration;
use wskload_core::{parse_wait, RunConfigBuilder, StatusPolicy};

/// Command line for the `wskload` binary.
///
/// Every run setting can also come from the `TEST_*` environment variables; flags given here
/// take precedence over the environment.
#[derive(Parser, Debug)]
#[command(name = "wskload", version, about = "Synthetic load against blocking action invocations")]
pub struct WskloadCli {
    /// Base URL of the API host (env: TEST_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Comma-separated action identifiers (env: TEST_ACTIONS, TEST_ACTION)
    #[arg(short, long, value_delimiter = ',')]
    pub actions: Vec<String>,

    /// Basic-auth user (env: TEST_USERNAME)
    #[arg(long)]
    pub username: Option<String>,

    /// Basic-auth password (env: TEST_PASSWORD)
    #[arg(long)]
    pub password: Option<String>,

    /// Lower bound of the wait between passes; bare numbers are milliseconds (env: TEST_MIN_WAIT)
    #[arg(long, value_parser = parse_wait)]
    pub min_wait: Option<Duration>,

    /// Upper bound of the wait between passes (env: TEST_MAX_WAIT)
    #[arg(long, value_parser = parse_wait)]
    pub max_wait: Option<Duration>,

    /// Per-request timeout (env: TEST_REQUEST_TIMEOUT)
    #[arg(long, value_parser = parse_wait)]
    pub request_timeout: Option<Duration>,

    /// Count non-200 responses as failures and exit non-zero if any occur (env: TEST_STRICT_STATUS)
    #[arg(long)]
    pub strict_status: bool,

    /// Verify TLS certificates instead of accepting self-signed ones
    #[arg(long)]
    pub verify_tls: bool,

    /// Print the password in the startup banner
    #[arg(long)]
    pub reveal_credentials: bool,

    /// Number of simulated users
    #[arg(short, long, default_value_t = DEFAULT_USERS)]
    pub users: usize,

    /// Simulated users started per second
    #[arg(short('r'), long, default_value_t = DEFAULT_SPAWN_RATE)]
    pub spawn_rate: f64,

    /// Stop after this long, e.g. `90s` or `10m`
    #[arg(short('t'), long, value_parser = humantime::parse_duration)]
    pub run_time: Option<Duration>,
}

impl WskloadCli {
    /// Layer the flags that were given on top of `builder`.
    pub fn apply(&self, mut builder: RunConfigBuilder) -> RunConfigBuilder {
        if let Some(host) = &self.host {
            builder = builder.base_url(host);
        }
        if !self.actions.is_empty() {
            let actions = self.actions.iter().map(|a| a.trim()).filter(|a| !a.is_empty());
            builder = builder.actions(actions);
        }
        if let Some(username) = &self.username {
            builder = builder.username(username);
        }
        if let Some(password) = &self.password {
            builder = builder.password(password);
        }
        if let Some(min_wait) = self.min_wait {
            builder = builder.min_wait(min_wait);
        }
        if let Some(max_wait) = self.max_wait {
            builder = builder.max_wait(max_wait);
        }
        if let Some(timeout) = self.request_timeout {
            builder = builder.request_timeout(timeout);
        }
        if self.strict_status {
            builder = builder.status_policy(StatusPolicy::Strict);
        }
        builder
            .verify_tls(self.verify_tls)
            .reveal_credentials(self.reveal_credentials)
    }

    /// Resolve the environment plus flags into a ready-to-run [`LoadRuntime`].
    pub fn into_runtime(self) -> Result<LoadRuntime, RuntimeError> {
        let builder = RunConfigBuilder::from_env()?;
        self.into_runtime_with(builder)
    }

    pub fn into_runtime_with(self, builder: RunConfigBuilder) -> Result<LoadRuntime, RuntimeError> {
        let config = self.apply(builder).build()?;
        let runtime = LoadRuntime::new(config)
            .users(self.users)
            .spawn_rate(self.spawn_rate)
            .run_time(self.run_time);
        runtime.validate()?;
        Ok(runtime)
    }
}
