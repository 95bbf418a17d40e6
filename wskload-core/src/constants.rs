use std::time::Duration;

/// Path segments between the base URL and the action identifier.
pub const ACTIONS_PATH: [&str; 5] = ["api", "v1", "namespaces", "_", "actions"];

/// Query string attached to every invocation so the call waits for the activation result.
pub const BLOCKING_QUERY: &str = "blocking=true";

/// The only status code treated as a healthy invocation.
pub const EXPECTED_STATUS: u16 = 200;

/// The default lower bound of the wait between passes.
pub const DEFAULT_MIN_WAIT: Duration = Duration::from_millis(10);

/// The default upper bound of the wait between passes.
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_millis(10);

/// The default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Placeholder printed in place of secrets.
pub const REDACTED: &str = "<redacted>";

pub const ENV_ACTIONS: &str = "TEST_ACTIONS";
pub const ENV_ACTION: &str = "TEST_ACTION";
pub const ENV_USERNAME: &str = "TEST_USERNAME";
pub const ENV_PASSWORD: &str = "TEST_PASSWORD";
pub const ENV_HOST: &str = "TEST_HOST";
pub const ENV_MIN_WAIT: &str = "TEST_MIN_WAIT";
pub const ENV_MAX_WAIT: &str = "TEST_MAX_WAIT";
pub const ENV_REQUEST_TIMEOUT: &str = "TEST_REQUEST_TIMEOUT";
pub const ENV_STRICT_STATUS: &str = "TEST_STRICT_STATUS";
