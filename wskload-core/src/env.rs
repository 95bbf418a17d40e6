use crate::{
    ConfigError, RunConfigBuilder, StatusPolicy, ENV_ACTION, ENV_ACTIONS, ENV_HOST, ENV_MAX_WAIT,
    ENV_MIN_WAIT, ENV_PASSWORD, ENV_REQUEST_TIMEOUT, ENV_STRICT_STATUS, ENV_USERNAME,
};
use std::time::Duration;
use tracing::debug;

impl RunConfigBuilder {
    /// Seed a builder from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Seed a builder from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut builder = RunConfigBuilder::default();

        if let Some(actions) = get(ENV_ACTIONS) {
            builder = builder.actions(parse_actions(&actions));
        } else if let Some(action) = get(ENV_ACTION) {
            debug!("{ENV_ACTIONS} not set, using {ENV_ACTION}");
            builder = builder.actions([action.trim().to_string()]);
        }

        if let Some(host) = get(ENV_HOST) {
            builder = builder.base_url(host);
        }
        if let Some(username) = get(ENV_USERNAME) {
            builder = builder.username(username);
        }
        if let Some(password) = get(ENV_PASSWORD) {
            builder = builder.password(password);
        }
        if let Some(min_wait) = get(ENV_MIN_WAIT) {
            builder = builder.min_wait(duration_setting(ENV_MIN_WAIT, &min_wait)?);
        }
        if let Some(max_wait) = get(ENV_MAX_WAIT) {
            builder = builder.max_wait(duration_setting(ENV_MAX_WAIT, &max_wait)?);
        }
        if let Some(timeout) = get(ENV_REQUEST_TIMEOUT) {
            builder = builder.request_timeout(duration_setting(ENV_REQUEST_TIMEOUT, &timeout)?);
        }
        if let Some(strict) = get(ENV_STRICT_STATUS) {
            if bool_setting(ENV_STRICT_STATUS, &strict)? {
                builder = builder.status_policy(StatusPolicy::Strict);
            }
        }

        Ok(builder)
    }
}

/// Split a comma-separated list of action identifiers, dropping blanks.
pub fn parse_actions(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|action| !action.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a wait or timeout. Bare integers are milliseconds, anything else goes through
/// `humantime` (`250ms`, `2s`, `1m 30s`).
pub fn parse_wait(raw: &str) -> Result<Duration, humantime::DurationError> {
    let raw = raw.trim();
    match raw.parse::<u64>() {
        Ok(millis) => Ok(Duration::from_millis(millis)),
        Err(_) => humantime::parse_duration(raw),
    }
}

fn duration_setting(key: &'static str, raw: &str) -> Result<Duration, ConfigError> {
    parse_wait(raw).map_err(|source| ConfigError::Duration { key, source })
}

fn bool_setting(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Bool {
            key,
            value: raw.to_string(),
        }),
    }
}
