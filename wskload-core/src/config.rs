use crate::{
    ConfigError, Credentials, ACTIONS_PATH, BLOCKING_QUERY, DEFAULT_MAX_WAIT, DEFAULT_MIN_WAIT,
    DEFAULT_REQUEST_TIMEOUT, EXPECTED_STATUS,
};
use rand::Rng;
use serde::Serialize;
use serde_with::{serde_as, DurationMilliSeconds};
use std::time::Duration;
use url::Url;

/// Inclusive range the wait between passes is drawn from.
#[serde_as]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct WaitRange {
    #[serde_as(as = "DurationMilliSeconds")]
    min: Duration,
    #[serde_as(as = "DurationMilliSeconds")]
    max: Duration,
}

impl WaitRange {
    pub fn new(min: Duration, max: Duration) -> Result<Self, ConfigError> {
        if min > max {
            return Err(ConfigError::InvertedWait { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn fixed(wait: Duration) -> Self {
        Self {
            min: wait,
            max: wait,
        }
    }

    pub fn min(&self) -> Duration {
        self.min
    }

    pub fn max(&self) -> Duration {
        self.max
    }

    /// Draw a wait uniformly from `[min, max]`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        if self.min == self.max {
            self.min
        } else {
            rng.gen_range(self.min..=self.max)
        }
    }
}

impl Default for WaitRange {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_WAIT,
            max: DEFAULT_MAX_WAIT,
        }
    }
}

/// How a response whose status is not `200` is accounted for.
///
/// Either way a warning is logged and the run continues.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum StatusPolicy {
    /// Count it as a completed request.
    #[default]
    Lenient,
    /// Count it as a failure.
    Strict,
}

impl StatusPolicy {
    pub fn is_failure(&self, status: u16) -> bool {
        matches!(self, StatusPolicy::Strict) && status != EXPECTED_STATUS
    }
}

/// An action identifier together with its resolved invocation URL.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Action {
    name: String,
    url: Url,
}

impl Action {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

/// Run Configuration
///
/// Built once at process start through [`RunConfigBuilder`] and read-only afterwards. Every
/// simulated user shares the same instance.
#[serde_as]
#[derive(Clone, Debug, Serialize)]
pub struct RunConfig {
    base_url: Url,
    actions: Vec<Action>,
    credentials: Credentials,
    wait: WaitRange,
    #[serde_as(as = "DurationMilliSeconds")]
    request_timeout: Duration,
    status_policy: StatusPolicy,
    verify_tls: bool,
    reveal_credentials: bool,
}

impl RunConfig {
    pub fn builder() -> RunConfigBuilder {
        RunConfigBuilder::default()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Actions in the order a pass visits them. Never empty.
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn wait(&self) -> WaitRange {
        self.wait
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn status_policy(&self) -> StatusPolicy {
        self.status_policy
    }

    pub fn verify_tls(&self) -> bool {
        self.verify_tls
    }

    pub fn reveal_credentials(&self) -> bool {
        self.reveal_credentials
    }
}

/// Collects settings from any number of sources; later setters win.
#[derive(Clone, Debug, Default)]
pub struct RunConfigBuilder {
    base_url: Option<String>,
    actions: Vec<String>,
    username: Option<String>,
    password: Option<String>,
    min_wait: Option<Duration>,
    max_wait: Option<Duration>,
    request_timeout: Option<Duration>,
    status_policy: Option<StatusPolicy>,
    verify_tls: bool,
    reveal_credentials: bool,
}

impl RunConfigBuilder {
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn actions<I, S>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.actions = actions.into_iter().map(Into::into).collect();
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn min_wait(mut self, min_wait: Duration) -> Self {
        self.min_wait = Some(min_wait);
        self
    }

    pub fn max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = Some(max_wait);
        self
    }

    /// Set both wait bounds to the same value.
    pub fn wait(self, wait: Duration) -> Self {
        self.min_wait(wait).max_wait(wait)
    }

    pub fn request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = Some(request_timeout);
        self
    }

    pub fn status_policy(mut self, status_policy: StatusPolicy) -> Self {
        self.status_policy = Some(status_policy);
        self
    }

    pub fn verify_tls(mut self, verify_tls: bool) -> Self {
        self.verify_tls = verify_tls;
        self
    }

    pub fn reveal_credentials(mut self, reveal_credentials: bool) -> Self {
        self.reveal_credentials = reveal_credentials;
        self
    }

    pub fn build(self) -> Result<RunConfig, ConfigError> {
        let base_url = self.base_url.ok_or(ConfigError::Missing("host"))?;
        let base_url = parse_base_url(&base_url)?;

        let username = self.username.ok_or(ConfigError::Missing("username"))?;
        let password = self.password.ok_or(ConfigError::Missing("password"))?;

        if self.actions.is_empty() {
            return Err(ConfigError::NoActions);
        }
        let actions = self
            .actions
            .iter()
            .map(|name| resolve_action(&base_url, name))
            .collect::<Result<Vec<_>, _>>()?;

        let wait = WaitRange::new(
            self.min_wait.unwrap_or(DEFAULT_MIN_WAIT),
            self.max_wait.unwrap_or(DEFAULT_MAX_WAIT),
        )?;

        let request_timeout = self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT);
        if request_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }

        Ok(RunConfig {
            base_url,
            actions,
            credentials: Credentials::new(username, password),
            wait,
            request_timeout,
            status_policy: self.status_policy.unwrap_or_default(),
            verify_tls: self.verify_tls,
            reveal_credentials: self.reveal_credentials,
        })
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim())?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(ConfigError::UnsupportedUrl(raw.to_string()));
    }
    Ok(url)
}

/// `{base}/api/v1/namespaces/_/actions/{action}?blocking=true`
///
/// Packaged actions (`pkg/action`) keep their slash as a path separator.
fn resolve_action(base_url: &Url, name: &str) -> Result<Action, ConfigError> {
    let name = name.trim();
    let segments: Vec<&str> = name.split('/').collect();
    if segments
        .iter()
        .any(|segment| matches!(*segment, "" | "." | ".."))
    {
        return Err(ConfigError::InvalidAction(name.to_string()));
    }

    let mut url = base_url.clone();
    url.set_query(None);
    url.set_fragment(None);
    url.path_segments_mut()
        .map_err(|_| ConfigError::UnsupportedUrl(base_url.to_string()))?
        .pop_if_empty()
        .extend(ACTIONS_PATH)
        .extend(segments);
    url.set_query(Some(BLOCKING_QUERY));

    Ok(Action {
        name: name.to_string(),
        url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::SmallRng, SeedableRng};

    fn builder() -> RunConfigBuilder {
        RunConfig::builder()
            .base_url("https://whisk.example.com")
            .actions(["alpha", "beta"])
            .username("guest")
            .password("hunter2")
    }

    #[test]
    fn resolves_action_urls_in_order() {
        let config = builder().build().unwrap();
        let urls: Vec<_> = config.actions().iter().map(|a| a.url().as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://whisk.example.com/api/v1/namespaces/_/actions/alpha?blocking=true",
                "https://whisk.example.com/api/v1/namespaces/_/actions/beta?blocking=true",
            ]
        );
    }

    #[test]
    fn base_path_is_preserved() {
        let config = builder()
            .base_url("http://localhost:8080/whisk/")
            .actions(["pkg/echo"])
            .build()
            .unwrap();
        assert_eq!(
            config.actions()[0].url().as_str(),
            "http://localhost:8080/whisk/api/v1/namespaces/_/actions/pkg/echo?blocking=true"
        );
        assert_eq!(config.actions()[0].name(), "pkg/echo");
    }

    #[test]
    fn defaults() {
        let config = builder().build().unwrap();
        assert_eq!(config.wait(), WaitRange::fixed(Duration::from_millis(10)));
        assert_eq!(config.request_timeout(), DEFAULT_REQUEST_TIMEOUT);
        assert_eq!(config.status_policy(), StatusPolicy::Lenient);
        assert!(!config.verify_tls());
        assert!(!config.reveal_credentials());
    }

    #[test]
    fn rejects_inverted_wait() {
        let err = builder()
            .min_wait(Duration::from_millis(500))
            .max_wait(Duration::from_millis(100))
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvertedWait { .. }));
    }

    #[test]
    fn rejects_missing_fields() {
        let err = RunConfig::builder()
            .actions(["alpha"])
            .username("guest")
            .password("pw")
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("host")));

        let err = builder().actions(Vec::<String>::new()).build().unwrap_err();
        assert!(matches!(err, ConfigError::NoActions));

        let err = RunConfig::builder()
            .base_url("http://localhost")
            .actions(["alpha"])
            .username("guest")
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("password")));
    }

    #[test]
    fn rejects_bad_urls_and_actions() {
        assert!(matches!(
            builder().base_url("mailto:ops@example.com").build(),
            Err(ConfigError::UnsupportedUrl(_))
        ));
        assert!(matches!(
            builder().base_url("not a url").build(),
            Err(ConfigError::Url(_))
        ));
        for name in ["pkg//echo", "..", ".", "pkg/..", "./echo"] {
            assert!(
                matches!(
                    builder().actions([name]).build(),
                    Err(ConfigError::InvalidAction(_))
                ),
                "{name}"
            );
        }
        assert!(matches!(
            builder().request_timeout(Duration::ZERO).build(),
            Err(ConfigError::ZeroTimeout)
        ));
    }

    #[test]
    fn serializes_durations_as_millis_without_password() {
        let config = builder()
            .min_wait(Duration::from_millis(100))
            .max_wait(Duration::from_millis(500))
            .request_timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        let value = serde_json::to_value(&config).unwrap();

        assert_eq!(value["wait"]["min"], 100);
        assert_eq!(value["wait"]["max"], 500);
        assert_eq!(value["request_timeout"], 5000);
        assert_eq!(value["credentials"]["username"], "guest");
        assert!(value["credentials"].get("password").is_none());
        assert!(!value.to_string().contains("hunter2"));
    }

    #[test]
    fn wait_samples_stay_in_range() {
        let mut rng = SmallRng::seed_from_u64(7);
        let ranges = [(0, 0), (10, 10), (100, 500), (0, 1), (250, 260)];
        for (min, max) in ranges {
            let range =
                WaitRange::new(Duration::from_millis(min), Duration::from_millis(max)).unwrap();
            for _ in 0..1_000 {
                let wait = range.sample(&mut rng);
                assert!(wait >= range.min() && wait <= range.max(), "{wait:?}");
            }
        }
    }

    #[test]
    fn strict_policy_flags_non_200() {
        assert!(StatusPolicy::Strict.is_failure(500));
        assert!(StatusPolicy::Strict.is_failure(202));
        assert!(!StatusPolicy::Strict.is_failure(200));
        assert!(!StatusPolicy::Lenient.is_failure(500));
    }
}
