use crate::EXPECTED_STATUS;
use std::fmt;
use std::time::Duration;

/// Result of a single invocation. Produced per request and logged or discarded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestOutcome {
    pub action: String,
    pub status: u16,
    pub latency: Duration,
}

impl RequestOutcome {
    pub fn is_expected(&self) -> bool {
        self.status == EXPECTED_STATUS
    }
}

impl fmt::Display for RequestOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} in {}",
            self.action,
            self.status,
            humantime::format_duration(self.latency)
        )
    }
}
