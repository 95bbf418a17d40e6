use std::fmt;

/// Counters for a single simulated user, returned when its driver stops.
///
/// `failures` counts transport errors, plus non-200 responses when the strict
/// [`StatusPolicy`](crate::StatusPolicy) is active.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DriverStats {
    pub passes: u64,
    pub requests: u64,
    pub unexpected_status: u64,
    pub transport_errors: u64,
    pub failures: u64,
}

impl DriverStats {
    pub fn merge(&mut self, other: &DriverStats) {
        self.passes += other.passes;
        self.requests += other.requests;
        self.unexpected_status += other.unexpected_status;
        self.transport_errors += other.transport_errors;
        self.failures += other.failures;
    }

    pub fn sum<'a>(stats: impl IntoIterator<Item = &'a DriverStats>) -> DriverStats {
        stats.into_iter().fold(DriverStats::default(), |mut acc, s| {
            acc.merge(s);
            acc
        })
    }
}

impl fmt::Display for DriverStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "passes={}, requests={}, unexpected_status={}, transport_errors={}, failures={}",
            self.passes, self.requests, self.unexpected_status, self.transport_errors, self.failures
        )
    }
}
