//! Load Task Driver
//!
//! One [`LoadTask`] is one simulated user. Execution inside a task is strictly sequential:
//!
//! idle -> request-in-flight (once per action, in order) -> waiting -> idle
//!
//! until the [`Shutdown`] signal flips to `true`. The signal is only observed between requests
//! and while waiting; a request that is already in flight always runs to completion (or to the
//! configured request timeout).
use crate::transaction::transaction_hook;
use crate::transport::{Invocation, Transport, TransportError};
use rand::{rngs::SmallRng, SeedableRng};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, instrument, trace, warn};
use wskload_core::{DriverStats, RequestOutcome, RunConfig};

/// Cooperative cancellation signal. Drivers stop once it reads `true` or its sender is gone.
pub type Shutdown = tokio::sync::watch::Receiver<bool>;

/// What happened during one pass over the action sequence.
#[derive(Debug, Default)]
pub struct PassReport {
    pub outcomes: Vec<RequestOutcome>,
    /// Set when a transport failure cut the pass short.
    pub aborted: Option<TransportError>,
    /// Set when shutdown was observed before every action was issued.
    pub cancelled: bool,
}

impl PassReport {
    pub fn is_complete(&self) -> bool {
        self.aborted.is_none() && !self.cancelled
    }
}

pub struct LoadTask<T> {
    config: Arc<RunConfig>,
    transport: T,
    rng: SmallRng,
    user: usize,
    stats: DriverStats,
}

impl<T: Transport> LoadTask<T> {
    pub fn new(config: Arc<RunConfig>, transport: T) -> Self {
        Self::with_rng(config, transport, SmallRng::from_entropy())
    }

    /// Deterministic wait sequence, for reproducible runs.
    pub fn with_seed(config: Arc<RunConfig>, transport: T, seed: u64) -> Self {
        Self::with_rng(config, transport, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(config: Arc<RunConfig>, transport: T, rng: SmallRng) -> Self {
        Self {
            config,
            transport,
            rng,
            user: 0,
            stats: DriverStats::default(),
        }
    }

    /// Tag this task with a simulated-user index (shows up in log spans).
    pub fn user(mut self, user: usize) -> Self {
        self.user = user;
        self
    }

    pub fn stats(&self) -> DriverStats {
        self.stats
    }

    /// Draw the wait before the next pass.
    pub fn next_wait(&mut self) -> Duration {
        self.config.wait().sample(&mut self.rng)
    }

    /// Issue one request per configured action, in order.
    pub async fn run_pass(&mut self) -> PassReport {
        self.pass(|| false).await
    }

    /// Loop pass -> wait until `shutdown` fires, then return this user's counters.
    #[instrument(name = "driver", skip_all, fields(user = self.user))]
    pub async fn run(mut self, mut shutdown: Shutdown) -> DriverStats {
        debug!("Simulated user started");

        loop {
            if *shutdown.borrow() {
                break;
            }

            let report = self.pass(|| *shutdown.borrow()).await;
            if report.cancelled {
                break;
            }

            let wait = self.next_wait();
            trace!("Waiting {}", humantime::format_duration(wait));
            tokio::select! {
                _ = tokio::time::sleep(wait) => {}
                _ = stopped(&mut shutdown) => break,
            }
        }

        debug!("Simulated user stopped: {}", self.stats);
        self.stats
    }

    async fn pass(&mut self, cancelled: impl Fn() -> bool) -> PassReport {
        let config = Arc::clone(&self.config);
        let mut report = PassReport {
            outcomes: Vec::with_capacity(config.actions().len()),
            ..Default::default()
        };

        for action in config.actions() {
            if cancelled() {
                debug!("Shutdown observed mid-pass");
                report.cancelled = true;
                return report;
            }

            let invocation = Invocation {
                action: action.name(),
                url: action.url(),
                credentials: config.credentials(),
            };

            self.stats.requests += 1;
            match transaction_hook(&self.transport, &invocation).await {
                Ok(outcome) => {
                    trace!("{outcome}");
                    if !outcome.is_expected() {
                        warn!(
                            "Unexpected status {} invoking action {}",
                            outcome.status, outcome.action
                        );
                        self.stats.unexpected_status += 1;
                        if config.status_policy().is_failure(outcome.status) {
                            self.stats.failures += 1;
                        }
                    }
                    report.outcomes.push(outcome);
                }
                Err(err) => {
                    error!("Invoking action {} failed, abandoning pass: {err}", action.name());
                    self.stats.transport_errors += 1;
                    self.stats.failures += 1;
                    report.aborted = Some(err);
                    return report;
                }
            }
        }

        self.stats.passes += 1;
        report
    }
}

/// Resolves once `shutdown` reads `true` or its sender is dropped.
pub async fn stopped(shutdown: &mut Shutdown) {
    let _ = shutdown.wait_for(|stop| *stop).await;
}
