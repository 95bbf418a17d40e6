//! Default wskload runtime
//!
//! Spawns the simulated users, staggers their start according to the spawn rate, and stops them
//! all on ctrl-c or once the run time has elapsed.
use crate::error::RuntimeError;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, error, info, instrument, Instrument};
use wskload::{stopped, HttpTransport, LoadTask, Transport};
use wskload_core::{DriverStats, RunConfig};

pub const DEFAULT_USERS: usize = 1;
pub const DEFAULT_SPAWN_RATE: f64 = 1.;

/// Runs `users` independent [`LoadTask`]s against one shared [`RunConfig`].
///
/// # Example
///
/// ```ignore
/// use wskload_core::RunConfig;
/// use wskload_runtime::LoadRuntime;
///
/// #[tokio::main]
/// async fn main() {
///     let config = RunConfig::builder()
///         .base_url("https://10.0.0.1")
///         .actions(["echo"])
///         .username("guest")
///         .password("guest")
///         .build()
///         .unwrap();
///
///     LoadRuntime::new(config)
///         .users(50)
///         .spawn_rate(5.)
///         .run()
///         .await
///         .unwrap();
/// }
/// ```
#[derive(Debug)]
pub struct LoadRuntime {
    config: Arc<RunConfig>,
    users: usize,
    spawn_rate: f64,
    run_time: Option<Duration>,
}

impl LoadRuntime {
    pub fn new(config: RunConfig) -> Self {
        Self {
            config: Arc::new(config),
            users: DEFAULT_USERS,
            spawn_rate: DEFAULT_SPAWN_RATE,
            run_time: None,
        }
    }

    /// Number of simulated users (default `1`).
    pub fn users(mut self, users: usize) -> Self {
        self.users = users;
        self
    }

    /// Users started per second (default `1`).
    pub fn spawn_rate(mut self, spawn_rate: f64) -> Self {
        self.spawn_rate = spawn_rate;
        self
    }

    /// Stop every user after this long. Without it the run lasts until ctrl-c.
    pub fn run_time(mut self, run_time: impl Into<Option<Duration>>) -> Self {
        self.run_time = run_time.into();
        self
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Check the harness settings, returning the delay between user spawns.
    pub fn validate(&self) -> Result<Duration, RuntimeError> {
        if self.users == 0 {
            return Err(RuntimeError::NoUsers);
        }
        if !(self.spawn_rate.is_finite() && self.spawn_rate > 0.) {
            return Err(RuntimeError::SpawnRate(self.spawn_rate));
        }
        Duration::try_from_secs_f64(1. / self.spawn_rate)
            .map_err(|_| RuntimeError::SpawnRate(self.spawn_rate))
    }

    /// Run over HTTP until ctrl-c or the configured run time.
    pub async fn run(self) -> Result<Vec<DriverStats>, RuntimeError> {
        let transport = HttpTransport::new(&self.config)?;
        self.run_until(transport, ctrl_c()).await
    }

    /// Run with the given transport until `stop` resolves or the run time elapses.
    ///
    /// Returns the counters of every user that was started, in spawn order.
    #[instrument(name = "wskload", skip_all, fields(users = self.users))]
    pub async fn run_until<T, S>(
        self,
        transport: T,
        stop: S,
    ) -> Result<Vec<DriverStats>, RuntimeError>
    where
        T: Transport + Clone + 'static,
        S: Future<Output = ()> + Send + 'static,
    {
        let spawn_interval = self.validate()?;
        log_banner(&self.config);

        let (stop_tx, stop_rx) = watch::channel(false);
        let stop_tx = Arc::new(stop_tx);
        let run_time = self.run_time;
        let stopper_tx = Arc::clone(&stop_tx);
        let stopper = tokio::spawn(
            async move {
                tokio::select! {
                    _ = stop => info!("Stop requested"),
                    _ = deadline(run_time) => info!("Run time elapsed"),
                }
                let _ = stopper_tx.send(true);
            }
            .in_current_span(),
        );

        let mut spawn_rx = stop_rx.clone();
        let mut handles = Vec::with_capacity(self.users);
        for user in 0..self.users {
            if user > 0 {
                tokio::select! {
                    _ = tokio::time::sleep(spawn_interval) => {}
                    _ = stopped(&mut spawn_rx) => {
                        debug!("Stopped while spawning users");
                        break;
                    }
                }
            }

            let task = LoadTask::new(Arc::clone(&self.config), transport.clone()).user(user);
            handles.push(tokio::spawn(task.run(stop_rx.clone()).in_current_span()));
            debug!("Spawned simulated user {user}");
        }
        info!("{} simulated users running", handles.len());

        let mut stats = Vec::with_capacity(handles.len());
        let mut handles = handles.into_iter();
        while let Some(handle) = handles.next() {
            match handle.await {
                Ok(user) => stats.push(user),
                Err(err) => {
                    error!("Simulated user task failed, stopping the run: {err}");
                    let _ = stop_tx.send(true);
                    handles.for_each(|handle| handle.abort());
                    stopper.abort();
                    return Err(err.into());
                }
            }
        }
        stopper.abort();

        info!("All simulated users stopped: {}", DriverStats::sum(&stats));
        Ok(stats)
    }
}

fn log_banner(config: &RunConfig) {
    let actions: Vec<&str> = config.actions().iter().map(|a| a.name()).collect();
    let credentials = config.credentials();
    let wait = config.wait();

    info!("Testing:");
    info!("    host: {}", config.base_url());
    info!("    actions: {}", actions.join(", "));
    info!("    username: {}", credentials.username());
    info!(
        "    password: {}",
        credentials.password().masked(config.reveal_credentials())
    );
    info!(
        "    wait: {} .. {}",
        humantime::format_duration(wait.min()),
        humantime::format_duration(wait.max())
    );
    debug!("Full configuration: {config:?}");
}

async fn deadline(run_time: Option<Duration>) {
    match run_time {
        Some(run_time) => tokio::time::sleep(run_time).await,
        None => std::future::pending::<()>().await,
    }
}

async fn ctrl_c() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Unable to listen for ctrl-c, running until killed: {err}");
        std::future::pending::<()>().await;
    }
}
