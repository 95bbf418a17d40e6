use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use wskload_core::{DriverStats, StatusPolicy};
use wskload_runtime::WskloadCli;

const DEFAULT_LOG_FILTER: &str = "wskload=info,wskload_runtime=info";

#[tokio::main]
async fn main() -> ExitCode {
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let runtime = match WskloadCli::parse().into_runtime() {
        Ok(runtime) => runtime,
        Err(err) => {
            error!("{err}");
            return ExitCode::FAILURE;
        }
    };
    let strict = runtime.config().status_policy() == StatusPolicy::Strict;

    match runtime.run().await {
        Ok(stats) => {
            let total = DriverStats::sum(&stats);
            info!("Finished: {total}");
            if strict && total.failures > 0 {
                error!("{} failed requests under strict status policy", total.failures);
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
