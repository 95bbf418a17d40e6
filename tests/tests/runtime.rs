mod utils;
use utils::*;

use mock_service::prelude::*;
use std::time::Duration;
use wskload::HttpTransport;
use wskload_core::{DriverStats, StatusPolicy};
use wskload_runtime::LoadRuntime;

#[tokio::test]
#[ntest::timeout(15000)]
async fn users_share_the_endpoint_until_run_time() {
    let mock = MockWhisk::new();
    let addr = spawn_mock(&mock).await;

    let config = builder_for(addr, &["alpha", "beta"]).build().unwrap();
    let transport = HttpTransport::new(&config).unwrap();
    let stats = LoadRuntime::new(config)
        .users(4)
        .spawn_rate(50.)
        .run_time(Duration::from_secs(1))
        .run_until(transport, std::future::pending::<()>())
        .await
        .unwrap();

    assert_eq!(stats.len(), 4);
    for user in &stats {
        assert!(user.passes >= 1, "{user}");
    }
    let total = DriverStats::sum(&stats);
    assert_eq!(total.requests, mock.invocations().len() as u64);
    assert_eq!(total.failures, 0);
}

#[tokio::test]
#[ntest::timeout(15000)]
async fn strict_policy_reports_failures() {
    let mock = MockWhisk::new();
    mock.respond_with("beta", StatusCode::SERVICE_UNAVAILABLE);
    let addr = spawn_mock(&mock).await;

    let config = builder_for(addr, &["alpha", "beta"])
        .status_policy(StatusPolicy::Strict)
        .build()
        .unwrap();
    let transport = HttpTransport::new(&config).unwrap();
    let stats = LoadRuntime::new(config)
        .users(2)
        .spawn_rate(100.)
        .run_until(transport, tokio::time::sleep(Duration::from_millis(500)))
        .await
        .unwrap();

    let total = DriverStats::sum(&stats);
    assert!(total.passes >= 2, "{total}");
    assert_eq!(total.failures, total.unexpected_status);
    assert!(total.failures >= total.passes);
}
