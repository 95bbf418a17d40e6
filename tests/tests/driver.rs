mod utils;
use utils::*;

use mock_service::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use wskload::prelude::*;

#[tokio::test]
#[ntest::timeout(10000)]
async fn pass_posts_each_action_with_credentials() {
    let mock = MockWhisk::new();
    let addr = spawn_mock(&mock).await;

    let config = Arc::new(builder_for(addr, &["alpha", "beta"]).build().unwrap());
    let transport = HttpTransport::new(&config).unwrap();
    let mut task = LoadTask::new(config.clone(), transport);

    let report = task.run_pass().await;
    assert!(report.is_complete(), "{:?}", report.aborted);
    let statuses: Vec<_> = report.outcomes.iter().map(|o| o.status).collect();
    assert_eq!(statuses, vec![200, 200]);

    let seen = mock.invocations();
    let actions: Vec<_> = seen.iter().map(|i| i.action.as_str()).collect();
    assert_eq!(actions, vec!["alpha", "beta"]);
    for invocation in &seen {
        assert!(invocation.blocking);
        assert_eq!(
            invocation.username.as_deref(),
            Some(config.credentials().username())
        );
        assert_eq!(
            invocation.password.as_deref(),
            Some(config.credentials().password().expose())
        );
    }
}

#[tokio::test]
#[ntest::timeout(10000)]
async fn packaged_actions_keep_their_path() {
    let mock = MockWhisk::new();
    let addr = spawn_mock(&mock).await;

    let config = Arc::new(builder_for(addr, &["utils/echo"]).build().unwrap());
    let mut task = LoadTask::new(config.clone(), HttpTransport::new(&config).unwrap());

    assert!(task.run_pass().await.is_complete());
    assert_eq!(mock.invocations()[0].action, "utils/echo");
}

#[tokio::test]
#[ntest::timeout(10000)]
async fn server_error_does_not_stop_the_pass() {
    let mock = MockWhisk::new();
    mock.respond_with("beta", StatusCode::INTERNAL_SERVER_ERROR);
    let addr = spawn_mock(&mock).await;

    let config = Arc::new(builder_for(addr, &["alpha", "beta", "gamma"]).build().unwrap());
    let mut task = LoadTask::new(config.clone(), HttpTransport::new(&config).unwrap());

    let report = task.run_pass().await;
    assert!(report.is_complete());
    let statuses: Vec<_> = report.outcomes.iter().map(|o| o.status).collect();
    assert_eq!(statuses, vec![200, 500, 200]);
    assert_eq!(mock.invocations().len(), 3);
    assert_eq!(task.stats().unexpected_status, 1);
    assert_eq!(task.stats().failures, 0);
}

#[tokio::test]
#[ntest::timeout(10000)]
async fn request_timeout_is_enforced() {
    let mock = MockWhisk::new();
    mock.delay(Duration::from_secs(3));
    let addr = spawn_mock(&mock).await;

    let config = Arc::new(
        builder_for(addr, &["slow"])
            .request_timeout(Duration::from_millis(200))
            .build()
            .unwrap(),
    );
    let mut task = LoadTask::new(config.clone(), HttpTransport::new(&config).unwrap());

    let report = task.run_pass().await;
    assert!(matches!(report.aborted, Some(TransportError::Timeout(_))));
    assert_eq!(task.stats().transport_errors, 1);
}

#[tokio::test]
#[ntest::timeout(10000)]
async fn unreachable_host_is_survivable() {
    // Grab a free port, then close it again so nothing is listening.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = Arc::new(builder_for(addr, &["alpha", "beta"]).build().unwrap());
    let task = LoadTask::new(config.clone(), HttpTransport::new(&config).unwrap());

    let (tx, rx) = watch::channel(false);
    let handle = tokio::spawn(task.run(rx));
    tokio::time::sleep(Duration::from_millis(300)).await;
    tx.send(true).unwrap();

    let stats = handle.await.unwrap();
    assert_eq!(stats.passes, 0);
    assert!(stats.transport_errors >= 2, "{stats}");
    assert_eq!(stats.requests, stats.transport_errors);
}

#[tokio::test]
#[ntest::timeout(10000)]
async fn driver_loops_until_shutdown() {
    let mock = MockWhisk::new();
    let addr = spawn_mock(&mock).await;

    let config = Arc::new(builder_for(addr, &["alpha", "beta"]).build().unwrap());
    let task = LoadTask::new(config.clone(), HttpTransport::new(&config).unwrap());

    let (tx, rx) = watch::channel(false);
    let handle = tokio::spawn(task.run(rx));
    tokio::time::sleep(Duration::from_millis(500)).await;
    tx.send(true).unwrap();
    let stats = handle.await.unwrap();

    assert!(stats.passes >= 2, "{stats}");
    let seen = mock.invocations();
    assert_eq!(seen.len() as u64, stats.requests);
    for (idx, invocation) in seen.iter().enumerate() {
        let expected = if idx % 2 == 0 { "alpha" } else { "beta" };
        assert_eq!(invocation.action, expected);
    }
}
