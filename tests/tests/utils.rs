use mock_service::MockWhisk;
use std::net::SocketAddr;
use std::sync::OnceLock;
use std::time::Duration;
use tracing_subscriber::FmtSubscriber;
use wskload_core::{RunConfig, RunConfigBuilder};

#[allow(unused)]
pub fn init() {
    static ONCE_LOCK: OnceLock<()> = OnceLock::new();

    ONCE_LOCK.get_or_init(|| {
        let _ = FmtSubscriber::builder()
            .with_env_filter("wskload=debug,wskload_runtime=debug,mock_service=debug")
            .with_test_writer()
            .try_init();
    });
}

/// Start a mock on a free local port.
#[allow(unused)]
pub async fn spawn_mock(mock: &MockWhisk) -> SocketAddr {
    init();
    let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
    mock.spawn(addr).await.expect("Mock service failed to bind")
}

#[allow(unused)]
pub fn builder_for(addr: SocketAddr, actions: &[&str]) -> RunConfigBuilder {
    RunConfig::builder()
        .base_url(format!("http://{addr}"))
        .actions(actions.iter().copied())
        .username("23bc46b1-71f6-4ed5-8c54-816aa4f8c502")
        .password("123zO3xZCLrMN6v2BKK1dXYFpXlPkccOFqm12CdAsMgRU4VrNZ9lyGVCGuMDGIwP")
        .wait(Duration::from_millis(20))
        .request_timeout(Duration::from_secs(5))
}
