use axum::http::StatusCode;
use mock_service::MockWhisk;
use std::net::SocketAddr;
use tracing_subscriber::FmtSubscriber;

/// Serves the mock on `MOCK_ADDR` (default `0.0.0.0:3002`).
///
/// `MOCK_FAIL=beta:500,gamma:503` makes the listed actions answer with the given status.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_env_filter("mock_service=debug,tower_http=debug")
        .init();

    let addr: SocketAddr = std::env::var("MOCK_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3002".to_string())
        .parse()?;

    let mock = MockWhisk::new();
    if let Ok(failures) = std::env::var("MOCK_FAIL") {
        for entry in failures.split(',').filter(|e| !e.trim().is_empty()) {
            let (action, status) = entry
                .split_once(':')
                .ok_or_else(|| anyhow::anyhow!("Expected action:status, got {entry:?}"))?;
            let status = StatusCode::from_u16(status.trim().parse()?)?;
            mock.respond_with(action.trim(), status);
        }
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Mock invocation API listening on {}", listener.local_addr()?);
    mock.serve(listener).await?;
    Ok(())
}
